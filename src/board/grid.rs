//! Board state: the 70 cells and their invariant-preserving accessors.
//!
//! Uses a fixed-size array indexed by `Coord::index` for O(1) lookup, so
//! the whole board is a single copyable value with no heap allocation.
//! The only externally triggered mutation is [`Grid::place`]; everything
//! else happens inside the resolver.

use super::capacity::CapacityTable;
use super::coord::{Coord, CELL_COUNT};
use super::player::{Player, PLAYER_COUNT};

/// One board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Owning player, `None` when empty.
    pub owner: Option<Player>,
    /// Units currently in the cell.
    pub count: u8,
    /// Units queued to land on the next wave.
    pub pending_growth: u16,
    /// Explosion threshold, fixed at setup.
    pub capacity: u8,
}

impl Cell {
    const fn empty(capacity: u8) -> Self {
        Cell {
            owner: None,
            count: 0,
            pending_growth: 0,
            capacity,
        }
    }

    /// Returns true if `player` may place a unit here.
    pub fn accepts(&self, player: Player) -> bool {
        match self.owner {
            None => true,
            Some(owner) => owner == player,
        }
    }

    /// Returns true if the cell has reached its explosion threshold.
    pub fn is_critical(&self) -> bool {
        self.count > 0 && self.count >= self.capacity
    }
}

/// Errors raised by [`Grid::place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlaceError {
    #[error("cell {coord} is owned by {owner}")]
    IllegalMove { coord: Coord, owner: Player },
}

/// The complete board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [Cell; CELL_COUNT],
}

impl Grid {
    /// Creates an empty board with the standard capacities.
    pub fn new() -> Self {
        Self::with_capacities(&CapacityTable::standard())
    }

    /// Creates an empty board using the given capacity table.
    pub fn with_capacities(table: &CapacityTable) -> Self {
        let mut cells = [Cell::empty(0); CELL_COUNT];
        for (i, cell) in cells.iter_mut().enumerate() {
            cell.capacity = table.get(Coord::from_index(i));
        }
        Grid { cells }
    }

    /// Returns the cell at `coord`.
    pub fn cell(&self, coord: Coord) -> &Cell {
        &self.cells[coord.index()]
    }

    /// Returns all cells in linear index order.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell; CELL_COUNT] {
        &mut self.cells
    }

    pub fn owner(&self, coord: Coord) -> Option<Player> {
        self.cell(coord).owner
    }

    pub fn count(&self, coord: Coord) -> u8 {
        self.cell(coord).count
    }

    pub fn capacity(&self, coord: Coord) -> u8 {
        self.cell(coord).capacity
    }

    /// Returns true if `player` may place at `coord`.
    pub fn can_place(&self, coord: Coord, player: Player) -> bool {
        self.cell(coord).accepts(player)
    }

    /// Queues one unit for `player` at `coord`.
    ///
    /// The unit lands when the resolver applies the next wave. Fails if the
    /// cell belongs to another player; the board is left untouched.
    pub fn place(&mut self, coord: Coord, player: Player) -> Result<(), PlaceError> {
        let cell = &mut self.cells[coord.index()];
        if let Some(owner) = cell.owner {
            if owner != player {
                return Err(PlaceError::IllegalMove { coord, owner });
            }
        }
        cell.pending_growth += 1;
        cell.owner = Some(player);
        Ok(())
    }

    /// Overwrites a cell with a stable `(owner, count)` pair.
    ///
    /// Used to construct positions directly. Panics if the pair would break
    /// the stable-board invariant: `count < capacity` and
    /// `owner.is_none() == (count == 0)`.
    pub fn set_cell(&mut self, coord: Coord, owner: Option<Player>, count: u8) {
        let cell = &mut self.cells[coord.index()];
        assert!(
            count < cell.capacity,
            "count {count} at {coord} would reach capacity {}",
            cell.capacity
        );
        assert_eq!(owner.is_none(), count == 0, "owner/count mismatch at {coord}");
        cell.owner = owner;
        cell.count = count;
        cell.pending_growth = 0;
    }

    /// Returns true if any cell has growth queued.
    pub fn has_pending(&self) -> bool {
        self.cells.iter().any(|c| c.pending_growth > 0)
    }

    /// Returns true if no growth is queued and no cell is at capacity.
    pub fn is_stable(&self) -> bool {
        self.cells
            .iter()
            .all(|c| c.pending_growth == 0 && c.count < c.capacity)
    }

    /// Units on the board, counting queued growth.
    pub fn total_units(&self) -> u32 {
        self.cells
            .iter()
            .map(|c| u32::from(c.count) + u32::from(c.pending_growth))
            .sum()
    }

    /// Number of owned cells per player, indexed by `Player::index`.
    pub fn cell_counts(&self) -> [u32; PLAYER_COUNT] {
        let mut counts = [0u32; PLAYER_COUNT];
        for cell in &self.cells {
            if let Some(owner) = cell.owner {
                counts[owner.index()] += 1;
            }
        }
        counts
    }

    /// Number of unowned cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.owner.is_none()).count()
    }

    /// Returns the single owner of every owned cell, if there is exactly one.
    ///
    /// `None` for an empty board or a board shared by two or more players.
    pub fn uniform_owner(&self) -> Option<Player> {
        let mut owners = self.cells.iter().filter_map(|c| c.owner);
        let first = owners.next()?;
        owners.all(|o| o == first).then_some(first)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
