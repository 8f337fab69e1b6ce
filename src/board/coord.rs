//! Grid coordinates and the orthogonal adjacency table.
//!
//! The board is a fixed 10x7 grid. Cells are addressed either by `(x, y)`
//! or by their linear index `y * GRID_WIDTH + x`. Adjacency is computed at
//! compile time into a static table so explosion resolution never branches
//! on corner/edge/interior position.

use serde::{Deserialize, Serialize};

/// Number of columns on the board.
pub const GRID_WIDTH: usize = 10;

/// Number of rows on the board.
pub const GRID_HEIGHT: usize = 7;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = GRID_WIDTH * GRID_HEIGHT;

/// Maximum number of orthogonal neighbors a cell can have.
pub const MAX_NEIGHBORS: usize = 4;

/// A cell position on the board.
///
/// Constructing a `Coord` outside the grid is a programming error: every
/// caller clamps raw input before it reaches the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    /// Creates a coordinate. Panics if `(x, y)` is off the board.
    pub fn new(x: u8, y: u8) -> Self {
        match Self::try_new(x, y) {
            Some(c) => c,
            None => panic!("coordinate ({x}, {y}) is outside the {GRID_WIDTH}x{GRID_HEIGHT} grid"),
        }
    }

    /// Creates a coordinate, or `None` if `(x, y)` is off the board.
    pub const fn try_new(x: u8, y: u8) -> Option<Self> {
        if (x as usize) < GRID_WIDTH && (y as usize) < GRID_HEIGHT {
            Some(Coord { x, y })
        } else {
            None
        }
    }

    /// Converts a linear index back into a coordinate. Panics if out of range.
    pub fn from_index(index: usize) -> Self {
        assert!(index < CELL_COUNT, "cell index {index} out of range");
        Coord {
            x: (index % GRID_WIDTH) as u8,
            y: (index / GRID_WIDTH) as u8,
        }
    }

    /// Returns the linear index `y * GRID_WIDTH + x`.
    pub const fn index(self) -> usize {
        self.y as usize * GRID_WIDTH + self.x as usize
    }

    /// Returns the in-bounds orthogonal neighbors of this cell.
    ///
    /// Corners have 2, non-corner edges 3, interior cells 4.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        neighbor_indices(self.index()).iter().map(|&i| Coord::from_index(i as usize))
    }

    /// Returns the number of orthogonal neighbors.
    pub fn neighbor_count(self) -> usize {
        ADJACENCY.len[self.index()] as usize
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// All coordinates in linear index order (left to right, top to bottom).
pub fn all_coords() -> impl Iterator<Item = Coord> {
    (0..CELL_COUNT).map(Coord::from_index)
}

/// Static neighbor lists: for each cell, up to four neighbor indices
/// (up, left, right, down) and how many of them are valid.
struct Adjacency {
    cells: [[u8; MAX_NEIGHBORS]; CELL_COUNT],
    len: [u8; CELL_COUNT],
}

const fn build_adjacency() -> Adjacency {
    let mut cells = [[0u8; MAX_NEIGHBORS]; CELL_COUNT];
    let mut len = [0u8; CELL_COUNT];
    let mut i = 0;
    while i < CELL_COUNT {
        let x = i % GRID_WIDTH;
        let y = i / GRID_WIDTH;
        let mut n = 0;
        if y > 0 {
            cells[i][n] = (i - GRID_WIDTH) as u8;
            n += 1;
        }
        if x > 0 {
            cells[i][n] = (i - 1) as u8;
            n += 1;
        }
        if x + 1 < GRID_WIDTH {
            cells[i][n] = (i + 1) as u8;
            n += 1;
        }
        if y + 1 < GRID_HEIGHT {
            cells[i][n] = (i + GRID_WIDTH) as u8;
            n += 1;
        }
        len[i] = n as u8;
        i += 1;
    }
    Adjacency { cells, len }
}

static ADJACENCY: Adjacency = build_adjacency();

/// Returns the neighbor indices of the cell at linear index `index`.
///
/// Hot-path variant of [`Coord::neighbors`] used by the resolver.
pub fn neighbor_indices(index: usize) -> &'static [u8] {
    &ADJACENCY.cells[index][..ADJACENCY.len[index] as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        for i in 0..CELL_COUNT {
            assert_eq!(Coord::from_index(i).index(), i);
        }
        assert_eq!(Coord::new(3, 2).index(), 23);
    }

    #[test]
    fn try_new_rejects_out_of_bounds() {
        assert!(Coord::try_new(9, 6).is_some());
        assert!(Coord::try_new(10, 0).is_none());
        assert!(Coord::try_new(0, 7).is_none());
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn new_panics_out_of_bounds() {
        let _ = Coord::new(0, 7);
    }

    #[test]
    fn corner_has_two_neighbors() {
        let n: Vec<Coord> = Coord::new(0, 0).neighbors().collect();
        assert_eq!(n, vec![Coord::new(1, 0), Coord::new(0, 1)]);
        assert_eq!(Coord::new(9, 6).neighbor_count(), 2);
        assert_eq!(Coord::new(9, 0).neighbor_count(), 2);
        assert_eq!(Coord::new(0, 6).neighbor_count(), 2);
    }

    #[test]
    fn edge_has_three_neighbors() {
        assert_eq!(Coord::new(4, 0).neighbor_count(), 3);
        assert_eq!(Coord::new(0, 3).neighbor_count(), 3);
        assert_eq!(Coord::new(9, 3).neighbor_count(), 3);
        assert_eq!(Coord::new(4, 6).neighbor_count(), 3);
    }

    #[test]
    fn interior_has_four_neighbors() {
        let n: Vec<Coord> = Coord::new(4, 3).neighbors().collect();
        assert_eq!(
            n,
            vec![Coord::new(4, 2), Coord::new(3, 3), Coord::new(5, 3), Coord::new(4, 4)]
        );
    }

    #[test]
    fn adjacency_is_symmetric() {
        for c in all_coords() {
            for n in c.neighbors() {
                assert!(n.neighbors().any(|back| back == c), "{c} -> {n} not symmetric");
            }
        }
    }
}
