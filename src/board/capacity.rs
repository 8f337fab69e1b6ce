//! Per-cell explosion thresholds.
//!
//! A cell's capacity equals its orthogonal neighbor count: 2 in the four
//! corners, 3 along the edges, 4 in the interior. The table is built once
//! at game setup and never mutated.

use super::coord::{Coord, CELL_COUNT};

/// Maximum units each cell holds before it explodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityTable {
    capacity: [u8; CELL_COUNT],
}

impl CapacityTable {
    /// Builds the table for the standard board from neighbor counts.
    pub fn standard() -> Self {
        let mut capacity = [0u8; CELL_COUNT];
        for (i, cap) in capacity.iter_mut().enumerate() {
            *cap = Coord::from_index(i).neighbor_count() as u8;
        }
        CapacityTable { capacity }
    }

    /// Returns the capacity of the cell at `coord`.
    pub fn get(&self, coord: Coord) -> u8 {
        self.capacity[coord.index()]
    }

    /// Sum of `capacity - 1` over all cells: the most units a stable board
    /// can hold.
    pub fn stable_limit(&self) -> u32 {
        self.capacity.iter().map(|&c| u32::from(c) - 1).sum()
    }
}

impl Default for CapacityTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_edges_interior() {
        let table = CapacityTable::standard();
        assert_eq!(table.get(Coord::new(0, 0)), 2);
        assert_eq!(table.get(Coord::new(9, 0)), 2);
        assert_eq!(table.get(Coord::new(0, 6)), 2);
        assert_eq!(table.get(Coord::new(9, 6)), 2);
        assert_eq!(table.get(Coord::new(5, 0)), 3);
        assert_eq!(table.get(Coord::new(0, 5)), 3);
        assert_eq!(table.get(Coord::new(9, 1)), 3);
        assert_eq!(table.get(Coord::new(2, 6)), 3);
        assert_eq!(table.get(Coord::new(5, 3)), 4);
    }

    #[test]
    fn stable_limit_matches_cell_mix() {
        // 4 corners * 1 + 26 edges * 2 + 40 interior * 3
        assert_eq!(CapacityTable::standard().stable_limit(), 4 + 52 + 120);
    }
}
