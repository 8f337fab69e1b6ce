//! Board representation.
//!
//! Contains the grid geometry, the capacity table, players and their
//! roster, and the cell-level board state.

pub mod capacity;
pub mod coord;
pub mod grid;
pub mod player;

pub use capacity::CapacityTable;
pub use coord::{
    all_coords, neighbor_indices, Coord, CELL_COUNT, GRID_HEIGHT, GRID_WIDTH, MAX_NEIGHBORS,
};
pub use grid::{Cell, Grid, PlaceError};
pub use player::{
    ParseKindError, Player, PlayerKind, PlayerSlot, Roster, SetupError, ALL_PLAYERS, PLAYER_COUNT,
};
