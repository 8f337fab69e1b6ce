//! Move selection.
//!
//! A `MoveProvider` picks one legal cell for the player to move. Automated
//! seats sample randomly with a deterministic fallback; human seats steer a
//! cursor from an external input source.

pub mod human;
pub mod random;

pub use human::{Cursor, HumanMover, InputAction, InputSource, ScriptedInput};
pub use random::{random_move, RandomMover, RANDOM_ATTEMPTS};

use crate::board::{all_coords, Coord, Grid, Player};

/// Errors a move provider can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("input source closed")]
    InputClosed,
    #[error("failed to read input: {0}")]
    Input(std::io::ErrorKind),
    #[error("no legal move for {player}")]
    NoLegalMove { player: Player },
}

/// Produces moves for one seat.
pub trait MoveProvider {
    /// Returns a cell `player` may legally place on.
    fn select_move(&mut self, grid: &Grid, player: Player) -> Result<Coord, MoveError>;

    /// Called after every committed move, by any player.
    fn observe_move(&mut self, _player: Player, _coord: Coord) {}
}

impl<P: MoveProvider + ?Sized> MoveProvider for Box<P> {
    fn select_move(&mut self, grid: &Grid, player: Player) -> Result<Coord, MoveError> {
        (**self).select_move(grid, player)
    }

    fn observe_move(&mut self, player: Player, coord: Coord) {
        (**self).observe_move(player, coord)
    }
}

/// All cells `player` may place on, in index order.
pub fn legal_moves(grid: &Grid, player: Player) -> Vec<Coord> {
    all_coords().filter(|&c| grid.can_place(c, player)).collect()
}
