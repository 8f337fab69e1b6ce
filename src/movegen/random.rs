//! Baseline automated strategy.
//!
//! Samples a few uniformly random cells and takes the first legal one. If
//! every sample is rejected, scans forward in index order from the last
//! sample, wrapping at the end of the board, and takes the first legal cell.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use super::{MoveError, MoveProvider};
use crate::board::{Coord, Grid, Player, CELL_COUNT, GRID_HEIGHT, GRID_WIDTH};

/// Random samples tried before falling back to a scan.
pub const RANDOM_ATTEMPTS: u32 = 5;

/// Picks a legal cell for `player`.
///
/// Fails only if no cell on the board is legal, which cannot happen for a
/// player still in the game.
pub fn random_move(grid: &Grid, player: Player, rng: &mut impl Rng) -> Result<Coord, MoveError> {
    let mut last = Coord::new(0, 0);
    for _ in 0..RANDOM_ATTEMPTS {
        let coord = Coord::new(
            rng.gen_range(0..GRID_WIDTH as u8),
            rng.gen_range(0..GRID_HEIGHT as u8),
        );
        if grid.can_place(coord, player) {
            return Ok(coord);
        }
        last = coord;
    }

    trace!(%player, from = %last, "random samples rejected, scanning");
    let start = last.index();
    (1..=CELL_COUNT)
        .map(|step| Coord::from_index((start + step) % CELL_COUNT))
        .find(|&c| grid.can_place(c, player))
        .ok_or(MoveError::NoLegalMove { player })
}

/// Automated seat using [`random_move`].
#[derive(Debug, Clone)]
pub struct RandomMover<R = SmallRng> {
    rng: R,
}

impl RandomMover<SmallRng> {
    /// Reproducible mover.
    pub fn from_seed(seed: u64) -> Self {
        RandomMover {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomMover<R> {
    pub fn with_rng(rng: R) -> Self {
        RandomMover { rng }
    }
}

impl<R: Rng> MoveProvider for RandomMover<R> {
    fn select_move(&mut self, grid: &Grid, player: Player) -> Result<Coord, MoveError> {
        random_move(grid, player, &mut self.rng)
    }
}
