//! Move resolution.
//!
//! Drains a placed unit's chain reaction to a stable board and sequences
//! turns, eliminations, and the end of the game.

pub mod explosion;
pub mod turn;

pub use explosion::{
    resolve_grid, Resolution, ResolveOptions, Resolver, StopReason, DEFAULT_MAX_WAVES,
};
pub use turn::{Advance, GameState, TurnReport};
