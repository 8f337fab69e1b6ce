//! Atoms: a chain-reaction territory game on a 10x7 grid.
//!
//! Exposes the board model, the explosion resolver and turn manager, move
//! providers for human and automated seats, and the terminal front end used
//! by the `atoms` and `selfplay` binaries.

pub mod board;
pub mod engine;
pub mod events;
pub mod movegen;
pub mod protocol;
pub mod render;
pub mod resolve;
pub mod selfplay;
