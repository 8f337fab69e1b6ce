//! Text protocol for terminal play.
//!
//! Turns typed lines into cursor actions for human seats.

pub mod input;

pub use input::{parse_command, parse_key, Command, LineInput};
