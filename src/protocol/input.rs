//! Line-based keyboard input.
//!
//! Parses lines typed at a terminal into cursor actions, and wraps a
//! reader/writer pair as an [`InputSource`] for human seats.
//!
//! Recognized input, per line:
//! - empty line: confirm
//! - words: `up`, `down`, `left`, `right`, `place`/`ok`/`confirm`, `quit`
//! - single keys, any number per token: `w`/`k`/`3` up, `s`/`j`/`2` down,
//!   `a`/`h`/`1` left, `d`/`l`/`4` right, `c`/`x`/`.` confirm
//!
//! Unknown keys are ignored.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::board::{Coord, Player};
use crate::movegen::{InputAction, InputSource, MoveError};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Actions(Vec<InputAction>),
    Quit,
}

/// Parses one line of input. Returns `None` when nothing on the line is
/// recognized.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Some(Command::Actions(vec![InputAction::Confirm]));
    }

    let mut actions = Vec::new();
    for token in trimmed.split_whitespace() {
        let lower = token.to_ascii_lowercase();
        match lower.as_str() {
            "quit" | "exit" | "q" => return Some(Command::Quit),
            "up" => actions.push(InputAction::MoveUp),
            "down" => actions.push(InputAction::MoveDown),
            "left" => actions.push(InputAction::MoveLeft),
            "right" => actions.push(InputAction::MoveRight),
            "place" | "ok" | "confirm" => actions.push(InputAction::Confirm),
            keys => actions.extend(keys.chars().filter_map(parse_key)),
        }
    }

    if actions.is_empty() {
        None
    } else {
        Some(Command::Actions(actions))
    }
}

/// Maps a single key to an action.
pub fn parse_key(c: char) -> Option<InputAction> {
    match c {
        'w' | 'k' | '3' => Some(InputAction::MoveUp),
        's' | 'j' | '2' => Some(InputAction::MoveDown),
        'a' | 'h' | '1' => Some(InputAction::MoveLeft),
        'd' | 'l' | '4' => Some(InputAction::MoveRight),
        'c' | 'x' | '.' => Some(InputAction::Confirm),
        _ => None,
    }
}

/// Reads actions line by line, prompting on `out` before each read.
pub struct LineInput<R, W> {
    reader: R,
    out: W,
    queued: VecDeque<InputAction>,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        LineInput {
            reader,
            out,
            queued: VecDeque::new(),
        }
    }

    fn read_line(&mut self, cursor: Coord, player: Player) -> Result<Option<Command>, MoveError> {
        // A failed prompt is not fatal; the read below decides.
        let _ = write!(self.out, "{player} at {cursor}> ");
        let _ = self.out.flush();

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Err(MoveError::InputClosed),
            Ok(_) => Ok(parse_command(&line)),
            Err(e) => Err(MoveError::Input(e.kind())),
        }
    }
}

impl<R: BufRead, W: Write> InputSource for LineInput<R, W> {
    fn next_action(&mut self, cursor: Coord, player: Player) -> Result<Option<InputAction>, MoveError> {
        if let Some(action) = self.queued.pop_front() {
            return Ok(Some(action));
        }
        match self.read_line(cursor, player)? {
            Some(Command::Quit) => Err(MoveError::InputClosed),
            Some(Command::Actions(actions)) => {
                self.queued.extend(actions);
                Ok(self.queued.pop_front())
            }
            None => Ok(None),
        }
    }
}
