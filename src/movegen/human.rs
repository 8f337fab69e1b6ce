//! Human seats: a clamped cursor driven by an external input source.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::debug;

use super::{MoveError, MoveProvider};
use crate::board::{Coord, Grid, Player, GRID_HEIGHT, GRID_WIDTH};

/// A single input from the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Confirm,
}

/// Blocking source of player input.
pub trait InputSource {
    /// Waits for the next input. `Ok(None)` is a no-op; an error means the
    /// source is gone for good.
    ///
    /// `cursor` and `player` are passed so interactive sources can prompt.
    fn next_action(&mut self, cursor: Coord, player: Player) -> Result<Option<InputAction>, MoveError>;
}

impl<I: InputSource + ?Sized> InputSource for Rc<RefCell<I>> {
    fn next_action(&mut self, cursor: Coord, player: Player) -> Result<Option<InputAction>, MoveError> {
        self.borrow_mut().next_action(cursor, player)
    }
}

/// Plays back a fixed list of inputs, then reports the source closed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    actions: VecDeque<InputAction>,
}

impl ScriptedInput {
    pub fn new(actions: impl IntoIterator<Item = InputAction>) -> Self {
        ScriptedInput {
            actions: actions.into_iter().collect(),
        }
    }

    /// Inputs not yet consumed.
    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_action(&mut self, _cursor: Coord, _player: Player) -> Result<Option<InputAction>, MoveError> {
        self.actions.pop_front().map(Some).ok_or(MoveError::InputClosed)
    }
}

/// Board cursor. Movement past an edge is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pos: Coord,
}

impl Cursor {
    pub fn new(pos: Coord) -> Self {
        Cursor { pos }
    }

    pub fn position(&self) -> Coord {
        self.pos
    }

    pub fn set(&mut self, pos: Coord) {
        self.pos = pos;
    }

    /// Applies a directional action. `Confirm` leaves the cursor in place.
    pub fn apply(&mut self, action: InputAction) {
        let Coord { mut x, mut y } = self.pos;
        match action {
            InputAction::MoveUp => y = y.saturating_sub(1),
            InputAction::MoveDown => y = (y + 1).min(GRID_HEIGHT as u8 - 1),
            InputAction::MoveLeft => x = x.saturating_sub(1),
            InputAction::MoveRight => x = (x + 1).min(GRID_WIDTH as u8 - 1),
            InputAction::Confirm => {}
        }
        self.pos = Coord::new(x, y);
    }
}

/// Human seat. Steers the cursor until a confirm lands on a legal cell;
/// confirms on illegal cells are ignored.
#[derive(Debug, Clone)]
pub struct HumanMover<I> {
    input: I,
    cursor: Cursor,
}

impl<I: InputSource> HumanMover<I> {
    pub fn new(input: I) -> Self {
        HumanMover {
            input,
            cursor: Cursor::default(),
        }
    }

    pub fn cursor(&self) -> Coord {
        self.cursor.position()
    }

    pub fn input(&self) -> &I {
        &self.input
    }
}

impl<I: InputSource> MoveProvider for HumanMover<I> {
    fn select_move(&mut self, grid: &Grid, player: Player) -> Result<Coord, MoveError> {
        loop {
            let pos = self.cursor.position();
            match self.input.next_action(pos, player)? {
                Some(InputAction::Confirm) => {
                    if grid.can_place(pos, player) {
                        return Ok(pos);
                    }
                    debug!(%player, %pos, "confirm on foreign cell ignored");
                }
                Some(action) => self.cursor.apply(action),
                None => {}
            }
        }
    }

    /// The cursor follows the last move made by anyone.
    fn observe_move(&mut self, _player: Player, coord: Coord) {
        self.cursor.set(coord);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InputAction::*;

    #[test]
    fn cursor_clamps_at_edges() {
        let mut cursor = Cursor::default();
        cursor.apply(MoveUp);
        cursor.apply(MoveLeft);
        assert_eq!(cursor.position(), Coord::new(0, 0));
        for _ in 0..20 {
            cursor.apply(MoveRight);
            cursor.apply(MoveDown);
        }
        assert_eq!(cursor.position(), Coord::new(9, 6));
    }

    #[test]
    fn confirm_returns_cursor_cell() {
        let mut mover = HumanMover::new(ScriptedInput::new([MoveRight, MoveRight, MoveDown, Confirm]));
        let c = mover.select_move(&Grid::new(), Player::One).unwrap();
        assert_eq!(c, Coord::new(2, 1));
        assert_eq!(mover.input().remaining(), 0);
    }

    #[test]
    fn confirm_on_enemy_cell_retries() {
        let mut grid = Grid::new();
        grid.set_cell(Coord::new(0, 0), Some(Player::Two), 1);
        let mut mover = HumanMover::new(ScriptedInput::new([Confirm, MoveDown, Confirm]));
        assert_eq!(mover.select_move(&grid, Player::One).unwrap(), Coord::new(0, 1));
    }

    #[test]
    fn exhausted_input_is_an_error() {
        let mut mover = HumanMover::new(ScriptedInput::new([MoveRight]));
        assert_eq!(mover.select_move(&Grid::new(), Player::One), Err(MoveError::InputClosed));
        assert_eq!(mover.cursor(), Coord::new(1, 0));
    }

    #[test]
    fn cursor_follows_observed_moves() {
        let mut mover = HumanMover::new(ScriptedInput::new([MoveRight, Confirm]));
        mover.observe_move(Player::Two, Coord::new(4, 4));
        assert_eq!(mover.select_move(&Grid::new(), Player::One).unwrap(), Coord::new(5, 4));
    }

    #[test]
    fn shared_input_feeds_two_seats() {
        let shared = Rc::new(RefCell::new(ScriptedInput::new([Confirm, MoveRight, Confirm])));
        let mut one = HumanMover::new(Rc::clone(&shared));
        let mut two = HumanMover::new(Rc::clone(&shared));
        let mut grid = Grid::new();
        let first = one.select_move(&grid, Player::One).unwrap();
        grid.place(first, Player::One).unwrap();
        assert_eq!(two.select_move(&grid, Player::Two).unwrap(), Coord::new(1, 0));
    }
}
