//! Plain-text presentation.
//!
//! `TextRenderer` is an [`EventSink`] that rebuilds the board purely from
//! engine events and prints it to any writer. Each occupied cell shows its
//! unit count and a player glyph (`M`agenta, `R`ed, `G`reen, `Y`ellow);
//! empty cells show a dot.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crate::board::{Coord, Grid, Player, CELL_COUNT, GRID_HEIGHT, GRID_WIDTH};
use crate::events::{EventSink, GameEvent};

/// Display glyph for a player.
pub const fn player_glyph(player: Player) -> char {
    match player {
        Player::One => 'M',
        Player::Two => 'R',
        Player::Three => 'G',
        Player::Four => 'Y',
    }
}

fn cell_text(owner: Option<Player>, count: u8) -> String {
    match owner {
        Some(p) if count > 0 => format!("{count}{}", player_glyph(p)),
        // captured but the unit has not landed yet
        Some(p) => format!("+{}", player_glyph(p)),
        None => " .".to_string(),
    }
}

fn board_text(cells: &[(Option<Player>, u8); CELL_COUNT]) -> String {
    let mut out = String::from("   ");
    for x in 0..GRID_WIDTH {
        out.push_str(&format!(" {x} "));
    }
    out.push('\n');
    for y in 0..GRID_HEIGHT {
        out.push_str(&format!(" {y} "));
        for x in 0..GRID_WIDTH {
            let (owner, count) = cells[y * GRID_WIDTH + x];
            out.push_str(&format!("{} ", cell_text(owner, count)));
        }
        out.push('\n');
    }
    out
}

/// Renders a grid directly.
pub fn render_grid(grid: &Grid) -> String {
    let mut cells = [(None, 0u8); CELL_COUNT];
    for (slot, cell) in cells.iter_mut().zip(grid.cells()) {
        *slot = (cell.owner, cell.count);
    }
    board_text(&cells)
}

/// Event-driven board printer.
pub struct TextRenderer<W> {
    out: W,
    cells: [(Option<Player>, u8); CELL_COUNT],
    wave_delay: Duration,
    in_chain: bool,
    error: Option<io::Error>,
}

impl<W: Write> TextRenderer<W> {
    /// `wave_delay` of zero prints only settled boards; otherwise every
    /// wave of a chain reaction is printed and followed by the delay.
    pub fn new(out: W, wave_delay: Duration) -> Self {
        TextRenderer {
            out,
            cells: [(None, 0); CELL_COUNT],
            wave_delay,
            in_chain: false,
            error: None,
        }
    }

    /// Returns the first write error, if any occurred.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Owner and count of a cell as last reported.
    pub fn cell(&self, coord: Coord) -> (Option<Player>, u8) {
        self.cells[coord.index()]
    }

    fn write(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            self.error = Some(e);
        }
    }

    fn draw(&mut self) {
        let board = board_text(&self.cells);
        self.write(&board);
    }
}

impl<W: Write> EventSink for TextRenderer<W> {
    fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::MovePlaced { player, coord } => {
                self.in_chain = false;
                self.write(&format!("{player} places at {coord}\n"));
            }
            GameEvent::CellUpdated { coord, owner, count, exploded } => {
                self.cells[coord.index()] = (owner, count);
                if exploded {
                    self.in_chain = true;
                }
            }
            GameEvent::TurnChanged { player, turn } => {
                self.draw();
                self.write(&format!("turn {}: {player} to move\n", turn + 1));
            }
            GameEvent::GameFinished { winner } => {
                self.draw();
                self.write(&format!("{winner} wins\n"));
            }
        }
    }

    fn end_wave(&mut self) {
        if self.in_chain && !self.wave_delay.is_zero() {
            self.draw();
            self.write("\n");
            thread::sleep(self.wave_delay);
        }
    }
}
