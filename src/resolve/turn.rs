//! Turn sequencing and game termination.
//!
//! `GameState` is the single owner of the board and roster. A move runs in
//! strict sequence: place, drain the chain reaction, refresh cell counts,
//! then advance to the next eligible player.
//!
//! Turn flow:
//! - Round 0: every used seat moves once, in seat order, whatever its
//!   cell count. Nobody can be eliminated before the first round closes.
//! - Later rounds: seats with no cells are skipped. Coming back round to
//!   the player who just moved without finding anyone else ends the game.
//! - After round 0, a board owned entirely by one player ends the game
//!   immediately.

use tracing::{debug, info};

use super::explosion::{ResolveOptions, Resolution, Resolver};
use crate::board::{Coord, Grid, PlaceError, Player, Roster};
use crate::events::{EventSink, GameEvent};

/// Result of advancing the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The game continues with this player.
    Next(Player),
    /// The game is over; this player won.
    Finished(Player),
}

/// Everything that happened during one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub player: Player,
    pub coord: Coord,
    pub resolution: Resolution,
    pub advance: Advance,
}

/// Complete game state between moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub grid: Grid,
    pub roster: Roster,
    /// The player to move, or the winner once `finished` is set.
    pub current: Player,
    /// Completed rounds. Incremented each time seat order wraps.
    pub turn_count: u32,
    pub finished: bool,
}

impl GameState {
    /// Starts a game on an empty board. The lowest used seat moves first.
    pub fn new(roster: Roster) -> Self {
        Self::with_grid(roster, Grid::new())
    }

    /// Starts from an existing stable board, refreshing cell counts from it.
    pub fn with_grid(mut roster: Roster, grid: Grid) -> Self {
        roster.record_counts(&grid.cell_counts());
        GameState {
            current: roster.first_player(),
            grid,
            roster,
            turn_count: 0,
            finished: false,
        }
    }

    /// The winner, once the game is over.
    pub fn winner(&self) -> Option<Player> {
        self.finished.then_some(self.current)
    }

    /// Plays `coord` for the current player and resolves it fully.
    ///
    /// On `IllegalMove` nothing changes and the same player is still to
    /// move. Panics if the game is already finished.
    pub fn play_move<S: EventSink + ?Sized>(
        &mut self,
        coord: Coord,
        resolver: &mut Resolver,
        options: &ResolveOptions,
        sink: &mut S,
    ) -> Result<TurnReport, PlaceError> {
        assert!(!self.finished, "move played after the game finished");
        let player = self.current;
        self.grid.place(coord, player)?;
        sink.on_event(GameEvent::MovePlaced { player, coord });
        debug!(%player, %coord, turn = self.turn_count, "move");

        let options = ResolveOptions {
            stop_when_uniform: options.stop_when_uniform && self.turn_count > 0,
            ..*options
        };
        let resolution = resolver.resolve(&mut self.grid, &options, sink);
        self.roster.record_counts(&resolution.cell_counts);

        let advance = self.advance(resolution.uniform);
        match advance {
            Advance::Next(next) => sink.on_event(GameEvent::TurnChanged {
                player: next,
                turn: self.turn_count,
            }),
            Advance::Finished(winner) => {
                info!(%winner, turn = self.turn_count, "game finished");
                sink.on_event(GameEvent::GameFinished { winner });
            }
        }

        Ok(TurnReport {
            player,
            coord,
            resolution,
            advance,
        })
    }

    /// Passes the turn to the next eligible player.
    ///
    /// `uniform` is the sole owner of the board after the last resolution,
    /// if any. Cell counts in the roster must already be current.
    pub fn advance(&mut self, uniform: Option<Player>) -> Advance {
        if self.finished {
            return Advance::Finished(self.current);
        }
        if let Some(owner) = uniform {
            if self.turn_count > 0 {
                self.current = owner;
                self.finished = true;
                return Advance::Finished(owner);
            }
        }

        let starting = self.current;
        loop {
            let (next, wrapped) = self.current.next();
            self.current = next;
            if wrapped {
                self.turn_count += 1;
            }

            if self.turn_count == 0 {
                if self.roster.kind(next).is_used() {
                    return Advance::Next(next);
                }
            } else if next == starting {
                self.finished = true;
                return Advance::Finished(next);
            } else if self.roster.is_eligible(next) {
                return Advance::Next(next);
            }
        }
    }
}
