//! Change events emitted to the presentation layer.
//!
//! The engine never renders. It reports what changed, in wave and turn
//! order, to an [`EventSink`]; how and when that is drawn is up to the sink.

use serde::Serialize;

use crate::board::{Coord, Player};

/// A single observable change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A player committed a move at `coord`.
    MovePlaced { player: Player, coord: Coord },
    /// A cell's state at the end of a wave.
    CellUpdated {
        coord: Coord,
        owner: Option<Player>,
        count: u8,
        exploded: bool,
    },
    /// The turn passed to `player`. `turn` is the 0-based round counter.
    TurnChanged { player: Player, turn: u32 },
    /// The game is over.
    GameFinished { winner: Player },
}

/// Receives engine events in order.
pub trait EventSink {
    fn on_event(&mut self, event: GameEvent);

    /// Frame boundary after each explosion wave. Sinks that animate pace
    /// themselves here; the engine does not wait.
    fn end_wave(&mut self) {}
}

impl EventSink for Vec<GameEvent> {
    fn on_event(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: GameEvent) {}
}

/// Records events grouped by wave.
///
/// `waves[i]` holds the cell updates of the i-th wave since creation;
/// other events are kept in `events` alongside them in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub events: Vec<GameEvent>,
    pub waves: Vec<Vec<GameEvent>>,
    current: Vec<GameEvent>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events of kind `CellUpdated` with `exploded == true`.
    pub fn explosions(&self) -> impl Iterator<Item = Coord> + '_ {
        self.events.iter().filter_map(|e| match e {
            GameEvent::CellUpdated { coord, exploded: true, .. } => Some(*coord),
            _ => None,
        })
    }
}

impl EventSink for Recorder {
    fn on_event(&mut self, event: GameEvent) {
        if matches!(event, GameEvent::CellUpdated { .. }) {
            self.current.push(event);
        }
        self.events.push(event);
    }

    fn end_wave(&mut self) {
        self.waves.push(std::mem::take(&mut self.current));
    }
}
