//! Players and the per-game roster.
//!
//! Four seats are available. Each seat is fixed at setup as unused, human,
//! or automated and never changes kind during a game. The roster also
//! carries each player's owned-cell count, refreshed after every
//! stabilization.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The number of player seats.
pub const PLAYER_COUNT: usize = 4;

/// A player seat. "No player" is modelled as `Option<Player>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

/// All players in seat order.
pub const ALL_PLAYERS: [Player; PLAYER_COUNT] = [Player::One, Player::Two, Player::Three, Player::Four];

impl Player {
    /// Returns the 1-based player id.
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Returns the 0-based array index for per-player tables.
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Parses a 1-based player id.
    pub fn from_id(id: u8) -> Option<Player> {
        match id {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            3 => Some(Player::Three),
            4 => Some(Player::Four),
            _ => None,
        }
    }

    /// Returns the next seat, and whether seat order wrapped back to `One`.
    pub const fn next(self) -> (Player, bool) {
        match self {
            Player::One => (Player::Two, false),
            Player::Two => (Player::Three, false),
            Player::Three => (Player::Four, false),
            Player::Four => (Player::One, true),
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.id())
    }
}

/// Who controls a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerKind {
    #[default]
    Unused,
    Human,
    Automated,
}

impl PlayerKind {
    /// Returns true for seats that take part in the game.
    pub const fn is_used(self) -> bool {
        !matches!(self, PlayerKind::Unused)
    }
}

/// Error returned when a seat kind name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown player kind '{0}' (expected human, cpu or off)")]
pub struct ParseKindError(String);

impl FromStr for PlayerKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" | "unused" | "-" => Ok(PlayerKind::Unused),
            "human" | "h" => Ok(PlayerKind::Human),
            "cpu" | "ai" | "auto" | "automated" => Ok(PlayerKind::Automated),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

/// Errors raised while building a roster.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("at least 2 players are required, {configured} configured")]
    TooFewPlayers { configured: usize },
}

/// One seat's configuration and live cell count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerSlot {
    pub kind: PlayerKind,
    pub cell_count: u32,
}

/// The four seats of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    slots: [PlayerSlot; PLAYER_COUNT],
}

impl Roster {
    /// Builds a roster from per-seat kinds. At least two seats must be used.
    pub fn new(kinds: [PlayerKind; PLAYER_COUNT]) -> Result<Self, SetupError> {
        let configured = kinds.iter().filter(|k| k.is_used()).count();
        if configured < 2 {
            return Err(SetupError::TooFewPlayers { configured });
        }
        let mut slots = [PlayerSlot::default(); PLAYER_COUNT];
        for (slot, kind) in slots.iter_mut().zip(kinds) {
            slot.kind = kind;
        }
        Ok(Roster { slots })
    }

    /// Returns the seat for `player`.
    pub fn slot(&self, player: Player) -> &PlayerSlot {
        &self.slots[player.index()]
    }

    /// Returns the kind of `player`'s seat.
    pub fn kind(&self, player: Player) -> PlayerKind {
        self.slots[player.index()].kind
    }

    /// Returns how many cells `player` owned after the last stabilization.
    pub fn cell_count(&self, player: Player) -> u32 {
        self.slots[player.index()].cell_count
    }

    /// A used seat that still owns at least one cell.
    pub fn is_eligible(&self, player: Player) -> bool {
        let slot = self.slot(player);
        slot.kind.is_used() && slot.cell_count > 0
    }

    /// The lowest-index used seat; this player moves first.
    pub fn first_player(&self) -> Player {
        ALL_PLAYERS
            .into_iter()
            .find(|&p| self.kind(p).is_used())
            .unwrap_or(Player::One)
    }

    /// Iterates over used seats in seat order.
    pub fn used_players(&self) -> impl Iterator<Item = Player> + '_ {
        ALL_PLAYERS.into_iter().filter(|&p| self.kind(p).is_used())
    }

    /// Replaces all cell counts, indexed by `Player::index`.
    pub fn record_counts(&mut self, counts: &[u32; PLAYER_COUNT]) {
        for (slot, &count) in self.slots.iter_mut().zip(counts) {
            slot.cell_count = count;
        }
    }
}
