//! Game driver.
//!
//! Owns the game state, one move provider per used seat, and a reusable
//! resolver. Each turn runs in strict sequence: ask the current seat's
//! provider for a move, place it, drain the chain reaction, advance.

use tracing::{debug, info};

use crate::board::{
    Coord, PlaceError, Player, PlayerKind, Roster, SetupError, ALL_PLAYERS, PLAYER_COUNT,
};
use crate::events::{EventSink, GameEvent};
use crate::movegen::{MoveError, MoveProvider, RandomMover};
use crate::resolve::{Advance, GameState, ResolveOptions, Resolver, TurnReport};

/// Engine-level failures.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Place(#[from] PlaceError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("no move provider for {player}")]
    MissingProvider { player: Player },
    #[error("the game is already finished")]
    Finished,
}

/// Knobs for a whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameConfig {
    pub resolve: ResolveOptions,
    /// Abandon the game once this many rounds have completed.
    pub max_turns: Option<u32>,
}

/// Totals for a finished or abandoned game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameSummary {
    /// `None` if the game was abandoned at `max_turns`.
    pub winner: Option<Player>,
    pub turns: u32,
    pub moves: u32,
    pub waves: u32,
    pub explosions: u32,
    /// Most waves any single move took to settle.
    pub longest_chain: u32,
    pub final_cells: [u32; PLAYER_COUNT],
}

type Provider = Box<dyn MoveProvider>;

/// A game in progress.
pub struct Game {
    state: GameState,
    providers: [Option<Provider>; PLAYER_COUNT],
    resolver: Resolver,
    config: GameConfig,
    summary: GameSummary,
    started: bool,
}

impl Game {
    /// Creates a game with no providers attached yet.
    pub fn new(roster: Roster, config: GameConfig) -> Self {
        Game {
            state: GameState::new(roster),
            providers: [None, None, None, None],
            resolver: Resolver::new(),
            config,
            summary: GameSummary::default(),
            started: false,
        }
    }

    /// Creates a game where every used seat is automated, seeded from
    /// `seed` so the whole game is reproducible.
    pub fn automated(kinds: [PlayerKind; PLAYER_COUNT], seed: u64, config: GameConfig) -> Result<Self, GameError> {
        let roster = Roster::new(kinds)?;
        let mut game = Game::new(roster, config);
        for player in ALL_PLAYERS {
            if kinds[player.index()].is_used() {
                let seed = seed.wrapping_add(u64::from(player.id()));
                game.set_provider(player, Box::new(RandomMover::from_seed(seed)));
            }
        }
        Ok(game)
    }

    pub fn set_provider(&mut self, player: Player, provider: Provider) {
        self.providers[player.index()] = Some(provider);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn summary(&self) -> &GameSummary {
        &self.summary
    }

    pub fn is_over(&self) -> bool {
        self.state.finished || self.abandoned()
    }

    fn abandoned(&self) -> bool {
        self.config.max_turns.is_some_and(|max| self.state.turn_count >= max)
    }

    /// Announces the first player. Called automatically by `play_turn`.
    pub fn start<S: EventSink + ?Sized>(&mut self, sink: &mut S) {
        if !self.started {
            self.started = true;
            sink.on_event(GameEvent::TurnChanged {
                player: self.state.current,
                turn: self.state.turn_count,
            });
        }
    }

    /// Plays one move for the current player.
    pub fn play_turn<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Result<TurnReport, GameError> {
        if self.state.finished {
            return Err(GameError::Finished);
        }
        self.start(sink);

        let player = self.state.current;
        let provider = self.providers[player.index()]
            .as_mut()
            .ok_or(GameError::MissingProvider { player })?;
        let coord = provider.select_move(&self.state.grid, player)?;

        let report = self
            .state
            .play_move(coord, &mut self.resolver, &self.config.resolve, sink)?;
        self.record(&report);
        self.broadcast(player, coord);
        Ok(report)
    }

    fn record(&mut self, report: &TurnReport) {
        let res = &report.resolution;
        let s = &mut self.summary;
        s.moves += 1;
        s.waves += res.waves;
        s.explosions += res.explosions;
        s.longest_chain = s.longest_chain.max(res.waves);
        s.final_cells = res.cell_counts;
        s.turns = self.state.turn_count;
        if let Advance::Finished(winner) = report.advance {
            s.winner = Some(winner);
        }
    }

    fn broadcast(&mut self, player: Player, coord: Coord) {
        for provider in self.providers.iter_mut().flatten() {
            provider.observe_move(player, coord);
        }
    }

    /// Plays until the game finishes or `max_turns` is reached.
    pub fn run<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Result<GameSummary, GameError> {
        while !self.is_over() {
            self.play_turn(sink)?;
        }
        match self.summary.winner {
            Some(winner) => info!(%winner, moves = self.summary.moves, "game over"),
            None => debug!(turns = self.state.turn_count, "game abandoned at turn limit"),
        }
        Ok(self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PlayerKind::{Automated as A, Human as H, Unused as U};
    use crate::events::{NullSink, Recorder};
    use crate::movegen::{HumanMover, InputAction::*, ScriptedInput};

    #[test]
    fn automated_game_reaches_a_winner() {
        let mut game = Game::automated([A, A, U, U], 11, GameConfig::default()).unwrap();
        let mut rec = Recorder::new();
        let summary = game.run(&mut rec).unwrap();

        let winner = summary.winner.expect("game should finish");
        assert_eq!(game.state().winner(), Some(winner));
        assert!(summary.turns >= 1);
        assert_eq!(rec.events.last(), Some(&GameEvent::GameFinished { winner }));
        assert_eq!(
            rec.events.first(),
            Some(&GameEvent::TurnChanged { player: Player::One, turn: 0 })
        );
        let losers: u32 = ALL_PLAYERS
            .into_iter()
            .filter(|&p| p != winner)
            .map(|p| summary.final_cells[p.index()])
            .sum();
        assert_eq!(losers, 0);
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let play = || {
            let mut game = Game::automated([A, A, A, U], 99, GameConfig::default()).unwrap();
            let mut rec: Vec<GameEvent> = Vec::new();
            game.run(&mut rec).unwrap();
            rec
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn four_player_games_finish() {
        for seed in 0..5 {
            let mut game = Game::automated([A, A, A, A], seed, GameConfig::default()).unwrap();
            let summary = game.run(&mut NullSink).unwrap();
            assert!(summary.winner.is_some(), "seed {seed} did not finish");
        }
    }

    #[test]
    fn turn_limit_abandons_game() {
        let config = GameConfig {
            max_turns: Some(1),
            ..GameConfig::default()
        };
        let mut game = Game::automated([A, A, U, U], 5, config).unwrap();
        let summary = game.run(&mut NullSink).unwrap();
        // nobody can win inside the opening round
        assert_eq!(summary.winner, None);
        assert_eq!(summary.moves, 2);
        assert_eq!(game.state().turn_count, 1);
        assert!(game.is_over());
    }

    #[test]
    fn human_seat_uses_its_input() {
        let roster = Roster::new([H, A, U, U]).unwrap();
        let mut game = Game::new(roster, GameConfig::default());
        game.set_provider(
            Player::One,
            Box::new(HumanMover::new(ScriptedInput::new([MoveRight, Confirm]))),
        );
        game.set_provider(Player::Two, Box::new(RandomMover::from_seed(1)));

        let report = game.play_turn(&mut NullSink).unwrap();
        assert_eq!(report.coord, Coord::new(1, 0));
        game.play_turn(&mut NullSink).unwrap();
        // out of scripted input on the next human turn
        assert!(matches!(
            game.play_turn(&mut NullSink),
            Err(GameError::Move(MoveError::InputClosed))
        ));
    }

    #[test]
    fn missing_provider_is_reported() {
        let roster = Roster::new([A, A, U, U]).unwrap();
        let mut game = Game::new(roster, GameConfig::default());
        assert!(matches!(
            game.play_turn(&mut NullSink),
            Err(GameError::MissingProvider { player: Player::One })
        ));
    }
}
