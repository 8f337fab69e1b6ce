//! Batch self-play between automated seats.
//!
//! Plays many seeded games, optionally across a rayon thread pool, and
//! records one summary line per game. Records serialize to JSONL for
//! offline analysis of balance and chain-length statistics.

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::board::{Player, PlayerKind, Roster, ALL_PLAYERS, PLAYER_COUNT};
use crate::engine::{Game, GameConfig, GameError};
use crate::events::NullSink;
use crate::resolve::ResolveOptions;

/// Configuration for a self-play batch.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Number of automated seats, filled from player one upward.
    pub players: usize,
    /// Worker threads; 1 plays games sequentially on the calling thread.
    pub threads: usize,
    /// Base seed (0 = use entropy). Game `i` is seeded with `seed + i`.
    pub seed: u64,
    /// Abandon a game after this many rounds.
    pub max_turns: Option<u32>,
    /// Suppress per-game progress logging.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            players: 2,
            threads: 4,
            seed: 0,
            max_turns: Some(500),
            quiet: false,
        }
    }
}

impl SelfPlayConfig {
    /// Seat kinds for this batch.
    pub fn kinds(&self) -> [PlayerKind; PLAYER_COUNT] {
        ALL_PLAYERS.map(|p| {
            if p.index() < self.players {
                PlayerKind::Automated
            } else {
                PlayerKind::Unused
            }
        })
    }

    fn game_seed(&self, game_id: usize) -> u64 {
        if self.seed != 0 {
            self.seed.wrapping_add(game_id as u64)
        } else {
            rand::random()
        }
    }

    fn game_config(&self) -> GameConfig {
        GameConfig {
            resolve: ResolveOptions::default(),
            max_turns: self.max_turns,
        }
    }
}

/// Self-play failures.
#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Outcome of one self-play game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub seed: u64,
    pub players: usize,
    /// `None` if the game hit the turn limit.
    pub winner: Option<Player>,
    pub turns: u32,
    pub moves: u32,
    pub total_waves: u32,
    pub explosions: u32,
    pub longest_chain: u32,
    pub final_cells: [u32; PLAYER_COUNT],
}

/// Plays a single seeded game to completion.
pub fn play_game(config: &SelfPlayConfig, game_id: usize, seed: u64) -> Result<GameRecord, GameError> {
    let mut game = Game::automated(config.kinds(), seed, config.game_config())?;
    let summary = game.run(&mut NullSink)?;
    Ok(GameRecord {
        game_id,
        seed,
        players: config.players.min(PLAYER_COUNT),
        winner: summary.winner,
        turns: summary.turns,
        moves: summary.moves,
        total_waves: summary.waves,
        explosions: summary.explosions,
        longest_chain: summary.longest_chain,
        final_cells: summary.final_cells,
    })
}

/// Runs the whole batch and returns records ordered by game id.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| games.push(game))?;
    games.sort_by_key(|g| g.game_id);
    Ok(games)
}

/// Runs the batch, handing each record to `on_game` as soon as it finishes.
///
/// With more than one thread, records arrive in completion order.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    // Reject bad seat counts before any worker starts.
    Roster::new(config.kinds()).map_err(GameError::from)?;

    if config.threads > 1 {
        run_self_play_parallel(config, on_game)
    } else {
        run_self_play_sequential(config, on_game)
    }
}

fn log_game(config: &SelfPlayConfig, finished: usize, game: &GameRecord, started: Instant) {
    if config.quiet {
        return;
    }
    let elapsed = started.elapsed().as_secs_f64();
    match game.winner {
        Some(winner) => info!(
            "game {}/{}: {} wins after {} turns ({:.2}s)",
            finished, config.num_games, winner, game.turns, elapsed
        ),
        None => info!(
            "game {}/{}: abandoned after {} turns ({:.2}s)",
            finished, config.num_games, game.turns, elapsed
        ),
    }
}

fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let started = Instant::now();
        let game = play_game(config, i, config.game_seed(i))?;
        log_game(config, i + 1, &game, started);
        on_game(game);
    }
    Ok(())
}

/// Plays games on a dedicated pool; finished records travel back over a
/// channel so the callback always runs on the calling thread. After the
/// first error no further games are started.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    let worker_config = config.clone();
    run_parallel(
        config,
        move |i| play_game(&worker_config, i, worker_config.game_seed(i)),
        on_game,
    )
}

fn run_parallel<P, F>(config: &SelfPlayConfig, play: P, mut on_game: F) -> Result<(), SelfPlayError>
where
    P: Fn(usize) -> Result<GameRecord, GameError> + Send + Sync + 'static,
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    debug!(threads = config.threads, "self-play pool ready");

    let (tx, rx) = mpsc::channel::<Result<GameRecord, GameError>>();
    let completed = AtomicUsize::new(0);
    let cancelled = AtomicBool::new(false);
    let worker_config = config.clone();
    let handle = std::thread::spawn(move || {
        pool.install(|| {
            (0..worker_config.num_games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    if cancelled.load(Ordering::Relaxed) {
                        return;
                    }
                    let started = Instant::now();
                    let result = play(i);
                    match &result {
                        Ok(game) => {
                            let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                            log_game(&worker_config, n, game, started);
                        }
                        Err(_) => cancelled.store(true, Ordering::Relaxed),
                    }
                    // The receiver only hangs up after an error.
                    let _ = tx.send(result);
                });
        });
    });

    let mut first_error = None;
    for result in rx {
        match result {
            Ok(game) => on_game(game),
            Err(e) => {
                first_error = Some(e);
                break;
            }
        }
    }

    if let Err(panic) = handle.join() {
        std::panic::resume_unwind(panic);
    }
    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Writes one JSON object per game, one per line.
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub games: usize,
    pub wins: [usize; PLAYER_COUNT],
    pub abandoned: usize,
    pub avg_turns: f64,
    pub avg_moves: f64,
    pub longest_chain: u32,
}

pub fn summarize(games: &[GameRecord]) -> BatchSummary {
    let mut summary = BatchSummary {
        games: games.len(),
        ..BatchSummary::default()
    };
    let mut turns = 0u64;
    let mut moves = 0u64;
    for game in games {
        match game.winner {
            Some(w) => summary.wins[w.index()] += 1,
            None => summary.abandoned += 1,
        }
        turns += u64::from(game.turns);
        moves += u64::from(game.moves);
        summary.longest_chain = summary.longest_chain.max(game.longest_chain);
    }
    let n = games.len().max(1) as f64;
    summary.avg_turns = turns as f64 / n;
    summary.avg_moves = moves as f64 / n;
    summary
}

/// Logs a batch summary at info level.
pub fn log_summary(games: &[GameRecord]) {
    let s = summarize(games);
    info!(
        games = s.games,
        abandoned = s.abandoned,
        avg_turns = s.avg_turns,
        avg_moves = s.avg_moves,
        longest_chain = s.longest_chain,
        "self-play summary"
    );
    for player in ALL_PLAYERS {
        let wins = s.wins[player.index()];
        if wins > 0 {
            let pct = 100.0 * wins as f64 / s.games.max(1) as f64;
            info!("  {player}: {wins} wins ({pct:.1}%)");
        }
    }
}
