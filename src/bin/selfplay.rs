//! Self-play batch runner.
//!
//! Plays automated games and writes one JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use atoms::selfplay::{self, SelfPlayConfig};

/// Plays automated Atoms games and outputs JSONL records
#[derive(Parser, Debug)]
#[command(name = "selfplay")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Number of automated players (2-4)
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=4))]
    players: u8,

    /// Number of parallel threads
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Random seed, 0 for entropy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Abandon a game after this many rounds
    #[arg(long, default_value_t = 500)]
    max_turns: u32,

    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Suppress progress and summary logging
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.quiet { "atoms=warn" } else { "atoms=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = SelfPlayConfig {
        num_games: args.games,
        players: usize::from(args.players),
        threads: args.threads.max(1),
        seed: args.seed,
        max_turns: Some(args.max_turns),
        quiet: args.quiet,
    };
    info!(
        games = config.num_games,
        players = config.players,
        threads = config.threads,
        "starting self-play"
    );

    let start = Instant::now();
    let games = match selfplay::run_self_play(&config) {
        Ok(games) => games,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let elapsed = start.elapsed().as_secs_f64();
    info!(
        "completed {} games in {:.1}s ({:.1} games/s)",
        games.len(),
        elapsed,
        games.len() as f64 / elapsed.max(1e-9)
    );
    if !config.quiet {
        selfplay::log_summary(&games);
    }

    let written = match &args.output {
        Some(path) => File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            selfplay::write_jsonl(&games, &mut writer)
        }),
        None => {
            let mut writer = BufWriter::new(io::stdout().lock());
            selfplay::write_jsonl(&games, &mut writer)
        }
    };
    if let Err(e) = written {
        eprintln!("error: failed to write output: {e}");
        return ExitCode::FAILURE;
    }
    if let Some(path) = &args.output {
        info!("wrote {} games to {}", games.len(), path.display());
    }
    ExitCode::SUCCESS
}
