//! Atoms: play a chain-reaction game in the terminal.
//!
//! Human seats read cursor moves from stdin; automated seats pick random
//! legal cells. The board is printed to stdout after every move.

use std::cell::RefCell;
use std::io::{self, Stdout, StdinLock};
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use atoms::board::{PlayerKind, Roster, ALL_PLAYERS, PLAYER_COUNT};
use atoms::engine::{Game, GameConfig, GameError};
use atoms::movegen::{HumanMover, MoveError, RandomMover};
use atoms::protocol::LineInput;
use atoms::render::TextRenderer;

/// Chain-reaction territory game on a 10x7 grid
#[derive(Parser, Debug)]
#[command(name = "atoms", version)]
struct Args {
    /// Seat kinds for players 1-4 (human, cpu, off), comma separated
    #[arg(long, value_delimiter = ',', default_value = "human,cpu")]
    players: Vec<PlayerKind>,

    /// Seed for automated players (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between chain-reaction waves in milliseconds (0 hides waves)
    #[arg(long, default_value_t = 60)]
    delay_ms: u64,

    /// Abandon the game after this many rounds
    #[arg(long)]
    max_turns: Option<u32>,
}

type TerminalInput = LineInput<StdinLock<'static>, Stdout>;

fn seat_kinds(players: &[PlayerKind]) -> Result<[PlayerKind; PLAYER_COUNT], String> {
    if players.len() > PLAYER_COUNT {
        return Err(format!("at most {PLAYER_COUNT} seats, got {}", players.len()));
    }
    let mut kinds = [PlayerKind::Unused; PLAYER_COUNT];
    kinds[..players.len()].copy_from_slice(players);
    Ok(kinds)
}

fn build_game(kinds: [PlayerKind; PLAYER_COUNT], args: &Args) -> Result<Game, GameError> {
    let roster = Roster::new(kinds)?;
    let config = GameConfig {
        max_turns: args.max_turns,
        ..GameConfig::default()
    };
    let mut game = Game::new(roster, config);

    // Every human seat shares the one terminal.
    let input: Rc<RefCell<TerminalInput>> =
        Rc::new(RefCell::new(LineInput::new(io::stdin().lock(), io::stdout())));
    let seed = args.seed.unwrap_or_else(rand::random);
    for player in ALL_PLAYERS {
        match kinds[player.index()] {
            PlayerKind::Human => game.set_provider(player, Box::new(HumanMover::new(Rc::clone(&input)))),
            PlayerKind::Automated => {
                let seat_seed = seed.wrapping_add(u64::from(player.id()));
                game.set_provider(player, Box::new(RandomMover::from_seed(seat_seed)));
            }
            PlayerKind::Unused => {}
        }
    }
    tracing::debug!(seed, ?kinds, "game configured");
    Ok(game)
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("atoms=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let kinds = match seat_kinds(&args.players) {
        Ok(k) => k,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut game = match build_game(kinds, &args) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut renderer = TextRenderer::new(io::stdout(), Duration::from_millis(args.delay_ms));
    let result = game.run(&mut renderer);
    if let Some(e) = renderer.take_error() {
        tracing::warn!(error = %e, "failed to write board");
    }

    match result {
        Ok(summary) => {
            if summary.winner.is_none() {
                println!("turn limit reached, no winner");
            }
            ExitCode::SUCCESS
        }
        Err(GameError::Move(MoveError::InputClosed)) => {
            println!();
            println!("game abandoned");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
