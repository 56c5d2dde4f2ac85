//! Computer-vs-computer match runner.
//!
//! Run with:
//! `cargo run --release -- --games 2 --max-plies 120`
//! `cargo run --release -- --config engines.toml`
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use quince_chess::config::EngineSettings;
use quince_chess::errors::ChessResult;
use quince_chess::game_state::chess_types::Team;
use quince_chess::utils::match_harness::{play_match, MatchConfig};

#[derive(Parser, Debug)]
#[command(name = "quince_chess")]
#[command(about = "Plays engine-vs-engine chess games and prints the records", long_about = None)]
struct Args {
    /// TOML file with per-side player settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of games to play
    #[arg(short, long, default_value_t = 1)]
    games: u32,

    /// Ply limit per game
    #[arg(short, long, default_value_t = 300)]
    max_plies: u32,

    /// Invalid moves tolerated per turn before a forfeit
    #[arg(long, default_value_t = 3)]
    max_invalid_attempts: u32,
}

fn run(args: &Args) -> ChessResult<()> {
    let settings = match &args.config {
        Some(path) => EngineSettings::load(path)?,
        None => EngineSettings::default(),
    };
    let match_config = MatchConfig {
        max_plies: args.max_plies,
        max_invalid_attempts: args.max_invalid_attempts,
    };

    let mut tally = [0u32; 3];
    for game in 1..=args.games {
        let mut white = settings.white.build(Team::White)?;
        let mut black = settings.black.build(Team::Black)?;
        info!(game, white = white.name(), black = black.name(), "starting game");

        let record = play_match(white.as_mut(), black.as_mut(), &match_config)?;
        match record.outcome.winner() {
            Some(Team::White) => tally[0] += 1,
            Some(Team::Black) => tally[1] += 1,
            None => tally[2] += 1,
        }
        println!("{}", record.notation());
        info!(
            game,
            outcome = %record.outcome,
            duration_ms = record.duration().num_milliseconds(),
            "game over"
        );
    }

    println!(
        "games={} white_wins={} black_wins={} draws_or_unfinished={}",
        args.games, tally[0], tally[1], tally[2]
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "match run failed");
            ExitCode::FAILURE
        }
    }
}
