//! Perft node counts from the standard starting position.
//!
//! Run with:
//! `cargo run --release --bin perft -- --depth 4`

use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use quince_chess::errors::ChessResult;
use quince_chess::game_state::board::Board;

#[derive(Parser, Debug)]
#[command(name = "perft")]
#[command(about = "Counts legal move tree leaves from the start position", long_about = None)]
struct Args {
    /// Deepest ply to count
    #[arg(short, long, default_value_t = 4)]
    depth: u32,
}

fn main() -> ChessResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let board = Board::standard()?;
    for depth in 1..=args.depth.max(1) {
        let started = Instant::now();
        let nodes = board.perft(depth)?;
        let elapsed = started.elapsed();
        println!(
            "depth {depth}: {nodes} nodes in {:.3}s ({:.0} nodes/s)",
            elapsed.as_secs_f64(),
            nodes as f64 / elapsed.as_secs_f64().max(1e-9)
        );
    }
    Ok(())
}
