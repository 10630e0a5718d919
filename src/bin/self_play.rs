//! Standalone self-play runner: two difficulty tiers play one game through
//! the search worker and the rules state machine.
//!
//! Run with:
//! `cargo run --release --bin self_play -- --white easy --black hard`
//! `RUST_LOG=debug cargo run --release --bin self_play`

use std::time::Instant;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use arcade_chess::engines::engine_iterative::IterativeEngine;
use arcade_chess::engines::engine_random::RandomEngine;
use arcade_chess::engines::engine_trait::Difficulty;
use arcade_chess::errors::ChessResult;
use arcade_chess::game_state::chess_types::{Color, GameResult};
use arcade_chess::game_state::position::Position;
use arcade_chess::search::threading::SearchWorker;
use arcade_chess::utils::long_algebraic::move_to_long_algebraic;

#[derive(Debug, Parser)]
#[command(name = "self_play", about = "Play one engine-vs-engine game")]
struct Args {
    /// Difficulty for White: random, easy, medium or hard.
    #[arg(long, default_value = "easy")]
    white: Difficulty,

    /// Difficulty for Black.
    #[arg(long, default_value = "medium")]
    black: Difficulty,

    /// Stop after this many plies and call the game unfinished.
    #[arg(long, default_value_t = 200)]
    max_plies: usize,

    /// Seed for book and random-tier picks; omit for a fresh game each run.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the board after every move.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ChessResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let worker = match args.seed {
        Some(seed) => SearchWorker::with_engines(
            IterativeEngine::with_seed(seed),
            RandomEngine::with_seed(seed),
        )?,
        None => SearchWorker::spawn()?,
    };

    info!(white = %args.white, black = %args.black, max_plies = args.max_plies, "starting self-play game");

    let mut position = Position::new_game();
    let mut lan_moves = Vec::new();
    while !position.result.is_over() && position.move_history.len() < args.max_plies {
        let difficulty = match position.side_to_move {
            Color::White => args.white,
            Color::Black => args.black,
        };

        let started = Instant::now();
        let output = worker.request(&position, difficulty)?.wait()?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        position = position.update_clock(elapsed_ms);
        if position.result.is_over() {
            break;
        }

        let Some(mv) = output.best_move else {
            warn!(side = ?position.side_to_move, "engine returned no move in a live position");
            break;
        };
        let lan = move_to_long_algebraic(&mv)?;
        let next = position.apply_engine_move(&mv);
        if next.move_history.len() == position.move_history.len() {
            warn!(%lan, "engine move rejected by the rules");
            break;
        }
        position = next;

        info!(
            ply = position.move_history.len(),
            %lan,
            book = output.from_book,
            depth = output.depth,
            score = output.score,
            elapsed_ms,
            "move played"
        );
        lan_moves.push(lan);
        if args.verbose {
            println!("{position}\n");
        }
    }

    let outcome = match position.result {
        GameResult::White => "1-0",
        GameResult::Black => "0-1",
        GameResult::Draw => "1/2-1/2",
        GameResult::None => "*",
    };
    println!("{}", lan_moves.join(" "));
    println!("result {outcome} after {} plies", position.move_history.len());
    println!("final FEN {}", position.get_fen());
    Ok(())
}
