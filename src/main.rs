//! alfil command-line entry point: pick a move for a position.

use alfil::fen::STARTING_FEN;
use alfil::{Color, Engine, Position};
use clap::{Parser, ValueEnum};
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Position to search
    #[arg(short, long, default_value_t = String::from(STARTING_FEN))]
    fen: String,

    /// Search depth in plies
    #[arg(short, long, default_value_t = 4)]
    depth: i32,

    /// Colour the engine plays; defaults to the side to move
    #[arg(short, long, value_enum)]
    colour: Option<Side>,
}

fn main() -> ExitCode {
    env_logger::init();
    alfil::init();
    let args = Args::parse();

    let pos = match Position::from_fen(&args.fen) {
        Ok(pos) => pos,
        Err(e) => {
            eprintln!("invalid position: {e}");
            return ExitCode::FAILURE;
        }
    };
    let colour = args
        .colour
        .map(Color::from)
        .unwrap_or_else(|| pos.side_to_move());
    let engine = Engine::new(colour);

    println!("{pos}");
    match engine.status(&args.fen) {
        Ok(status) if status.is_over() => println!("status: {status:?}"),
        Ok(_) => {}
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    }

    let start = std::time::Instant::now();
    match engine.choose_move(&args.fen, args.depth) {
        Ok(Some(mv)) => {
            println!("bestmove {mv} ({} ms)", start.elapsed().as_millis());
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("bestmove (none)");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("search failed: {e}");
            ExitCode::FAILURE
        }
    }
}
