use alfil::fen::STARTING_FEN;
use alfil::perft::{divide, perft};
use alfil::Position;
use clap::Parser;
use shakmaty::fen::Fen;
use shakmaty::{Chess, Position as _};
use std::collections::BTreeMap;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from(STARTING_FEN))]
    fen: String,

    #[arg(short, long, default_value_t = 4)]
    depth: u32,

    /// Split the count per root move and compare with shakmaty
    #[arg(short, long)]
    compare: bool,
}

fn perft_shakmaty(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}

fn divide_shakmaty(pos: &Chess, depth: u32) -> BTreeMap<String, u64> {
    pos.legal_moves()
        .iter()
        .map(|m| {
            let mut new_pos = pos.clone();
            new_pos.play_unchecked(m);
            (
                m.to_uci(shakmaty::CastlingMode::Standard).to_string(),
                perft_shakmaty(&new_pos, depth.saturating_sub(1)),
            )
        })
        .collect()
}

fn main() -> ExitCode {
    env_logger::init();
    alfil::init();
    let args = Args::parse();

    println!("Running perft on FEN: '{}' at depth {}", args.fen, args.depth);

    let mut pos = match Position::from_fen(&args.fen) {
        Ok(pos) => pos,
        Err(e) => {
            eprintln!("invalid position: {e}");
            return ExitCode::FAILURE;
        }
    };

    if !args.compare {
        let start = std::time::Instant::now();
        let nodes = match perft(&mut pos, args.depth) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("perft failed: {e}");
                return ExitCode::FAILURE;
            }
        };
        let duration = start.elapsed();
        println!(
            "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
            args.depth,
            nodes,
            duration.as_millis(),
            nodes as f64 / (duration.as_micros().max(1) as f64)
        );
        return ExitCode::SUCCESS;
    }

    let ours: BTreeMap<String, u64> = match divide(&mut pos, args.depth) {
        Ok(split) => split.into_iter().map(|(m, n)| (m.to_uci(), n)).collect(),
        Err(e) => {
            eprintln!("perft failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let reference: Chess = match args
        .fen
        .parse::<Fen>()
        .ok()
        .and_then(|fen| fen.into_position(shakmaty::CastlingMode::Standard).ok())
    {
        Some(pos) => pos,
        None => {
            eprintln!("shakmaty rejected the position");
            return ExitCode::FAILURE;
        }
    };
    let theirs = divide_shakmaty(&reference, args.depth);

    let mut mismatches = 0;
    for mv in ours.keys().chain(theirs.keys()).collect::<std::collections::BTreeSet<_>>() {
        let a = ours.get(mv).copied();
        let b = theirs.get(mv).copied();
        if a == b {
            println!("  {mv}: {}", a.unwrap_or(0));
        } else {
            mismatches += 1;
            println!("  {mv}: alfil {a:?} shakmaty {b:?}  <-- mismatch");
        }
    }

    let total_ours: u64 = ours.values().sum();
    let total_theirs: u64 = theirs.values().sum();
    println!("Total: alfil {total_ours} shakmaty {total_theirs}");

    if mismatches == 0 && total_ours == total_theirs {
        println!("Counts match");
        ExitCode::SUCCESS
    } else {
        println!("{mismatches} root moves differ");
        ExitCode::FAILURE
    }
}
