// Perft: count leaf nodes of the legal move tree to a fixed depth.
// Any difference from reference counts means a generator or make/unmake bug.
use crate::board::Position;
use crate::error::PositionError;
use crate::movegen::MoveGenerator;
use crate::moves::Move;

pub fn perft(pos: &mut Position, depth: u32) -> Result<u64, PositionError> {
    let mut generator = MoveGenerator::new();
    perft_with(&mut generator, pos, depth)
}

pub fn perft_with(
    generator: &mut MoveGenerator<'_>,
    pos: &mut Position,
    depth: u32,
) -> Result<u64, PositionError> {
    if depth == 0 {
        return Ok(1);
    }
    let moves = generator.generate_moves(pos, true);
    if depth == 1 {
        return Ok(moves.len() as u64);
    }
    let mut nodes = 0u64;
    for mv in moves {
        pos.make_move(mv, true);
        nodes += perft_with(generator, pos, depth - 1)?;
        pos.unmake_move(mv, true)?;
    }
    Ok(nodes)
}

/// Node count below each root move, in generator order
pub fn divide(pos: &mut Position, depth: u32) -> Result<Vec<(Move, u64)>, PositionError> {
    // no root moves are played at depth 0
    if depth == 0 {
        return Ok(Vec::new());
    }
    let mut generator = MoveGenerator::new();
    let moves = generator.generate_moves(pos, true);
    let mut counts = Vec::with_capacity(moves.len());
    for mv in moves {
        pos.make_move(mv, true);
        let nodes = perft_with(&mut generator, pos, depth - 1)?;
        pos.unmake_move(mv, true)?;
        log::trace!("{mv}: {nodes}");
        counts.push((mv, nodes));
    }
    Ok(counts)
}
