//! Self-check filtering.
//!
//! A candidate move is simulated on a scratch copy of the board, the
//! opposing team's moves are regenerated there and the move is dropped if
//! any of them reaches a guarded piece (normally the King) of the mover's
//! team. The real board is never touched by a simulation.

use crate::{
    piece::{PieceId, PieceType},
    Board, Player, Position,
};

/// True if moving `piece` to `to` leaves a `guarded` piece of the mover's
/// team attacked by `opposing`. Moves that cannot be applied at all count
/// as exposing.
pub fn move_exposes(board: &Board, opposing: &Player, piece: PieceId, to: Position, guarded: PieceType) -> bool {
    let mut scratch = board.clone();
    if scratch.apply_move(piece, to).is_none() {
        return true;
    }
    opposing.generate_all_possible_moves(&mut scratch);
    !opposing
        .pieces_attacking_opposite_piece_of_type(&scratch, guarded)
        .is_empty()
}

/// Narrows `piece`'s cached moves to those that keep every `guarded`
/// piece of `moving`'s team safe from `opposing`.
pub fn filter_self_check_moves(
    board: &mut Board,
    moving: &Player,
    opposing: &Player,
    piece: PieceId,
    guarded: PieceType,
) {
    let candidates = match board.piece(piece) {
        Some(p) if p.color == moving.team => p.available_moves.clone(),
        _ => return,
    };

    let snapshot: &Board = board;
    let legal: Vec<Position> = candidates
        .into_iter()
        .filter(|&to| !move_exposes(snapshot, opposing, piece, to, guarded))
        .collect();

    if let Some(p) = board.piece_mut(piece) {
        p.available_moves = legal;
    }
}
