use crate::{
    piece::{Color, PieceId, PieceType},
    Board, Piece, Position,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveType {
    Normal,
    Capture,
    DoubleStep,
    EnPassant,
    /// Pawn reached its last rank. May also capture.
    Promotion,
}

/// Record of an applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub piece_type: PieceType,
    pub color: Color,
    pub move_type: MoveType,
    pub captured: Option<PieceType>,
    /// Kind chosen for a promoted pawn, filled in once the choice arrives.
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = QUEEN_DIRECTIONS;

/// Pseudo-legal destinations for `piece` on `board`. Never mutates the
/// board and never considers check; see [`crate::legality`] for that.
pub fn generate_candidate_moves(board: &Board, piece: &Piece) -> Vec<Position> {
    match piece.piece_type {
        PieceType::Pawn => pawn_moves(board, piece),
        PieceType::Rook => sliding_moves(board, piece, &ROOK_DIRECTIONS),
        PieceType::Bishop => sliding_moves(board, piece, &BISHOP_DIRECTIONS),
        PieceType::Queen => sliding_moves(board, piece, &QUEEN_DIRECTIONS),
        PieceType::Knight => step_moves(board, piece, &KNIGHT_OFFSETS),
        PieceType::King => step_moves(board, piece, &KING_OFFSETS),
    }
}

/// Rebuilds one piece's cache. Unknown ids are ignored.
pub fn refresh_available_moves(board: &mut Board, id: PieceId) {
    let Some(moves) = board.piece(id).map(|piece| generate_candidate_moves(board, piece)) else {
        return;
    };
    if let Some(piece) = board.piece_mut(id) {
        piece.available_moves = moves;
    }
}

fn pawn_moves(board: &Board, pawn: &Piece) -> Vec<Position> {
    let mut moves = Vec::new();
    let forward = pawn.color.forward();
    let range = if pawn.has_moved { 1 } else { 2 };

    for step in 1..=range {
        let next = pawn.position.offset(0, forward * step);
        if !board.is_on_board(next) || board.get(next).is_some() {
            break;
        }
        moves.push(next);
    }

    for file_step in [1, -1] {
        let target = pawn.position.offset(file_step, forward);
        if !board.is_on_board(target) {
            continue;
        }
        match board.get(target) {
            Some(occupant) if !occupant.is_from_same_team(pawn) => moves.push(target),
            Some(_) => {}
            None if can_capture_en_passant(board, pawn, target) => moves.push(target),
            None => {}
        }
    }

    moves
}

/// The square must be the recorded en passant target and the pawn beside
/// us must be the enemy pawn that just double-stepped past it.
fn can_capture_en_passant(board: &Board, pawn: &Piece, target: Position) -> bool {
    if board.en_passant_square() != Some(target) {
        return false;
    }

    let beside = Position::new(target.file, pawn.position.rank);
    board.get(beside).is_some_and(|other| {
        other.piece_type == PieceType::Pawn
            && !other.is_from_same_team(pawn)
            && board.last_moved_piece() == Some(other.id)
            && other.last_rank_displacement() == 2
    })
}

fn sliding_moves(board: &Board, piece: &Piece, directions: &[(i8, i8)]) -> Vec<Position> {
    let mut moves = Vec::new();
    for &(file_step, rank_step) in directions {
        let mut current = piece.position.offset(file_step, rank_step);
        while board.is_on_board(current) {
            match board.get(current) {
                None => moves.push(current),
                Some(occupant) => {
                    if !occupant.is_from_same_team(piece) {
                        moves.push(current);
                    }
                    break;
                }
            }
            current = current.offset(file_step, rank_step);
        }
    }
    moves
}

fn step_moves(board: &Board, piece: &Piece, offsets: &[(i8, i8)]) -> Vec<Position> {
    offsets
        .iter()
        .map(|&(file_step, rank_step)| piece.position.offset(file_step, rank_step))
        .filter(|&target| board.is_on_board(target))
        .filter(|&target| board.get(target).map_or(true, |occupant| !occupant.is_from_same_team(piece)))
        .collect()
}
