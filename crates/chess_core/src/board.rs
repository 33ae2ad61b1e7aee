use std::collections::BTreeMap;

use log::debug;

use crate::{
    moves::{Move, MoveType},
    piece::{Color, PieceId, PieceType},
    ChessError, ChessResult, Piece, Position,
};

pub const BOARD_SIZE: i8 = 8;

/// Result of [`Board::apply_move`]: the record of what happened plus the
/// piece that left the board, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub record: Move,
    pub captured: Option<Piece>,
}

/// The 8x8 grid plus the transient en passant state.
///
/// Pieces live in an arena keyed by [`PieceId`]; each grid cell holds at
/// most one id. Every live piece is referenced by exactly one cell and its
/// stored position names that cell.
#[derive(Debug, Clone)]
pub struct Board {
    grid: [[Option<PieceId>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
    pieces: BTreeMap<PieceId, Piece>,
    next_id: u32,
    en_passant_square: Option<Position>,
    last_moved_piece: Option<PieceId>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            grid: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
            pieces: BTreeMap::new(),
            next_id: 0,
            en_passant_square: None,
            last_moved_piece: None,
        }
    }

    pub fn is_on_board(&self, pos: Position) -> bool {
        pos.is_on_board()
    }

    pub fn piece_id_at(&self, pos: Position) -> Option<PieceId> {
        if !self.is_on_board(pos) {
            return None;
        }
        self.grid[pos.file as usize][pos.rank as usize]
    }

    /// Occupant of `pos`. Off-board squares read as empty.
    pub fn get(&self, pos: Position) -> Option<&Piece> {
        self.piece_id_at(pos).and_then(|id| self.pieces.get(&id))
    }

    /// Raw grid write. Does not touch the arena; no-op off the board.
    pub fn set(&mut self, pos: Position, occupant: Option<PieceId>) {
        if self.is_on_board(pos) {
            self.grid[pos.file as usize][pos.rank as usize] = occupant;
        }
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(&id)
    }

    pub fn has_piece(&self, id: PieceId) -> bool {
        self.pieces.contains_key(&id)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces.values().filter(move |p| p.color == color)
    }

    pub fn en_passant_square(&self) -> Option<Position> {
        self.en_passant_square
    }

    pub fn last_moved_piece(&self) -> Option<PieceId> {
        self.last_moved_piece
    }

    /// Creates a piece on an empty square.
    pub fn place(&mut self, piece_type: PieceType, color: Color, pos: Position) -> ChessResult<PieceId> {
        if !self.is_on_board(pos) {
            return Err(ChessError::OffBoard(pos));
        }
        if self.piece_id_at(pos).is_some() {
            return Err(ChessError::SquareOccupied(pos));
        }

        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.pieces.insert(id, Piece::new(id, piece_type, color, pos));
        self.set(pos, Some(id));
        Ok(id)
    }

    /// Removes a piece from both the grid and the arena.
    pub fn take(&mut self, id: PieceId) -> Option<Piece> {
        let piece = self.pieces.remove(&id)?;
        if self.piece_id_at(piece.position) == Some(id) {
            self.set(piece.position, None);
        }
        if self.last_moved_piece == Some(id) {
            self.last_moved_piece = None;
        }
        Some(piece)
    }

    /// Clears `from` and writes its occupant into `to`, updating the
    /// mover's coordinates. Whatever stood on `to` is dropped from the
    /// board and handed back; owner bookkeeping is the caller's job.
    pub fn move_occupant(&mut self, from: Position, to: Position) -> Option<Piece> {
        let id = self.piece_id_at(from)?;
        if !self.is_on_board(to) || from == to {
            return None;
        }

        let displaced = self.piece_id_at(to).and_then(|other| self.take(other));
        self.set(from, None);
        self.set(to, Some(id));
        if let Some(piece) = self.pieces.get_mut(&id) {
            piece.move_to(to);
        }
        displaced
    }

    /// Applies a move for piece `id` without any legality checks beyond
    /// refusing same-team captures. Handles normal and en passant
    /// captures, records double steps for the next half-move and
    /// invalidates every move cache.
    pub fn apply_move(&mut self, id: PieceId, to: Position) -> Option<AppliedMove> {
        let mover = self.pieces.get(&id)?;
        let (from, piece_type, color) = (mover.position, mover.piece_type, mover.color);
        if !self.is_on_board(to) || from == to {
            return None;
        }
        if self.get(to).is_some_and(|target| target.color == color) {
            return None;
        }

        // The en passant window only lasts one half-move.
        let en_passant = self.en_passant_square.take();
        let last_moved = self.last_moved_piece.take();

        let mut move_type = MoveType::Normal;
        let mut captured = None;
        if piece_type == PieceType::Pawn
            && Some(to) == en_passant
            && to.file != from.file
            && self.get(to).is_none()
        {
            let behind = Position::new(to.file, from.rank);
            let victim = self
                .get(behind)
                .filter(|p| p.piece_type == PieceType::Pawn && p.color != color)
                .map(|p| p.id)
                .filter(|victim| Some(*victim) == last_moved);
            if let Some(victim) = victim {
                captured = self.take(victim);
                move_type = MoveType::EnPassant;
            }
        }

        if let Some(taken) = self.move_occupant(from, to) {
            captured = Some(taken);
            move_type = MoveType::Capture;
        }

        if piece_type == PieceType::Pawn {
            // The landing rank decides promotion, even after a double step.
            if to.rank == color.promotion_rank() {
                move_type = MoveType::Promotion;
            } else if (to.rank - from.rank).abs() == 2 {
                self.en_passant_square = Some(Position::new(from.file, (from.rank + to.rank) / 2));
                self.last_moved_piece = Some(id);
                move_type = MoveType::DoubleStep;
            }
        }

        self.invalidate_moves();

        let record = Move {
            from,
            to,
            piece_type,
            color,
            move_type,
            captured: captured.as_ref().map(|p| p.piece_type),
            promotion: None,
        };
        debug!("applied {:?}", record);
        Some(AppliedMove { record, captured })
    }

    /// Drops every cached move list. Caches are rebuilt, never patched.
    pub fn invalidate_moves(&mut self) {
        for piece in self.pieces.values_mut() {
            piece.available_moves.clear();
        }
    }

    /// Empties the grid, the arena and the transient state. Ids keep
    /// counting up so stale handles never alias a new piece.
    pub fn clear(&mut self) {
        self.grid = [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize];
        self.pieces.clear();
        self.en_passant_square = None;
        self.last_moved_piece = None;
    }

    /// FEN-style piece placement, rank 8 first.
    pub fn placement(&self) -> String {
        let mut out = String::new();
        for rank in (0..BOARD_SIZE).rev() {
            let mut empty = 0;
            for file in 0..BOARD_SIZE {
                match self.get(Position::new(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.piece_type.to_char(piece.color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }
}
