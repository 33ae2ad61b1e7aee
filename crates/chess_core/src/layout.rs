use std::collections::HashSet;
use std::str::FromStr;

use crate::{
    board::BOARD_SIZE,
    piece::{Color, PieceType},
    ChessError, ChessResult, Position,
};

/// One piece of a starting layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    pub position: Position,
    pub color: Color,
    pub piece_type: PieceType,
}

/// Ordered starting placement. Any layout with on-board, distinct squares
/// is accepted; nothing assumes the standard opening position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardLayout {
    entries: Vec<LayoutEntry>,
}

impl BoardLayout {
    pub fn new(entries: Vec<LayoutEntry>) -> ChessResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !entry.position.is_on_board() {
                return Err(ChessError::OffBoard(entry.position));
            }
            if !seen.insert(entry.position) {
                return Err(ChessError::SquareOccupied(entry.position));
            }
        }
        Ok(Self { entries })
    }

    pub fn standard() -> Self {
        let piece_order = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        let mut entries = Vec::with_capacity(32);
        for (color, back_rank, pawn_rank) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
            for (file, &piece_type) in (0..BOARD_SIZE).zip(piece_order.iter()) {
                entries.push(LayoutEntry {
                    position: Position::new(file, back_rank),
                    color,
                    piece_type,
                });
            }
            for file in 0..BOARD_SIZE {
                entries.push(LayoutEntry {
                    position: Position::new(file, pawn_rank),
                    color,
                    piece_type: PieceType::Pawn,
                });
            }
        }
        Self { entries }
    }

    /// Parses the piece-placement field of a FEN string, e.g.
    /// `"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"`.
    pub fn from_placement(placement: &str) -> ChessResult<Self> {
        let ranks: Vec<&str> = placement.trim().split('/').collect();
        if ranks.len() != BOARD_SIZE as usize {
            return Err(ChessError::InvalidLayout(format!(
                "expected {} ranks, found {}",
                BOARD_SIZE,
                ranks.len()
            )));
        }

        let mut entries = Vec::new();
        for (row, rank_text) in ranks.iter().enumerate() {
            let rank = BOARD_SIZE - 1 - row as i8;
            let overflow = || {
                ChessError::InvalidLayout(format!("rank {} spans more than {} files", rank + 1, BOARD_SIZE))
            };
            let mut file: i8 = 0;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip == 0 || skip > BOARD_SIZE as u32 {
                        return Err(ChessError::InvalidLayout(format!(
                            "bad empty-square count '{}' on rank {}",
                            c,
                            rank + 1
                        )));
                    }
                    file += skip as i8;
                    if file > BOARD_SIZE {
                        return Err(overflow());
                    }
                    continue;
                }
                let (color, piece_type) = PieceType::from_char(c)?;
                if file >= BOARD_SIZE {
                    return Err(overflow());
                }
                entries.push(LayoutEntry {
                    position: Position::new(file, rank),
                    color,
                    piece_type,
                });
                file += 1;
            }
            if file != BOARD_SIZE {
                return Err(ChessError::InvalidLayout(format!(
                    "rank {} spans {} files",
                    rank + 1,
                    file
                )));
            }
        }

        Self::new(entries)
    }

    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for BoardLayout {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_placement(s)
    }
}
