use std::fmt;
use std::str::FromStr;

use crate::{ChessError, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank step a pawn of this team advances by.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The farthest rank for this team's pawns.
    pub fn promotion_rank(self) -> i8 {
        match self {
            Color::White => crate::board::BOARD_SIZE - 1,
            Color::Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Kinds a pawn may become, in the order a picker offers them.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    pub fn is_promotion_choice(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }

    /// Parses a FEN-style letter. Uppercase is White.
    pub fn from_char(c: char) -> Result<(Color, PieceType), ChessError> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece_type = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'r' => PieceType::Rook,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return Err(ChessError::UnknownPieceKind(c.to_string())),
        };
        Ok((color, piece_type))
    }

    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceType::Pawn => 'p',
            PieceType::Rook => 'r',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl FromStr for PieceType {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceType::ALL
            .into_iter()
            .find(|kind| format!("{:?}", kind).eq_ignore_ascii_case(s))
            .ok_or_else(|| ChessError::UnknownPieceKind(s.to_string()))
    }
}

/// Stable handle for a live piece. Ids are never reused within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub piece_type: PieceType,
    pub color: Color,
    pub position: Position,
    /// Where the piece stood before its last move. Equal to `position` until it moves.
    pub previous_position: Position,
    pub has_moved: bool,
    /// Cached destinations; rebuilt from scratch whenever the board changes.
    pub available_moves: Vec<Position>,
}

impl Piece {
    pub fn new(id: PieceId, piece_type: PieceType, color: Color, position: Position) -> Self {
        Self {
            id,
            piece_type,
            color,
            position,
            previous_position: position,
            has_moved: false,
            available_moves: Vec::new(),
        }
    }

    pub fn is_from_same_team(&self, other: &Piece) -> bool {
        self.color == other.color
    }

    pub fn can_move_to(&self, pos: Position) -> bool {
        self.available_moves.contains(&pos)
    }

    /// Relocates the piece and remembers where it came from.
    pub fn move_to(&mut self, pos: Position) {
        self.previous_position = self.position;
        self.position = pos;
        self.has_moved = true;
    }

    /// Rank distance covered by the last move.
    pub fn last_rank_displacement(&self) -> i8 {
        (self.position.rank - self.previous_position.rank).abs()
    }
}
