//! Error types for the rules engine.
//!
//! Grid queries never fail: off-board coordinates simply read as empty.
//! These errors cover rejected moves, promotion protocol misuse and
//! configuration problems such as malformed layouts.

use thiserror::Error;

use crate::{piece::PieceType, Position};

/// Errors surfaced by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// A piece kind name or letter did not match any of the six kinds
    #[error("Unknown piece kind: {0:?}")]
    UnknownPieceKind(String),

    #[error("Square {0} is off the board")]
    OffBoard(Position),

    #[error("Square {0} is already occupied")]
    SquareOccupied(Position),

    #[error("No piece at square {0}")]
    NoPieceAt(Position),

    /// Destination is not in the piece's filtered move list
    #[error("Illegal move from {from} to {to}")]
    IllegalMove { from: Position, to: Position },

    #[error("No piece is selected")]
    NoSelection,

    #[error("Piece does not belong to the active team")]
    NotYourTurn,

    #[error("Game is not in progress")]
    GameNotInProgress,

    /// A move arrived while a pawn is waiting to be promoted
    #[error("A promotion choice is pending")]
    PromotionPending,

    #[error("No promotion is pending")]
    NoPromotionPending,

    #[error("Cannot promote to {0:?}")]
    InvalidPromotion(PieceType),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

/// Result type alias for engine operations
pub type ChessResult<T> = Result<T, ChessError>;
