// Core chess rules modules
pub mod board;
pub mod error;
pub mod game;
pub mod layout;
pub mod legality;
pub mod moves;
pub mod piece;
pub mod player;
pub mod position;

// Re-export main types for convenience
pub use board::{AppliedMove, Board, BOARD_SIZE};
pub use error::{ChessError, ChessResult};
pub use game::{Game, GameEvent, GameInput, GameState, Outcome, PromotionRequest, SelectionSquare};
pub use layout::{BoardLayout, LayoutEntry};
pub use moves::{Move, MoveType};
pub use piece::{Color, Piece, PieceId, PieceType};
pub use player::Player;
pub use position::Position;
