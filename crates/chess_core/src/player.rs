use crate::{
    legality,
    moves::refresh_available_moves,
    piece::{Color, PieceId, PieceType},
    Board, Piece, Position,
};

/// One side of the game: a team color and the ids of its live pieces.
///
/// The board owns the pieces themselves. Ids whose piece is no longer on
/// the board handed in (e.g. captured on a scratch copy) are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub team: Color,
    active_pieces: Vec<PieceId>,
}

impl Player {
    pub fn new(team: Color) -> Self {
        Self {
            team,
            active_pieces: Vec::new(),
        }
    }

    pub fn active_pieces(&self) -> &[PieceId] {
        &self.active_pieces
    }

    pub fn add_piece(&mut self, id: PieceId) {
        if !self.active_pieces.contains(&id) {
            self.active_pieces.push(id);
        }
    }

    pub fn remove_piece(&mut self, id: PieceId) -> bool {
        let before = self.active_pieces.len();
        self.active_pieces.retain(|&p| p != id);
        before != self.active_pieces.len()
    }

    pub fn on_game_restarted(&mut self) {
        self.active_pieces.clear();
    }

    pub fn pieces<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = &'a Piece> + 'a {
        self.active_pieces.iter().filter_map(move |&id| board.piece(id))
    }

    /// Recomputes the pseudo-legal moves of every live piece.
    pub fn generate_all_possible_moves(&self, board: &mut Board) {
        for &id in &self.active_pieces {
            refresh_available_moves(board, id);
        }
    }

    pub fn pieces_of_type(&self, board: &Board, kind: PieceType) -> Vec<PieceId> {
        self.pieces(board)
            .filter(|p| p.piece_type == kind)
            .map(|p| p.id)
            .collect()
    }

    /// Own pieces whose cached moves reach an enemy piece of `kind`.
    pub fn pieces_attacking_opposite_piece_of_type(&self, board: &Board, kind: PieceType) -> Vec<PieceId> {
        let targets: Vec<Position> = board
            .pieces_of(self.team.opposite())
            .filter(|p| p.piece_type == kind)
            .map(|p| p.position)
            .collect();
        if targets.is_empty() {
            return Vec::new();
        }

        self.pieces(board)
            .filter(|p| p.available_moves.iter().any(|m| targets.contains(m)))
            .map(|p| p.id)
            .collect()
    }

    /// Whether some move of this team leaves no own piece of `kind` under
    /// attack from `opponent`.
    pub fn can_hide_piece_from_attack(&self, board: &Board, opponent: &Player, kind: PieceType) -> bool {
        self.pieces(board).any(|piece| {
            piece
                .available_moves
                .iter()
                .any(|&to| !legality::move_exposes(board, opponent, piece.id, to, kind))
        })
    }

    /// Drops the moves of `piece` that would let `opponent` attack one of
    /// our pieces of `kind`.
    pub fn remove_moves_enabling_attack_on_piece_of_type(
        &self,
        board: &mut Board,
        opponent: &Player,
        kind: PieceType,
        piece: PieceId,
    ) {
        legality::filter_self_check_moves(board, self, opponent, piece, kind);
    }

    /// Applies the King filter to every live piece.
    pub fn restrict_to_legal_moves(&self, board: &mut Board, opponent: &Player) {
        for &id in &self.active_pieces {
            self.remove_moves_enabling_attack_on_piece_of_type(board, opponent, PieceType::King, id);
        }
    }

    pub fn has_any_move(&self, board: &Board) -> bool {
        self.pieces(board).any(|p| !p.available_moves.is_empty())
    }
}
