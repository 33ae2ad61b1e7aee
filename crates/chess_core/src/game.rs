//! Game controller: turn alternation, outcome detection and the promotion
//! suspension point.
//!
//! All mutation goes through `&mut Game`, so a move (capture, relocation,
//! cache rebuild, turn-end evaluation) is applied as one unit. Front ends
//! and transports talk to it with board coordinates only and learn about
//! the results by draining [`GameEvent`]s.

use log::{debug, info, warn};

use crate::{
    board::AppliedMove,
    moves::{Move, MoveType},
    piece::{Color, PieceId, PieceType},
    Board, BoardLayout, ChessError, ChessResult, Piece, Player, Position,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Init,
    Play,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    /// The team to move is not in check and has no legal move.
    Stalemate,
}

impl Outcome {
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } => Some(winner),
            Outcome::Stalemate => None,
        }
    }
}

/// A pawn waiting on the farthest rank for its new kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionRequest {
    pub team: Color,
    pub position: Position,
    pub pawn: PieceId,
}

/// One highlighted destination of the selected piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSquare {
    pub position: Position,
    /// False when the square holds an enemy piece.
    pub is_free: bool,
}

/// Outbound notifications for rendering, UI and network layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    PieceCreated {
        id: PieceId,
        piece_type: PieceType,
        color: Color,
        position: Position,
    },
    PieceRemoved {
        id: PieceId,
        piece_type: PieceType,
        color: Color,
        position: Position,
    },
    PieceMoved {
        id: PieceId,
        from: Position,
        to: Position,
    },
    SelectionChanged {
        selected: Option<Position>,
        squares: Vec<SelectionSquare>,
    },
    PromotionRequested(PromotionRequest),
    TurnEnded {
        active: Color,
    },
    GameFinished(Outcome),
}

/// Input events. A transport can replay the same ordered stream into
/// another engine and reach the same state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    SquareSelected(Position),
    PieceSelected(Position),
    SelectedPieceMoved(Position),
    PromotionChosen(PieceType),
    Restart,
}

#[derive(Debug, Clone)]
pub struct Game {
    layout: BoardLayout,
    board: Board,
    white: Player,
    black: Player,
    active: Color,
    state: GameState,
    outcome: Option<Outcome>,
    selected: Option<PieceId>,
    pending_promotion: Option<PromotionRequest>,
    history: Vec<Move>,
    events: Vec<GameEvent>,
}

impl Game {
    /// Builds the pieces from `layout` and enters `Play` with White to move.
    pub fn new(layout: BoardLayout) -> ChessResult<Self> {
        let mut game = Self {
            layout,
            board: Board::new(),
            white: Player::new(Color::White),
            black: Player::new(Color::Black),
            active: Color::White,
            state: GameState::Init,
            outcome: None,
            selected: None,
            pending_promotion: None,
            history: Vec::new(),
            events: Vec::new(),
        };
        game.start_new_game()?;
        Ok(game)
    }

    pub fn standard() -> ChessResult<Self> {
        Self::new(BoardLayout::standard())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn active_team(&self) -> Color {
        self.active
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<Color> {
        self.outcome.and_then(Outcome::winner)
    }

    pub fn is_game_in_progress(&self) -> bool {
        self.state == GameState::Play
    }

    pub fn is_team_turn_active(&self, team: Color) -> bool {
        self.active == team
    }

    pub fn player(&self, team: Color) -> &Player {
        match team {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn selected_piece(&self) -> Option<&Piece> {
        self.selected.and_then(|id| self.board.piece(id))
    }

    pub fn pending_promotion(&self) -> Option<PromotionRequest> {
        self.pending_promotion
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    /// Cached destinations of the piece on `pos`; empty for empty squares.
    pub fn available_moves(&self, pos: Position) -> &[Position] {
        self.board
            .get(pos)
            .map(|p| p.available_moves.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_in_check(&self, team: Color) -> bool {
        let attacker = self.player(team.opposite());
        let mut scratch = self.board.clone();
        attacker.generate_all_possible_moves(&mut scratch);
        !attacker
            .pieces_attacking_opposite_piece_of_type(&scratch, PieceType::King)
            .is_empty()
    }

    /// Hands over every event produced since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn handle_input(&mut self, input: GameInput) -> ChessResult<()> {
        match input {
            GameInput::SquareSelected(pos) => {
                self.on_square_selected(pos);
                Ok(())
            }
            GameInput::PieceSelected(pos) => self.on_piece_selected(pos),
            GameInput::SelectedPieceMoved(pos) => self.on_selected_piece_moved(pos),
            GameInput::PromotionChosen(kind) => self.choose_promotion(kind),
            GameInput::Restart => self.restart(),
        }
    }

    /// Click handling: reselect, deselect or move the selected piece.
    /// Rejected input is dropped silently.
    pub fn on_square_selected(&mut self, pos: Position) {
        if let Err(err) = self.try_square_selected(pos) {
            debug!("ignored selection of {}: {}", pos, err);
        }
    }

    fn try_square_selected(&mut self, pos: Position) -> ChessResult<()> {
        self.ensure_accepting_input()?;
        let clicked = self.board.get(pos).map(|p| (p.id, p.color));

        match self.selected {
            Some(selected) => {
                if clicked.map(|(id, _)| id) == Some(selected) {
                    self.deselect_piece();
                    Ok(())
                } else if clicked.is_some_and(|(_, color)| self.is_team_turn_active(color)) {
                    self.on_piece_selected(pos)
                } else {
                    self.on_selected_piece_moved(pos)
                }
            }
            None => match clicked {
                Some((_, color)) if self.is_team_turn_active(color) => self.on_piece_selected(pos),
                Some(_) => Err(ChessError::NotYourTurn),
                None => Err(ChessError::NoPieceAt(pos)),
            },
        }
    }

    /// Selects the active team's piece on `pos` and narrows its moves to
    /// legal ones.
    pub fn on_piece_selected(&mut self, pos: Position) -> ChessResult<()> {
        self.ensure_accepting_input()?;
        let piece = self.board.get(pos).ok_or(ChessError::NoPieceAt(pos))?;
        if !self.is_team_turn_active(piece.color) {
            return Err(ChessError::NotYourTurn);
        }
        let id = piece.id;

        let (board, active, opponent) = self.sides();
        active.remove_moves_enabling_attack_on_piece_of_type(board, opponent, PieceType::King, id);
        self.selected = Some(id);
        self.emit_selection();
        Ok(())
    }

    pub fn on_selected_piece_moved(&mut self, pos: Position) -> ChessResult<()> {
        self.ensure_accepting_input()?;
        let id = self.selected.ok_or(ChessError::NoSelection)?;
        let from = self
            .board
            .piece(id)
            .map(|p| p.position)
            .ok_or(ChessError::NoSelection)?;
        self.move_piece(from, pos).map(|_| ())
    }

    pub fn deselect_piece(&mut self) {
        if self.selected.take().is_some() {
            self.emit_selection();
        }
    }

    /// Moves the active team's piece from `from` to `to` if `to` is in its
    /// legal move list. Returns the applied move; a pawn landing on its
    /// last rank leaves the turn open until [`Game::choose_promotion`].
    pub fn move_piece(&mut self, from: Position, to: Position) -> ChessResult<Move> {
        self.ensure_accepting_input()?;
        let piece = self.board.get(from).ok_or(ChessError::NoPieceAt(from))?;
        if !self.is_team_turn_active(piece.color) {
            return Err(ChessError::NotYourTurn);
        }
        if !piece.can_move_to(to) {
            return Err(ChessError::IllegalMove { from, to });
        }
        let id = piece.id;

        let applied = self
            .board
            .apply_move(id, to)
            .ok_or(ChessError::IllegalMove { from, to })?;
        Ok(self.on_move_applied(id, applied))
    }

    fn on_move_applied(&mut self, id: PieceId, applied: AppliedMove) -> Move {
        let AppliedMove { record, captured } = applied;
        if let Some(captured) = captured {
            self.on_piece_removed(&captured);
        }
        self.events.push(GameEvent::PieceMoved {
            id,
            from: record.from,
            to: record.to,
        });
        self.history.push(record);
        self.deselect_piece();

        if record.move_type == MoveType::Promotion {
            let request = PromotionRequest {
                team: record.color,
                position: record.to,
                pawn: id,
            };
            info!("{} pawn on {} awaits promotion", record.color, record.to);
            self.pending_promotion = Some(request);
            self.events.push(GameEvent::PromotionRequested(request));
        } else {
            self.end_turn();
        }
        record
    }

    /// Replaces the pending pawn with a piece of `kind` and completes the turn.
    pub fn choose_promotion(&mut self, kind: PieceType) -> ChessResult<()> {
        let Some(request) = self.pending_promotion else {
            warn!("promotion to {:?} requested with no pawn pending", kind);
            return Err(ChessError::NoPromotionPending);
        };
        if !kind.is_promotion_choice() {
            warn!("refusing promotion to {:?}", kind);
            return Err(ChessError::InvalidPromotion(kind));
        }

        if let Some(pawn) = self.board.take(request.pawn) {
            self.on_piece_removed(&pawn);
        }
        let id = self.create_piece(kind, request.team, request.position)?;
        if let Some(piece) = self.board.piece_mut(id) {
            piece.has_moved = true;
        }
        if let Some(record) = self.history.last_mut() {
            record.promotion = Some(kind);
        }
        self.pending_promotion = None;
        info!("{} pawn on {} promoted to {:?}", request.team, request.position, kind);

        self.end_turn();
        Ok(())
    }

    /// Throws away the current game and starts over from the stored layout.
    pub fn restart(&mut self) -> ChessResult<()> {
        info!("restarting game");
        self.deselect_piece();
        let ids: Vec<PieceId> = self
            .white
            .active_pieces()
            .iter()
            .chain(self.black.active_pieces())
            .copied()
            .collect();
        for id in ids {
            if let Some(piece) = self.board.take(id) {
                self.events.push(removed_event(&piece));
            }
        }

        self.board.clear();
        self.white.on_game_restarted();
        self.black.on_game_restarted();
        self.pending_promotion = None;
        self.history.clear();
        self.start_new_game()
    }

    fn start_new_game(&mut self) -> ChessResult<()> {
        self.set_game_state(GameState::Init);
        self.outcome = None;
        self.create_pieces_from_layout()?;
        self.active = Color::White;
        self.set_game_state(GameState::Play);
        info!("new game with {} pieces", self.layout.len());

        self.regenerate_all_moves();
        self.begin_turn();
        Ok(())
    }

    fn set_game_state(&mut self, state: GameState) {
        debug!("game state {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn create_pieces_from_layout(&mut self) -> ChessResult<()> {
        let entries = self.layout.entries().to_vec();
        for entry in entries {
            self.create_piece(entry.piece_type, entry.color, entry.position)?;
        }
        Ok(())
    }

    fn create_piece(&mut self, piece_type: PieceType, color: Color, position: Position) -> ChessResult<PieceId> {
        let id = self.board.place(piece_type, color, position)?;
        self.player_mut(color).add_piece(id);
        self.events.push(GameEvent::PieceCreated {
            id,
            piece_type,
            color,
            position,
        });
        Ok(id)
    }

    /// Owner bookkeeping for a piece the board has already dropped.
    fn on_piece_removed(&mut self, piece: &Piece) {
        self.player_mut(piece.color).remove_piece(piece.id);
        self.events.push(removed_event(piece));
    }

    fn end_turn(&mut self) {
        // A stale en passant square was consumed when the move was applied;
        // one is only present now if this move was a double step.
        self.regenerate_all_moves();
        if self.check_if_game_is_finished() {
            self.end_game(Outcome::Checkmate { winner: self.active });
            return;
        }
        self.change_active_team();
        self.begin_turn();
    }

    /// Active team first so the opponent's regeneration sees the new board.
    fn regenerate_all_moves(&mut self) {
        let (board, active, opponent) = self.sides();
        active.generate_all_possible_moves(board);
        opponent.generate_all_possible_moves(board);
    }

    fn check_if_game_is_finished(&mut self) -> bool {
        let (board, active, opponent) = self.sides();
        if active
            .pieces_attacking_opposite_piece_of_type(board, PieceType::King)
            .is_empty()
        {
            return false;
        }

        let Some(king) = opponent.pieces_of_type(board, PieceType::King).first().copied() else {
            return false;
        };
        opponent.remove_moves_enabling_attack_on_piece_of_type(board, active, PieceType::King, king);
        let king_moves = board.piece(king).map_or(0, |k| k.available_moves.len());
        king_moves == 0 && !opponent.can_hide_piece_from_attack(board, active, PieceType::King)
    }

    /// Narrows the new active team to legal moves and catches the
    /// no-legal-move terminal states.
    fn begin_turn(&mut self) {
        let (board, active, opponent) = self.sides();
        active.restrict_to_legal_moves(board, opponent);
        if active.has_any_move(board) {
            return;
        }

        let in_check = !opponent
            .pieces_attacking_opposite_piece_of_type(board, PieceType::King)
            .is_empty();
        let outcome = if in_check {
            Outcome::Checkmate {
                winner: opponent.team,
            }
        } else {
            Outcome::Stalemate
        };
        self.end_game(outcome);
    }

    fn change_active_team(&mut self) {
        self.active = self.active.opposite();
        self.events.push(GameEvent::TurnEnded { active: self.active });
    }

    fn end_game(&mut self, outcome: Outcome) {
        self.set_game_state(GameState::Finished);
        self.outcome = Some(outcome);
        match outcome {
            Outcome::Checkmate { winner } => info!("{} won", winner),
            Outcome::Stalemate => info!("stalemate, {} cannot move", self.active),
        }
        self.events.push(GameEvent::GameFinished(outcome));
    }

    fn ensure_accepting_input(&self) -> ChessResult<()> {
        if self.pending_promotion.is_some() {
            return Err(ChessError::PromotionPending);
        }
        if !self.is_game_in_progress() {
            return Err(ChessError::GameNotInProgress);
        }
        Ok(())
    }

    fn emit_selection(&mut self) {
        let selected = self.selected.and_then(|id| self.board.piece(id));
        let squares = selected
            .map(|piece| {
                piece
                    .available_moves
                    .iter()
                    .map(|&position| SelectionSquare {
                        position,
                        is_free: self.board.get(position).is_none(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let event = GameEvent::SelectionChanged {
            selected: selected.map(|p| p.position),
            squares,
        };
        self.events.push(event);
    }

    fn player_mut(&mut self, team: Color) -> &mut Player {
        match team {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Board plus (active, opponent) players, borrowed side by side.
    fn sides(&mut self) -> (&mut Board, &Player, &Player) {
        match self.active {
            Color::White => (&mut self.board, &self.white, &self.black),
            Color::Black => (&mut self.board, &self.black, &self.white),
        }
    }
}

fn removed_event(piece: &Piece) -> GameEvent {
    GameEvent::PieceRemoved {
        id: piece.id,
        piece_type: piece.piece_type,
        color: piece.color,
        position: piece.position,
    }
}
