mod common;

use chess_core::{
    ChessError, Color, GameEvent, GameState, MoveType, PieceType, PromotionRequest,
};
use common::{game_from, kind_at, moves_of, play, sq, squares, standard_game};

#[test]
fn promotion_suspends_the_turn_until_a_choice_arrives() {
    let mut game = game_from("4k3/P7/8/8/8/8/8/4K3");
    game.drain_events();
    let pawn = game.board().get(sq("a7")).unwrap().id;

    let record = game.move_piece(sq("a7"), sq("a8")).unwrap();
    assert_eq!(record.move_type, MoveType::Promotion);

    let request = PromotionRequest {
        team: Color::White,
        position: sq("a8"),
        pawn,
    };
    assert_eq!(game.pending_promotion(), Some(request));
    assert_eq!(game.active_team(), Color::White);
    assert_eq!(game.state(), GameState::Play);
    assert_eq!(
        game.drain_events(),
        vec![
            GameEvent::PieceMoved {
                id: pawn,
                from: sq("a7"),
                to: sq("a8")
            },
            GameEvent::PromotionRequested(request),
        ]
    );

    // Nothing else moves while the pawn waits.
    assert_eq!(
        game.move_piece(sq("e1"), sq("e2")),
        Err(ChessError::PromotionPending)
    );
    game.on_square_selected(sq("e1"));
    assert!(game.selected_piece().is_none());
    assert!(game.drain_events().is_empty());

    game.choose_promotion(PieceType::Queen).unwrap();
    assert_eq!(game.pending_promotion(), None);
    assert_eq!(kind_at(&game, "a8"), Some((Color::White, PieceType::Queen)));
    assert_eq!(game.active_team(), Color::Black);
    assert_eq!(game.last_move().and_then(|m| m.promotion), Some(PieceType::Queen));

    let queen = game.board().get(sq("a8")).unwrap();
    assert!(queen.can_move_to(sq("d8")));
    assert!(!game.player(Color::White).active_pieces().contains(&pawn));
    assert!(game.player(Color::White).active_pieces().contains(&queen.id));

    assert!(game.is_in_check(Color::Black));
    assert_eq!(moves_of(&game, "e8"), squares(&["d7", "e7", "f7"]));

    let events = game.drain_events();
    assert!(matches!(events[0], GameEvent::PieceRemoved { id, .. } if id == pawn));
    assert!(matches!(
        events[1],
        GameEvent::PieceCreated { piece_type: PieceType::Queen, color: Color::White, .. }
    ));
    assert_eq!(events[2], GameEvent::TurnEnded { active: Color::Black });
    common::assert_consistent(&game);
}

#[test]
fn pawn_and_king_are_not_promotion_choices() {
    let mut game = game_from("4k3/P7/8/8/8/8/8/4K3");
    play(&mut game, &[("a7", "a8")]);

    assert_eq!(
        game.choose_promotion(PieceType::King),
        Err(ChessError::InvalidPromotion(PieceType::King))
    );
    assert_eq!(
        game.choose_promotion(PieceType::Pawn),
        Err(ChessError::InvalidPromotion(PieceType::Pawn))
    );
    assert!(game.pending_promotion().is_some());
    assert_eq!(kind_at(&game, "a8"), Some((Color::White, PieceType::Pawn)));
}

#[test]
fn promotion_without_pending_pawn_is_a_no_op() {
    let mut game = standard_game();
    game.drain_events();
    let before = game.board().placement();

    assert_eq!(
        game.choose_promotion(PieceType::Queen),
        Err(ChessError::NoPromotionPending)
    );
    assert_eq!(game.board().placement(), before);
    assert_eq!(game.active_team(), Color::White);
    assert!(game.drain_events().is_empty());
}

#[test]
fn black_underpromotes_on_the_first_rank() {
    let mut game = game_from("4k3/8/8/8/8/8/7p/K7");
    play(&mut game, &[("a1", "a2"), ("h2", "h1")]);
    assert_eq!(game.pending_promotion().map(|r| r.team), Some(Color::Black));

    game.choose_promotion(PieceType::Knight).unwrap();
    assert_eq!(kind_at(&game, "h1"), Some((Color::Black, PieceType::Knight)));
    assert_eq!(game.active_team(), Color::White);
    assert_eq!(moves_of(&game, "h1"), squares(&["f2", "g3"]));
}

#[test]
fn capturing_onto_the_last_rank_promotes() {
    let mut game = game_from("1r2k3/P7/8/8/8/8/8/4K3");
    let record = game.move_piece(sq("a7"), sq("b8")).unwrap();

    assert_eq!(record.move_type, MoveType::Promotion);
    assert_eq!(record.captured, Some(PieceType::Rook));
    assert_eq!(game.player(Color::Black).active_pieces().len(), 1);

    game.choose_promotion(PieceType::Rook).unwrap();
    assert_eq!(kind_at(&game, "b8"), Some((Color::White, PieceType::Rook)));
    assert!(game.is_in_check(Color::Black));
}

#[test]
fn promoted_piece_can_deliver_mate() {
    let mut game = game_from("k7/7P/1K6/8/8/8/8/8");
    play(&mut game, &[("h7", "h8")]);
    assert_eq!(game.state(), GameState::Play);

    game.choose_promotion(PieceType::Queen).unwrap();
    assert_eq!(game.state(), GameState::Finished);
    assert_eq!(game.winner(), Some(Color::White));
}

#[test]
fn double_step_onto_the_last_rank_promotes() {
    let mut game = game_from("4k3/8/P7/8/8/8/8/4K3");
    assert_eq!(moves_of(&game, "a6"), squares(&["a7", "a8"]));

    let record = game.move_piece(sq("a6"), sq("a8")).unwrap();
    assert_eq!(record.move_type, MoveType::Promotion);
    assert_eq!(game.pending_promotion().map(|r| r.position), Some(sq("a8")));
    assert_eq!(game.active_team(), Color::White);
    assert_eq!(game.board().en_passant_square(), None);
    assert_eq!(game.board().last_moved_piece(), None);

    game.choose_promotion(PieceType::Queen).unwrap();
    assert_eq!(kind_at(&game, "a8"), Some((Color::White, PieceType::Queen)));
    assert_eq!(game.active_team(), Color::Black);
}
