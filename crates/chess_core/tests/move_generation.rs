mod common;

use chess_core::{moves::generate_candidate_moves, Board, Color, PieceType, Position, BOARD_SIZE};
use common::{sorted, sq, squares};

fn candidates(board: &Board, name: &str) -> Vec<Position> {
    let piece = board.get(sq(name)).expect("piece on square");
    sorted(generate_candidate_moves(board, piece))
}

#[test]
fn knight_in_corner() {
    let mut board = Board::new();
    board.place(PieceType::Knight, Color::White, sq("a1")).unwrap();
    assert_eq!(candidates(&board, "a1"), squares(&["b3", "c2"]));
}

#[test]
fn knight_jumps_but_not_onto_friends() {
    let mut board = Board::new();
    board.place(PieceType::Knight, Color::White, sq("d4")).unwrap();
    board.place(PieceType::Pawn, Color::White, sq("e6")).unwrap();
    board.place(PieceType::Pawn, Color::Black, sq("c6")).unwrap();
    // surrounded on all sides does not matter for a knight
    for name in ["c3", "c4", "c5", "d3", "d5", "e3", "e4", "e5"] {
        board.place(PieceType::Pawn, Color::White, sq(name)).unwrap();
    }
    assert_eq!(
        candidates(&board, "d4"),
        squares(&["b3", "b5", "c2", "c6", "e2", "f3", "f5"])
    );
}

#[test]
fn rook_stops_at_first_occupant() {
    let mut board = Board::new();
    board.place(PieceType::Rook, Color::White, sq("a1")).unwrap();
    board.place(PieceType::Pawn, Color::White, sq("a3")).unwrap();
    board.place(PieceType::Knight, Color::Black, sq("c1")).unwrap();
    assert_eq!(candidates(&board, "a1"), squares(&["a2", "b1", "c1"]));
}

#[test]
fn bishop_rays() {
    let mut board = Board::new();
    board.place(PieceType::Bishop, Color::Black, sq("c1")).unwrap();
    board.place(PieceType::Pawn, Color::White, sq("e3")).unwrap();
    assert_eq!(candidates(&board, "c1"), squares(&["a3", "b2", "d2", "e3"]));
}

#[test]
fn queen_on_empty_board() {
    let mut board = Board::new();
    board.place(PieceType::Queen, Color::White, sq("d4")).unwrap();
    assert_eq!(candidates(&board, "d4").len(), 27);
}

#[test]
fn king_steps() {
    let mut board = Board::new();
    board.place(PieceType::King, Color::White, sq("h1")).unwrap();
    board.place(PieceType::Pawn, Color::White, sq("g2")).unwrap();
    board.place(PieceType::Pawn, Color::Black, sq("h2")).unwrap();
    assert_eq!(candidates(&board, "h1"), squares(&["g1", "h2"]));
}

#[test]
fn pawn_double_step_needs_both_squares_empty() {
    let mut board = Board::new();
    board.place(PieceType::Pawn, Color::White, sq("e2")).unwrap();
    board.place(PieceType::Pawn, Color::White, sq("d2")).unwrap();
    board.place(PieceType::Knight, Color::Black, sq("d3")).unwrap();
    board.place(PieceType::Knight, Color::Black, sq("e4")).unwrap();

    assert_eq!(candidates(&board, "e2"), squares(&["d3", "e3"]));
    assert_eq!(candidates(&board, "d2"), Vec::<Position>::new());
}

#[test]
fn moved_pawn_steps_once() {
    let mut board = Board::new();
    let pawn = board.place(PieceType::Pawn, Color::White, sq("a2")).unwrap();
    board.apply_move(pawn, sq("a3")).unwrap();
    assert_eq!(candidates(&board, "a3"), squares(&["a4"]));
}

#[test]
fn unmoved_pawn_off_its_home_rank_may_still_double_step() {
    let mut board = Board::new();
    board.place(PieceType::Pawn, Color::Black, sq("c5")).unwrap();
    assert_eq!(candidates(&board, "c5"), squares(&["c3", "c4"]));
}

#[test]
fn pawn_on_last_rank_has_no_forward_move() {
    let mut board = Board::new();
    board.place(PieceType::Pawn, Color::Black, sq("c1")).unwrap();
    assert!(candidates(&board, "c1").is_empty());
}

#[test]
fn pawn_captures_only_enemies() {
    let mut board = Board::new();
    board.place(PieceType::Pawn, Color::Black, sq("d7")).unwrap();
    board.place(PieceType::Rook, Color::White, sq("c6")).unwrap();
    board.place(PieceType::Rook, Color::Black, sq("e6")).unwrap();
    assert_eq!(candidates(&board, "d7"), squares(&["c6", "d5", "d6"]));
}

#[test]
fn standard_position_generation() {
    let game = common::standard_game();
    let board = game.board();

    let mut total = 0;
    for piece in board.pieces_of(Color::White) {
        total += generate_candidate_moves(board, piece).len();
    }
    assert_eq!(total, 20);

    for piece in board.pieces() {
        for to in generate_candidate_moves(board, piece) {
            assert!(to.file >= 0 && to.file < BOARD_SIZE && to.rank >= 0 && to.rank < BOARD_SIZE);
            assert!(board.get(to).map_or(true, |other| other.color != piece.color));
        }
    }
}

#[test]
fn generation_does_not_touch_the_board() {
    let game = common::standard_game();
    let board = game.board().clone();
    let before = board.placement();
    for piece in board.pieces() {
        let _ = generate_candidate_moves(&board, piece);
    }
    assert_eq!(board.placement(), before);
    assert_eq!(board.en_passant_square(), None);
}
