#![allow(dead_code)]

use chess_core::{BoardLayout, Color, Game, PieceType, Position};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn sq(name: &str) -> Position {
    Position::from_algebraic(name).unwrap_or_else(|| panic!("bad square {}", name))
}

pub fn squares(names: &[&str]) -> Vec<Position> {
    sorted(names.iter().map(|n| sq(n)).collect())
}

pub fn sorted(mut positions: Vec<Position>) -> Vec<Position> {
    positions.sort_by_key(|p| (p.file, p.rank));
    positions
}

pub fn game_from(placement: &str) -> Game {
    init_logging();
    let layout = BoardLayout::from_placement(placement).expect("valid placement");
    Game::new(layout).expect("game starts")
}

pub fn standard_game() -> Game {
    init_logging();
    Game::standard().expect("game starts")
}

pub fn play(game: &mut Game, moves: &[(&str, &str)]) {
    for &(from, to) in moves {
        if let Err(err) = game.move_piece(sq(from), sq(to)) {
            panic!("{}{} rejected: {}", from, to, err);
        }
    }
}

pub fn moves_of(game: &Game, name: &str) -> Vec<Position> {
    sorted(game.available_moves(sq(name)).to_vec())
}

pub fn kind_at(game: &Game, name: &str) -> Option<(Color, PieceType)> {
    game.board().get(sq(name)).map(|p| (p.color, p.piece_type))
}

/// Grid, arena and player collections agree, and every cached move is
/// on the board and not onto a friendly piece.
pub fn assert_consistent(game: &Game) {
    let board = game.board();
    for piece in board.pieces() {
        assert_eq!(board.piece_id_at(piece.position), Some(piece.id), "{:?}", piece);
        assert!(game.player(piece.color).active_pieces().contains(&piece.id));
        for &to in &piece.available_moves {
            assert!(to.is_on_board(), "{:?} -> {}", piece, to);
            assert!(board.get(to).map_or(true, |other| other.color != piece.color));
        }
    }
    for color in [Color::White, Color::Black] {
        let player = game.player(color);
        assert_eq!(player.active_pieces().len(), board.pieces_of(color).count());
        for &id in player.active_pieces() {
            assert_eq!(board.piece(id).map(|p| p.color), Some(color));
        }
    }
}
