use bevy::prelude::*;
use chess_core::{BoardLayout, ChessError, Game};
use chess_ui::ChessUiPlugin;

/// Optional first argument: a FEN piece-placement field to start from.
fn main() -> Result<(), ChessError> {
    let layout = match std::env::args().nth(1) {
        Some(placement) => BoardLayout::from_placement(&placement)?,
        None => BoardLayout::standard(),
    };
    let game = Game::new(layout)?;

    App::new().add_plugins(ChessUiPlugin::new(game)).run();
    Ok(())
}
