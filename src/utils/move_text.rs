//! Short algebraic move text and status lines for the display.
//!
//! Moves are rendered from what the board sensors observed: origin-file
//! disambiguation is only emitted for pawn captures, and castling is
//! recognized from the king's two-file displacement.

use crate::game_state::chess_rules::STATUS_TEXT_WIDTH;
use crate::game_state::chess_types::*;
use crate::utils::algebraic::SquareName;

pub fn move_text(record: &MoveRecord) -> String {
    let mut out = match record.castle_side() {
        Some(CastleSide::Kingside) => "O-O".to_owned(),
        Some(CastleSide::Queenside) => "O-O-O".to_owned(),
        None => piece_move_text(record),
    };

    if record.checkmate {
        out.push('#');
    } else if record.check {
        out.push('+');
    }

    out
}

fn piece_move_text(record: &MoveRecord) -> String {
    let mut out = String::with_capacity(8);

    match record.piece.kind.san_letter() {
        Some(letter) => out.push(letter),
        None if record.captured => out.push(char::from(b'a' + file_of(record.start))),
        None => {}
    }

    if record.captured {
        out.push('x');
    }
    out.push_str(&SquareName(record.end).to_string());

    if record.promotion {
        out.push_str("=Q");
    }

    out
}

/// Text of `color`'s most recent move, `-` before it has moved.
pub fn last_move_text(game_state: &GameState, color: Color) -> String {
    game_state
        .last_move(color)
        .map(move_text)
        .unwrap_or_else(|| "-".to_owned())
}

pub fn status_text(status: GameStatus) -> &'static str {
    match status {
        GameStatus::InProgress { color, phase } => match (color, phase) {
            (Color::White, Phase::ToPlay) => "White to play",
            (Color::White, Phase::Playing) => "White playing",
            (Color::White, Phase::Capturing) => "White capturing",
            (Color::White, Phase::EnPassant) => "White enpassant",
            (Color::White, Phase::Castling) => "White castling",
            (Color::Black, Phase::ToPlay) => "Black to play",
            (Color::Black, Phase::Playing) => "Black playing",
            (Color::Black, Phase::Capturing) => "Black capturing",
            (Color::Black, Phase::EnPassant) => "Black enpassant",
            (Color::Black, Phase::Castling) => "Black castling",
        },
        GameStatus::Finished {
            winner: Color::White,
        } => "White won",
        GameStatus::Finished {
            winner: Color::Black,
        } => "Black won",
        GameStatus::Draw => "Draw",
    }
}

/// Status text left-aligned in a fixed-width display field.
pub fn status_text_padded(status: GameStatus) -> String {
    format!("{:<width$}", status_text(status), width = STATUS_TEXT_WIDTH)
}

/// Move-number line such as `12. Nf3 Nc6`, covering the current full move.
pub fn move_line(game_state: &GameState) -> String {
    let white = game_state.last_move(Color::White).map(move_text);
    let black = game_state.last_move(Color::Black).map(move_text);

    match (game_state.side_to_move(), white, black) {
        (_, None, None) => format!("{}.", game_state.fullmove_number),
        (Color::Black, Some(white), _) => format!("{}. {white}", game_state.fullmove_number),
        (Color::Black, None, Some(black)) => format!("{}. {black}", game_state.fullmove_number),
        (Color::White, white, Some(black)) => format!(
            "{}. {} {black}",
            game_state.fullmove_number.saturating_sub(1).max(1),
            white.as_deref().unwrap_or("..")
        ),
        (Color::White, Some(white), None) => format!("{}. {white}", game_state.fullmove_number),
    }
}
