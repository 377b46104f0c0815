//! Terminal-oriented Unicode board and sensor renderers.
//!
//! Used by the console front end and in diagnostics to compare what the
//! model believes against what the reed sensors report.

use crate::game_state::chess_types::*;
use crate::utils::move_text::{move_line, status_text};

/// Render the board to a Unicode string for terminal output.
///
/// Assumes square indexing where `0 == a1`, `7 == h1`, and `63 == h8`.
pub fn render_board(board: &Board) -> String {
    render_grid(|square| board.get(square).map(piece_to_unicode))
}

/// Board followed by the status line and current move line.
pub fn render_game_state(game_state: &GameState) -> String {
    format!(
        "{}\n{}\n{}",
        render_board(&game_state.board),
        status_text(game_state.status),
        move_line(game_state)
    )
}

/// One cell per square: `■` where a sensor reports a piece.
pub fn render_occupancy(sensors: u64) -> String {
    render_grid(|square| (sensors & (1u64 << square) != 0).then_some('■'))
}

fn render_grid(cell: impl Fn(Square) -> Option<char>) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for file in 0..8u8 {
            out.push(cell(square_at(file, rank)).unwrap_or('·'));
            if file < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");

    out
}

fn piece_to_unicode(piece: Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::King) => '♔',
        (Color::Black, PieceKind::Pawn) => '♟',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::King) => '♚',
    }
}
