//! Canonical chess-rule constants.
//!
//! Starting layout, default sensor masks, and the fixed castling geometry
//! used while inferring moves from occupancy changes.

use crate::game_state::chess_types::{
    file_of, rank_of, square_at, CastleSide, Color, PieceKind, Square,
};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Occupancy of the standard starting position (ranks 1, 2, 7 and 8).
pub const DEFAULT_SENSORS_STATE: u64 = 0xFFFF_0000_0000_FFFF;

/// Reduced layout used for training: knights and bishops only.
pub const TRAINING_SENSORS_STATE: u64 = 0x6600_0000_0000_0066;

pub const BACK_RANK_LAYOUT: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Rook home squares and the castling right each one guards.
pub const ROOK_HOME_SQUARES: [(Square, Color, CastleSide); 4] = [
    (0, Color::White, CastleSide::Queenside),
    (7, Color::White, CastleSide::Kingside),
    (56, Color::Black, CastleSide::Queenside),
    (63, Color::Black, CastleSide::Kingside),
];

/// Column width of the status line on the reference display.
pub const STATUS_TEXT_WIDTH: usize = 15;

/// Rook `(home, destination)` for a castle where the king lands on `king_to`.
#[inline]
pub fn castling_rook_squares(king_to: Square, side: CastleSide) -> (Square, Square) {
    let rank = rank_of(king_to);
    match side {
        CastleSide::Kingside => (square_at(7, rank), square_at(5, rank)),
        CastleSide::Queenside => (square_at(0, rank), square_at(3, rank)),
    }
}

/// Side of a castle implied by a two-file king move along its rank.
#[inline]
pub fn castle_side_for_king_move(from: Square, to: Square) -> Option<CastleSide> {
    if rank_of(from) != rank_of(to) {
        return None;
    }
    match file_of(to) as i8 - file_of(from) as i8 {
        2 => Some(CastleSide::Kingside),
        -2 => Some(CastleSide::Queenside),
        _ => None,
    }
}
