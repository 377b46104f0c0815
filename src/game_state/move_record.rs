use crate::game_state::chess_rules::castle_side_for_king_move;
use crate::game_state::chess_types::*;

/// A piece lifted off the board during the current turn, not yet resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingRemoval {
    pub square: Square,
    pub piece: Piece,
}

/// A move as it was physically played, plus the annotations needed for SAN.
///
/// `piece` is the piece that moved; a promotion keeps `Pawn` here and sets
/// `promotion` while the board holds the new queen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    pub start: Square,
    pub end: Square,
    pub piece: Piece,
    pub captured: bool,
    pub check: bool,
    pub checkmate: bool,
    pub promotion: bool,
}

impl MoveRecord {
    #[inline]
    pub const fn new(start: Square, end: Square, piece: Piece) -> Self {
        Self {
            start,
            end,
            piece,
            captured: false,
            check: false,
            checkmate: false,
            promotion: false,
        }
    }

    #[inline]
    pub fn castle_side(&self) -> Option<CastleSide> {
        if !self.piece.is_kind(PieceKind::King) {
            return None;
        }
        castle_side_for_king_move(self.start, self.end)
    }

    /// Square skipped by a pawn double step, which becomes the en passant target.
    pub fn en_passant_target(&self) -> Option<Square> {
        if !self.piece.is_kind(PieceKind::Pawn) {
            return None;
        }
        let color = self.piece.color;
        let start_rank = rank_of(self.start);
        let end_rank = rank_of(self.end) as i8;
        if start_rank != color.pawn_start_rank()
            || end_rank != start_rank as i8 + 2 * color.pawn_direction()
        {
            return None;
        }
        offset_square(self.end, 0, -color.pawn_direction())
    }

    #[inline]
    pub fn reaches_promotion_rank(&self) -> bool {
        self.piece.is_kind(PieceKind::Pawn)
            && rank_of(self.end) == self.piece.color.promotion_rank()
    }
}
