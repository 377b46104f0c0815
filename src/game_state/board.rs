//! Mailbox board: one optional piece per square.
//!
//! Sensor masks only tell which squares are occupied, so the board keeps
//! piece identity per square and derives occupancy on demand.

use crate::game_state::chess_rules::BACK_RANK_LAYOUT;
use crate::game_state::chess_types::{
    square_at, Color, Piece, PieceKind, Square, BOARD_SQUARES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SQUARES],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SQUARES],
        }
    }

    pub fn starting_position() -> Self {
        let mut board = Self::empty();
        for (file, kind) in BACK_RANK_LAYOUT.iter().enumerate() {
            let file = file as u8;
            for color in Color::ALL {
                board.set(square_at(file, color.back_rank()), Piece::new(color, *kind));
                board.set(
                    square_at(file, color.pawn_start_rank()),
                    Piece::new(color, PieceKind::Pawn),
                );
            }
        }
        board
    }

    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    #[inline]
    pub fn set(&mut self, square: Square, piece: Piece) {
        self.squares[square as usize] = Some(piece);
    }

    /// Empty a square, returning whatever stood there.
    #[inline]
    pub fn clear(&mut self, square: Square) -> Option<Piece> {
        self.squares[square as usize].take()
    }

    pub fn occupancy(&self) -> u64 {
        self.iter()
            .fold(0u64, |mask, (square, _)| mask | (1u64 << square))
    }

    /// First square (lowest index) holding `color`'s king.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceKind::King);
        self.iter()
            .find(|(_, piece)| *piece == king)
            .map(|(square, _)| square)
    }

    /// Drop every piece whose square is not set in `mask`.
    pub fn retain_mask(&mut self, mask: u64) {
        for (square, slot) in self.squares.iter_mut().enumerate() {
            if mask & (1u64 << square) == 0 {
                *slot = None;
            }
        }
    }

    /// Occupied squares in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(square, slot)| slot.map(|piece| (square as Square, piece)))
    }
}
