//! Piece, color, square, and status vocabulary shared by every subsystem.
//!
//! Pieces expose derived movement capabilities (diagonal, orthogonal,
//! long-range) so ray scans in the analyzers can match attackers without
//! per-kind lookup tables.

use std::fmt;

pub use crate::game_state::board::Board;
pub use crate::game_state::game_state::GameState;
pub use crate::game_state::move_record::{MoveRecord, PendingRemoval};

/// Side owning a piece, or the side whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank delta of a single forward pawn step.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    #[inline]
    pub const fn pawn_start_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

pub const ALL_PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

impl PieceKind {
    /// Pawns capture one step diagonally and kings step diagonally; bishops
    /// and queens slide.
    #[inline]
    pub const fn moves_diagonally(self) -> bool {
        matches!(
            self,
            PieceKind::Pawn | PieceKind::Bishop | PieceKind::Queen | PieceKind::King
        )
    }

    #[inline]
    pub const fn moves_orthogonally(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Queen | PieceKind::King)
    }

    /// Knights count as long-range even though they jump: they are neither
    /// diagonal nor orthogonal, so ray scans never match them.
    #[inline]
    pub const fn is_long_range(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }

    /// Uppercase SAN letter, `None` for pawns.
    #[inline]
    pub const fn san_letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }
}

/// A colored piece. Empty squares are `None` wherever a `Piece` is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    #[inline]
    pub fn is_color(self, color: Color) -> bool {
        self.color == color
    }

    #[inline]
    pub fn is_kind(self, kind: PieceKind) -> bool {
        self.kind == kind
    }

    /// Bishops and queens: threatens every square along a clear diagonal.
    #[inline]
    pub const fn threatens_diagonally(self) -> bool {
        self.kind.is_long_range() && self.kind.moves_diagonally()
    }

    /// Rooks and queens: threatens every square along a clear rank or file.
    #[inline]
    pub const fn threatens_orthogonally(self) -> bool {
        self.kind.is_long_range() && self.kind.moves_orthogonally()
    }

    pub fn to_fen_char(self) -> char {
        let base = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        match self.color {
            Color::White => base.to_ascii_uppercase(),
            Color::Black => base,
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else if ch.is_ascii_lowercase() {
            Color::Black
        } else {
            return None;
        };

        let kind = match ch.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };

        Some(Self::new(color, kind))
    }
}

/// Board square index (`0 == a1`, `7 == h1`, `63 == h8`).
pub type Square = u8;

pub const BOARD_SQUARES: usize = 64;

#[inline]
pub const fn square_at(file: u8, rank: u8) -> Square {
    rank * 8 + file
}

#[inline]
pub const fn file_of(square: Square) -> u8 {
    square % 8
}

#[inline]
pub const fn rank_of(square: Square) -> u8 {
    square / 8
}

/// Shift a square by file/rank deltas; `None` when the result leaves the board.
#[inline]
pub fn offset_square(square: Square, d_file: i8, d_rank: i8) -> Option<Square> {
    let file = file_of(square) as i8 + d_file;
    let rank = rank_of(square) as i8 + d_rank;
    if !(0..8).contains(&file) || !(0..8).contains(&rank) {
        return None;
    }
    Some(square_at(file as u8, rank as u8))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

pub const CASTLE_WHITE_KINGSIDE: u8 = 1 << 0;
pub const CASTLE_WHITE_QUEENSIDE: u8 = 1 << 1;
pub const CASTLE_BLACK_KINGSIDE: u8 = 1 << 2;
pub const CASTLE_BLACK_QUEENSIDE: u8 = 1 << 3;

/// Per-color castling availability.
///
/// Rights can only be granted when the value is built (starting position or
/// FEN); afterwards they can only be revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const ALL: Self = Self(
        CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE | CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
    );
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => CASTLE_WHITE_KINGSIDE,
            (Color::White, CastleSide::Queenside) => CASTLE_WHITE_QUEENSIDE,
            (Color::Black, CastleSide::Kingside) => CASTLE_BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queenside) => CASTLE_BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    #[inline]
    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::flag(color, side);
    }

    #[inline]
    pub fn revoke_all(&mut self, color: Color) {
        self.revoke(color, CastleSide::Kingside);
        self.revoke(color, CastleSide::Queenside);
    }

    #[inline]
    pub const fn is_subset_of(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }
}

/// Sub-step of one side's turn between two committed moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    ToPlay,
    Playing,
    Capturing,
    EnPassant,
    Castling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    InProgress { color: Color, phase: Phase },
    Finished { winner: Color },
    Draw,
}

impl GameStatus {
    #[inline]
    pub const fn to_play(color: Color) -> Self {
        GameStatus::InProgress {
            color,
            phase: Phase::ToPlay,
        }
    }

    #[inline]
    pub const fn color(self) -> Option<Color> {
        match self {
            GameStatus::InProgress { color, .. } => Some(color),
            _ => None,
        }
    }

    #[inline]
    pub const fn phase(self) -> Option<Phase> {
        match self {
            GameStatus::InProgress { phase, .. } => Some(phase),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_over(self) -> bool {
        matches!(self, GameStatus::Finished { .. } | GameStatus::Draw)
    }
}
