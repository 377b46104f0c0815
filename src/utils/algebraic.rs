//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and internal
//! square indices reused by FEN, SAN, logging and sensor scripts.

use std::fmt;

use crate::errors::ChessErrors;
use crate::game_state::chess_types::{file_of, rank_of, Square};

/// Convert algebraic notation (for example: "e4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, ChessErrors> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessErrors::InvalidAlgebraicSquare(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(ChessErrors::InvalidAlgebraicFile(file as char));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(ChessErrors::InvalidAlgebraicRank(rank as char));
    }

    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Display adapter printing a square as `e4`, used in log lines and SAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareName(pub Square);

impl fmt::Display for SquareName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 63 {
            return f.write_str("??");
        }
        let file_char = char::from(b'a' + file_of(self.0));
        let rank_char = char::from(b'1' + rank_of(self.0));
        write!(f, "{file_char}{rank_char}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_square_conversions() {
        assert_eq!(algebraic_to_square("a1").expect("a1 should parse"), 0);
        assert_eq!(algebraic_to_square("h8").expect("h8 should parse"), 63);
        assert_eq!(SquareName(0).to_string(), "a1");
        assert_eq!(SquareName(algebraic_to_square("e4").expect("e4 should parse")).to_string(), "e4");
        assert_eq!(SquareName(63).to_string(), "h8");
    }

    #[test]
    fn malformed_coordinates_are_rejected() {
        assert_eq!(
            algebraic_to_square("e"),
            Err(ChessErrors::InvalidAlgebraicSquare("e".to_owned()))
        );
        assert_eq!(algebraic_to_square("i4"), Err(ChessErrors::InvalidAlgebraicFile('i')));
        assert_eq!(algebraic_to_square("e9"), Err(ChessErrors::InvalidAlgebraicRank('9')));
        assert_eq!(SquareName(64).to_string(), "??");
    }
}
