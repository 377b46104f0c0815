//! FEN-to-GameState loader.
//!
//! Loads board, side to move, castling rights, en passant target and clocks
//! from a Forsyth-Edwards Notation string. Fields are applied in order, so a
//! failure leaves the earlier fields in place with the status set to `Draw`.

use log::{debug, warn};

use crate::errors::ChessErrors;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, ChessErrors> {
    let mut game_state = GameState::new_empty();
    load_fen(&mut game_state, fen)?;
    Ok(game_state)
}

/// Replace `game_state` with the position described by `fen`.
pub fn load_fen(game_state: &mut GameState, fen: &str) -> Result<(), ChessErrors> {
    reset_for_load(game_state);
    load_fields(game_state, fen)
        .inspect(|_| debug!("loaded FEN {fen}"))
        .inspect_err(|err| warn!("FEN loading stopped: {err}"))
}

fn reset_for_load(game_state: &mut GameState) {
    *game_state = GameState {
        status: GameStatus::Draw,
        ..GameState::new_empty()
    };
}

fn load_fields(game_state: &mut GameState, fen: &str) -> Result<(), ChessErrors> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or(ChessErrors::MissingFenField("board layout"))?;
    parse_board(board_part, &mut game_state.board)?;

    let side_part = parts.next().ok_or(ChessErrors::MissingFenField("side to move"))?;
    let side_to_move = parse_side_to_move(side_part)?;

    let castling_part = parts
        .next()
        .ok_or(ChessErrors::MissingFenField("castling rights"))?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;

    let en_passant_part = parts
        .next()
        .ok_or(ChessErrors::MissingFenField("en passant square"))?;
    game_state.en_passant_square = parse_en_passant_square(en_passant_part)?;

    let halfmove_part = parts.next().ok_or(ChessErrors::MissingFenField("halfmove clock"))?;
    game_state.halfmove_clock = parse_clock("halfmove clock", halfmove_part)?;

    let fullmove_part = parts.next().ok_or(ChessErrors::MissingFenField("fullmove number"))?;
    game_state.fullmove_number = parse_clock("fullmove number", fullmove_part)?;

    if parts.next().is_some() {
        return Err(ChessErrors::TrailingFenFields);
    }

    game_state.status = GameStatus::to_play(side_to_move);
    Ok(())
}

fn parse_board(board_part: &str, board: &mut Board) -> Result<(), ChessErrors> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessErrors::InvalidFenBoard(format!(
            "expected 8 ranks, found {}",
            ranks.len()
        )));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7u8.saturating_sub(fen_rank_idx as u8);
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessErrors::InvalidFenBoard(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(ChessErrors::InvalidFenBoard(format!(
                        "rank {} has too many files",
                        board_rank + 1
                    )));
                }
                continue;
            }

            let piece = Piece::from_fen_char(ch).ok_or(ChessErrors::InvalidFenPiece(ch))?;

            if file >= 8 {
                return Err(ChessErrors::InvalidFenBoard(format!(
                    "rank {} has too many files",
                    board_rank + 1
                )));
            }

            board.set(square_at(file, board_rank), piece);
            file += 1;
        }

        if file != 8 {
            return Err(ChessErrors::InvalidFenBoard(format!(
                "rank {} does not sum to 8 files",
                board_rank + 1
            )));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, ChessErrors> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(ChessErrors::InvalidSideToMove(side_part.to_owned())),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, ChessErrors> {
    if castling_part == "-" {
        return Ok(CastlingRights::NONE);
    }

    let mut bits = 0u8;
    for ch in castling_part.chars() {
        bits |= match ch {
            'K' => CASTLE_WHITE_KINGSIDE,
            'Q' => CASTLE_WHITE_QUEENSIDE,
            'k' => CASTLE_BLACK_KINGSIDE,
            'q' => CASTLE_BLACK_QUEENSIDE,
            _ => return Err(ChessErrors::InvalidCastlingRights(ch)),
        };
    }

    Ok(CastlingRights::from_bits(bits))
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, ChessErrors> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    Ok(Some(algebraic_to_square(en_passant_part)?))
}

fn parse_clock(field: &'static str, value: &str) -> Result<u16, ChessErrors> {
    value.parse::<u16>().map_err(|_| ChessErrors::InvalidClock {
        field,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::{DEFAULT_SENSORS_STATE, STARTING_POSITION_FEN};

    const START_BOARD: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    #[test]
    fn parse_starting_fen() {
        let game_state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        assert_eq!(game_state.status, GameStatus::to_play(Color::White));
        assert_eq!(game_state.occupancy(), DEFAULT_SENSORS_STATE);
        assert_eq!(game_state.castling_rights, CastlingRights::ALL);
        assert_eq!(game_state.fullmove_number, 1);
        assert_eq!(game_state.halfmove_clock, 0);
        assert_eq!(game_state.board, Board::starting_position());
    }

    #[test]
    fn castling_tokens_and_clocks() {
        let cases = [
            ("Kk - 4 12", CASTLE_WHITE_KINGSIDE | CASTLE_BLACK_KINGSIDE, 4, 12),
            ("Qq - 0 8", CASTLE_WHITE_QUEENSIDE | CASTLE_BLACK_QUEENSIDE, 0, 8),
            ("- - 99 50", 0, 99, 50),
        ];

        for (tail, bits, halfmove, fullmove) in cases {
            let fen = format!("{START_BOARD} w {tail}");
            let game_state = parse_fen(&fen).expect("castling FEN should parse");
            assert_eq!(game_state.castling_rights.bits(), bits, "{fen}");
            assert_eq!(game_state.halfmove_clock, halfmove);
            assert_eq!(game_state.fullmove_number, fullmove);
        }
    }

    #[test]
    fn en_passant_target_and_side() {
        let game_state = parse_fen("8/8/8/2k5/2pP4/8/B7/4K3 b - d3 0 3")
            .expect("en passant FEN should parse");
        assert_eq!(game_state.en_passant_square, Some(19));
        assert_eq!(game_state.status, GameStatus::to_play(Color::Black));
        assert_eq!(game_state.board.get(27), Some(Piece::new(Color::White, PieceKind::Pawn)));
    }

    #[test]
    fn failed_load_keeps_partial_state_as_draw() {
        let mut game_state = GameState::new_game();
        let result = load_fen(&mut game_state, "8/8/8/8/8/8/8/K6k x KQkq - 0 1");

        assert_eq!(result, Err(ChessErrors::InvalidSideToMove("x".to_owned())));
        assert_eq!(game_state.status, GameStatus::Draw);
        assert_eq!(game_state.board.get(0), Some(Piece::new(Color::White, PieceKind::King)));
        assert_eq!(game_state.occupancy(), 0x81);
        assert_eq!(game_state.castling_rights, CastlingRights::NONE);
    }

    #[test]
    fn malformed_fields_are_reported() {
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8 w - - 0 1").map(|_| ()),
            Err(ChessErrors::InvalidFenBoard("expected 8 ranks, found 7".to_owned()))
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/7x w - - 0 1").map(|_| ()),
            Err(ChessErrors::InvalidFenPiece('x'))
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 w KX - 0 1").map(|_| ()),
            Err(ChessErrors::InvalidCastlingRights('X'))
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 w - - 0").map(|_| ()),
            Err(ChessErrors::MissingFenField("fullmove number"))
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 w - - 0 1 extra").map(|_| ()),
            Err(ChessErrors::TrailingFenFields)
        );
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/8 w - - zero 1"),
            Err(ChessErrors::InvalidClock { field: "halfmove clock", .. })
        ));
    }
}
