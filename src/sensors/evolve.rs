//! Sensor-driven move inference.
//!
//! Each call diffs a sensor mask against the board and advances the turn
//! phase machine by at most one step. A cycle that returns the side to move
//! to `ToPlay` commits exactly one move and refreshes check, checkmate,
//! clocks and castling rights.
//!
//! Anomalous input (a piece dropped on an unrelated square, a third lift)
//! is logged and ignored; the board is only updated by events that fit the
//! current phase.

use log::{debug, info, trace, warn};

use crate::analysis::attack_checks::is_in_check;
use crate::analysis::checkmate::is_checkmate;
use crate::game_state::chess_rules::{castling_rook_squares, ROOK_HOME_SQUARES};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::sensors::sensor_diff::{diff_occupancy, SensorDelta};
use crate::utils::algebraic::SquareName;
use crate::utils::move_text::move_text;

/// Advance `game_state` with a new sensor mask; `true` when a move was committed.
pub fn evolve_game(game_state: &mut GameState, sensors: u64) -> bool {
    let delta = diff_occupancy(game_state.occupancy(), sensors);
    if delta.is_idle() {
        trace!("sensors unchanged");
        return false;
    }

    match game_state.status {
        GameStatus::Finished { winner } => {
            info!("game over, {winner} won; ignoring sensor change");
            false
        }
        GameStatus::Draw => {
            info!("game over by draw; ignoring sensor change");
            false
        }
        GameStatus::InProgress { color, phase } => match phase {
            Phase::ToPlay => on_to_play(game_state, color, delta),
            Phase::Playing => on_playing(game_state, color, delta),
            Phase::Capturing => on_capturing(game_state, color, delta),
            Phase::EnPassant => on_en_passant(game_state, color, delta),
            Phase::Castling => on_castling(game_state, color, delta),
        },
    }
}

#[inline]
fn set_phase(game_state: &mut GameState, color: Color, phase: Phase) {
    debug!("{color}: {:?} -> {phase:?}", game_state.status.phase());
    game_state.status = GameStatus::InProgress { color, phase };
}

fn on_to_play(game_state: &mut GameState, color: Color, delta: SensorDelta) -> bool {
    if let Some(square) = delta.removed {
        if let Some(piece) = game_state.board.clear(square) {
            game_state.removed = [Some(PendingRemoval { square, piece }), None];
            set_phase(game_state, color, Phase::Playing);
        }
    }

    if let Some(square) = delta.placed {
        warn!("unexpected piece on {} while {color} is to play", SquareName(square));
    }

    false
}

fn on_playing(game_state: &mut GameState, color: Color, delta: SensorDelta) -> bool {
    let Some(lifted) = game_state.removed[0] else {
        warn!("{color} is playing without a lifted piece");
        set_phase(game_state, color, Phase::ToPlay);
        return false;
    };

    if let Some(placed) = delta.placed {
        if placed == lifted.square {
            debug!("{color} put the piece back on {}", SquareName(placed));
            game_state.board.set(placed, lifted.piece);
            game_state.removed[0] = None;
            set_phase(game_state, color, Phase::ToPlay);
            return false;
        }

        if !lifted.piece.is_color(color) {
            warn!(
                "{} piece from {} dropped on {} during {color}'s turn",
                lifted.piece.color,
                SquareName(lifted.square),
                SquareName(placed)
            );
            return false;
        }

        let record = MoveRecord::new(lifted.square, placed, lifted.piece);
        game_state.board.set(placed, lifted.piece);
        game_state.removed[0] = None;

        if record.castle_side().is_some() {
            game_state.last_moves[color.index()] = Some(record);
            set_phase(game_state, color, Phase::Castling);
            return false;
        }

        if record.piece.is_kind(PieceKind::Pawn) && game_state.en_passant_square == Some(placed) {
            // The marker now points at the pawn that has to be taken off.
            game_state.en_passant_square = Some(square_at(file_of(placed), rank_of(lifted.square)));
            game_state.last_moves[color.index()] = Some(record);
            set_phase(game_state, color, Phase::EnPassant);
            return false;
        }

        game_state.en_passant_square = record.en_passant_target();
        return complete_move(game_state, color, record);
    }

    if let Some(square) = delta.removed {
        if let Some(piece) = game_state.board.clear(square) {
            game_state.removed[1] = Some(PendingRemoval { square, piece });
            set_phase(game_state, color, Phase::Capturing);
        }
    }

    false
}

fn on_capturing(game_state: &mut GameState, color: Color, delta: SensorDelta) -> bool {
    let [Some(first), Some(second)] = game_state.removed else {
        warn!("{color} is capturing without two lifted pieces");
        return false;
    };

    if let Some(placed) = delta.placed {
        if placed == first.square || placed == second.square {
            let (capturer, victim) = if first.piece.is_color(color) {
                (first, second)
            } else {
                (second, first)
            };

            if !capturer.piece.is_color(color) || victim.piece.is_color(color) {
                warn!("lifted pieces do not form a {color} capture");
                return restore_lift(game_state, color, placed);
            }

            if placed == capturer.square {
                return restore_lift(game_state, color, placed);
            }

            game_state.board.set(placed, capturer.piece);
            game_state.removed = [None, None];
            game_state.en_passant_square = None;

            let mut record = MoveRecord::new(capturer.square, placed, capturer.piece);
            record.captured = true;
            return complete_move(game_state, color, record);
        }

        warn!("piece dropped on {} during {color}'s capture", SquareName(placed));
    }

    if let Some(square) = delta.removed {
        warn!("third piece lifted from {} during {color}'s capture", SquareName(square));
    }

    false
}

/// Put back the lift recorded on `square`, leaving the other one pending.
fn restore_lift(game_state: &mut GameState, color: Color, square: Square) -> bool {
    let [first, second] = game_state.removed;
    let (restored, remaining) = if first.is_some_and(|lift| lift.square == square) {
        (first, second)
    } else {
        (second, first)
    };

    if let Some(lift) = restored {
        debug!("{color} put the piece back on {}", SquareName(lift.square));
        game_state.board.set(lift.square, lift.piece);
    }
    game_state.removed = [remaining, None];
    set_phase(game_state, color, Phase::Playing);
    false
}

fn on_en_passant(game_state: &mut GameState, color: Color, delta: SensorDelta) -> bool {
    if let Some(square) = delta.placed {
        warn!("piece dropped on {} during {color}'s en passant", SquareName(square));
        return false;
    }

    let Some(square) = delta.removed else {
        return false;
    };
    if game_state.en_passant_square != Some(square) {
        warn!("wrong piece lifted from {} during {color}'s en passant", SquareName(square));
        return false;
    }
    let Some(mut record) = game_state.last_moves[color.index()] else {
        warn!("{color} is capturing en passant without a recorded pawn move");
        return false;
    };

    game_state.board.clear(square);
    game_state.en_passant_square = None;
    record.captured = true;
    complete_move(game_state, color, record)
}

fn on_castling(game_state: &mut GameState, color: Color, delta: SensorDelta) -> bool {
    let Some(king_move) = game_state.last_moves[color.index()] else {
        warn!("{color} is castling without a recorded king move");
        return false;
    };
    let Some(side) = king_move.castle_side() else {
        warn!("{color} is castling but the last move was not a castle");
        return false;
    };
    let (rook_home, rook_destination) = castling_rook_squares(king_move.end, side);

    if let Some(square) = delta.removed {
        if game_state.removed[0].is_some() {
            warn!("second piece lifted from {} during {color}'s castle", SquareName(square));
        } else if let Some(piece) = game_state.board.clear(square) {
            if !piece.is_kind(PieceKind::Rook) {
                warn!("lifted {:?} from {} instead of the castling rook", piece.kind, SquareName(square));
            } else if square != rook_home {
                warn!(
                    "rook lifted from {} instead of {}",
                    SquareName(square),
                    SquareName(rook_home)
                );
            }
            game_state.removed[0] = Some(PendingRemoval { square, piece });
        }
    }

    if let Some(placed) = delta.placed {
        match game_state.removed[0] {
            Some(lift) if lift.square == placed => {
                debug!("{color} put the piece back on {}", SquareName(placed));
                game_state.board.set(placed, lift.piece);
                game_state.removed[0] = None;
            }
            Some(lift) if placed == rook_destination => {
                game_state.board.set(placed, lift.piece);
                game_state.removed[0] = None;
                game_state.en_passant_square = None;
                return complete_move(game_state, color, king_move);
            }
            Some(_) => warn!(
                "castling rook dropped on {} instead of {}",
                SquareName(placed),
                SquareName(rook_destination)
            ),
            None => warn!("unexpected piece on {} during {color}'s castle", SquareName(placed)),
        }
    }

    false
}

/// Finalize `mover`'s move: hand the turn over and refresh derived state.
fn complete_move(game_state: &mut GameState, mover: Color, mut record: MoveRecord) -> bool {
    if record.reaches_promotion_rank() {
        record.promotion = true;
        game_state.board.set(record.end, Piece::new(mover, PieceKind::Queen));
    }

    let opponent = mover.opposite();
    game_state.status = GameStatus::to_play(opponent);
    record.check = is_in_check(game_state, opponent);
    record.checkmate = record.check && is_checkmate(game_state);

    if mover == Color::Black {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }
    if record.piece.is_kind(PieceKind::Pawn) || record.captured {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);
    }

    game_state.last_moves[mover.index()] = Some(record);
    revoke_castling_rights(&mut game_state.castling_rights, &record);

    info!("{mover} played {}", move_text(&record));
    if record.checkmate {
        info!("checkmate, {mover} wins");
        game_state.status = GameStatus::Finished { winner: mover };
    }

    true
}

/// Kings lose both rights; touching a rook home square loses that corner's right.
pub fn revoke_castling_rights(rights: &mut CastlingRights, record: &MoveRecord) {
    if record.piece.is_kind(PieceKind::King) {
        rights.revoke_all(record.piece.color);
        return;
    }

    for (square, color, side) in ROOK_HOME_SQUARES {
        if record.start == square || record.end == square {
            rights.revoke(color, side);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::DEFAULT_SENSORS_STATE;
    use crate::sensors::sensor_script::parse_sensor_script;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::move_text::last_move_text;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("test square should parse")
    }

    /// Feed a sensor script one action at a time, returning the committed move count.
    fn play(game: &mut GameState, script: &str) -> usize {
        let mut sensors = game.occupancy();
        let mut committed = 0;
        for action in parse_sensor_script(script).expect("test script should parse") {
            sensors = action.apply(sensors);
            if game.evolve(sensors) {
                committed += 1;
            }
        }
        committed
    }

    fn from_fen(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("test FEN should parse")
    }

    #[test]
    fn lift_and_drop_commits_one_move() {
        let mut game = GameState::new_game();
        let mut sensors = DEFAULT_SENSORS_STATE & !(1 << sq("e2"));
        assert!(!game.evolve(sensors));
        assert_eq!(
            game.status,
            GameStatus::InProgress {
                color: Color::White,
                phase: Phase::Playing
            }
        );

        sensors |= 1 << sq("e4");
        assert!(game.evolve(sensors));
        assert!(!game.evolve(sensors));
        assert_eq!(game.status, GameStatus::to_play(Color::Black));
        assert_eq!(game.en_passant_square, Some(sq("e3")));
        assert_eq!(game.occupancy(), sensors);
        assert_eq!(last_move_text(&game, Color::White), "e4");
    }

    #[test]
    fn putting_a_piece_back_undoes_the_lift() {
        let mut game = GameState::new_game();
        assert_eq!(play(&mut game, "-e2 +e2"), 0);
        assert_eq!(game, GameState::new_game());
    }

    #[test]
    fn game_sequence_move_texts() {
        let steps = [
            ("-e2 +e4", "e4"),
            ("-d7 +d5", "d5"),
            ("-e4 -d5 +d5", "exd5"),
            ("-d8 -d5 +d5", "Qxd5"),
            ("-f1 +b5", "Bb5+"),
            ("-c8 +d7", "Bd7"),
            ("-g1 +f3", "Nf3"),
            ("-b8 +c6", "Nc6"),
            ("-e1 +g1 -h1 +f1", "O-O"),
            ("-e8 +c8 -a8 +d8", "O-O-O"),
            ("-h2 +h4", "h4"),
            ("-c8 +b8", "Kb8"),
            ("-h4 +h5", "h5"),
            ("-g7 +g5", "g5"),
            ("-h5 +g6 -g5", "hxg6"),
            ("-d7 +h3", "Bh3"),
            ("-f3 +e5", "Ne5"),
            ("-d5 -g2 +g2", "Qxg2#"),
        ];

        let mut game = GameState::new_game();
        for (ply, (script, expected)) in steps.iter().enumerate() {
            let mover = if ply % 2 == 0 { Color::White } else { Color::Black };
            assert_eq!(play(&mut game, script), 1, "{script}");
            assert_eq!(last_move_text(&game, mover), *expected, "{script}");
        }

        assert_eq!(
            game.status,
            GameStatus::Finished {
                winner: Color::Black
            }
        );
        assert_eq!(
            game.get_fen(),
            "1k1r1bnr/ppp1pp1p/2n3P1/1B2N3/8/7b/PPPP1Pq1/RNBQ1RK1 w - - 0 10"
        );
        assert_eq!(play(&mut game, "-a2 +a3"), 0);
    }

    #[test]
    fn capture_accepts_either_lift_order() {
        let mut game = GameState::new_game();
        play(&mut game, "-e2 +e4 -d7 +d5");

        let mut victim_first = game.clone();
        assert_eq!(play(&mut victim_first, "-d5 -e4 +d5"), 1);
        assert_eq!(play(&mut game, "-e4 -d5 +d5"), 1);
        assert_eq!(victim_first, game);
        assert_eq!(game.halfmove_clock, 0);
        assert_eq!(game.en_passant_square, None);
    }

    #[test]
    fn capture_can_be_abandoned() {
        let mut game = GameState::new_game();
        play(&mut game, "-e2 +e4 -d7 +d5");
        let before = game.clone();

        assert_eq!(play(&mut game, "-e4 -d5 +e4"), 0);
        assert_eq!(
            game.status,
            GameStatus::InProgress {
                color: Color::White,
                phase: Phase::Playing
            }
        );
        assert_eq!(game.removed[0].map(|lift| lift.square), Some(sq("d5")));

        assert_eq!(play(&mut game, "+d5"), 0);
        assert_eq!(game, before);
    }

    #[test]
    fn anomalies_are_ignored() {
        let mut game = GameState::new_game();
        let mut sensors = DEFAULT_SENSORS_STATE | (1 << sq("e4"));
        assert!(!game.evolve(sensors));
        assert_eq!(game.status, GameStatus::to_play(Color::White));

        // Lifting an opponent piece and dropping it elsewhere is not a move.
        sensors = DEFAULT_SENSORS_STATE & !(1 << sq("e7"));
        assert!(!game.evolve(sensors));
        sensors |= 1 << sq("e5");
        assert!(!game.evolve(sensors));
        assert_eq!(game.board.get(sq("e5")), None);

        sensors = DEFAULT_SENSORS_STATE;
        assert!(!game.evolve(sensors));
        assert_eq!(game.status, GameStatus::to_play(Color::White));
        assert_eq!(game.board, GameState::new_game().board);
    }

    fn capturing_e4_d5(game: &mut GameState) {
        play(game, "-e2 +e4 -d7 +d5");
        assert_eq!(play(game, "-e4 -d5"), 0);
        assert_eq!(
            game.status,
            GameStatus::InProgress {
                color: Color::White,
                phase: Phase::Capturing
            }
        );
    }

    #[test]
    fn third_lift_during_capture_is_ignored() {
        let mut game = GameState::new_game();
        capturing_e4_d5(&mut game);

        assert_eq!(play(&mut game, "-a2"), 0);
        assert_eq!(game.board.get(sq("a2")), Some(Piece::new(Color::White, PieceKind::Pawn)));
        assert_eq!(game.status.phase(), Some(Phase::Capturing));

        assert_eq!(play(&mut game, "+a2 +d5"), 1);
        assert_eq!(last_move_text(&game, Color::White), "exd5");
        assert_eq!(game.status, GameStatus::to_play(Color::Black));
    }

    #[test]
    fn stray_drop_during_capture_is_ignored() {
        let mut game = GameState::new_game();
        capturing_e4_d5(&mut game);

        assert_eq!(play(&mut game, "+a3"), 0);
        assert_eq!(game.board.get(sq("a3")), None);
        assert_eq!(game.status.phase(), Some(Phase::Capturing));

        assert_eq!(play(&mut game, "-a3 +d5"), 1);
        assert_eq!(last_move_text(&game, Color::White), "exd5");
    }

    #[test]
    fn castling_with_a_non_rook_still_completes() {
        let mut game = from_fen("rnbqk2r/pppppppp/8/8/8/8/PPPPPPPP/RNBQK2R w KQkq - 0 1");
        assert_eq!(play(&mut game, "-e1 +g1 -h2"), 0);
        assert_eq!(game.removed[0].map(|lift| lift.square), Some(sq("h2")));
        assert_eq!(game.status.phase(), Some(Phase::Castling));

        assert_eq!(play(&mut game, "+f1"), 1);
        assert_eq!(last_move_text(&game, Color::White), "O-O");
        assert_eq!(game.board.get(sq("f1")), Some(Piece::new(Color::White, PieceKind::Pawn)));
        assert_eq!(game.board.get(sq("h1")), Some(Piece::new(Color::White, PieceKind::Rook)));
    }

    #[test]
    fn stray_drop_during_en_passant_is_ignored() {
        let mut game = GameState::new_game();
        assert_eq!(play(&mut game, "-e2 +e4 -a7 +a6 -e4 +e5 -d7 +d5 -e5 +d6"), 4);
        assert_eq!(game.status.phase(), Some(Phase::EnPassant));

        assert_eq!(play(&mut game, "+a4"), 0);
        assert_eq!(game.board.get(sq("a4")), None);
        assert_eq!(game.status.phase(), Some(Phase::EnPassant));
        assert_eq!(game.en_passant_square, Some(sq("d5")));

        assert_eq!(play(&mut game, "-a4 -d5"), 1);
        assert_eq!(last_move_text(&game, Color::White), "exd6");
    }

    #[test]
    fn en_passant_needs_the_captured_pawn_lifted() {
        let mut game = GameState::new_game();
        assert_eq!(play(&mut game, "-e2 +e4 -a7 +a6 -e4 +e5 -d7 +d5"), 4);
        assert_eq!(game.en_passant_square, Some(sq("d6")));

        assert_eq!(play(&mut game, "-e5 +d6"), 0);
        assert_eq!(
            game.status,
            GameStatus::InProgress {
                color: Color::White,
                phase: Phase::EnPassant
            }
        );
        assert_eq!(game.en_passant_square, Some(sq("d5")));

        assert_eq!(play(&mut game, "-c7"), 0);
        assert_eq!(play(&mut game, "+c7 -d5"), 1);
        assert_eq!(game.board.get(sq("d5")), None);
        assert_eq!(game.board.get(sq("d6")), Some(Piece::new(Color::White, PieceKind::Pawn)));
        assert_eq!(game.en_passant_square, None);
        let record = game.last_move(Color::White).expect("white should have moved");
        assert!(record.captured);
        assert_eq!(last_move_text(&game, Color::White), "exd6");
    }

    #[test]
    fn both_sides_castle() {
        let mut game = from_fen("rnbqk2r/pppppppp/8/8/8/8/PPPPPPPP/RNBQK2R w KQkq - 0 1");
        assert_eq!(play(&mut game, "-e1 +g1"), 0);
        assert_eq!(
            game.status,
            GameStatus::InProgress {
                color: Color::White,
                phase: Phase::Castling
            }
        );
        assert_eq!(play(&mut game, "-h1 +f1"), 1);
        assert_eq!(game.status, GameStatus::to_play(Color::Black));
        assert_eq!(last_move_text(&game, Color::White), "O-O");

        assert_eq!(play(&mut game, "-e8 +g8 -h8 +f8"), 1);
        assert_eq!(game.status, GameStatus::to_play(Color::White));
        assert_eq!(
            game.get_fen(),
            "rnbq1rk1/pppppppp/8/8/8/8/PPPPPPPP/RNBQ1RK1 w - - 2 2"
        );

        let mut game = from_fen("r3kbnr/pppppppp/8/8/8/8/PPPPPPPP/R3KBNR b KQkq - 0 1");
        assert_eq!(play(&mut game, "-e8 +c8 -a8 +d8"), 1);
        assert_eq!(play(&mut game, "-e1 +c1 -a1 +d1"), 1);
        assert_eq!(last_move_text(&game, Color::Black), "O-O-O");
        assert_eq!(game.castling_rights, CastlingRights::NONE);
    }

    #[test]
    fn castling_rook_can_be_put_back() {
        let mut game = from_fen("rnbqk2r/pppppppp/8/8/8/8/PPPPPPPP/RNBQK2R w KQkq - 0 1");
        assert_eq!(play(&mut game, "-e1 +g1 -h1 +h1 +e3"), 0);
        assert_eq!(game.board.get(sq("h1")), Some(Piece::new(Color::White, PieceKind::Rook)));
        assert_eq!(game.board.get(sq("e3")), None);
        assert_eq!(game.removed, [None, None]);
        assert_eq!(play(&mut game, "-h1 +f1"), 1);
        assert_eq!(last_move_text(&game, Color::White), "O-O");
    }

    const RIGHTS_FEN: &str = "r3k2r/p6p/8/3BB3/3bb3/8/P6P/R3K2R w KQkq - 0 1";

    fn rights_after(game: &mut GameState, script: &str) -> u8 {
        assert_eq!(play(game, script), 1, "{script}");
        game.castling_rights.bits()
    }

    #[test]
    fn king_moves_drop_both_rights() {
        let mut game = from_fen(RIGHTS_FEN);
        assert_eq!(rights_after(&mut game, "-e1 +e2"), CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE);
        assert_eq!(rights_after(&mut game, "-e8 +c8 -a8 +d8"), 0);
    }

    #[test]
    fn rook_moves_drop_their_side() {
        let mut game = from_fen(RIGHTS_FEN);
        let mut expected = CastlingRights::ALL.bits();
        for (script, lost) in [
            ("-a1 +b1", CASTLE_WHITE_QUEENSIDE),
            ("-a8 +b8", CASTLE_BLACK_QUEENSIDE),
            ("-h1 +f1", CASTLE_WHITE_KINGSIDE),
            ("-h8 +f8", CASTLE_BLACK_KINGSIDE),
        ] {
            expected &= !lost;
            assert_eq!(rights_after(&mut game, script), expected, "{script}");
        }
    }

    #[test]
    fn captured_rooks_drop_their_side() {
        let mut game = from_fen(RIGHTS_FEN);
        let mut expected = CastlingRights::ALL.bits();
        for (script, lost) in [
            ("-d5 -a8 +a8", CASTLE_BLACK_QUEENSIDE),
            ("-a1 -d4 +a1", CASTLE_WHITE_QUEENSIDE),
            ("-h8 -e5 +h8", CASTLE_BLACK_KINGSIDE),
            ("-e4 -h1 +h1", CASTLE_WHITE_KINGSIDE),
        ] {
            expected &= !lost;
            assert_eq!(rights_after(&mut game, script), expected, "{script}");
        }
    }

    #[test]
    fn pawns_promote_to_queens() {
        let fen = "8/6P1/3k4/8/8/8/1pK5/R7 w - - 0 1";
        let mut game = from_fen(fen);
        assert_eq!(play(&mut game, "-g7 +g8"), 1);
        let record = game.last_move(Color::White).expect("white should have moved");
        assert!(record.promotion && !record.captured && !record.check);
        assert_eq!(record.piece.kind, PieceKind::Pawn);
        assert_eq!(game.board.get(sq("g8")), Some(Piece::new(Color::White, PieceKind::Queen)));
        assert_eq!(last_move_text(&game, Color::White), "g8=Q");

        let mut game = from_fen(&fen.replace(" w ", " b "));
        assert_eq!(play(&mut game, "-b2 -a1 +a1"), 1);
        let record = game.last_move(Color::Black).expect("black should have moved");
        assert!(record.promotion && record.captured && !record.check);
        assert_eq!(game.board.get(sq("a1")), Some(Piece::new(Color::Black, PieceKind::Queen)));
        assert_eq!(last_move_text(&game, Color::Black), "bxa1=Q");
    }

    #[test]
    fn replayed_game_matches_fen() {
        let script = "# G.Kasparov - V.Topalov, Netherlands, 1999 (1-0)\n\
            -e2 +e4 -d7 +d6 -d2 +d4 -g8 +f6 -b1 +c3 -g7 +g6 -c1 +e3 -f8 +g7\n\
            -d1 +d2 -c7 +c6 -f2 +f3 -b7 +b5 -g1 +e2 -b8 +d7 -e3 +h6 -g7 -h6 +h6\n\
            -d2 -h6 +h6 -c8 +b7 -a2 +a3 -e7 +e5 -e1 +c1 -a1 +d1\n\
            # Black to move";
        let mut game = GameState::new_game();
        assert_eq!(play(&mut game, script), 21);
        assert_eq!(
            game.get_fen(),
            "r2qk2r/pb1n1p1p/2pp1npQ/1p2p3/3PP3/P1N2P2/1PP1N1PP/2KR1B1R b kq - 1 11"
        );
    }

    #[test]
    fn random_single_square_polls_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(0xB0A2D);
        let mut game = GameState::new_game();

        for _ in 0..3_000 {
            let sensors = game.occupancy() ^ (1u64 << rng.random_range(0..64u32));
            let rights_before = game.castling_rights;
            let committed = game.evolve(sensors);

            assert!(game.castling_rights.is_subset_of(rights_before));
            assert!(!game.evolve(sensors), "identical poll committed a second move");
            if committed {
                let mover = game.side_to_move().opposite();
                let record = game.last_move(mover).expect("committed move should be recorded");
                assert!(!record.checkmate || record.check);
            }
            if game.status.phase() == Some(Phase::ToPlay) {
                assert!(!game.is_checkmate() || game.is_check());
            }
            if game.status.is_over() {
                game = GameState::new_game();
            }
        }
    }
}
