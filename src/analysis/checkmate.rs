//! Checkmate detection for the side to play.
//!
//! A king in check is mated when it has no safe flight square and the check
//! cannot be lifted: double checks must be escaped, knight checks captured,
//! and slider or pawn checks captured or blocked by an unpinned defender
//! (en passant included).

use log::{error, warn};

use crate::analysis::attack_checks::{
    attackers_on_board, find_attackers_of, is_king_attacked, is_pinned, AttackMode, KING_OFFSETS,
};
use crate::game_state::{chess_types::*, game_state::GameState};

pub fn is_checkmate(game_state: &GameState) -> bool {
    let GameStatus::InProgress {
        color: defender,
        phase: Phase::ToPlay,
    } = game_state.status
    else {
        warn!("unable to analyze checkmate when neither side has to play");
        return false;
    };

    let board = &game_state.board;
    let Some(king_sq) = board.king_square(defender) else {
        error!("unable to locate {defender} king");
        return false;
    };
    if !is_king_attacked(board, king_sq, defender) {
        return false;
    }

    let attacker_color = defender.opposite();
    let checkers = find_attackers_of(game_state, king_sq, attacker_color, false, AttackMode::Threats);
    if checkers.is_empty() || has_flight_square(board, king_sq, defender) {
        return false;
    }
    if checkers.len() >= 2 {
        return true;
    }

    let checker = checkers[0];
    if checker.piece.is_kind(PieceKind::Knight) {
        return !defender_can_reach(game_state, checker.square, king_sq, defender);
    }

    let blocked = check_line(checker.square, king_sq)
        .any(|square| defender_can_reach(game_state, square, king_sq, defender));
    if blocked {
        return false;
    }

    !(checker.piece.is_kind(PieceKind::Pawn)
        && en_passant_removes_checker(game_state, checker.square, king_sq, defender))
}

/// Adjacent squares not held by the defender's own pieces and not threatened
/// once the king has left its square.
fn has_flight_square(board: &Board, king_sq: Square, defender: Color) -> bool {
    let mut lifted = *board;
    lifted.clear(king_sq);

    KING_OFFSETS
        .iter()
        .filter_map(|&(d_file, d_rank)| offset_square(king_sq, d_file, d_rank))
        .filter(|&square| !board.get(square).is_some_and(|piece| piece.is_color(defender)))
        .any(|square| {
            attackers_on_board(&lifted, None, square, defender.opposite(), true, AttackMode::Threats)
                .is_empty()
        })
}

/// Squares from the checker (inclusive) up to the king (exclusive).
fn check_line(checker_sq: Square, king_sq: Square) -> impl Iterator<Item = Square> {
    let step_file = (file_of(king_sq) as i8 - file_of(checker_sq) as i8).signum();
    let step_rank = (rank_of(king_sq) as i8 - rank_of(checker_sq) as i8).signum();

    std::iter::successors(Some(checker_sq), move |&square| {
        offset_square(square, step_file, step_rank)
    })
    .take_while(move |&square| square != king_sq)
    .take(8)
}

/// Whether an unpinned defender can move onto `square`.
fn defender_can_reach(game_state: &GameState, square: Square, king_sq: Square, defender: Color) -> bool {
    find_attackers_of(game_state, square, defender, false, AttackMode::Moves)
        .iter()
        .any(|attacker| !is_pinned(&game_state.board, attacker.square, king_sq, defender.opposite()))
}

fn en_passant_removes_checker(
    game_state: &GameState,
    pawn_sq: Square,
    king_sq: Square,
    defender: Color,
) -> bool {
    let behind = offset_square(pawn_sq, 0, -defender.opposite().pawn_direction());
    if behind.is_none() || game_state.en_passant_square != behind {
        return false;
    }

    let board = &game_state.board;
    let own_pawn = Some(Piece::new(defender, PieceKind::Pawn));
    [-1, 1].into_iter().any(|d_file| {
        offset_square(pawn_sq, d_file, 0).is_some_and(|square| {
            board.get(square) == own_pawn && !is_pinned(board, square, king_sq, defender.opposite())
        })
    })
}
