//! Attack, pin, and check queries over the mailbox board.
//!
//! Everything here scans outward from a target square (rays, knight jumps,
//! pawn offsets) so check detection and checkmate analysis never need a full
//! move generator.

use log::{error, trace, warn};
use smallvec::SmallVec;

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::SquareName;

/// Orthogonal rays first, then diagonals.
const RAYS: [(RayKind, i8, i8); 8] = [
    (RayKind::Orthogonal, -1, 0),
    (RayKind::Orthogonal, 1, 0),
    (RayKind::Orthogonal, 0, -1),
    (RayKind::Orthogonal, 0, 1),
    (RayKind::Diagonal, -1, -1),
    (RayKind::Diagonal, -1, 1),
    (RayKind::Diagonal, 1, -1),
    (RayKind::Diagonal, 1, 1),
];

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayKind {
    Orthogonal,
    Diagonal,
}

impl RayKind {
    #[inline]
    fn slider_matches(self, piece: Piece) -> bool {
        match self {
            RayKind::Orthogonal => piece.threatens_orthogonally(),
            RayKind::Diagonal => piece.threatens_diagonally(),
        }
    }
}

/// What counts as "reaching" a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackMode {
    /// Squares a piece controls: pawn diagonals always count and king steps
    /// are not validated. Pawn pushes and en passant are excluded even though
    /// a pawn can reach the square that way, since neither attacks it.
    Threats,
    /// Squares a piece can actually move to: pawn diagonals need a victim,
    /// pushes and en passant are included, and a king may not step onto a
    /// threatened square.
    Moves,
}

/// A piece that can reach the scanned square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attacker {
    pub square: Square,
    pub piece: Piece,
}

pub type Attackers = SmallVec<[Attacker; 16]>;

/// First occupied square walking from `from` (exclusive) toward the board edge.
pub fn first_piece_on_ray(
    board: &Board,
    from: Square,
    d_file: i8,
    d_rank: i8,
) -> Option<(Square, Piece)> {
    let mut current = from;
    while let Some(next) = offset_square(current, d_file, d_rank) {
        if let Some(piece) = board.get(next) {
            return Some((next, piece));
        }
        current = next;
    }
    None
}

/// Whether `color`'s king is attacked, for the side that currently has to play.
///
/// Logs and returns `false` when `color` is not in `ToPlay` or has no king.
pub fn is_in_check(game_state: &GameState, color: Color) -> bool {
    if game_state.status != GameStatus::to_play(color) {
        warn!("unable to analyze check: {color} does not have to play");
        return false;
    }

    let Some(king_sq) = game_state.board.king_square(color) else {
        error!("unable to locate {color} king");
        return false;
    };

    is_king_attacked(&game_state.board, king_sq, color)
}

/// Direct scan of rays, knight jumps and pawn diagonals around a king square.
pub fn is_king_attacked(board: &Board, king_sq: Square, color: Color) -> bool {
    let enemy = color.opposite();

    for (ray, d_file, d_rank) in RAYS {
        if let Some((_, piece)) = first_piece_on_ray(board, king_sq, d_file, d_rank) {
            if piece.is_color(enemy) && ray.slider_matches(piece) {
                return true;
            }
        }
    }

    let enemy_knight = Some(Piece::new(enemy, PieceKind::Knight));
    for (d_file, d_rank) in KNIGHT_OFFSETS {
        if offset_square(king_sq, d_file, d_rank).is_some_and(|sq| board.get(sq) == enemy_knight) {
            return true;
        }
    }

    // Enemy pawns sit one rank ahead of the king from the king's side.
    let enemy_pawn = Some(Piece::new(enemy, PieceKind::Pawn));
    [-1, 1].into_iter().any(|d_file| {
        offset_square(king_sq, d_file, color.pawn_direction())
            .is_some_and(|sq| board.get(sq) == enemy_pawn)
    })
}

pub fn find_attackers_of(
    game_state: &GameState,
    target: Square,
    attacker_color: Color,
    stop_at_first: bool,
    mode: AttackMode,
) -> Attackers {
    attackers_on_board(
        &game_state.board,
        game_state.en_passant_square,
        target,
        attacker_color,
        stop_at_first,
        mode,
    )
}

/// Every `attacker_color` piece able to reach `target`.
///
/// Results are ordered sliders, knights, pawn diagonals, en passant, pawn
/// pushes, then the king. With `stop_at_first` at most one attacker is
/// returned. The board may be missing either king.
pub fn attackers_on_board(
    board: &Board,
    en_passant: Option<Square>,
    target: Square,
    attacker_color: Color,
    stop_at_first: bool,
    mode: AttackMode,
) -> Attackers {
    let mut attackers = Attackers::new();

    for (ray, d_file, d_rank) in RAYS {
        if let Some((square, piece)) = first_piece_on_ray(board, target, d_file, d_rank) {
            if piece.is_color(attacker_color)
                && ray.slider_matches(piece)
                && push_attacker(&mut attackers, square, piece, stop_at_first)
            {
                return attackers;
            }
        }
    }

    let knight = Piece::new(attacker_color, PieceKind::Knight);
    for (d_file, d_rank) in KNIGHT_OFFSETS {
        if let Some(square) = offset_square(target, d_file, d_rank) {
            if board.get(square) == Some(knight)
                && push_attacker(&mut attackers, square, knight, stop_at_first)
            {
                return attackers;
            }
        }
    }

    let pawn = Piece::new(attacker_color, PieceKind::Pawn);
    let behind = -attacker_color.pawn_direction();
    let target_piece = board.get(target);
    let has_victim = target_piece.is_some_and(|piece| !piece.is_color(attacker_color));

    if mode == AttackMode::Threats || has_victim {
        for d_file in [-1, 1] {
            if let Some(square) = offset_square(target, d_file, behind) {
                if board.get(square) == Some(pawn)
                    && push_attacker(&mut attackers, square, pawn, stop_at_first)
                {
                    return attackers;
                }
            }
        }
    }

    if mode == AttackMode::Moves {
        if en_passant == Some(target) {
            for d_file in [-1, 1] {
                if let Some(square) = offset_square(target, d_file, behind) {
                    if board.get(square) == Some(pawn)
                        && push_attacker(&mut attackers, square, pawn, stop_at_first)
                    {
                        return attackers;
                    }
                }
            }
        }

        if target_piece.is_none() {
            if let Some(one_back) = offset_square(target, 0, behind) {
                match board.get(one_back) {
                    Some(piece) if piece == pawn => {
                        if push_attacker(&mut attackers, one_back, pawn, stop_at_first) {
                            return attackers;
                        }
                    }
                    Some(_) => {}
                    None => {
                        if let Some(two_back) = offset_square(one_back, 0, behind) {
                            if rank_of(two_back) == attacker_color.pawn_start_rank()
                                && board.get(two_back) == Some(pawn)
                                && push_attacker(&mut attackers, two_back, pawn, stop_at_first)
                            {
                                return attackers;
                            }
                        }
                    }
                }
            }
        }
    }

    let king = Piece::new(attacker_color, PieceKind::King);
    for (d_file, d_rank) in KING_OFFSETS {
        let Some(square) = offset_square(target, d_file, d_rank) else {
            continue;
        };
        if board.get(square) != Some(king) {
            continue;
        }
        if mode == AttackMode::Moves && is_destination_guarded(board, square, target, attacker_color) {
            continue;
        }
        if push_attacker(&mut attackers, square, king, stop_at_first) {
            return attackers;
        }
    }

    attackers
}

/// Record an attacker; `true` when the scan should stop.
#[inline]
fn push_attacker(attackers: &mut Attackers, square: Square, piece: Piece, stop_at_first: bool) -> bool {
    attackers.push(Attacker { square, piece });
    stop_at_first
}

/// Whether the opponent would threaten `destination` once the king leaves `king_sq`.
fn is_destination_guarded(board: &Board, king_sq: Square, destination: Square, color: Color) -> bool {
    let mut lifted = *board;
    lifted.clear(king_sq);
    !attackers_on_board(
        &lifted,
        None,
        destination,
        color.opposite(),
        true,
        AttackMode::Threats,
    )
    .is_empty()
}

/// Whether the piece on `piece_sq` shields `king_sq` from a `pinner_color` slider.
///
/// Both squares must share a rank, file, or diagonal with nothing between
/// them, and the first piece beyond `piece_sq` must be a matching slider.
pub fn is_pinned(board: &Board, piece_sq: Square, king_sq: Square, pinner_color: Color) -> bool {
    if piece_sq == king_sq {
        return false;
    }

    let d_file = file_of(piece_sq) as i8 - file_of(king_sq) as i8;
    let d_rank = rank_of(piece_sq) as i8 - rank_of(king_sq) as i8;
    let ray = if d_file == 0 || d_rank == 0 {
        RayKind::Orthogonal
    } else if d_file.abs() == d_rank.abs() {
        RayKind::Diagonal
    } else {
        return false;
    };
    let (step_file, step_rank) = (d_file.signum(), d_rank.signum());

    match first_piece_on_ray(board, king_sq, step_file, step_rank) {
        Some((square, _)) if square == piece_sq => {}
        _ => return false,
    }

    match first_piece_on_ray(board, piece_sq, step_file, step_rank) {
        Some((square, piece)) => {
            let pinned = piece.is_color(pinner_color) && ray.slider_matches(piece);
            if pinned {
                trace!(
                    "{} pinned against {} by {}",
                    SquareName(piece_sq),
                    SquareName(king_sq),
                    SquareName(square)
                );
            }
            pinned
        }
        None => false,
    }
}
