//! Central position model driven by sensor polls.
//!
//! `GameState` holds the board, turn phase, pending lifts, castling rights,
//! clocks, and each side's last committed move. It is mutated in place by
//! [`GameState::evolve`] and FEN loading.

use log::info;

use crate::analysis::attack_checks::is_in_check;
use crate::analysis::checkmate::is_checkmate;
use crate::errors::ChessErrors;
use crate::game_state::chess_rules::DEFAULT_SENSORS_STATE;
use crate::game_state::chess_types::*;
use crate::sensors::evolve::evolve_game;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::load_fen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub status: GameStatus,
    pub en_passant_square: Option<Square>,

    // Lifts awaiting resolution during the current turn.
    pub removed: [Option<PendingRemoval>; 2],

    pub castling_rights: CastlingRights,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    // [color] most recent committed move.
    pub last_moves: [Option<MoveRecord>; 2],
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: Board::empty(),
            status: GameStatus::to_play(Color::White),
            en_passant_square: None,
            removed: [None; 2],
            castling_rights: CastlingRights::NONE,
            halfmove_clock: 0,
            fullmove_number: 1,
            last_moves: [None; 2],
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn new_game() -> Self {
        Self::new_game_with_mask(DEFAULT_SENSORS_STATE)
    }

    /// Standard layout restricted to the squares set in `sensors`.
    pub fn new_game_with_mask(sensors: u64) -> Self {
        let mut board = Board::starting_position();
        board.retain_mask(sensors);
        info!("game initialized with sensor mask {sensors:#018x}");
        Self {
            board,
            castling_rights: CastlingRights::ALL,
            ..Self::default()
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessErrors> {
        let mut game_state = Self::new_empty();
        load_fen(&mut game_state, fen)?;
        Ok(game_state)
    }

    /// Overwrite this state from a FEN string.
    ///
    /// On error the state keeps whatever was parsed before the failing field
    /// and its status is `Draw`.
    #[inline]
    pub fn load_fen(&mut self, fen: &str) -> Result<(), ChessErrors> {
        load_fen(self, fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn occupancy(&self) -> u64 {
        self.board.occupancy()
    }

    /// Side whose turn it is; the loser once the game is finished, White on a draw.
    pub fn side_to_move(&self) -> Color {
        match self.status {
            GameStatus::InProgress { color, .. } => color,
            GameStatus::Finished { winner } => winner.opposite(),
            GameStatus::Draw => Color::White,
        }
    }

    #[inline]
    pub fn last_move(&self, color: Color) -> Option<&MoveRecord> {
        self.last_moves[color.index()].as_ref()
    }

    /// Advance the turn machine with a new sensor mask; `true` when a move was committed.
    #[inline]
    pub fn evolve(&mut self, sensors: u64) -> bool {
        evolve_game(self, sensors)
    }

    /// Whether the side to move is in check. After a mate this is the loser.
    pub fn is_check(&self) -> bool {
        match self.status {
            GameStatus::Finished { winner } => {
                is_in_check(&self.reopened_for(winner.opposite()), winner.opposite())
            }
            _ => is_in_check(self, self.side_to_move()),
        }
    }

    /// Whether the side to move is mated; stays `true` once a mate finished the game.
    pub fn is_checkmate(&self) -> bool {
        match self.status {
            GameStatus::Finished { winner } => is_checkmate(&self.reopened_for(winner.opposite())),
            _ => is_checkmate(self),
        }
    }

    /// The analyzers only look at a side whose turn it is.
    fn reopened_for(&self, color: Color) -> GameState {
        GameState {
            status: GameStatus::to_play(color),
            ..self.clone()
        }
    }
}
