//! Crate root module declarations for the sensor chessboard core.
//!
//! The board reports only which squares hold a piece. This crate turns that
//! stream of occupancy masks into chess moves: it tracks the position, infers
//! each move from lifts and drops, and keeps check, checkmate, castling,
//! en passant and promotion state current. Utilities cover FEN, SAN move
//! text, and terminal rendering.

pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod move_record;
}

pub mod analysis {
    pub mod attack_checks;
    pub mod checkmate;
}

pub mod sensors {
    pub mod evolve;
    pub mod sensor_diff;
    pub mod sensor_script;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod move_text;
    pub mod render_game_state;
}
