use thiserror::Error;

/// Errors raised while decoding positions, squares, or sensor scripts.
///
/// The move-inference state machine never returns errors: anomalous sensor
/// input is logged and ignored instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessErrors {
    /// A coordinate was not exactly two characters.
    #[error("invalid algebraic square: {0}")]
    InvalidAlgebraicSquare(String),
    #[error("invalid algebraic file: {0}")]
    InvalidAlgebraicFile(char),
    #[error("invalid algebraic rank: {0}")]
    InvalidAlgebraicRank(char),
    /// The FEN string ended before the named field.
    #[error("missing {0} in FEN")]
    MissingFenField(&'static str),
    #[error("FEN has extra trailing fields")]
    TrailingFenFields,
    #[error("invalid piece character '{0}' in FEN board layout")]
    InvalidFenPiece(char),
    /// Rank count or per-rank file count is wrong.
    #[error("invalid FEN board layout: {0}")]
    InvalidFenBoard(String),
    #[error("invalid side-to-move field: {0}")]
    InvalidSideToMove(String),
    #[error("invalid castling rights character: {0}")]
    InvalidCastlingRights(char),
    #[error("invalid {field}: {value}")]
    InvalidClock { field: &'static str, value: String },
    #[error("invalid sensor action '{0}'")]
    InvalidSensorAction(char),
    #[error("invalid sensor square: {0}")]
    InvalidSensorSquare(String),
}
