use thiserror::Error;

/// Errors raised while handling text protocol commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("missing argument")]
    MissingArgument,

    #[error("expected {expected} arguments, got {got}")]
    ArgumentCount { expected: usize, got: usize },

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("coordinate off board: {0}")]
    OffBoard(String),

    #[error("no {color} queen on {square}")]
    NotYourQueen { color: String, square: String },

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("invalid time: {0}")]
    InvalidTime(String),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
