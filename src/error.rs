//! Errors for the text side of the game: parsing moves and driving turns.

use thiserror::Error;

use crate::movegen::Move;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("expected four characters like e2e4, got {0}")]
    Length(usize),

    #[error("file must be a-h, got '{0}'")]
    File(char),

    #[error("rank must be 1-8, got '{0}'")]
    Rank(char),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid format: {0}")]
    Parse(#[from] MoveParseError),

    #[error("Illegal move: {0}")]
    IllegalMove(Move),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Game is over")]
    GameOver,
}

pub type Result<T> = std::result::Result<T, GameError>;
