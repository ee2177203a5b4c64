use thiserror::Error;

use crate::game::Target;

/// Errors raised by the game library.
///
/// Collisions are not errors; they end the game through `GameStatus::Over`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("unknown target: {0:?} (expected head, tail or food)")]
    UnknownTarget(String),

    #[error("{0} is not on the board")]
    TargetAbsent(Target),

    #[error("a snake needs at least one segment")]
    EmptySnake,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
