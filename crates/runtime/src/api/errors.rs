//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the turn machine and grid so clients can bubble them
//! up with consistent context.
use thiserror::Error;

use tactics_core::{GameError, GridError, Role, TurnError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("level has no {0} spawn points")]
    NoSpawnPoints(Role),

    #[error("runtime requires a mission before building")]
    MissingMission,
}

impl RuntimeError {
    /// Whether the tick loop may log the error and carry on.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RuntimeError::Turn(error) => error.severity().is_recoverable(),
            _ => false,
        }
    }
}
