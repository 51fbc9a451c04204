//! Error types for turn commands.

use crate::actor::Role;
use crate::error::{ErrorSeverity, GameError};
use crate::grid::{CellId, GridError};
use crate::search::SearchError;

use super::TurnState;

/// Errors surfaced by [`super::TurnMachine`] commands.
///
/// Recoverable variants leave the machine untouched and are mirrored by a
/// transient hint event.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("{command} is not allowed during {state}")]
    WrongPhase {
        command: &'static str,
        state: TurnState,
    },

    #[error("cell {0} is not a valid target")]
    InvalidTarget(CellId),

    #[error("cell {cell} is not a {role} spawn point")]
    NotASpawnPoint { role: Role, cell: CellId },

    #[error("{0} has already been spawned")]
    AlreadySpawned(Role),

    #[error("{0} has not been spawned")]
    NotSpawned(Role),

    #[error("no action points left")]
    ActionsExhausted,

    #[error("already attacked this turn")]
    AlreadyAttacked,

    #[error("actor position does not map to a cell")]
    OffGrid(Role),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        use TurnError::*;
        match self {
            InvalidTarget(_) | NotASpawnPoint { .. } | ActionsExhausted | AlreadyAttacked => {
                ErrorSeverity::Recoverable
            }
            WrongPhase { .. } | AlreadySpawned(_) | NotSpawned(_) => ErrorSeverity::Validation,
            OffGrid(_) => ErrorSeverity::Internal,
            Grid(error) => error.severity(),
            Search(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use TurnError::*;
        match self {
            WrongPhase { .. } => "TURN_WRONG_PHASE",
            InvalidTarget(_) => "TURN_INVALID_TARGET",
            NotASpawnPoint { .. } => "TURN_NOT_A_SPAWN_POINT",
            AlreadySpawned(_) => "TURN_ALREADY_SPAWNED",
            NotSpawned(_) => "TURN_NOT_SPAWNED",
            ActionsExhausted => "TURN_ACTIONS_EXHAUSTED",
            AlreadyAttacked => "TURN_ALREADY_ATTACKED",
            OffGrid(_) => "TURN_OFF_GRID",
            Grid(error) => error.error_code(),
            Search(error) => error.error_code(),
        }
    }
}
