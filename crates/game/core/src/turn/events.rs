use crate::actor::Role;
use crate::direction::CardinalDirection;
use crate::grid::CellId;
use crate::search::Path;

use super::TurnState;

/// Short-lived message for the player. Collaborators display it briefly and
/// let it disappear on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hint {
    ChooseSpawn,
    NotASpawnPoint,
    InvalidTarget,
    NoActionsLeft,
    AlreadyAttacked,
    ChooseFacing,
}

impl Hint {
    pub const fn message(self) -> &'static str {
        match self {
            Hint::ChooseSpawn => "Select one of the highlighted cells to spawn the player",
            Hint::NotASpawnPoint => "The player can only spawn on a highlighted cell",
            Hint::InvalidTarget => "That cell cannot be targeted",
            Hint::NoActionsLeft => "No action points left this turn",
            Hint::AlreadyAttacked => "Already attacked this turn",
            Hint::ChooseFacing => "Choose a direction to face",
        }
    }
}

/// Something observable happened inside the turn machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnEvent {
    Spawned {
        role: Role,
        cell: CellId,
    },
    TurnStarted {
        role: Role,
        turn: u32,
    },
    PhaseChanged {
        from: TurnState,
        to: TurnState,
    },
    /// Cells highlighted for the pending move or attack selection.
    ReachableComputed {
        role: Role,
        cells: Vec<CellId>,
    },
    /// Playback should walk `path`; report back with `on_move_complete`.
    MoveStarted {
        role: Role,
        path: Path,
    },
    /// Animation should play; report back with `on_attack_resolved`.
    AttackStarted {
        role: Role,
        target: CellId,
    },
    ActionsUsed {
        role: Role,
        spent: u32,
        remaining: u32,
    },
    Faced {
        role: Role,
        direction: CardinalDirection,
    },
    Hint(Hint),
}
