use core::fmt;

use crate::actor::Role;

/// Step within an acting agent's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Choosing between move, attack and wait.
    Menu,
    /// Reachable cells are shown; waiting for a move target.
    Move,
    /// Motion playback is running.
    Moving,
    /// Attackable cells are shown; waiting for an attack target.
    Attack,
    /// Attack animation is running.
    Attacking,
    /// Deciding whether the agent acts again or the turn ends.
    Check,
    /// Final facing before the turn is handed over.
    Ending,
}

/// Whose turn it is and what may happen now.
///
/// A single value so that a phase can never exist without an owning turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnState {
    /// Agents are being placed; no one acts yet.
    #[default]
    Spawn,
    /// No agent holds the turn; waiting for the initiative queue.
    Handoff,
    /// `role` is acting in `phase`.
    Acting { role: Role, phase: Phase },
}

impl TurnState {
    pub const fn acting(role: Role, phase: Phase) -> Self {
        TurnState::Acting { role, phase }
    }

    /// Role holding the turn, if any.
    pub fn turn(&self) -> Option<Role> {
        match self {
            TurnState::Acting { role, .. } => Some(*role),
            TurnState::Spawn | TurnState::Handoff => None,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            TurnState::Acting { phase, .. } => Some(*phase),
            TurnState::Spawn | TurnState::Handoff => None,
        }
    }

    pub fn is_acting(&self, role: Role, phase: Phase) -> bool {
        *self == TurnState::acting(role, phase)
    }

    /// Whether playback or animation of `role` is in progress.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase(),
            Some(Phase::Moving) | Some(Phase::Attacking)
        )
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnState::Spawn => f.write_str("spawn"),
            TurnState::Handoff => f.write_str("handoff"),
            TurnState::Acting { role, phase } => write!(f, "{role}/{phase}"),
        }
    }
}
