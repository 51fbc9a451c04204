//! Agents that occupy the grid and take turns.

use core::fmt;

use crate::direction::CardinalDirection;
use crate::grid::{CellId, WorldPoint};

/// Side an agent plays for.
///
/// Exactly two agents compete; each role owns one of them.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    Player,
    Enemy,
}

impl Role {
    /// Returns the competing role.
    #[inline]
    pub const fn opponent(self) -> Self {
        match self {
            Role::Player => Role::Enemy,
            Role::Enemy => Role::Player,
        }
    }

    #[inline]
    pub const fn is_player(self) -> bool {
        matches!(self, Role::Player)
    }
}

/// Action points available to an agent during its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionBudget {
    pub current: u32,
    pub maximum: u32,
}

impl ActionBudget {
    pub fn new(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Spends `amount` action points, clamping at zero.
    ///
    /// Returns the number of points actually spent.
    pub fn spend(&mut self, amount: u32) -> u32 {
        let spent = amount.min(self.current);
        self.current -= spent;
        spent
    }

    /// Refills the budget to its maximum.
    pub fn reset(&mut self) {
        self.current = self.maximum;
    }

    pub fn is_exhausted(&self) -> bool {
        self.current == 0
    }
}

impl fmt::Display for ActionBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.maximum)
    }
}

/// Static description of an agent, shared by every spawn of it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorTemplate {
    pub name: String,
    /// Initiative gain per millisecond.
    pub speed: u32,
    /// Highest height difference the agent can step across.
    pub jump: u32,
    /// Action points restored at the start of each turn.
    pub actions: u32,
}

impl ActorTemplate {
    pub fn new(name: impl Into<String>, speed: u32, jump: u32, actions: u32) -> Self {
        Self {
            name: name.into(),
            speed,
            jump,
            actions,
        }
    }
}

/// A spawned agent.
///
/// `position` is the authoritative world location; the cell an agent stands
/// on is always derived from it by rounding (see [`crate::Grid::cell_at_world`]).
/// `cell` remembers the cell whose occupancy this agent last claimed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub role: Role,
    pub name: String,
    pub position: WorldPoint,
    pub budget: ActionBudget,
    pub jump: u32,
    pub speed: u32,
    pub facing: CardinalDirection,
    pub cell: Option<CellId>,
}

impl Actor {
    pub fn from_template(role: Role, template: &ActorTemplate, position: WorldPoint) -> Self {
        Self {
            role,
            name: template.name.clone(),
            position,
            budget: ActionBudget::new(template.actions),
            jump: template.jump,
            speed: template.speed,
            facing: CardinalDirection::North,
            cell: None,
        }
    }
}
