//! Abstraction for sourcing player intent.
//!
//! Runtime users plug in [`PlayerProvider`] implementations so a match can
//! run with human input, scripted fixtures, or simple policies. The enemy
//! never needs one; it is driven by the turn machine's approach policy.
use serde::{Deserialize, Serialize};
use tactics_core::{CardinalDirection, CellId, Grid, Occupancy, Role, TurnMachine};

/// What the runtime is waiting for from the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prompt {
    /// Pick a cell of the player spawn pool.
    Spawn,
    /// Choose the next action of the turn.
    Menu,
    /// Choose a facing before the turn ends.
    Facing,
}

/// A player decision, validated by the turn machine when executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerCommand {
    Spawn(CellId),
    Move(CellId),
    Attack(CellId),
    Wait,
    Face(CardinalDirection),
}

/// Source of player decisions.
///
/// Returning `None` means "not yet"; the runtime asks again next tick.
pub trait PlayerProvider {
    fn provide(&mut self, prompt: Prompt, machine: &TurnMachine) -> Option<PlayerCommand>;
}

fn first_free_spawn(machine: &TurnMachine) -> Option<CellId> {
    machine
        .spawns()
        .pool(Role::Player)
        .iter()
        .copied()
        .find(|&cell| machine.grid().occupancy(cell) == Some(Occupancy::Empty))
}

/// Spawns on the first free cell and then waits out every turn.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaitProvider;

impl PlayerProvider for WaitProvider {
    fn provide(&mut self, prompt: Prompt, machine: &TurnMachine) -> Option<PlayerCommand> {
        match prompt {
            Prompt::Spawn => first_free_spawn(machine).map(PlayerCommand::Spawn),
            Prompt::Menu => Some(PlayerCommand::Wait),
            Prompt::Facing => {
                let facing = machine
                    .actor(Role::Player)
                    .map_or(CardinalDirection::North, |actor| actor.facing);
                Some(PlayerCommand::Face(facing))
            }
        }
    }
}

/// Walks toward the enemy, swings at the closest cell it can, and faces
/// the enemy at the end of every turn.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChaseProvider;

impl ChaseProvider {
    fn decide(machine: &TurnMachine) -> Option<PlayerCommand> {
        let own = machine.actor_cell(Role::Player).ok()?;
        let Ok(enemy) = machine.actor_cell(Role::Enemy) else {
            return Some(PlayerCommand::Wait);
        };
        let grid = machine.grid();
        let reachable = machine.reachable(Role::Player).ok()?;
        let closest = |keep: fn(&Grid, CellId) -> bool| {
            reachable
                .iter()
                .filter(|&cell| cell != own && keep(grid, cell))
                .min_by_key(|&cell| grid.distance(cell, enemy))
        };

        if !machine.has_moved() {
            let current = grid.distance(own, enemy);
            let nearer = closest(|_, _| true).filter(|&cell| grid.distance(cell, enemy) < current);
            if let Some(cell) = nearer {
                return Some(PlayerCommand::Move(cell));
            }
        }
        if !machine.has_attacked() {
            let attackable = closest(|grid, cell| grid.cell(cell).is_some_and(|c| c.can_act()));
            if let Some(cell) = attackable {
                return Some(PlayerCommand::Attack(cell));
            }
        }
        Some(PlayerCommand::Wait)
    }
}

impl PlayerProvider for ChaseProvider {
    fn provide(&mut self, prompt: Prompt, machine: &TurnMachine) -> Option<PlayerCommand> {
        match prompt {
            Prompt::Spawn => first_free_spawn(machine).map(PlayerCommand::Spawn),
            Prompt::Menu => Self::decide(machine),
            Prompt::Facing => {
                let toward = machine
                    .actor_cell(Role::Player)
                    .ok()
                    .zip(machine.actor_cell(Role::Enemy).ok())
                    .and_then(|(own, enemy)| {
                        let grid = machine.grid();
                        CardinalDirection::toward(grid.coord_of(own), grid.coord_of(enemy))
                    });
                Some(PlayerCommand::Face(toward.unwrap_or(CardinalDirection::North)))
            }
        }
    }
}
