//! Turns runtime events into log lines.
use tactics_core::{TurnEvent, TurnMachine};

pub fn log_event(machine: &TurnMachine, event: &TurnEvent) {
    let grid = machine.grid();
    match event {
        TurnEvent::Spawned { role, cell } => {
            tracing::info!(%role, at = %grid.coord_of(*cell), "spawned");
        }
        TurnEvent::TurnStarted { role, turn } => {
            tracing::info!(turn, %role, "turn started");
        }
        TurnEvent::MoveStarted { role, path } => {
            let to = path.last().map(|cell| grid.coord_of(cell));
            tracing::info!(
                %role,
                hops = path.hop_count(),
                distance = path.path_distance(grid),
                to = ?to,
                "moving"
            );
        }
        TurnEvent::AttackStarted { role, target } => {
            tracing::info!(%role, target = %grid.coord_of(*target), "attacking");
        }
        TurnEvent::ActionsUsed {
            role,
            spent,
            remaining,
        } => {
            tracing::info!(%role, spent, remaining, "actions used");
        }
        TurnEvent::Faced { role, direction } => {
            tracing::info!(%role, %direction, "faced");
        }
        TurnEvent::PhaseChanged { from, to } => {
            tracing::debug!(%from, %to, "phase changed");
        }
        TurnEvent::ReachableComputed { role, cells } => {
            tracing::debug!(%role, cells = cells.len(), "targets highlighted");
        }
        TurnEvent::Hint(hint) => {
            tracing::debug!(hint = hint.message(), "hint");
        }
    }
}
