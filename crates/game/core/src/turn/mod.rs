//! Turn sequencing: spawn, initiative hand-off and the per-turn phase flow.
//!
//! [`TurnMachine`] owns the grid, both agents and the initiative scheduler.
//! Collaborators drive it with commands (`select_move`, `select_target`, ...)
//! and report the end of motion or animation through `on_move_complete` and
//! `on_attack_resolved`. Everything observable is recorded as a
//! [`TurnEvent`] and handed out by [`TurnMachine::drain_events`].
//!
//! Within a turn the phases flow as
//! `Menu -> Move|Attack -> Moving|Attacking -> Check -> Menu|Ending`,
//! after which the next agent is taken from the initiative queue.
mod errors;
mod events;
mod initiative;
mod phase;

pub use errors::TurnError;
pub use events::{Hint, TurnEvent};
pub use initiative::InitiativeScheduler;
pub use phase::{Phase, TurnState};

use crate::actor::{Actor, ActorTemplate, Role};
use crate::ai::choose_approach_path;
use crate::config::EngineConfig;
use crate::direction::CardinalDirection;
use crate::grid::{CellId, Grid, GridError, Level, Occupancy, SpawnPools};
use crate::search::{Path, ReachableSet, find_path, reachable_cells};

/// What a collaborator must play out after a target was accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Order {
    Move(Path),
    Attack { target: CellId },
}

/// Turn and phase state machine for one match between two agents.
#[derive(Clone, Debug)]
pub struct TurnMachine {
    config: EngineConfig,
    grid: Grid,
    spawns: SpawnPools,
    actors: [Option<Actor>; EngineConfig::MAX_AGENTS],
    scheduler: InitiativeScheduler,
    state: TurnState,
    turn_number: u32,
    targets: Option<ReachableSet>,
    active_path: Option<Path>,
    moved: bool,
    attacked: bool,
    events: Vec<TurnEvent>,
}

const fn slot(role: Role) -> usize {
    match role {
        Role::Player => 0,
        Role::Enemy => 1,
    }
}

impl TurnMachine {
    pub fn new(level: Level, config: EngineConfig) -> Self {
        Self::from_parts(level.grid, level.spawns, config)
    }

    pub fn from_parts(grid: Grid, spawns: SpawnPools, config: EngineConfig) -> Self {
        Self {
            scheduler: InitiativeScheduler::new(config.initiative),
            config,
            grid,
            spawns,
            actors: [None, None],
            state: TurnState::Spawn,
            turn_number: 0,
            targets: None,
            active_path: None,
            moved: false,
            attacked: false,
            events: vec![TurnEvent::Hint(Hint::ChooseSpawn)],
        }
    }

    // ===== accessors =====

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn spawns(&self) -> &SpawnPools {
        &self.spawns
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Number of the current turn; 0 until the first turn starts.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn scheduler(&self) -> &InitiativeScheduler {
        &self.scheduler
    }

    pub fn actor(&self, role: Role) -> Option<&Actor> {
        self.actors[slot(role)].as_ref()
    }

    /// Mutable access for motion playback, which owns the actor's position
    /// and facing while a move is running.
    pub fn actor_mut(&mut self, role: Role) -> Option<&mut Actor> {
        self.actors[slot(role)].as_mut()
    }

    /// Cells highlighted for the pending move or attack selection.
    pub fn targets(&self) -> Option<&ReachableSet> {
        self.targets.as_ref()
    }

    /// Path currently being played back.
    pub fn active_path(&self) -> Option<&Path> {
        self.active_path.as_ref()
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    pub fn has_attacked(&self) -> bool {
        self.attacked
    }

    pub fn drain_events(&mut self) -> Vec<TurnEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== queries =====

    /// The cell an agent stands on, derived from its position by rounding.
    pub fn actor_cell(&self, role: Role) -> Result<CellId, TurnError> {
        let actor = self.actor(role).ok_or(TurnError::NotSpawned(role))?;
        self.grid
            .cell_at_world(actor.position.x, actor.position.z)
            .ok_or(TurnError::OffGrid(role))
    }

    /// Least-cost path from the agent's cell to `target`.
    pub fn path_to(&mut self, role: Role, target: CellId) -> Result<Path, TurnError> {
        let start = self.actor_cell(role)?;
        let jump = self.actor(role).map_or(0, |actor| actor.jump);
        Ok(find_path(&mut self.grid, start, target, role, jump)?)
    }

    /// Cells the agent can enter with its remaining action points.
    pub fn reachable(&self, role: Role) -> Result<ReachableSet, TurnError> {
        let start = self.actor_cell(role)?;
        let actor = self.actor(role).ok_or(TurnError::NotSpawned(role))?;
        Ok(reachable_cells(
            &self.grid,
            start,
            role,
            actor.jump,
            actor.budget.current,
        ))
    }

    // ===== setup =====

    /// Registers a spawn cell for one side. Duplicates are ignored.
    pub fn add_spawn_point(&mut self, cell: CellId, is_enemy_pool: bool) -> Result<(), TurnError> {
        if !self.grid.contains(cell) {
            return Err(GridError::UnknownCell(cell).into());
        }
        self.spawns.add(cell, is_enemy_pool);
        Ok(())
    }

    /// Places an agent on a cell of its role's spawn pool.
    pub fn spawn_agent(
        &mut self,
        role: Role,
        template: &ActorTemplate,
        cell: CellId,
    ) -> Result<(), TurnError> {
        if self.state != TurnState::Spawn {
            return Err(self.wrong_phase("spawn_agent"));
        }
        if self.actor(role).is_some() {
            return Err(TurnError::AlreadySpawned(role));
        }
        if !self.spawns.contains(role, cell) {
            if role.is_player() {
                self.hint(Hint::NotASpawnPoint);
            }
            tracing::warn!(%role, %cell, "rejected spawn outside the spawn pool");
            return Err(TurnError::NotASpawnPoint { role, cell });
        }
        if self.grid.occupancy(cell) != Some(Occupancy::Empty) {
            return Err(TurnError::InvalidTarget(cell));
        }

        let anchor = self.grid.anchor(cell).ok_or(GridError::UnknownCell(cell))?;
        self.grid.set_occupancy(cell, Occupancy::Occupied(role))?;
        let mut actor = Actor::from_template(role, template, anchor);
        actor.cell = Some(cell);
        self.scheduler.register(role, actor.speed);
        tracing::info!(%role, name = %actor.name, %cell, "agent spawned");
        self.actors[slot(role)] = Some(actor);
        self.events.push(TurnEvent::Spawned { role, cell });
        Ok(())
    }

    pub fn all_spawned(&self) -> bool {
        self.actors.iter().all(Option::is_some)
    }

    // ===== clock =====

    /// Advances the initiative clock and starts a turn when one is due.
    ///
    /// The first turn starts once both agents are placed and the queue has
    /// filled; after a hand-off the next turn starts as soon as any agent is
    /// queued.
    pub fn tick(&mut self, elapsed_ms: u64) {
        match self.state {
            TurnState::Spawn => {
                if !self.all_spawned() {
                    return;
                }
                self.scheduler.tick(elapsed_ms);
                if self.scheduler.is_full() {
                    self.advance_turn();
                }
            }
            TurnState::Handoff => {
                self.scheduler.tick(elapsed_ms);
                if !self.scheduler.is_empty() {
                    self.advance_turn();
                }
            }
            TurnState::Acting { .. } => {
                self.scheduler.tick(elapsed_ms);
            }
        }
    }

    // ===== menu commands =====

    /// Enters target selection for a move and returns the highlighted cells.
    pub fn select_move(&mut self) -> Result<&ReachableSet, TurnError> {
        let role = self.expect_phase(Phase::Menu, "select_move")?;
        self.require_actions(role)?;

        let reachable = self.reachable(role)?;
        self.open_selection(role, Phase::Move, reachable);
        self.targets.as_ref().ok_or(TurnError::NotSpawned(role))
    }

    /// Enters target selection for an attack and returns the highlighted cells.
    ///
    /// Attackable cells are the reachable cells that allow actions, without
    /// the attacker's own cell.
    pub fn select_attack(&mut self) -> Result<&ReachableSet, TurnError> {
        let role = self.expect_phase(Phase::Menu, "select_attack")?;
        if self.attacked {
            self.hint(Hint::AlreadyAttacked);
            tracing::warn!(%role, "rejected second attack");
            return Err(TurnError::AlreadyAttacked);
        }
        self.require_actions(role)?;

        let origin = self.actor_cell(role)?;
        let grid = &self.grid;
        let targets = self.reachable(role)?.filtered(|target| {
            target != origin && grid.cell(target).is_some_and(|c| c.can_act())
        });
        self.open_selection(role, Phase::Attack, targets);
        self.targets.as_ref().ok_or(TurnError::NotSpawned(role))
    }

    /// Leaves move or attack selection without acting.
    pub fn cancel(&mut self) -> Result<(), TurnError> {
        let (role, phase) = self.acting("cancel")?;
        if !matches!(phase, Phase::Move | Phase::Attack) {
            return Err(self.wrong_phase("cancel"));
        }
        self.targets = None;
        self.set_state(TurnState::acting(role, Phase::Menu));
        Ok(())
    }

    /// Ends the turn without spending further actions.
    pub fn wait(&mut self) -> Result<(), TurnError> {
        let role = self.expect_phase(Phase::Menu, "wait")?;
        tracing::debug!(%role, "agent waits");
        self.enter_ending(role);
        Ok(())
    }

    /// Commits the pending selection to `cell`.
    ///
    /// A cell outside the highlighted set is rejected with a hint and leaves
    /// the machine unchanged.
    pub fn select_target(&mut self, cell: CellId) -> Result<Order, TurnError> {
        let (role, phase) = self.acting("select_target")?;
        if !matches!(phase, Phase::Move | Phase::Attack) {
            return Err(self.wrong_phase("select_target"));
        }

        let origin = self.actor_cell(role)?;
        let valid = cell != origin && self.targets.as_ref().is_some_and(|t| t.contains(cell));
        if !valid {
            self.hint(Hint::InvalidTarget);
            tracing::warn!(%role, %cell, %phase, "rejected target selection");
            return Err(TurnError::InvalidTarget(cell));
        }

        if phase == Phase::Move {
            let path = self.path_to(role, cell)?;
            self.start_move(role, path.clone());
            Ok(Order::Move(path))
        } else {
            self.targets = None;
            self.set_state(TurnState::acting(role, Phase::Attacking));
            self.events.push(TurnEvent::AttackStarted { role, target: cell });
            Ok(Order::Attack { target: cell })
        }
    }

    /// Plays the enemy's turn: approach the player, or wait if no approach
    /// is possible.
    pub fn run_enemy_turn(&mut self) -> Result<Option<Order>, TurnError> {
        let role = self.expect_phase(Phase::Menu, "run_enemy_turn")?;
        if role != Role::Enemy {
            return Err(self.wrong_phase("run_enemy_turn"));
        }

        let mover = self.actor_cell(role)?;
        let opponent = self.actor_cell(role.opponent())?;
        let reachable = self.reachable(role)?;
        let jump = self.actor(role).map_or(0, |actor| actor.jump);

        let path = choose_approach_path(&mut self.grid, mover, opponent, role, jump, &reachable)?;
        match path {
            Some(path) if path.hop_count() > 0 => {
                self.start_move(role, path.clone());
                Ok(Some(Order::Move(path)))
            }
            _ => {
                self.enter_ending(role);
                Ok(None)
            }
        }
    }

    // ===== playback callbacks =====

    /// Motion playback finished; the agent's position is on its new cell.
    pub fn on_move_complete(&mut self, role: Role) -> Result<(), TurnError> {
        if !self.state.is_acting(role, Phase::Moving) {
            return Err(self.wrong_phase("on_move_complete"));
        }

        let cell = self.actor_cell(role)?;
        let hops = self.active_path.take().map_or(0, |path| path.hop_count());
        let previous = self.actor(role).and_then(|actor| actor.cell);

        if let Some(previous) = previous.filter(|&previous| previous != cell) {
            if self.grid.occupancy(previous) == Some(Occupancy::Occupied(role)) {
                self.grid.set_occupancy(previous, Occupancy::Empty)?;
            }
        }
        self.grid.set_occupancy(cell, Occupancy::Occupied(role))?;
        if let Some(actor) = self.actor_mut(role) {
            actor.cell = Some(cell);
        }

        self.moved = true;
        self.spend(role, hops);
        self.check(role);
        Ok(())
    }

    /// Attack animation finished.
    ///
    /// Attacking after a move costs every remaining point; attacking first
    /// costs exactly one.
    pub fn on_attack_resolved(&mut self, role: Role) -> Result<(), TurnError> {
        if !self.state.is_acting(role, Phase::Attacking) {
            return Err(self.wrong_phase("on_attack_resolved"));
        }
        let cost = if self.moved {
            self.actor(role).map_or(0, |actor| actor.budget.current)
        } else {
            1
        };
        self.attacked = true;
        self.spend(role, cost);
        self.check(role);
        Ok(())
    }

    /// Finishes a player turn that is waiting for a facing choice.
    pub fn choose_facing(&mut self, direction: CardinalDirection) -> Result<(), TurnError> {
        let role = self.expect_phase(Phase::Ending, "choose_facing")?;
        self.face(role, direction);
        self.finish_turn();
        Ok(())
    }

    // ===== transitions =====

    fn set_state(&mut self, next: TurnState) {
        let previous = self.state;
        if previous == next {
            return;
        }
        self.state = next;
        tracing::debug!(from = %previous, to = %next, "phase changed");
        self.events.push(TurnEvent::PhaseChanged {
            from: previous,
            to: next,
        });
    }

    fn open_selection(&mut self, role: Role, phase: Phase, targets: ReachableSet) {
        self.events.push(TurnEvent::ReachableComputed {
            role,
            cells: targets.iter().collect(),
        });
        self.targets = Some(targets);
        self.set_state(TurnState::acting(role, phase));
    }

    fn start_move(&mut self, role: Role, path: Path) {
        tracing::debug!(%role, hops = path.hop_count(), "move started");
        self.targets = None;
        self.active_path = Some(path.clone());
        self.set_state(TurnState::acting(role, Phase::Moving));
        self.events.push(TurnEvent::MoveStarted { role, path });
    }

    fn spend(&mut self, role: Role, amount: u32) {
        let Some(actor) = self.actor_mut(role) else {
            return;
        };
        let spent = actor.budget.spend(amount);
        let remaining = actor.budget.current;
        self.events.push(TurnEvent::ActionsUsed {
            role,
            spent,
            remaining,
        });
    }

    /// After an action: the player continues while points remain; everyone
    /// else ends the turn.
    fn check(&mut self, role: Role) {
        self.set_state(TurnState::acting(role, Phase::Check));
        let exhausted = self.actor(role).is_none_or(|actor| actor.budget.is_exhausted());
        if role.is_player() && !exhausted {
            self.set_state(TurnState::acting(role, Phase::Menu));
        } else {
            self.enter_ending(role);
        }
    }

    fn enter_ending(&mut self, role: Role) {
        self.targets = None;
        self.set_state(TurnState::acting(role, Phase::Ending));

        if role.is_player() {
            if self.config.facing_prompt {
                self.hint(Hint::ChooseFacing);
                return;
            }
        } else if let (Ok(own), Ok(opponent)) =
            (self.actor_cell(role), self.actor_cell(role.opponent()))
        {
            let (from, to) = (self.grid.coord_of(own), self.grid.coord_of(opponent));
            if let Some(direction) = CardinalDirection::toward(from, to) {
                self.face(role, direction);
            }
        }
        self.finish_turn();
    }

    fn face(&mut self, role: Role, direction: CardinalDirection) {
        if let Some(actor) = self.actor_mut(role) {
            actor.facing = direction;
        }
        self.events.push(TurnEvent::Faced { role, direction });
    }

    fn finish_turn(&mut self) {
        self.targets = None;
        self.active_path = None;
        self.advance_turn();
    }

    /// Hands the turn to the head of the initiative queue.
    fn advance_turn(&mut self) {
        let Some(role) = self.scheduler.pop() else {
            self.set_state(TurnState::Handoff);
            return;
        };

        if let Some(actor) = self.actor_mut(role) {
            actor.budget.reset();
        }
        self.moved = false;
        self.attacked = false;
        self.turn_number += 1;

        tracing::info!(turn = self.turn_number, %role, "turn started");
        self.events.push(TurnEvent::TurnStarted {
            role,
            turn: self.turn_number,
        });
        self.set_state(TurnState::acting(role, Phase::Menu));
    }

    // ===== guards =====

    fn hint(&mut self, hint: Hint) {
        self.events.push(TurnEvent::Hint(hint));
    }

    fn wrong_phase(&self, command: &'static str) -> TurnError {
        TurnError::WrongPhase {
            command,
            state: self.state,
        }
    }

    fn acting(&self, command: &'static str) -> Result<(Role, Phase), TurnError> {
        match self.state {
            TurnState::Acting { role, phase } => Ok((role, phase)),
            _ => Err(self.wrong_phase(command)),
        }
    }

    fn expect_phase(&self, expected: Phase, command: &'static str) -> Result<Role, TurnError> {
        match self.acting(command)? {
            (role, phase) if phase == expected => Ok(role),
            _ => Err(self.wrong_phase(command)),
        }
    }

    fn require_actions(&mut self, role: Role) -> Result<(), TurnError> {
        let exhausted = self.actor(role).is_none_or(|actor| actor.budget.is_exhausted());
        if exhausted {
            self.hint(Hint::NoActionsLeft);
            tracing::warn!(%role, "rejected action with an empty budget");
            return Err(TurnError::ActionsExhausted);
        }
        Ok(())
    }
}
