//! Tick-driven match orchestrator.
//!
//! [`Runtime`] owns the turn machine together with everything that takes
//! time to play out: the initiative clock, motion playback, the attack
//! animation and the hint board. Clients call [`Runtime::tick`] once per
//! frame; player decisions come from the injected [`PlayerProvider`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use tactics_content::Mission;
use tactics_core::{
    ActorTemplate, CellId, EngineConfig, Occupancy, Path, Phase, Role, TurnError, TurnEvent,
    TurnMachine, TurnState,
};

use crate::api::{PlayerCommand, PlayerProvider, Prompt, Result, RuntimeError, WaitProvider};
use crate::hints::HintBoard;
use crate::motion::{MotionPlayback, yaw_of};
use crate::task::{Delay, Task, TaskSlot, TaskStatus};

/// Playback tunables shared by the runtime and its tasks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Ground speed while walking, in cells per second.
    pub move_speed: f32,
    /// Planar distance under which a cell counts as reached.
    pub arrive_epsilon: f32,
    /// Fraction of a height step blended in per second.
    pub jump_speed: f32,
    /// Elevation only changes closer than this to the next cell.
    pub jump_start_distance: f32,
    /// Height of an agent's body above the cell it stands on.
    pub max_y_offset: f32,
    /// Turning speed in radians per second.
    pub rotate_speed: f32,
    /// Rotation stops once the remaining angle is below this, in radians.
    pub angle_epsilon: f32,
    /// Seconds a hint stays visible.
    pub hint_duration: f32,
    /// Seconds the attack animation takes.
    pub attack_duration: f32,
}

impl RuntimeConfig {
    pub const DEFAULT_MOVE_SPEED: f32 = 7.5;
    pub const DEFAULT_ARRIVE_EPSILON: f32 = 0.05;
    pub const DEFAULT_JUMP_SPEED: f32 = 12.0;
    pub const DEFAULT_JUMP_START_DISTANCE: f32 = 0.35;
    pub const DEFAULT_MAX_Y_OFFSET: f32 = 0.65;
    pub const DEFAULT_ROTATE_SPEED: f32 = 10.0;
    /// Half a degree.
    pub const DEFAULT_ANGLE_EPSILON: f32 = 0.008_726_646;
    pub const DEFAULT_HINT_DURATION: f32 = 2.0;
    pub const DEFAULT_ATTACK_DURATION: f32 = 0.5;
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            move_speed: Self::DEFAULT_MOVE_SPEED,
            arrive_epsilon: Self::DEFAULT_ARRIVE_EPSILON,
            jump_speed: Self::DEFAULT_JUMP_SPEED,
            jump_start_distance: Self::DEFAULT_JUMP_START_DISTANCE,
            max_y_offset: Self::DEFAULT_MAX_Y_OFFSET,
            rotate_speed: Self::DEFAULT_ROTATE_SPEED,
            angle_epsilon: Self::DEFAULT_ANGLE_EPSILON,
            hint_duration: Self::DEFAULT_HINT_DURATION,
            attack_duration: Self::DEFAULT_ATTACK_DURATION,
        }
    }
}

/// Attack animation stand-in: resolves after a fixed delay.
#[derive(Debug)]
struct AttackAnimation {
    role: Role,
    delay: Delay,
}

impl Task for AttackAnimation {
    type Output = Role;

    fn poll(&mut self, dt: f32) -> TaskStatus<Role> {
        match self.delay.poll(dt) {
            TaskStatus::Pending => TaskStatus::Pending,
            TaskStatus::Done(()) => TaskStatus::Done(self.role),
        }
    }
}

const fn slot(role: Role) -> usize {
    match role {
        Role::Player => 0,
        Role::Enemy => 1,
    }
}

/// One running match.
pub struct Runtime {
    config: RuntimeConfig,
    mission: String,
    machine: TurnMachine,
    player: ActorTemplate,
    enemy: ActorTemplate,
    provider: Box<dyn PlayerProvider>,
    rng: StdRng,
    motion: TaskSlot<MotionPlayback>,
    attack: TaskSlot<AttackAnimation>,
    hints: HintBoard,
    yaws: [f32; 2],
    events: Vec<TurnEvent>,
    ticks: u64,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn mission_name(&self) -> &str {
        &self.mission
    }

    pub fn machine(&self) -> &TurnMachine {
        &self.machine
    }

    pub fn state(&self) -> TurnState {
        self.machine.state()
    }

    pub fn turn_number(&self) -> u32 {
        self.machine.turn_number()
    }

    pub fn hints(&self) -> &HintBoard {
        &self.hints
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current heading of an agent, see [`crate::motion::yaw_toward`].
    pub fn yaw(&self, role: Role) -> f32 {
        self.yaws[slot(role)]
    }

    pub fn motion(&self) -> Option<&MotionPlayback> {
        self.motion.get()
    }

    /// Whether a move or attack is still playing out.
    pub fn is_busy(&self) -> bool {
        !self.motion.is_idle() || !self.attack.is_idle()
    }

    /// Events recorded since the last call, in order.
    pub fn drain_events(&mut self) -> Vec<TurnEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advances the match by `dt` seconds.
    ///
    /// Rejected player commands are logged and surfaced as hints; only
    /// errors that indicate a broken invariant are returned.
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        let dt = dt.max(0.0);
        self.ticks += 1;
        self.hints.tick(dt);

        if self.machine.state() == TurnState::Spawn {
            if self.machine.actor(Role::Enemy).is_none() {
                self.spawn_enemy()?;
            }
            if self.machine.actor(Role::Player).is_none() {
                self.prompt(Prompt::Spawn)?;
            }
        }

        self.machine.tick((dt * 1000.0).round() as u64);
        self.pump()?;

        self.advance_playback(dt)?;
        if !self.is_busy() {
            self.act()?;
        }
        Ok(())
    }

    /// Executes a player command against the turn machine.
    pub fn command(&mut self, command: PlayerCommand) -> Result<()> {
        tracing::debug!(?command, "player command");
        let result = self.dispatch(command);
        self.pump()?;
        match result {
            Err(error) if error.is_recoverable() => {
                tracing::warn!(%error, "player command rejected");
                Ok(())
            }
            other => other,
        }
    }

    fn dispatch(&mut self, command: PlayerCommand) -> Result<()> {
        match command {
            PlayerCommand::Spawn(cell) => {
                self.machine.spawn_agent(Role::Player, &self.player, cell)?;
            }
            PlayerCommand::Move(cell) => {
                self.machine.select_move()?;
                self.commit(cell)?;
            }
            PlayerCommand::Attack(cell) => {
                self.machine.select_attack()?;
                self.commit(cell)?;
            }
            PlayerCommand::Wait => self.machine.wait()?,
            PlayerCommand::Face(direction) => self.machine.choose_facing(direction)?,
        }
        Ok(())
    }

    /// Confirms a target; a rejected target returns to the menu.
    fn commit(&mut self, cell: CellId) -> Result<()> {
        if let Err(error) = self.machine.select_target(cell) {
            if matches!(error, TurnError::InvalidTarget(_)) {
                self.machine.cancel()?;
            }
            return Err(error.into());
        }
        Ok(())
    }

    fn prompt(&mut self, prompt: Prompt) -> Result<()> {
        match self.provider.provide(prompt, &self.machine) {
            Some(command) => self.command(command),
            None => Ok(()),
        }
    }

    fn act(&mut self) -> Result<()> {
        match self.machine.state() {
            TurnState::Acting {
                role: Role::Enemy,
                phase: Phase::Menu,
            } => {
                self.machine.run_enemy_turn()?;
                self.pump()
            }
            TurnState::Acting {
                role: Role::Player,
                phase: Phase::Menu,
            } => self.prompt(Prompt::Menu),
            TurnState::Acting {
                role: Role::Player,
                phase: Phase::Ending,
            } => self.prompt(Prompt::Facing),
            _ => Ok(()),
        }
    }

    fn spawn_enemy(&mut self) -> Result<()> {
        let grid = self.machine.grid();
        let free: Vec<CellId> = self
            .machine
            .spawns()
            .pool(Role::Enemy)
            .iter()
            .copied()
            .filter(|&cell| grid.occupancy(cell) == Some(Occupancy::Empty))
            .collect();
        if free.is_empty() {
            return Err(RuntimeError::NoSpawnPoints(Role::Enemy));
        }

        let cell = free[self.rng.gen_range(0..free.len())];
        self.machine.spawn_agent(Role::Enemy, &self.enemy, cell)?;
        self.pump()
    }

    fn advance_playback(&mut self, dt: f32) -> Result<()> {
        if let Some(outcome) = self.motion.poll(dt) {
            self.yaws[slot(outcome.role)] = outcome.yaw;
            if let Some(actor) = self.machine.actor_mut(outcome.role) {
                actor.position = outcome.position;
                actor.facing = outcome.facing;
            }
            self.machine.on_move_complete(outcome.role)?;
            self.pump()?;
        } else if let Some(playback) = self.motion.get() {
            let (role, position, yaw) = (playback.role(), playback.position(), playback.yaw());
            self.yaws[slot(role)] = yaw;
            if let Some(actor) = self.machine.actor_mut(role) {
                actor.position = position;
            }
        }

        if let Some(role) = self.attack.poll(dt) {
            self.machine.on_attack_resolved(role)?;
            self.pump()?;
        }
        Ok(())
    }

    /// Moves machine events into the runtime log, starting whatever
    /// playback they ask for.
    fn pump(&mut self) -> Result<()> {
        for event in self.machine.drain_events() {
            match &event {
                TurnEvent::MoveStarted { role, path } => self.start_motion(*role, path)?,
                TurnEvent::AttackStarted { role, .. } => {
                    self.attack.start(AttackAnimation {
                        role: *role,
                        delay: Delay::new(self.config.attack_duration),
                    });
                }
                TurnEvent::Faced { role, direction } => {
                    self.yaws[slot(*role)] = yaw_of(*direction);
                }
                TurnEvent::Hint(hint) => self.hints.show(*hint),
                _ => {}
            }
            self.events.push(event);
        }
        Ok(())
    }

    fn start_motion(&mut self, role: Role, path: &Path) -> Result<()> {
        let actor = self
            .machine
            .actor(role)
            .ok_or(TurnError::NotSpawned(role))?;
        let playback = MotionPlayback::new(
            role,
            path,
            self.machine.grid(),
            actor.position,
            self.yaws[slot(role)],
            &self.config,
        )?;
        self.motion.start(playback);
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
#[derive(Default)]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    engine: EngineConfig,
    mission: Option<Mission>,
    provider: Option<Box<dyn PlayerProvider>>,
    seed: Option<u64>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn engine_config(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn mission(mut self, mission: Mission) -> Self {
        self.mission = Some(mission);
        self
    }

    /// Defaults to [`WaitProvider`].
    pub fn player_provider(mut self, provider: impl PlayerProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Seeds enemy spawn selection. Without a seed it is drawn from entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Runtime> {
        let Mission {
            name,
            level,
            player,
            enemy,
        } = self.mission.ok_or(RuntimeError::MissingMission)?;

        for role in [Role::Player, Role::Enemy] {
            if level.spawns.pool(role).is_empty() {
                return Err(RuntimeError::NoSpawnPoints(role));
            }
        }

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut runtime = Runtime {
            config: self.config,
            mission: name,
            machine: TurnMachine::new(level, self.engine),
            player,
            enemy,
            provider: self.provider.unwrap_or_else(|| Box::new(WaitProvider)),
            rng,
            motion: TaskSlot::new("motion"),
            attack: TaskSlot::new("attack"),
            hints: HintBoard::new(self.config.hint_duration),
            yaws: [0.0; 2],
            events: Vec::new(),
            ticks: 0,
        };
        runtime.pump()?;

        tracing::info!(mission = %runtime.mission, "runtime ready");
        Ok(runtime)
    }
}
