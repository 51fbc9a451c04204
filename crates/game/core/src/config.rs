/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Whether adjacency includes the four diagonal neighbours.
    pub diagonal_motion: bool,

    /// Initiative accumulation parameters.
    pub initiative: InitiativeConfig,

    /// When true the player picks a facing direction before the turn ends.
    /// When false the player keeps their facing and the turn ends immediately.
    pub facing_prompt: bool,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of neighbours per cell (8-connectivity).
    pub const MAX_NEIGHBOURS: usize = 8;
    /// Number of competing agents.
    pub const MAX_AGENTS: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DIAGONAL_MOTION: bool = true;
    pub const DEFAULT_FACING_PROMPT: bool = true;

    pub fn new() -> Self {
        Self {
            diagonal_motion: Self::DEFAULT_DIAGONAL_MOTION,
            initiative: InitiativeConfig::default(),
            facing_prompt: Self::DEFAULT_FACING_PROMPT,
        }
    }

    pub fn with_diagonal_motion(mut self, diagonal_motion: bool) -> Self {
        self.diagonal_motion = diagonal_motion;
        self
    }

    pub fn with_facing_prompt(mut self, facing_prompt: bool) -> Self {
        self.facing_prompt = facing_prompt;
        self
    }

    pub fn with_initiative(mut self, initiative: InitiativeConfig) -> Self {
        self.initiative = initiative;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of the speed-driven initiative timers.
///
/// Each tick an agent gains `speed * tick_ms * scale_factor` initiative; every
/// time the timer crosses `threshold` the agent is queued once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InitiativeConfig {
    pub threshold: u64,
    pub scale_factor: u32,
    pub queue_capacity: usize,
}

impl InitiativeConfig {
    pub const DEFAULT_THRESHOLD: u64 = 1_000;
    pub const DEFAULT_SCALE_FACTOR: u32 = 1;
    pub const DEFAULT_QUEUE_CAPACITY: usize = 4;

    pub const fn new(threshold: u64, scale_factor: u32, queue_capacity: usize) -> Self {
        Self {
            threshold,
            scale_factor,
            queue_capacity,
        }
    }
}

impl Default for InitiativeConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_THRESHOLD,
            Self::DEFAULT_SCALE_FACTOR,
            Self::DEFAULT_QUEUE_CAPACITY,
        )
    }
}
