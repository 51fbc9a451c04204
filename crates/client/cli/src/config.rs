//! CLI configuration read from the process environment.
use std::env;
use std::path::PathBuf;

/// Which built-in policy plays the player side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayerKind {
    #[default]
    Chase,
    Wait,
}

impl std::str::FromStr for PlayerKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "chase" => Ok(PlayerKind::Chase),
            "wait" => Ok(PlayerKind::Wait),
            other => Err(format!("unknown player kind '{other}'")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub mission: String,
    pub player: PlayerKind,
    pub max_ticks: u64,
    pub tick_ms: u64,
    pub seed: Option<u64>,
}

impl CliConfig {
    pub const DEFAULT_MISSION: &'static str = "courtyard_skirmish";
    pub const DEFAULT_MAX_TICKS: u64 = 2_000;
    pub const DEFAULT_TICK_MS: u64 = 50;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_DATA_DIR` - Content directory (default: bundled data)
    /// - `TACTICS_MISSION` - Mission file stem (default: `courtyard_skirmish`)
    /// - `TACTICS_PLAYER` - `chase` or `wait` (default: `chase`)
    /// - `TACTICS_MAX_TICKS` - Ticks to simulate (default: 2000)
    /// - `TACTICS_TICK_MS` - Milliseconds per tick (default: 50)
    /// - `TACTICS_SEED` - Seed for enemy spawn selection (default: random)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(read: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = read("TACTICS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(mission) = read("TACTICS_MISSION") {
            config.mission = mission;
        }
        if let Some(player) = parse(read("TACTICS_PLAYER")) {
            config.player = player;
        }
        if let Some(ticks) = parse(read("TACTICS_MAX_TICKS")) {
            config.max_ticks = ticks;
        }
        if let Some(tick_ms) = parse::<u64>(read("TACTICS_TICK_MS")) {
            config.tick_ms = tick_ms.max(1);
        }
        config.seed = parse(read("TACTICS_SEED"));

        config
    }

    pub fn tick_seconds(&self) -> f32 {
        self.tick_ms as f32 / 1000.0
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../game/content/data"),
            mission: Self::DEFAULT_MISSION.to_owned(),
            player: PlayerKind::default(),
            max_ticks: Self::DEFAULT_MAX_TICKS,
            tick_ms: Self::DEFAULT_TICK_MS,
            seed: None,
        }
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> CliConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config(&[]);
        assert_eq!(config.mission, CliConfig::DEFAULT_MISSION);
        assert_eq!(config.player, PlayerKind::Chase);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("TACTICS_MISSION", "duel"),
            ("TACTICS_PLAYER", "Wait"),
            ("TACTICS_MAX_TICKS", "40"),
            ("TACTICS_TICK_MS", "0"),
            ("TACTICS_SEED", " 9 "),
        ]);
        assert_eq!(config.mission, "duel");
        assert_eq!(config.player, PlayerKind::Wait);
        assert_eq!(config.max_ticks, 40);
        assert_eq!(config.tick_ms, 1);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let config = config(&[("TACTICS_MAX_TICKS", "many"), ("TACTICS_PLAYER", "hero")]);
        assert_eq!(config.max_ticks, CliConfig::DEFAULT_MAX_TICKS);
        assert_eq!(config.player, PlayerKind::Chase);
    }
}
