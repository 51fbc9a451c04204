//! Content factory for resolving missions from data files.

use std::path::{Path, PathBuf};

use tactics_core::{ActorTemplate, EngineConfig, LevelLayout, Role};

use crate::loaders::{
    ActorLoader, ConfigLoader, LevelLoader, LoadResult, MissionLoader, MissionSpec,
    ObstacleLayout, ObstacleLoader,
};
use crate::mission::Mission;

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── actors.ron
/// ├── levels/
/// │   └── courtyard.ron
/// ├── obstacles/
/// │   └── courtyard.ron
/// └── missions/
///     └── courtyard_skirmish.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the actor catalog from `actors.ron`.
    pub fn load_actors(&self) -> LoadResult<Vec<(String, ActorTemplate)>> {
        ActorLoader::load(&self.data_dir.join("actors.ron"))
    }

    /// Load a level layout from `levels/<name>.ron`.
    pub fn load_level(&self, name: &str) -> LoadResult<LevelLayout> {
        LevelLoader::load(&self.data_dir.join("levels").join(format!("{name}.ron")))
    }

    /// Load an obstacle layout from `obstacles/<name>.ron`.
    pub fn load_obstacles(&self, name: &str) -> LoadResult<ObstacleLayout> {
        ObstacleLoader::load(&self.data_dir.join("obstacles").join(format!("{name}.ron")))
    }

    /// Load a mission description from `missions/<name>.ron`.
    pub fn load_mission_spec(&self, name: &str) -> LoadResult<MissionSpec> {
        MissionLoader::load(&self.data_dir.join("missions").join(format!("{name}.ron")))
    }

    /// Resolves a mission: loads its level, applies its obstacles, builds the
    /// grid with `config.diagonal_motion` and looks up both combatants.
    ///
    /// Fails if either side has no spawn cell.
    pub fn load_mission(&self, name: &str, config: &EngineConfig) -> LoadResult<Mission> {
        let spec = self.load_mission_spec(name)?;
        let catalog = self.load_actors()?;

        let mut layout = self.load_level(&spec.level)?;
        if let Some(obstacles) = &spec.obstacles {
            layout = self.load_obstacles(obstacles)?.apply_to(layout)?;
        }

        let level = layout
            .build(config.diagonal_motion)
            .map_err(|e| anyhow::anyhow!("Failed to build level '{}': {}", spec.level, e))?;

        for role in [Role::Player, Role::Enemy] {
            if level.spawns.pool(role).is_empty() {
                anyhow::bail!("level '{}' has no {} spawn cells", spec.level, role);
            }
        }

        let player = ActorLoader::find(&catalog, &spec.player)?.clone();
        let enemy = ActorLoader::find(&catalog, &spec.enemy)?.clone();

        tracing::info!(
            mission = %spec.name,
            level = %level.name,
            cells = level.grid.cell_count(),
            player = %player.name,
            enemy = %enemy.name,
            "mission loaded"
        );

        Ok(Mission {
            name: spec.name,
            level,
            player,
            enemy,
        })
    }
}
