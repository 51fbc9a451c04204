//! Mission file loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Mission description as authored: references into the level, obstacle
/// and actor catalogs by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionSpec {
    pub name: String,
    /// Level file stem under `levels/`.
    pub level: String,
    /// Obstacle file stem under `obstacles/`, if any.
    #[serde(default)]
    pub obstacles: Option<String>,
    /// Actor id of the player.
    pub player: String,
    /// Actor id of the enemy.
    pub enemy: String,
}

/// Loader for mission files from RON.
pub struct MissionLoader;

impl MissionLoader {
    pub fn load(path: &Path) -> LoadResult<MissionSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<MissionSpec> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse mission RON: {}", e))
    }
}
