//! Content loaders for reading game data from files.
//!
//! Each loader converts one RON/TOML file into tactics-core types;
//! [`ContentFactory`] resolves a whole mission from a data directory.

pub mod actors;
pub mod config;
pub mod factory;
pub mod level;
pub mod mission;
pub mod obstacles;

pub use actors::ActorLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use level::LevelLoader;
pub use mission::{MissionLoader, MissionSpec};
pub use obstacles::{ObstacleLayout, ObstacleLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
