//! Data-driven content definitions and loaders.
//!
//! This crate provides loaders for the RON/TOML data files that describe a
//! match:
//! - Level layouts: row-major height arrays (RON)
//! - Obstacle layouts: row-major obstacle codes (RON)
//! - Actor templates (RON)
//! - Missions tying a level to a player and an enemy template (RON)
//! - Engine configuration (TOML)
//!
//! All loaders deserialize tactics-core types directly through serde.

pub mod mission;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use mission::Mission;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActorLoader, ConfigLoader, ContentFactory, LevelLoader, LoadResult, MissionLoader,
    MissionSpec, ObstacleLayout, ObstacleLoader,
};
