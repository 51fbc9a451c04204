//! Engine configuration loader.

use std::path::Path;

use tactics_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`EngineConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.initiative.threshold == 0 {
            anyhow::bail!("initiative.threshold must be greater than zero");
        }
        if config.initiative.queue_capacity == 0 {
            anyhow::bail!("initiative.queue_capacity must be greater than zero");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let config = ConfigLoader::parse("facing_prompt = false\n").unwrap();
        assert!(!config.facing_prompt);
        assert_eq!(config.diagonal_motion, EngineConfig::DEFAULT_DIAGONAL_MOTION);
        assert_eq!(config.initiative, tactics_core::InitiativeConfig::default());
    }

    #[test]
    fn reads_initiative_table() {
        let config = ConfigLoader::parse(
            "diagonal_motion = false\n\n[initiative]\nthreshold = 250\nqueue_capacity = 6\n",
        )
        .unwrap();
        assert!(!config.diagonal_motion);
        assert_eq!(config.initiative.threshold, 250);
        assert_eq!(config.initiative.queue_capacity, 6);
        assert_eq!(config.initiative.scale_factor, 1);
    }

    #[test]
    fn rejects_zero_threshold() {
        let error = ConfigLoader::parse("[initiative]\nthreshold = 0\n").unwrap_err();
        assert!(error.to_string().contains("threshold"));
    }
}
