//! Obstacle layout loader.
//!
//! Obstacle layouts are authored separately from levels so the same terrain
//! can host several missions. Codes: 0 nothing, 1 blocked, 2 no action,
//! 3 enemy spawn, 4 player spawn.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::LevelLayout;

use crate::loaders::{LoadResult, read_file};

/// Row-major obstacle codes for a level of the same dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleLayout {
    pub rows: u32,
    pub columns: u32,
    pub codes: Vec<u8>,
}

impl ObstacleLayout {
    /// Copies the codes onto `layout`, replacing any it already had.
    pub fn apply_to(&self, mut layout: LevelLayout) -> LoadResult<LevelLayout> {
        if (self.rows, self.columns) != (layout.rows, layout.columns) {
            anyhow::bail!(
                "obstacle layout is {}x{} but level '{}' is {}x{}",
                self.rows,
                self.columns,
                layout.name,
                layout.rows,
                layout.columns
            );
        }
        layout.obstacles = self.codes.clone();
        Ok(layout)
    }
}

/// Loader for obstacle layouts from RON files.
pub struct ObstacleLoader;

impl ObstacleLoader {
    pub fn load(path: &Path) -> LoadResult<ObstacleLayout> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ObstacleLayout> {
        let layout: ObstacleLayout = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse obstacle RON: {}", e))?;

        let expected = layout.rows as usize * layout.columns as usize;
        if layout.codes.len() != expected {
            anyhow::bail!(
                "obstacle layout has {} codes, expected {}",
                layout.codes.len(),
                expected
            );
        }
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_to_matching_level() {
        let obstacles =
            ObstacleLoader::parse("(rows: 1, columns: 3, codes: [4, 1, 3])").unwrap();
        let layout = obstacles
            .apply_to(LevelLayout::new("strip", 1, 3, vec![1, 1, 1]))
            .unwrap();
        assert_eq!(layout.obstacles, vec![4, 1, 3]);
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let obstacles = ObstacleLoader::parse("(rows: 1, columns: 2, codes: [0, 0])").unwrap();
        let error = obstacles
            .apply_to(LevelLayout::new("strip", 1, 3, vec![1, 1, 1]))
            .unwrap_err();
        assert!(error.to_string().contains("1x2"));
    }
}
