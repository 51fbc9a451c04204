//! Level layout loader.
//!
//! A level file holds the row-major height array of a grid (and optionally
//! its obstacle codes).

use std::path::Path;

use tactics_core::LevelLayout;

use crate::loaders::{LoadResult, read_file};

/// Loader for level layouts from RON files.
pub struct LevelLoader;

impl LevelLoader {
    /// Load a level layout from a RON file.
    ///
    /// The height array must hold exactly `rows * columns` entries; the
    /// obstacle array, when present, as well.
    pub fn load(path: &Path) -> LoadResult<LevelLayout> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<LevelLayout> {
        let layout: LevelLayout = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse level RON: {}", e))?;

        let expected = layout.rows as usize * layout.columns as usize;
        if layout.heights.len() != expected {
            anyhow::bail!(
                "level '{}' has {} heights, expected {} ({}x{})",
                layout.name,
                layout.heights.len(),
                expected,
                layout.rows,
                layout.columns
            );
        }
        Ok(layout)
    }
}
