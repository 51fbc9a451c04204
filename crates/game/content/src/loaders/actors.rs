//! Actor catalog loader.

use std::path::Path;

use tactics_core::ActorTemplate;

use crate::loaders::{LoadResult, read_file};

/// Loader for the actor catalog from RON files.
pub struct ActorLoader;

impl ActorLoader {
    /// Load the actor catalog from a RON file.
    ///
    /// RON format: `Vec<(String, ActorTemplate)>`, keyed by actor id.
    pub fn load(path: &Path) -> LoadResult<Vec<(String, ActorTemplate)>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<(String, ActorTemplate)>> {
        let actors: Vec<(String, ActorTemplate)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse actor catalog RON: {}", e))?;

        for (i, (id, template)) in actors.iter().enumerate() {
            if actors[..i].iter().any(|(other, _)| other == id) {
                anyhow::bail!("duplicate actor id '{}'", id);
            }
            if template.actions == 0 {
                anyhow::bail!("actor '{}' must have at least one action point", id);
            }
        }
        Ok(actors)
    }

    /// Finds the template with the given id.
    pub fn find<'a>(
        catalog: &'a [(String, ActorTemplate)],
        id: &str,
    ) -> LoadResult<&'a ActorTemplate> {
        catalog
            .iter()
            .find(|(actor_id, _)| actor_id == id)
            .map(|(_, template)| template)
            .ok_or_else(|| anyhow::anyhow!("Actor '{}' not found in catalog", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        ("knight", (name: "Knight", speed: 8, jump: 1, actions: 4)),
        ("goblin", (name: "Goblin", speed: 11, jump: 2, actions: 3)),
    ]"#;

    #[test]
    fn parses_catalog_and_finds_by_id() {
        let catalog = ActorLoader::parse(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);

        let goblin = ActorLoader::find(&catalog, "goblin").unwrap();
        assert_eq!(goblin.jump, 2);
        assert!(ActorLoader::find(&catalog, "dragon").is_err());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let error = ActorLoader::parse(
            r#"[("a", (name: "A", speed: 1, jump: 1, actions: 1)), ("a", (name: "B", speed: 1, jump: 1, actions: 1))]"#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("duplicate"));
    }
}
