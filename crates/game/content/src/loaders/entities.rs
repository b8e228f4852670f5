//! Entity template catalog loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::templates::EntityTemplate;

/// Loader for entity templates from RON files.
pub struct EntityLoader;

impl EntityLoader {
    /// RON format: `Vec<EntityTemplate>`. Keys must be unique.
    pub fn load(path: &Path) -> LoadResult<Vec<EntityTemplate>> {
        let content = read_file(path)?;
        let templates: Vec<EntityTemplate> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse entity RON at {}: {}", path.display(), e))?;

        let mut seen = std::collections::HashSet::new();
        for template in &templates {
            if !seen.insert(template.key.as_str()) {
                anyhow::bail!("Duplicate entity template '{}'", template.key);
            }
        }
        tracing::debug!(count = templates.len(), path = %path.display(), "loaded entity templates");
        Ok(templates)
    }
}
