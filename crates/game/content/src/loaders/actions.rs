//! Action template catalog loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::templates::ActionTemplate;

/// Loader for action templates from RON files.
pub struct ActionLoader;

impl ActionLoader {
    /// RON format: `Vec<ActionTemplate>`.
    ///
    /// Every template is built once so bad cooldowns fail at load time
    /// rather than when the action is granted.
    pub fn load(path: &Path) -> LoadResult<Vec<ActionTemplate>> {
        let content = read_file(path)?;
        let templates: Vec<ActionTemplate> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse action RON at {}: {}", path.display(), e))?;

        for template in &templates {
            template
                .build()
                .map_err(|e| anyhow::anyhow!("Invalid action '{}': {}", template.name, e))?;
        }
        tracing::debug!(count = templates.len(), path = %path.display(), "loaded action templates");
        Ok(templates)
    }
}
