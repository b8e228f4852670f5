//! Content factory for loading everything from a data directory.

use std::path::{Path, PathBuf};

use rpg_core::{EngineConfig, World};

use crate::loaders::{ActionLoader, ConfigLoader, EntityLoader, LoadResult};
use crate::templates::{ActionTemplate, EntityTemplate};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml      (optional)
/// ├── entities.ron
/// └── actions.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`, or defaults when the
    /// file is absent.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(EngineConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load entity templates from `entities.ron`.
    pub fn load_entities(&self) -> LoadResult<Vec<EntityTemplate>> {
        EntityLoader::load(&self.data_dir.join("entities.ron"))
    }

    /// Load action templates from `actions.ron`.
    pub fn load_actions(&self) -> LoadResult<Vec<ActionTemplate>> {
        ActionLoader::load(&self.data_dir.join("actions.ron"))
    }

    /// Creates an empty world configured from `config.toml`.
    pub fn new_world(&self) -> LoadResult<World> {
        Ok(World::with_config(self.load_config()?))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
