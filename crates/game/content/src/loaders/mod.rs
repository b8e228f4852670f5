//! Content loaders for reading game data from files.
//!
//! RON files hold templates, TOML holds engine configuration.

pub mod actions;
pub mod config;
pub mod entities;
pub mod factory;

pub use actions::ActionLoader;
pub use config::ConfigLoader;
pub use entities::EntityLoader;
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
