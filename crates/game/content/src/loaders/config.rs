//! Engine configuration loader.

use std::path::Path;

use rpg_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        if config.max_settle_passes == 0 {
            anyhow::bail!("max_settle_passes must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("additive_threshold = 2.0").expect("config parses");
        assert_eq!(config.additive_threshold, 2.0);
        assert_eq!(
            config.max_settle_passes,
            EngineConfig::DEFAULT_MAX_SETTLE_PASSES
        );
    }

    #[test]
    fn zero_settle_passes_is_rejected() {
        assert!(ConfigLoader::parse("max_settle_passes = 0").is_err());
    }
}
