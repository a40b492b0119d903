//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            xp_rate = 2.0
            enabled_content = ["expansion_kunark"]

            [flee]
            engaged_base = 0.4
            "#,
        )
        .unwrap();

        assert_eq!(config.xp_rate, 2.0);
        assert_eq!(config.xp_base, CombatConfig::DEFAULT_XP_BASE);
        assert_eq!(config.flee.engaged_base, 0.4);
        assert_eq!(config.flee.max_chance, 0.95);
        assert!(config.is_content_enabled("expansion_kunark"));
    }

    #[test]
    fn empty_file_is_the_default_config() {
        assert_eq!(ConfigLoader::parse("").unwrap(), CombatConfig::default());
    }
}
