//! Game configuration loader.

use std::path::Path;

use hunt_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing sections and keys fall back to their defaults. The result is
    /// validated before it is returned.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid game config: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(ConfigLoader::parse("").unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ConfigLoader::parse(
            r#"
            [casting]
            wand_capacity = 5

            [status]
            frog_duration_ms = 8000
            "#,
        )
        .unwrap();

        assert_eq!(config.casting.wand_capacity, 5);
        assert_eq!(
            config.casting.reload_time_ms,
            hunt_core::CastingConfig::DEFAULT_RELOAD_TIME_MS
        );
        assert_eq!(config.status.frog_duration_ms, 8_000);
        assert_eq!(config.targeting, hunt_core::TargetingConfig::default());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string(&GameConfig::default()).unwrap();
        assert_eq!(ConfigLoader::parse(&text).unwrap(), GameConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = ConfigLoader::parse("[casting]\nwand_capacity = 0\n").unwrap_err();
        assert!(err.to_string().contains("wand_capacity"));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[targeting]\npointing_range = 12.5").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.targeting.pointing_range, 12.5);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/config.toml"));
    }
}
