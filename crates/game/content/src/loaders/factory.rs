//! Content factory for loading a session's data directory.

use std::path::{Path, PathBuf};

use hunt_core::GameConfig;

use crate::loaders::{ConfigLoader, LevelLoader, LevelSpec, LoadResult};

/// Content factory that loads all session content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── level.toml
/// ```
///
/// Both files are optional; missing ones yield defaults.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load wand placements from `level.toml`.
    pub fn load_level(&self) -> LoadResult<LevelSpec> {
        let path = self.data_dir.join("level.toml");
        if !path.exists() {
            return Ok(LevelSpec::default());
        }
        LevelLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
