//! Level content loader.

use std::collections::BTreeSet;
use std::path::Path;

use glam::Vec3;
use hunt_core::{EntityId, WandState};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Wand placed when the level loads.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WandSpawn {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    /// World position the wand rests at, `[x, y, z]`.
    #[serde(default)]
    pub position: [f32; 3],
}

impl WandSpawn {
    pub fn entity(&self) -> EntityId {
        EntityId(self.id)
    }

    /// Display name, falling back to the stock wand name.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(WandState::DEFAULT_NAME)
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Static level layout relevant to the interaction rules.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelSpec {
    pub wands: Vec<WandSpawn>,
}

/// Loader for level layouts from TOML files.
pub struct LevelLoader;

impl LevelLoader {
    pub fn load(path: &Path) -> LoadResult<LevelSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse level text, rejecting duplicate wand ids.
    pub fn parse(content: &str) -> LoadResult<LevelSpec> {
        let level: LevelSpec = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse level TOML: {}", e))?;

        let mut seen = BTreeSet::new();
        if let Some(dup) = level.wands.iter().find(|wand| !seen.insert(wand.id)) {
            anyhow::bail!("Duplicate wand id {} in level", dup.id);
        }
        Ok(level)
    }
}
