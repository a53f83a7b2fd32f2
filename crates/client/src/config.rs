//! Console-specific configuration.
use std::env;
use std::path::PathBuf;

use glam::Vec3;
use hunt_core::EntityId;

/// Console session configuration.
///
/// Settings specific to the line console, separate from the runtime's own
/// [`hunt_runtime::RuntimeConfig`].
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Directory holding `config.toml` and `level.toml`.
    pub data_dir: PathBuf,
    /// Simulated milliseconds per input line.
    pub frame_ms: u64,
    /// Player driven by the console.
    pub player: EntityId,
    /// Idle rival standing in front of the player.
    pub rival: EntityId,
    pub rival_position: Vec3,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            frame_ms: 16,
            player: EntityId(1),
            rival: EntityId(2),
            rival_position: Vec3::new(0.0, 0.0, -6.0),
        }
    }
}

impl CliConfig {
    /// Construct console configuration from environment variables.
    ///
    /// Environment variables:
    /// - `HUNT_DATA_DIR` - Content directory (default: `data`)
    /// - `HUNT_FRAME_MS` - Milliseconds simulated per input line (default: 16)
    /// - `HUNT_PLAYER_ID` - Entity id of the console player (default: 1)
    /// - `HUNT_RIVAL_ID` - Entity id of the idle rival (default: 2)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("HUNT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(frame_ms) = read_env::<u64>("HUNT_FRAME_MS") {
            config.frame_ms = frame_ms.max(1);
        }
        if let Some(id) = read_env::<u32>("HUNT_PLAYER_ID") {
            config.player = EntityId(id);
        }
        if let Some(id) = read_env::<u32>("HUNT_RIVAL_ID") {
            config.rival = EntityId(id);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
