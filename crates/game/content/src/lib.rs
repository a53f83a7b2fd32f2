//! Data-driven session content and loaders.
//!
//! This crate reads TOML data files:
//! - Interaction tunables (`config.toml` → [`hunt_core::GameConfig`])
//! - Level wand placements (`level.toml`)
//!
//! Content is consumed when a session starts and never changes afterwards.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LevelLoader, LevelSpec, LoadResult, WandSpawn};
