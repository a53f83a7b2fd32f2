//! Tunable interaction parameters.
//!
//! Values are supplied externally (see `hunt-content`'s `ConfigLoader`); the
//! defaults mirror the shipped prefab settings. Durations are milliseconds of
//! simulation time, distances are world units.
use glam::Vec3;

/// Game configuration grouped by the component that consumes it.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub targeting: TargetingConfig,
    pub casting: CastingConfig,
    pub projectile: ProjectileConfig,
    pub status: StatusConfig,
    pub tools: ToolConfig,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects values that would make the rules degenerate (zero ranges,
    /// empty wands).
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("targeting.pointing_range", self.targeting.pointing_range)?;
        positive("targeting.interaction_range", self.targeting.interaction_range)?;
        positive("casting.max_cast_range", self.casting.max_cast_range)?;
        if self.casting.wand_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.projectile.ttl_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "projectile.ttl_ms",
            });
        }
        if self.status.frog_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "status.frog_duration_ms",
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveDistance { field, value })
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a positive distance (got {value})")]
    NonPositiveDistance { field: &'static str, value: f32 },

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("casting.wand_capacity must be at least 1")]
    ZeroCapacity,
}

/// Ray lengths for pointing and the pickup probe.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TargetingConfig {
    pub pointing_range: f32,
    pub interaction_range: f32,
}

impl TargetingConfig {
    pub const DEFAULT_POINTING_RANGE: f32 = 10.0;
    pub const DEFAULT_INTERACTION_RANGE: f32 = 5.0;
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            pointing_range: Self::DEFAULT_POINTING_RANGE,
            interaction_range: Self::DEFAULT_INTERACTION_RANGE,
        }
    }
}

/// Wand ammunition, cadence and launch parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CastingConfig {
    /// Impact probe length; a miss aims at the ray endpoint at this distance.
    pub max_cast_range: f32,
    pub wand_capacity: u32,
    pub time_between_shots_ms: u64,
    pub reload_time_ms: u64,
    /// Impulse applied along the launch direction.
    pub launch_impulse: f32,
    /// Extra impulse applied along world up.
    pub upward_impulse: f32,
}

impl CastingConfig {
    pub const DEFAULT_MAX_CAST_RANGE: f32 = 75.0;
    pub const DEFAULT_WAND_CAPACITY: u32 = 3;
    pub const DEFAULT_TIME_BETWEEN_SHOTS_MS: u64 = 250;
    pub const DEFAULT_RELOAD_TIME_MS: u64 = 1_000;
    pub const DEFAULT_LAUNCH_IMPULSE: f32 = 30.0;
}

impl Default for CastingConfig {
    fn default() -> Self {
        Self {
            max_cast_range: Self::DEFAULT_MAX_CAST_RANGE,
            wand_capacity: Self::DEFAULT_WAND_CAPACITY,
            time_between_shots_ms: Self::DEFAULT_TIME_BETWEEN_SHOTS_MS,
            reload_time_ms: Self::DEFAULT_RELOAD_TIME_MS,
            launch_impulse: Self::DEFAULT_LAUNCH_IMPULSE,
            upward_impulse: 0.0,
        }
    }
}

/// Projectile lifetime and hit feedback timing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectileConfig {
    pub ttl_ms: u64,
    /// Delay between resolution and teardown so hit feedback spawns first.
    pub despawn_grace_ms: u64,
    pub hit_effect_lifetime_ms: u64,
}

impl ProjectileConfig {
    pub const DEFAULT_TTL_MS: u64 = 5_000;
    pub const DEFAULT_DESPAWN_GRACE_MS: u64 = 100;
    pub const DEFAULT_HIT_EFFECT_LIFETIME_MS: u64 = 3_000;
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            ttl_ms: Self::DEFAULT_TTL_MS,
            despawn_grace_ms: Self::DEFAULT_DESPAWN_GRACE_MS,
            hit_effect_lifetime_ms: Self::DEFAULT_HIT_EFFECT_LIFETIME_MS,
        }
    }
}

/// Frog transformation parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatusConfig {
    pub frog_duration_ms: u64,
    pub normal_move_speed: f32,
    pub frog_move_speed: f32,
}

impl StatusConfig {
    pub const DEFAULT_FROG_DURATION_MS: u64 = 15_000;
    pub const DEFAULT_NORMAL_MOVE_SPEED: f32 = 5.0;
    pub const DEFAULT_FROG_MOVE_SPEED: f32 = 2.0;
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            frog_duration_ms: Self::DEFAULT_FROG_DURATION_MS,
            normal_move_speed: Self::DEFAULT_NORMAL_MOVE_SPEED,
            frog_move_speed: Self::DEFAULT_FROG_MOVE_SPEED,
        }
    }
}

/// Hand and wand handling parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ToolConfig {
    /// Delay between a forced wand drop and the hand coming out.
    pub hand_settle_delay_ms: u64,
    pub drop_forward_offset: f32,
    pub drop_up_offset: f32,
    pub drop_impulse_forward: f32,
    pub drop_impulse_up: f32,
    /// Local offset from the player root when the rig has no hand anchor.
    pub fallback_anchor_offset: Vec3,
}

impl ToolConfig {
    pub const DEFAULT_HAND_SETTLE_DELAY_MS: u64 = 100;
    pub const DEFAULT_FALLBACK_ANCHOR_OFFSET: Vec3 = Vec3::new(0.5, 0.5, 1.0);
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            hand_settle_delay_ms: Self::DEFAULT_HAND_SETTLE_DELAY_MS,
            drop_forward_offset: 2.0,
            drop_up_offset: 1.0,
            drop_impulse_forward: 3.0,
            drop_impulse_up: 2.0,
            fallback_anchor_offset: Self::DEFAULT_FALLBACK_ANCHOR_OFFSET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_capacity() {
        let mut config = GameConfig::default();
        config.casting.wand_capacity = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn rejects_nan_range() {
        let mut config = GameConfig::default();
        config.targeting.pointing_range = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveDistance {
                field: "targeting.pointing_range",
                ..
            })
        ));
    }
}
