use glam::Vec3;

use super::common::{EntityId, ProjectileId, Timestamp};

/// Short-lived spell projectile.
///
/// `has_resolved` flips from false to true exactly once; every collision
/// reported afterwards is ignored.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileState {
    pub id: ProjectileId,
    pub caster: EntityId,
    pub wand: EntityId,
    pub origin: Vec3,
    pub direction: Vec3,
    pub spawn_time: Timestamp,
    pub ttl_ms: u64,
    pub(crate) has_resolved: bool,
}

impl ProjectileState {
    pub fn has_resolved(&self) -> bool {
        self.has_resolved
    }

    pub fn expires_at(&self) -> Timestamp {
        self.spawn_time + self.ttl_ms
    }

    /// Marks the projectile resolved; returns false if it already was.
    pub(crate) fn resolve(&mut self) -> bool {
        !std::mem::replace(&mut self.has_resolved, true)
    }
}
