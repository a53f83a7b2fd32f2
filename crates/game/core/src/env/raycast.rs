use glam::Vec3;

use crate::state::{EntityId, Ray};

bitflags::bitflags! {
    /// Collision categories used both to tag scene entities and to filter
    /// raycasts.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Category: u8 {
        /// Player root or any part of a player rig.
        const PLAYER = 1 << 0;
        /// Human-tagged body part.
        const HUMAN = 1 << 1;
        /// Something the pickup probe may highlight.
        const INTERACTABLE = 1 << 2;
        /// Static level geometry.
        const ENVIRONMENT = 1 << 3;
        /// In-flight spell projectile.
        const PROJECTILE = 1 << 4;

        /// Categories eligible as pointing targets.
        const TARGETABLE = Self::PLAYER.bits() | Self::HUMAN.bits();
    }
}

/// First hit along a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub entity: EntityId,
    pub point: Vec3,
    pub distance: f32,
}

/// Line-of-sight query provided by the physics layer.
pub trait RayCaster: Send + Sync {
    /// Returns the closest hit within `max_distance` among entities whose
    /// categories intersect `filter`.
    fn cast(&self, ray: &Ray, max_distance: f32, filter: Category) -> Option<RayHit>;
}
