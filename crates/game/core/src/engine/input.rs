use glam::Vec3;

use super::effect::{Effect, Rejection};
use crate::state::{EntityId, Pose, ProjectileId, Ray, Timestamp};

bitflags::bitflags! {
    /// Key-down edges observed since the previous tick.
    ///
    /// Only edges are reported; held keys are never polled.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct InputEdges: u8 {
        /// Show or hide the pointing hand.
        const TOGGLE_HAND = 1 << 0;
        /// Accuse the current target.
        const POINT = 1 << 1;
        /// Drop any held wand and bring the hand out.
        const FORCE_POINT = 1 << 2;
        /// Pick up the hovered wand.
        const INTERACT = 1 << 3;
        const DROP = 1 << 4;
        const CAST = 1 << 5;
        const RELOAD = 1 << 6;
    }
}

/// Input sampled for one player this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerInput {
    pub player: EntityId,
    pub edges: InputEdges,
    /// Camera ray used for pointing, casting and the pickup probe.
    pub aim: Ray,
    pub pose: Pose,
}

impl PlayerInput {
    pub fn idle(player: EntityId, aim: Ray, pose: Pose) -> Self {
        Self {
            player,
            edges: InputEdges::empty(),
            aim,
            pose,
        }
    }

    pub fn with_edges(mut self, edges: InputEdges) -> Self {
        self.edges |= edges;
        self
    }
}

/// Contact between a projectile and another collider.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionEvent {
    pub projectile: ProjectileId,
    pub other: EntityId,
    pub point: Vec3,
}

/// Everything the host feeds into one tick.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickInput {
    pub dt_ms: u64,
    pub players: Vec<PlayerInput>,
    pub collisions: Vec<CollisionEvent>,
}

impl TickInput {
    pub fn advance(dt_ms: u64) -> Self {
        Self {
            dt_ms,
            ..Self::default()
        }
    }
}

/// Everything one tick produced.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TickOutcome {
    /// Clock after the tick.
    pub now: Timestamp,
    pub effects: Vec<Effect>,
    pub rejections: Vec<Rejection>,
}
