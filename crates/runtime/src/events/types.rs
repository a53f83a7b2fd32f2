//! Payloads carried by [`super::Event`].

use glam::Vec3;
use hunt_core::{EntityId, Effect, Rejection, Timestamp};
use serde::Serialize;

/// A side effect produced by one tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectEvent {
    /// Simulation time at the end of the producing tick.
    pub at: Timestamp,
    pub effect: Effect,
}

/// An operation the rules declined during a tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RejectionEvent {
    pub at: Timestamp,
    pub rejection: Rejection,
}

/// Session bookkeeping outside the per-tick effect stream.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum SessionEvent {
    PlayerSpawned { player: EntityId, position: Vec3 },
    PlayerDespawned { player: EntityId },
    WandPlaced { wand: EntityId, position: Vec3 },
    TickCompleted {
        now: Timestamp,
        effects: usize,
        rejections: usize,
    },
}
