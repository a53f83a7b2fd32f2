//! Outputs of a tick consumed by presentation, physics and UI layers.

use glam::Vec3;

use crate::error::RejectionKind;
use crate::state::{Attachment, EntityId, Form, ProjectileId};

/// What a resolved projectile hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HitKind {
    Player,
    Environment,
}

/// Side effect requested by the rules for an external collaborator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    /// Show the pointing hand at the given attachment.
    HandShown {
        player: EntityId,
        attachment: Attachment,
    },
    HandHidden {
        player: EntityId,
    },
    /// Parent the wand to the player's rig; physics on the wand is suspended.
    WandAttached {
        player: EntityId,
        wand: EntityId,
        attachment: Attachment,
    },
    /// Detach the wand, place it and re-enable physics with an impulse.
    WandDropped {
        player: EntityId,
        wand: EntityId,
        position: Vec3,
        impulse: Vec3,
    },
    TargetExit {
        player: EntityId,
        target: EntityId,
    },
    TargetEnter {
        player: EntityId,
        target: EntityId,
    },
    /// Reticle highlight; last writer wins.
    Highlight {
        player: EntityId,
        on: bool,
    },
    WandHover {
        player: EntityId,
        wand: EntityId,
        hovered: bool,
    },
    /// Hand-off to the trial flow.
    Accusation {
        accuser: EntityId,
        accused: EntityId,
    },
    ProjectileSpawned {
        projectile: ProjectileId,
        caster: EntityId,
        origin: Vec3,
        direction: Vec3,
        impulse: Vec3,
    },
    ProjectileDespawned {
        projectile: ProjectileId,
    },
    AmmoChanged {
        wand: EntityId,
        remaining: u32,
        capacity: u32,
    },
    ReloadStarted {
        wand: EntityId,
    },
    FormChanged {
        player: EntityId,
        form: Form,
        move_speed: f32,
    },
    /// Transient particles and sound at a contact point.
    HitFeedback {
        kind: HitKind,
        point: Vec3,
        lifetime_ms: u64,
    },
}

/// Ordered effect buffer filled during a tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effects(Vec<Effect>);

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) {
        self.0.push(effect);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Effect> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Effect> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Effects {
    type Item = &'a Effect;
    type IntoIter = std::slice::Iter<'a, Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Record of a declined request.
///
/// Rejections never change state; they exist for diagnostics and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rejection {
    pub actor: EntityId,
    pub action: &'static str,
    pub kind: RejectionKind,
    pub code: &'static str,
    pub message: String,
}
