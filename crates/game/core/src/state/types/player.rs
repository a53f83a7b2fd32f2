use glam::Vec3;

use super::common::EntityId;
use super::status::StatusEffect;
use crate::targeting::TargetTracker;

/// Tool the player currently has out.
///
/// `HandOut` and `WandEquipped` are never adjacent: every switch between them
/// passes through `None`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ToolState {
    #[default]
    None,
    HandOut,
    WandEquipped,
}

impl ToolState {
    /// True while a tool is out and target acquisition runs.
    pub const fn is_out(self) -> bool {
        !matches!(self, ToolState::None)
    }
}

/// Where a tool is attached on the player's rig.
///
/// Resolved once at spawn; `RootOffset` is the fallback when the rig exposes
/// no suitable anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attachment {
    Anchor(EntityId),
    RootOffset(Vec3),
}

impl Attachment {
    pub const fn is_fallback(self) -> bool {
        matches!(self, Attachment::RootOffset(_))
    }
}

/// Interaction state of one player.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub id: EntityId,
    pub(crate) tool: ToolState,
    pub(crate) status: StatusEffect,
    /// Wand held by this player; updated only at equip and drop time.
    pub(crate) equipped_wand: Option<EntityId>,
    /// Cleared while transformed.
    pub(crate) can_cast: bool,
    /// Player currently aimed at with the tool out.
    pub(crate) pointing: TargetTracker,
    /// Wand currently under the pickup probe.
    pub(crate) hover: TargetTracker,
    pub hand_attachment: Attachment,
    pub wand_attachment: Attachment,
}

impl PlayerState {
    pub fn new(id: EntityId, hand_attachment: Attachment, wand_attachment: Attachment) -> Self {
        Self {
            id,
            tool: ToolState::None,
            status: StatusEffect::Human,
            equipped_wand: None,
            can_cast: true,
            pointing: TargetTracker::default(),
            hover: TargetTracker::default(),
            hand_attachment,
            wand_attachment,
        }
    }

    pub fn tool(&self) -> ToolState {
        self.tool
    }

    pub fn status(&self) -> StatusEffect {
        self.status
    }

    pub fn equipped_wand(&self) -> Option<EntityId> {
        self.equipped_wand
    }

    pub fn is_hand_out(&self) -> bool {
        self.tool == ToolState::HandOut
    }

    pub fn can_cast(&self) -> bool {
        self.can_cast
    }

    pub fn current_target(&self) -> Option<EntityId> {
        self.pointing.current()
    }

    pub fn hovered_wand(&self) -> Option<EntityId> {
        self.hover.current()
    }

    /// Pointing is possible with the hand out, a target acquired and no wand held.
    pub fn can_point(&self) -> bool {
        self.is_hand_out() && self.current_target().is_some() && self.equipped_wand.is_none()
    }
}
