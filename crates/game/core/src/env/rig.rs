use glam::Vec3;

use crate::state::EntityId;

/// Named attachment point on a player rig.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AnchorKind {
    /// Where the pointing hand is parented.
    Hand,
    /// Where a picked-up wand is held.
    WandGrip,
}

impl AnchorKind {
    /// Child names looked up on the rig, in priority order.
    pub const fn candidate_names(self) -> &'static [&'static str] {
        match self {
            AnchorKind::Hand => &["RightHandPosition", "HandPosition", "RightHand", "Hand"],
            AnchorKind::WandGrip => &["HandPosition", "PlayerHand", "Hand", "RightHand"],
        }
    }
}

/// Attachment lookup on player rigs and wand models.
pub trait RigOracle: Send + Sync {
    /// Direct child of `player` with the given name.
    fn find_child(&self, player: EntityId, name: &str) -> Option<EntityId>;

    /// World position projectiles leave the wand from.
    fn attack_point(&self, _wand: EntityId) -> Option<Vec3> {
        None
    }

    /// First candidate anchor present on the rig.
    fn anchor(&self, player: EntityId, kind: AnchorKind) -> Option<EntityId> {
        kind.candidate_names()
            .iter()
            .find_map(|name| self.find_child(player, name))
    }
}
