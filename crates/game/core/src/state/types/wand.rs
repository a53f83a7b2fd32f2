use super::common::{EntityId, Timestamp};

/// Pickup-able wand placed in the level.
///
/// Wands are never destroyed during a session; they are dropped, picked up,
/// reloaded and recharged instead.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WandState {
    pub id: EntityId,
    pub name: String,
    /// Holder of the wand; mirrors [`super::PlayerState::equipped_wand`].
    pub(crate) equipped_by: Option<EntityId>,
    pub(crate) ammo_remaining: u32,
    pub(crate) capacity: u32,
    /// Set while the cast cooldown timer is pending.
    pub(crate) cooldown_until: Option<Timestamp>,
    pub(crate) reloading: bool,
}

impl WandState {
    pub const DEFAULT_NAME: &'static str = "Magic Wand";

    /// Creates a fully charged, unequipped wand.
    pub fn new(id: EntityId, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            equipped_by: None,
            ammo_remaining: capacity,
            capacity,
            cooldown_until: None,
            reloading: false,
        }
    }

    pub fn equipped_by(&self) -> Option<EntityId> {
        self.equipped_by
    }

    pub fn is_equipped(&self) -> bool {
        self.equipped_by.is_some()
    }

    pub fn ammo_remaining(&self) -> u32 {
        self.ammo_remaining
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn cooldown_until(&self) -> Option<Timestamp> {
        self.cooldown_until
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    /// Prompt shown while the wand is hovered, empty once it is held.
    pub fn interaction_prompt(&self) -> Option<String> {
        if self.is_equipped() {
            None
        } else {
            Some(format!("Pick up {}", self.name))
        }
    }

    /// Ammo readout in the `left / capacity` form shown by the HUD.
    pub fn ammo_display(&self) -> String {
        format!("{} / {}", self.ammo_remaining, self.capacity)
    }
}
