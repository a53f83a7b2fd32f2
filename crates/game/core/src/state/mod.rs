//! Authoritative interaction state.
//!
//! This module owns the data structures describing players, wands, in-flight
//! projectiles and pending timers. Runtime layers clone or query this state
//! but mutate it exclusively through the engine.
mod error;
pub mod scheduler;
pub mod types;

use std::collections::BTreeMap;

use crate::config::GameConfig;

pub use error::StateError;
pub use scheduler::{Scheduler, Timer};
pub use types::{
    Attachment, EntityId, Form, PlayerState, Pose, ProjectileId, ProjectileState, Ray,
    StatusEffect, Timestamp, ToolState, WandState,
};

/// Canonical snapshot of the interaction state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Tunables fixed for the whole session.
    pub config: GameConfig,

    /// Simulation clock, advanced only by the engine tick.
    now: Timestamp,

    /// Sequential projectile id allocator (monotonically increasing, never reused).
    next_projectile_id: u32,

    pub(crate) players: BTreeMap<EntityId, PlayerState>,
    pub(crate) wands: BTreeMap<EntityId, WandState>,
    pub(crate) projectiles: BTreeMap<ProjectileId, ProjectileState>,
    pub(crate) scheduler: Scheduler,
}

impl GameState {
    /// Creates an empty session at time zero.
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            now: Timestamp::ZERO,
            next_projectile_id: 1,
            players: BTreeMap::new(),
            wands: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            scheduler: Scheduler::new(),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub(crate) fn set_now(&mut self, now: Timestamp) {
        debug_assert!(now >= self.now, "simulation clock must not run backwards");
        self.now = now;
    }

    pub fn player(&self, id: EntityId) -> Option<&PlayerState> {
        self.players.get(&id)
    }

    pub(crate) fn player_mut(&mut self, id: EntityId) -> Option<&mut PlayerState> {
        self.players.get_mut(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.values()
    }

    pub fn wand(&self, id: EntityId) -> Option<&WandState> {
        self.wands.get(&id)
    }

    pub(crate) fn wand_mut(&mut self, id: EntityId) -> Option<&mut WandState> {
        self.wands.get_mut(&id)
    }

    pub fn wands(&self) -> impl Iterator<Item = &WandState> {
        self.wands.values()
    }

    pub fn projectile(&self, id: ProjectileId) -> Option<&ProjectileState> {
        self.projectiles.get(&id)
    }

    pub fn projectiles(&self) -> impl Iterator<Item = &ProjectileState> {
        self.projectiles.values()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Wand held by `player`, following the owned relation.
    pub fn equipped_wand_of(&self, player: EntityId) -> Option<&WandState> {
        self.player(player)
            .and_then(|p| p.equipped_wand)
            .and_then(|wand| self.wand(wand))
    }

    /// Prompt for the wand currently under `player`'s pickup probe.
    pub fn interaction_prompt(&self, player: EntityId) -> Option<String> {
        self.player(player)
            .and_then(|p| p.hovered_wand())
            .and_then(|wand| self.wand(wand))
            .and_then(WandState::interaction_prompt)
    }

    fn is_tracked(&self, id: EntityId) -> bool {
        self.players.contains_key(&id) || self.wands.contains_key(&id)
    }

    /// Registers a player whose attachments have already been resolved.
    pub fn insert_player(&mut self, player: PlayerState) -> Result<(), StateError> {
        if self.is_tracked(player.id) {
            return Err(StateError::DuplicateEntity(player.id));
        }
        self.players.insert(player.id, player);
        Ok(())
    }

    /// Places a fully charged wand using the configured capacity.
    pub fn place_wand(&mut self, id: EntityId, name: impl Into<String>) -> Result<(), StateError> {
        if self.is_tracked(id) {
            return Err(StateError::DuplicateEntity(id));
        }
        let wand = WandState::new(id, name, self.config.casting.wand_capacity);
        self.wands.insert(id, wand);
        Ok(())
    }

    pub(crate) fn remove_player(&mut self, id: EntityId) -> Result<PlayerState, StateError> {
        self.players
            .remove(&id)
            .ok_or(StateError::PlayerNotFound(id))
    }

    pub(crate) fn insert_projectile(&mut self, projectile: ProjectileState) {
        self.projectiles.insert(projectile.id, projectile);
    }

    pub(crate) fn projectile_mut(&mut self, id: ProjectileId) -> Option<&mut ProjectileState> {
        self.projectiles.get_mut(&id)
    }

    pub(crate) fn remove_projectile(&mut self, id: ProjectileId) -> Option<ProjectileState> {
        self.projectiles.remove(&id)
    }

    /// Peeks the id the next spawned projectile will receive.
    pub(crate) fn peek_projectile_id(&self) -> Result<ProjectileId, StateError> {
        if self.next_projectile_id == u32::MAX {
            return Err(StateError::ProjectileIdOverflow);
        }
        Ok(ProjectileId(self.next_projectile_id))
    }

    /// Allocates a new unique projectile id.
    pub(crate) fn allocate_projectile_id(&mut self) -> Result<ProjectileId, StateError> {
        let id = self.peek_projectile_id()?;
        self.next_projectile_id += 1;
        Ok(id)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_entities() {
        let mut state = GameState::default();
        state.place_wand(EntityId(10), "Wand").unwrap();

        let player = PlayerState::new(
            EntityId(10),
            Attachment::RootOffset(glam::Vec3::ZERO),
            Attachment::RootOffset(glam::Vec3::ZERO),
        );
        assert_eq!(
            state.insert_player(player),
            Err(StateError::DuplicateEntity(EntityId(10)))
        );
    }

    #[test]
    fn placed_wand_is_charged() {
        let mut state = GameState::default();
        state.place_wand(EntityId(4), "Birch Wand").unwrap();

        let wand = state.wand(EntityId(4)).unwrap();
        assert_eq!(wand.ammo_remaining(), state.config.casting.wand_capacity);
        assert_eq!(wand.ammo_display(), "3 / 3");
        assert_eq!(wand.interaction_prompt().as_deref(), Some("Pick up Birch Wand"));
    }

    #[test]
    fn projectile_ids_are_sequential() {
        let mut state = GameState::default();
        assert_eq!(state.allocate_projectile_id(), Ok(ProjectileId(1)));
        assert_eq!(state.allocate_projectile_id(), Ok(ProjectileId(2)));
    }
}
