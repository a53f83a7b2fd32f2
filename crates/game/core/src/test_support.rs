//! Scripted collaborators shared by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use glam::Vec3;

use crate::env::{Category, GameEnv, RayCaster, RayHit, RigOracle, SceneOracle};
use crate::state::{EntityId, Ray};

/// Scene whose raycasts return whatever the test aimed at last.
#[derive(Default)]
pub struct StubWorld {
    aimed: Mutex<Option<RayHit>>,
    parents: HashMap<EntityId, EntityId>,
    categories: HashMap<EntityId, Category>,
    owners: HashMap<EntityId, EntityId>,
    children: HashMap<(EntityId, &'static str), EntityId>,
    attack_points: HashMap<EntityId, Vec3>,
}

impl StubWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(mut self, id: EntityId) -> Self {
        self.categories.insert(id, Category::PLAYER);
        self
    }

    pub fn part(mut self, id: EntityId, parent: EntityId, categories: Category) -> Self {
        self.parents.insert(id, parent);
        self.categories.insert(id, categories);
        self
    }

    pub fn wand(mut self, id: EntityId) -> Self {
        self.categories.insert(id, Category::INTERACTABLE);
        self
    }

    pub fn prop(mut self, id: EntityId) -> Self {
        self.categories.insert(id, Category::ENVIRONMENT);
        self
    }

    pub fn tagged(mut self, id: EntityId, owner: EntityId) -> Self {
        self.categories.insert(id, Category::HUMAN);
        self.owners.insert(id, owner);
        self
    }

    pub fn anchor(mut self, player: EntityId, name: &'static str, anchor: EntityId) -> Self {
        self.children.insert((player, name), anchor);
        self
    }

    pub fn attack_point(mut self, wand: EntityId, point: Vec3) -> Self {
        self.attack_points.insert(wand, point);
        self
    }

    /// Makes the next raycasts hit `entity` at `distance` along the ray.
    pub fn aim_at(&self, entity: EntityId, distance: f32) {
        *self.aimed.lock().unwrap() = Some(RayHit {
            entity,
            point: Vec3::new(0.0, 0.0, -distance),
            distance,
        });
    }

    pub fn aim_at_nothing(&self) {
        *self.aimed.lock().unwrap() = None;
    }

    pub fn env(&self) -> GameEnv<'_> {
        GameEnv::from_parts(self, self, Some(self))
    }
}

impl RayCaster for StubWorld {
    fn cast(&self, _ray: &Ray, max_distance: f32, filter: Category) -> Option<RayHit> {
        let hit = (*self.aimed.lock().unwrap())?;
        let matches = self.categories(hit.entity).intersects(filter);
        (matches && hit.distance <= max_distance).then_some(hit)
    }
}

impl SceneOracle for StubWorld {
    fn parent(&self, entity: EntityId) -> Option<EntityId> {
        self.parents.get(&entity).copied()
    }

    fn categories(&self, entity: EntityId) -> Category {
        self.categories.get(&entity).copied().unwrap_or_default()
    }

    fn tagged_owner(&self, entity: EntityId) -> Option<EntityId> {
        self.owners.get(&entity).copied()
    }
}

impl RigOracle for StubWorld {
    fn find_child(&self, player: EntityId, name: &str) -> Option<EntityId> {
        self.children
            .iter()
            .find(|((owner, child), _)| *owner == player && *child == name)
            .map(|(_, anchor)| *anchor)
    }

    fn attack_point(&self, wand: EntityId) -> Option<Vec3> {
        self.attack_points.get(&wand).copied()
    }
}

/// Forward-facing aim ray from the origin.
pub fn forward_aim() -> Ray {
    Ray::new(Vec3::ZERO, Vec3::NEG_Z)
}

/// Registers a player with fallback attachments.
pub fn add_player(state: &mut crate::state::GameState, id: EntityId) {
    let offset = state.config.tools.fallback_anchor_offset;
    let player = crate::state::PlayerState::new(
        id,
        crate::state::Attachment::RootOffset(offset),
        crate::state::Attachment::RootOffset(offset),
    );
    state.insert_player(player).unwrap();
}
