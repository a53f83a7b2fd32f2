//! Stand-in physics scene served through the `hunt-core` collaborator traits.
//!
//! [`SimWorld`] keeps sphere colliders, the parent hierarchy and named rig
//! children. It answers raycasts for targeting and casting, and [`Flights`]
//! sweeps in-flight projectiles through it to produce collision reports. A
//! real engine integration replaces both; the rules never see the difference.
mod flight;

use std::collections::{BTreeMap, HashMap};

use glam::Vec3;
use hunt_core::{
    AnchorKind, Category, EntityId, GameEnv, Ray, RayCaster, RayHit, RigOracle, SceneOracle,
};

pub use flight::{Flight, Flights};

/// First id handed out for rig parts created by [`SimWorld::spawn_body`].
pub const PART_ID_BASE: u32 = 1_000_000;

/// Height of a standing player's root collider center above its feet.
const BODY_CENTER_HEIGHT: f32 = 0.9;
const BODY_RADIUS: f32 = 0.45;
const HEAD_HEIGHT: f32 = 1.65;
const HEAD_RADIUS: f32 = 0.2;
const HAND_OFFSET: Vec3 = Vec3::new(0.35, 1.3, -0.4);
const WAND_RADIUS: f32 = 0.15;
const WAND_CHILD: &str = "Wand";

/// Sphere collider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub center: Vec3,
    pub radius: f32,
    pub categories: Category,
}

impl Body {
    pub fn new(center: Vec3, radius: f32, categories: Category) -> Self {
        Self {
            center,
            radius,
            categories,
        }
    }

    /// Position-only marker that no ray can hit.
    pub fn marker(center: Vec3) -> Self {
        Self::new(center, 0.0, Category::empty())
    }

    /// Distance along `ray` to the sphere surface, if the ray reaches it.
    ///
    /// A ray starting inside the sphere hits the far side.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        if self.radius <= 0.0 || ray.direction == Vec3::ZERO {
            return None;
        }
        let offset = ray.origin - self.center;
        let b = offset.dot(ray.direction);
        let c = offset.length_squared() - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        [-b - root, -b + root].into_iter().find(|t| *t >= 0.0)
    }
}

/// Scene graph plus colliders for one session.
#[derive(Debug, Default)]
pub struct SimWorld {
    bodies: BTreeMap<EntityId, Body>,
    parents: HashMap<EntityId, EntityId>,
    children: HashMap<EntityId, Vec<(String, EntityId)>>,
    owners: HashMap<EntityId, EntityId>,
    next_part: u32,
}

impl SimWorld {
    pub fn new() -> Self {
        Self {
            next_part: PART_ID_BASE,
            ..Self::default()
        }
    }

    /// Borrows the world as the rule engine's collaborator bundle.
    pub fn env(&self) -> GameEnv<'_> {
        GameEnv::from_parts(self, self, Some(self))
    }

    pub fn body(&self, entity: EntityId) -> Option<&Body> {
        self.bodies.get(&entity)
    }

    pub fn insert_body(&mut self, entity: EntityId, body: Body) {
        self.bodies.insert(entity, body);
    }

    /// Parents `child` under `parent`, registering it as a named rig child.
    pub fn attach_child(&mut self, parent: EntityId, name: impl Into<String>, child: EntityId) {
        self.parents.insert(child, parent);
        self.children
            .entry(parent)
            .or_default()
            .push((name.into(), child));
    }

    /// Records the owner of a detached tagged collider.
    pub fn tag_owner(&mut self, part: EntityId, owner: EntityId) {
        self.owners.insert(part, owner);
    }

    fn allocate_part(&mut self) -> EntityId {
        let id = EntityId(self.next_part);
        self.next_part += 1;
        id
    }

    /// Builds a standing player rig at `feet`: a root collider, a human-tagged
    /// head and a hand anchor shared by the pointing hand and the wand grip.
    pub fn spawn_body(&mut self, player: EntityId, feet: Vec3) {
        self.insert_body(
            player,
            Body::new(feet + Vec3::Y * BODY_CENTER_HEIGHT, BODY_RADIUS, Category::PLAYER),
        );

        let head = self.allocate_part();
        self.insert_body(
            head,
            Body::new(feet + Vec3::Y * HEAD_HEIGHT, HEAD_RADIUS, Category::HUMAN),
        );
        self.attach_child(player, "Head", head);

        let hand = self.allocate_part();
        self.insert_body(hand, Body::marker(feet + HAND_OFFSET));
        self.attach_child(player, "HandPosition", hand);
    }

    /// Removes a player rig and every part parented under it. A held wand is
    /// unparented and left where it is.
    pub fn despawn_body(&mut self, player: EntityId) {
        let parts = self.children.remove(&player).unwrap_or_default();
        for (name, part) in parts {
            self.parents.remove(&part);
            if name != WAND_CHILD {
                self.bodies.remove(&part);
            } else if let Some(wand) = self.bodies.get_mut(&part) {
                wand.categories = Category::INTERACTABLE;
            }
        }
        self.bodies.remove(&player);
        self.owners.retain(|_, owner| *owner != player);
    }

    /// Moves a rig so its feet sit at `feet`, carrying attached parts along.
    pub fn move_body(&mut self, player: EntityId, feet: Vec3) {
        let Some(root) = self.bodies.get_mut(&player) else {
            return;
        };
        let delta = feet + Vec3::Y * BODY_CENTER_HEIGHT - root.center;
        if delta == Vec3::ZERO {
            return;
        }
        root.center += delta;
        let parts: Vec<EntityId> = self
            .children
            .get(&player)
            .map(|parts| parts.iter().map(|(_, id)| *id).collect())
            .unwrap_or_default();
        for part in parts {
            if let Some(body) = self.bodies.get_mut(&part) {
                body.center += delta;
            }
        }
    }

    /// Places a loose wand collider.
    pub fn place_wand(&mut self, wand: EntityId, position: Vec3) {
        self.insert_body(
            wand,
            Body::new(position, WAND_RADIUS, Category::INTERACTABLE),
        );
    }

    /// Parents a wand to a player rig, snapping it to the grip anchor. A held
    /// wand has no collider categories until it is released.
    pub fn attach_wand(&mut self, player: EntityId, wand: EntityId) {
        let grip = self
            .anchor(player, AnchorKind::WandGrip)
            .and_then(|anchor| self.bodies.get(&anchor))
            .or_else(|| self.bodies.get(&player))
            .map(|body| body.center);
        self.detach(wand);
        self.parents.insert(wand, player);
        self.children
            .entry(player)
            .or_default()
            .push((WAND_CHILD.to_owned(), wand));
        if let Some(body) = self.bodies.get_mut(&wand) {
            body.categories = Category::empty();
            if let Some(position) = grip {
                body.center = position;
            }
        }
    }

    /// Unparents a wand and rests it at `position`.
    pub fn release_wand(&mut self, wand: EntityId, position: Vec3) {
        self.detach(wand);
        self.place_wand(wand, position);
    }

    fn detach(&mut self, entity: EntityId) {
        if let Some(parent) = self.parents.remove(&entity)
            && let Some(parts) = self.children.get_mut(&parent)
        {
            parts.retain(|(_, child)| *child != entity);
        }
    }

    /// Closest collider along `ray` within `max_distance` accepted by `keep`.
    pub fn first_hit<F>(&self, ray: &Ray, max_distance: f32, keep: F) -> Option<RayHit>
    where
        F: Fn(EntityId, &Body) -> bool,
    {
        self.bodies
            .iter()
            .filter(|(id, body)| keep(**id, *body))
            .filter_map(|(id, body)| body.intersect(ray).map(|distance| (*id, distance)))
            .filter(|(_, distance)| *distance <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entity, distance)| RayHit {
                entity,
                point: ray.at(distance),
                distance,
            })
    }
}

impl RayCaster for SimWorld {
    fn cast(&self, ray: &Ray, max_distance: f32, filter: Category) -> Option<RayHit> {
        self.first_hit(ray, max_distance, |_, body| body.categories.intersects(filter))
    }
}

impl SceneOracle for SimWorld {
    fn parent(&self, entity: EntityId) -> Option<EntityId> {
        self.parents.get(&entity).copied()
    }

    fn categories(&self, entity: EntityId) -> Category {
        self.bodies
            .get(&entity)
            .map(|body| body.categories)
            .unwrap_or_default()
    }

    fn tagged_owner(&self, entity: EntityId) -> Option<EntityId> {
        self.owners.get(&entity).copied()
    }
}

impl RigOracle for SimWorld {
    fn find_child(&self, player: EntityId, name: &str) -> Option<EntityId> {
        self.children
            .get(&player)?
            .iter()
            .find(|(child, _)| child == name)
            .map(|(_, id)| *id)
    }

    fn attack_point(&self, wand: EntityId) -> Option<Vec3> {
        self.parents
            .contains_key(&wand)
            .then(|| self.bodies.get(&wand).map(|body| body.center))
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: EntityId = EntityId(1);
    const BOB: EntityId = EntityId(2);
    const WAND: EntityId = EntityId(100);

    #[test]
    fn ray_hits_nearest_matching_collider() {
        let mut world = SimWorld::new();
        world.spawn_body(BOB, Vec3::new(0.0, 0.0, -5.0));
        world.place_wand(WAND, Vec3::new(0.0, 0.9, -2.0));

        let ray = Ray::new(Vec3::new(0.0, 0.9, 0.0), Vec3::NEG_Z);
        let hit = world.cast(&ray, 10.0, Category::TARGETABLE).unwrap();
        assert_eq!(hit.entity, BOB);
        assert!((hit.distance - (5.0 - BODY_RADIUS)).abs() < 1e-4);

        let hit = world.cast(&ray, 10.0, Category::all()).unwrap();
        assert_eq!(hit.entity, WAND);

        assert!(world.cast(&ray, 1.0, Category::all()).is_none());
    }

    #[test]
    fn rig_exposes_hand_anchor_and_parts() {
        let mut world = SimWorld::new();
        world.spawn_body(ALICE, Vec3::ZERO);

        let hand = world.anchor(ALICE, AnchorKind::Hand).unwrap();
        assert_eq!(world.parent(hand), Some(ALICE));
        assert_eq!(world.root(hand), ALICE);
        assert!(world.categories(hand).is_empty());

        let head = world.find_child(ALICE, "Head").unwrap();
        assert!(world.categories(head).contains(Category::HUMAN));
    }

    #[test]
    fn moving_a_body_carries_its_parts() {
        let mut world = SimWorld::new();
        world.spawn_body(ALICE, Vec3::ZERO);
        let head = world.find_child(ALICE, "Head").unwrap();

        world.move_body(ALICE, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(world.body(head).unwrap().center, Vec3::new(3.0, HEAD_HEIGHT, 0.0));
    }

    #[test]
    fn wand_follows_attach_and_release() {
        let mut world = SimWorld::new();
        world.spawn_body(ALICE, Vec3::ZERO);
        world.place_wand(WAND, Vec3::new(0.0, 0.0, -3.0));
        assert_eq!(world.attack_point(WAND), None);

        world.attach_wand(ALICE, WAND);
        assert_eq!(world.root(WAND), ALICE);
        assert_eq!(world.attack_point(WAND), Some(HAND_OFFSET));

        world.release_wand(WAND, Vec3::new(0.0, 1.0, -2.0));
        assert_eq!(world.parent(WAND), None);
        assert_eq!(world.body(WAND).unwrap().center, Vec3::new(0.0, 1.0, -2.0));
        assert_eq!(world.find_child(ALICE, WAND_CHILD), None);
    }

    #[test]
    fn held_wand_is_invisible_to_raycasts() {
        let mut world = SimWorld::new();
        world.spawn_body(ALICE, Vec3::ZERO);
        world.place_wand(WAND, Vec3::new(0.0, 0.0, -3.0));
        world.attach_wand(ALICE, WAND);

        let eye = Vec3::new(0.0, 1.6, -0.5);
        let toward_grip = Ray::new(eye, HAND_OFFSET - eye);
        assert!(
            world
                .cast(&toward_grip, 10.0, Category::all())
                .is_none_or(|hit| hit.entity != WAND)
        );
        assert!(world.categories(WAND).is_empty());

        world.release_wand(WAND, Vec3::new(0.0, 1.6, -2.0));
        let ahead = Ray::new(eye, Vec3::NEG_Z);
        let hit = world.cast(&ahead, 10.0, Category::all()).unwrap();
        assert_eq!(hit.entity, WAND);
    }

    #[test]
    fn despawn_drops_a_held_wand_back_into_the_scene() {
        let mut world = SimWorld::new();
        world.spawn_body(ALICE, Vec3::ZERO);
        world.place_wand(WAND, Vec3::new(0.0, 0.0, -3.0));
        world.attach_wand(ALICE, WAND);

        world.despawn_body(ALICE);
        assert_eq!(world.parent(WAND), None);
        assert_eq!(world.categories(WAND), Category::INTERACTABLE);
    }

    #[test]
    fn despawn_removes_rig_parts() {
        let mut world = SimWorld::new();
        world.spawn_body(ALICE, Vec3::ZERO);
        let head = world.find_child(ALICE, "Head").unwrap();

        world.despawn_body(ALICE);
        assert!(world.body(ALICE).is_none());
        assert!(world.body(head).is_none());
        assert_eq!(world.parent(head), None);
    }
}
