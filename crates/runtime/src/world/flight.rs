//! Straight-line projectile motion with swept collision checks.

use std::collections::BTreeMap;

use glam::Vec3;
use hunt_core::{Category, CollisionEvent, EntityId, ProjectileId, Ray, SceneOracle};

use super::SimWorld;

/// One projectile body in flight.
///
/// Launch impulses act on a unit mass, so the impulse is the velocity.
/// Spells ignore gravity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flight {
    pub caster: EntityId,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Set once a contact was reported; the body then rests until despawned.
    pub landed: bool,
}

/// Projectile bodies tracked between ticks.
#[derive(Clone, Debug, Default)]
pub struct Flights {
    bodies: BTreeMap<ProjectileId, Flight>,
}

impl Flights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launch(&mut self, projectile: ProjectileId, caster: EntityId, origin: Vec3, impulse: Vec3) {
        self.bodies.insert(
            projectile,
            Flight {
                caster,
                position: origin,
                velocity: impulse,
                landed: false,
            },
        );
    }

    pub fn remove(&mut self, projectile: ProjectileId) -> Option<Flight> {
        self.bodies.remove(&projectile)
    }

    pub fn get(&self, projectile: ProjectileId) -> Option<&Flight> {
        self.bodies.get(&projectile)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Advances every airborne body by `dt_ms`, reporting the first contact
    /// along each swept segment.
    ///
    /// Colliders belonging to the caster's rig and other projectiles are not
    /// considered, so a spell never stops inside the hand that cast it.
    pub fn sweep(&mut self, world: &SimWorld, dt_ms: u64) -> Vec<CollisionEvent> {
        let dt = dt_ms as f32 / 1_000.0;
        let mut contacts = Vec::new();

        for (id, flight) in self.bodies.iter_mut().filter(|(_, f)| !f.landed) {
            let step = flight.velocity * dt;
            let length = step.length();
            if length <= f32::EPSILON {
                continue;
            }

            let ray = Ray::new(flight.position, step);
            let caster = flight.caster;
            let hit = world.first_hit(&ray, length, |entity, body| {
                !body.categories.is_empty()
                    && !body.categories.contains(Category::PROJECTILE)
                    && world.root(entity) != caster
            });

            match hit {
                Some(hit) => {
                    tracing::trace!(projectile = %id, other = %hit.entity, "projectile contact");
                    flight.position = hit.point;
                    flight.landed = true;
                    contacts.push(CollisionEvent {
                        projectile: *id,
                        other: hit.entity,
                        point: hit.point,
                    });
                }
                None => flight.position += step,
            }
        }
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASTER: EntityId = EntityId(1);
    const TARGET: EntityId = EntityId(2);

    fn world() -> SimWorld {
        let mut world = SimWorld::new();
        world.spawn_body(CASTER, Vec3::ZERO);
        world.spawn_body(TARGET, Vec3::new(0.0, 0.0, -6.0));
        world
    }

    #[test]
    fn sweep_reports_first_contact_once() {
        let world = world();
        let mut flights = Flights::new();
        flights.launch(ProjectileId(1), CASTER, Vec3::new(0.0, 0.9, 0.0), Vec3::NEG_Z * 30.0);

        let contacts = flights.sweep(&world, 500);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].other, TARGET);
        assert!(flights.get(ProjectileId(1)).unwrap().landed);

        assert!(flights.sweep(&world, 500).is_empty());
    }

    #[test]
    fn caster_rig_is_ignored() {
        let world = world();
        let mut flights = Flights::new();
        // Starts inside the caster's own body collider.
        flights.launch(ProjectileId(1), CASTER, Vec3::new(0.0, 0.9, 0.0), Vec3::Z * 10.0);

        assert!(flights.sweep(&world, 100).is_empty());
        let flight = flights.get(ProjectileId(1)).unwrap();
        assert!((flight.position.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn short_steps_accumulate_until_contact() {
        let world = world();
        let mut flights = Flights::new();
        flights.launch(ProjectileId(3), CASTER, Vec3::new(0.0, 0.9, 0.0), Vec3::NEG_Z * 10.0);

        let mut contacts = Vec::new();
        for _ in 0..10 {
            contacts.extend(flights.sweep(&world, 100));
        }
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].projectile, ProjectileId(3));
        assert!((contacts[0].point.z + 5.55).abs() < 1e-3);
    }
}
