//! Projectile collision resolution.
//!
//! Each projectile reacts to at most one collision. Hits on the caster's own
//! rig are skipped without consuming the projectile; everything else resolves
//! it, transforms the struck player (if any) and schedules teardown after a
//! short grace delay.

use glam::Vec3;

use crate::action::ActionTransition;
use crate::engine::{Effect, Effects, HitKind};
use crate::env::{Category, GameEnv, OracleError, SceneOracle, ancestors};
use crate::error::{ErrorSeverity, GameError, RejectionKind};
use crate::state::{EntityId, GameState, ProjectileId, Timer};
use crate::status::{FrogOutcome, StatusError, TransformToFrogAction};

/// Why a collision report was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum IgnoreReason {
    UnknownProjectile,
    AlreadyResolved,
    SelfHit,
}

/// Result of feeding one collision to the resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionOutcome {
    Ignored(IgnoreReason),
    Transformed { player: EntityId },
    AlreadyFrog { player: EntityId },
    Environment,
}

/// Which rule located the player owning a struck part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HolderLookup {
    /// The struck entity is a player.
    Direct(EntityId),
    /// A parent of the struck entity is a player.
    ParentChain(EntityId),
    /// The struck entity is a tagged body part linked to its player.
    Tag(EntityId),
}

impl HolderLookup {
    pub fn player(self) -> EntityId {
        match self {
            HolderLookup::Direct(id) | HolderLookup::ParentChain(id) | HolderLookup::Tag(id) => {
                id
            }
        }
    }
}

/// Locates the player carrying status for `part`.
///
/// Direct match first, then the parent chain, then the tag fallback (owner
/// link, then hierarchy root). The first rule that names a tracked player wins.
pub fn find_status_holder<S>(state: &GameState, scene: &S, part: EntityId) -> Option<HolderLookup>
where
    S: SceneOracle + ?Sized,
{
    let is_player = |id: EntityId| state.player(id).is_some();

    if is_player(part) {
        return Some(HolderLookup::Direct(part));
    }
    if let Some(parent) = ancestors(scene, part).skip(1).find(|id| is_player(*id)) {
        return Some(HolderLookup::ParentChain(parent));
    }
    if scene.categories(part).intersects(Category::TARGETABLE) {
        return scene
            .tagged_owner(part)
            .into_iter()
            .chain(std::iter::once(scene.root(part)))
            .find(|id| is_player(*id))
            .map(HolderLookup::Tag);
    }
    None
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HitError {
    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for HitError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Status(err) => err.severity(),
            Self::Oracle(err) => err.severity(),
        }
    }

    fn rejection_kind(&self) -> RejectionKind {
        match self {
            Self::Status(err) => err.rejection_kind(),
            Self::Oracle(err) => err.rejection_kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Status(err) => err.error_code(),
            Self::Oracle(err) => err.error_code(),
        }
    }
}

/// Collision reported by the physics layer for a live projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolveHitAction {
    pub projectile: ProjectileId,
    pub other: EntityId,
    pub point: Vec3,
}

impl ActionTransition for ResolveHitAction {
    type Error = HitError;
    type Result = CollisionOutcome;

    fn actor(&self) -> EntityId {
        self.other
    }

    fn label(&self) -> &'static str {
        "resolve_hit"
    }

    fn pre_validate(&self, _state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        env.scene()?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<CollisionOutcome, Self::Error> {
        let scene = env.scene()?;
        let Some(projectile) = state.projectile(self.projectile) else {
            return Ok(CollisionOutcome::Ignored(IgnoreReason::UnknownProjectile));
        };
        if projectile.has_resolved() {
            return Ok(CollisionOutcome::Ignored(IgnoreReason::AlreadyResolved));
        }
        if scene.root(self.other) == scene.root(projectile.caster) {
            tracing::trace!(
                projectile = %self.projectile,
                part = %self.other,
                "passing through caster"
            );
            return Ok(CollisionOutcome::Ignored(IgnoreReason::SelfHit));
        }

        let holder = find_status_holder(state, scene, self.other);
        let outcome = match holder {
            Some(lookup) => {
                let player = lookup.player();
                tracing::debug!(projectile = %self.projectile, ?lookup, "projectile hit player");
                match (TransformToFrogAction { player }).execute(state, env, effects)? {
                    FrogOutcome::Transformed => CollisionOutcome::Transformed { player },
                    FrogOutcome::AlreadyFrog => CollisionOutcome::AlreadyFrog { player },
                }
            }
            None => CollisionOutcome::Environment,
        };

        let config = &state.config.projectile;
        let (lifetime_ms, grace_ms) = (config.hit_effect_lifetime_ms, config.despawn_grace_ms);
        let despawn_at = state.now() + grace_ms;
        if let Some(projectile) = state.projectile_mut(self.projectile) {
            projectile.resolve();
        }
        state.scheduler.cancel(Timer::ProjectileExpire(self.projectile));
        state
            .scheduler
            .schedule(Timer::ProjectileDespawn(self.projectile), despawn_at);

        effects.push(Effect::HitFeedback {
            kind: match holder {
                Some(_) => HitKind::Player,
                None => HitKind::Environment,
            },
            point: self.point,
            lifetime_ms,
        });
        Ok(outcome)
    }
}

/// Tears down a projectile once its expiry or despawn timer fires.
pub(crate) fn despawn(state: &mut GameState, projectile: ProjectileId, effects: &mut Effects) {
    if state.remove_projectile(projectile).is_none() {
        return;
    }
    state.scheduler.cancel(Timer::ProjectileExpire(projectile));
    state.scheduler.cancel(Timer::ProjectileDespawn(projectile));
    effects.push(Effect::ProjectileDespawned { projectile });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ProjectileState, Timestamp};
    use crate::test_support::{StubWorld, add_player};

    const CASTER: EntityId = EntityId(1);
    const CASTER_ARM: EntityId = EntityId(11);
    const VICTIM: EntityId = EntityId(2);
    const VICTIM_HEAD: EntityId = EntityId(21);
    const DETACHED_HITBOX: EntityId = EntityId(22);
    const WALL: EntityId = EntityId(90);
    const BOLT: ProjectileId = ProjectileId(1);

    fn world() -> StubWorld {
        StubWorld::new()
            .player(CASTER)
            .part(CASTER_ARM, CASTER, Category::PLAYER)
            .player(VICTIM)
            .part(VICTIM_HEAD, VICTIM, Category::HUMAN)
            .tagged(DETACHED_HITBOX, VICTIM)
            .prop(WALL)
    }

    fn in_flight() -> GameState {
        let mut state = GameState::default();
        add_player(&mut state, CASTER);
        add_player(&mut state, VICTIM);
        let projectile = ProjectileState {
            id: BOLT,
            caster: CASTER,
            wand: EntityId(50),
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            spawn_time: Timestamp::ZERO,
            ttl_ms: state.config.projectile.ttl_ms,
            has_resolved: false,
        };
        state
            .scheduler
            .schedule(Timer::ProjectileExpire(BOLT), projectile.expires_at());
        state.insert_projectile(projectile);
        state
    }

    fn hit(state: &mut GameState, world: &StubWorld, other: EntityId) -> CollisionOutcome {
        ResolveHitAction {
            projectile: BOLT,
            other,
            point: Vec3::new(0.0, 1.0, -4.0),
        }
        .execute(state, &world.env(), &mut Effects::new())
        .unwrap()
    }

    #[test]
    fn holder_lookup_prefers_direct_then_parent_then_tag() {
        let world = world();
        let state = in_flight();

        assert_eq!(
            find_status_holder(&state, &world, VICTIM),
            Some(HolderLookup::Direct(VICTIM))
        );
        assert_eq!(
            find_status_holder(&state, &world, VICTIM_HEAD),
            Some(HolderLookup::ParentChain(VICTIM))
        );
        assert_eq!(
            find_status_holder(&state, &world, DETACHED_HITBOX),
            Some(HolderLookup::Tag(VICTIM))
        );
        assert_eq!(find_status_holder(&state, &world, WALL), None);
    }

    #[test]
    fn own_rig_does_not_consume_the_projectile() {
        let world = world();
        let mut state = in_flight();

        assert_eq!(
            hit(&mut state, &world, CASTER_ARM),
            CollisionOutcome::Ignored(IgnoreReason::SelfHit)
        );
        assert!(!state.projectile(BOLT).unwrap().has_resolved());
    }

    #[test]
    fn first_hit_wins() {
        let world = world();
        let mut state = in_flight();

        assert_eq!(
            hit(&mut state, &world, VICTIM_HEAD),
            CollisionOutcome::Transformed { player: VICTIM }
        );
        assert_eq!(
            hit(&mut state, &world, WALL),
            CollisionOutcome::Ignored(IgnoreReason::AlreadyResolved)
        );
        assert!(state.player(VICTIM).unwrap().status().is_frog());
        assert!(!state.scheduler().is_pending(Timer::ProjectileExpire(BOLT)));
        assert_eq!(
            state.scheduler().due_at(Timer::ProjectileDespawn(BOLT)),
            Some(Timestamp(state.config.projectile.despawn_grace_ms))
        );
    }

    #[test]
    fn environment_hits_only_give_feedback() {
        let world = world();
        let mut state = in_flight();

        let mut effects = Effects::new();
        let outcome = ResolveHitAction {
            projectile: BOLT,
            other: WALL,
            point: Vec3::ONE,
        }
        .execute(&mut state, &world.env(), &mut effects)
        .unwrap();

        assert_eq!(outcome, CollisionOutcome::Environment);
        assert_eq!(
            effects.into_vec(),
            vec![Effect::HitFeedback {
                kind: HitKind::Environment,
                point: Vec3::ONE,
                lifetime_ms: state.config.projectile.hit_effect_lifetime_ms,
            }]
        );
        assert!(state.players().all(|player| player.status().is_human()));
    }

    #[test]
    fn hitting_a_frog_is_a_no_op() {
        let world = world();
        let mut state = in_flight();
        TransformToFrogAction { player: VICTIM }
            .execute(&mut state, &world.env(), &mut Effects::new())
            .unwrap();
        let due = state.scheduler().due_at(Timer::FrogRevert(VICTIM));

        assert_eq!(
            hit(&mut state, &world, VICTIM),
            CollisionOutcome::AlreadyFrog { player: VICTIM }
        );
        assert_eq!(state.scheduler().due_at(Timer::FrogRevert(VICTIM)), due);
    }

    #[test]
    fn despawn_removes_once() {
        let mut state = in_flight();
        let mut effects = Effects::new();

        despawn(&mut state, BOLT, &mut effects);
        despawn(&mut state, BOLT, &mut effects);

        assert!(state.projectile(BOLT).is_none());
        assert!(state.scheduler().is_empty());
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn unknown_projectiles_are_ignored() {
        let world = world();
        let mut state = GameState::default();
        assert_eq!(
            hit(&mut state, &world, WALL),
            CollisionOutcome::Ignored(IgnoreReason::UnknownProjectile)
        );
    }
}
