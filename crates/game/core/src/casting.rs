//! Wand casting, reload and recharge.
//!
//! A cast is gated by the caster's status, the wand's ammunition, a pending
//! reload and the per-wand cooldown. Every check runs before the first write,
//! so a declined cast never spawns anything and never touches the ammo count.

use glam::Vec3;

use crate::action::ActionTransition;
use crate::engine::{Effect, Effects};
use crate::env::{Category, GameEnv, OracleError};
use crate::error::{ErrorSeverity, GameError, RejectionKind};
use crate::state::{
    EntityId, GameState, ProjectileId, ProjectileState, Ray, StateError, Timer, Timestamp,
    WandState,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastError {
    #[error("player {0} not found")]
    PlayerNotFound(EntityId),

    #[error("wand {0} not found")]
    WandNotFound(EntityId),

    #[error("player {player} holds no wand")]
    NoWandEquipped { player: EntityId },

    #[error("player {player} cannot cast in its current form")]
    CastingDisabled { player: EntityId },

    #[error("wand {wand} is out of ammo")]
    OutOfAmmo { wand: EntityId },

    #[error("wand {wand} is reloading")]
    Reloading { wand: EntityId },

    #[error("wand {wand} is already reloading")]
    AlreadyReloading { wand: EntityId },

    #[error("wand {wand} is cooling down until {until}")]
    CoolingDown { wand: EntityId, until: Timestamp },

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for CastError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PlayerNotFound(_) | Self::WandNotFound(_) => ErrorSeverity::Validation,
            Self::State(err) => err.severity(),
            Self::Oracle(err) => err.severity(),
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn rejection_kind(&self) -> RejectionKind {
        match self {
            Self::PlayerNotFound(_) | Self::WandNotFound(_) => RejectionKind::UnknownEntity,
            Self::NoWandEquipped { .. } | Self::CastingDisabled { .. } => {
                RejectionKind::ToolConflict
            }
            Self::OutOfAmmo { .. }
            | Self::Reloading { .. }
            | Self::AlreadyReloading { .. }
            | Self::CoolingDown { .. } => RejectionKind::OutOfResource,
            Self::State(err) => err.rejection_kind(),
            Self::Oracle(err) => err.rejection_kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PlayerNotFound(_) => "CAST_PLAYER_NOT_FOUND",
            Self::WandNotFound(_) => "CAST_WAND_NOT_FOUND",
            Self::NoWandEquipped { .. } => "CAST_NO_WAND_EQUIPPED",
            Self::CastingDisabled { .. } => "CAST_CASTING_DISABLED",
            Self::OutOfAmmo { .. } => "CAST_OUT_OF_AMMO",
            Self::Reloading { .. } => "CAST_RELOADING",
            Self::AlreadyReloading { .. } => "CAST_ALREADY_RELOADING",
            Self::CoolingDown { .. } => "CAST_COOLING_DOWN",
            Self::State(err) => err.error_code(),
            Self::Oracle(err) => err.error_code(),
        }
    }
}

fn ammo_changed(wand: &WandState) -> Effect {
    Effect::AmmoChanged {
        wand: wand.id,
        remaining: wand.ammo_remaining,
        capacity: wand.capacity,
    }
}

/// Fires the held wand along the aim ray.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastAction {
    pub player: EntityId,
    pub aim: Ray,
}

fn held_wand(state: &GameState, player: EntityId) -> Result<EntityId, CastError> {
    state
        .player(player)
        .ok_or(CastError::PlayerNotFound(player))?
        .equipped_wand()
        .ok_or(CastError::NoWandEquipped { player })
}

impl CastAction {
    /// Where the projectile should head: the first thing under the aim ray,
    /// or the end of the ray when nothing is in range.
    fn impact_point(&self, state: &GameState, env: &GameEnv<'_>) -> Result<Vec3, CastError> {
        let range = state.config.casting.max_cast_range;
        let hit = env.ray_caster()?.cast(&self.aim, range, Category::all());
        Ok(hit.map_or_else(|| self.aim.at(range), |hit| hit.point))
    }
}

impl ActionTransition for CastAction {
    type Error = CastError;
    type Result = ProjectileId;

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "cast"
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let wand_id = held_wand(state, self.player)?;
        let wand = state.wand(wand_id).ok_or(CastError::WandNotFound(wand_id))?;
        let player = state
            .player(self.player)
            .ok_or(CastError::PlayerNotFound(self.player))?;

        if !player.can_cast() {
            return Err(CastError::CastingDisabled {
                player: self.player,
            });
        }
        if wand.ammo_remaining() == 0 {
            return Err(CastError::OutOfAmmo { wand: wand_id });
        }
        if wand.is_reloading() {
            return Err(CastError::Reloading { wand: wand_id });
        }
        if let Some(until) = wand.cooldown_until().filter(|until| state.now() < *until) {
            return Err(CastError::CoolingDown {
                wand: wand_id,
                until,
            });
        }
        env.ray_caster()?;
        state.peek_projectile_id()?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<ProjectileId, Self::Error> {
        let wand_id = held_wand(state, self.player)?;
        let impact = self.impact_point(state, env)?;
        let origin = env
            .rig()
            .and_then(|rig| rig.attack_point(wand_id))
            .unwrap_or(self.aim.origin);
        let direction = (impact - origin)
            .try_normalize()
            .unwrap_or(self.aim.direction);

        let now = state.now();
        let casting = state.config.casting.clone();
        let ttl_ms = state.config.projectile.ttl_ms;
        let impulse = direction * casting.launch_impulse + Vec3::Y * casting.upward_impulse;

        let projectile = state.allocate_projectile_id()?;
        let wand = state
            .wand_mut(wand_id)
            .ok_or(CastError::WandNotFound(wand_id))?;
        wand.ammo_remaining = wand.ammo_remaining.saturating_sub(1);
        let cooldown_until = now + casting.time_between_shots_ms;
        wand.cooldown_until = Some(cooldown_until);
        effects.push(Effect::ProjectileSpawned {
            projectile,
            caster: self.player,
            origin,
            direction,
            impulse,
        });
        effects.push(ammo_changed(wand));

        let spawned = ProjectileState {
            id: projectile,
            caster: self.player,
            wand: wand_id,
            origin,
            direction,
            spawn_time: now,
            ttl_ms,
            has_resolved: false,
        };
        state
            .scheduler
            .schedule(Timer::CastCooldown(wand_id), cooldown_until);
        state
            .scheduler
            .schedule(Timer::ProjectileExpire(projectile), spawned.expires_at());
        state.insert_projectile(spawned);

        tracing::debug!(
            player = %self.player,
            wand = %wand_id,
            %projectile,
            "spell cast"
        );
        Ok(projectile)
    }
}

/// Starts refilling the held wand; the ammo is restored when the reload
/// timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReloadAction {
    pub player: EntityId,
}

impl ActionTransition for ReloadAction {
    type Error = CastError;
    type Result = Timestamp;

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "reload"
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let wand_id = held_wand(state, self.player)?;
        let wand = state.wand(wand_id).ok_or(CastError::WandNotFound(wand_id))?;
        if wand.is_reloading() {
            return Err(CastError::AlreadyReloading { wand: wand_id });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<Timestamp, Self::Error> {
        let wand_id = held_wand(state, self.player)?;
        let done_at = state.now() + state.config.casting.reload_time_ms;
        let wand = state
            .wand_mut(wand_id)
            .ok_or(CastError::WandNotFound(wand_id))?;
        wand.reloading = true;
        state.scheduler.schedule(Timer::Reload(wand_id), done_at);

        effects.push(Effect::ReloadStarted { wand: wand_id });
        tracing::debug!(player = %self.player, wand = %wand_id, %done_at, "reload started");
        Ok(done_at)
    }
}

/// Refills a wand immediately. Leaves a pending reload untouched.
///
/// Returns whether any ammo was added.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RechargeAction {
    pub wand: EntityId,
}

impl ActionTransition for RechargeAction {
    type Error = CastError;
    type Result = bool;

    fn actor(&self) -> EntityId {
        self.wand
    }

    fn label(&self) -> &'static str {
        "recharge"
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        state
            .wand(self.wand)
            .ok_or(CastError::WandNotFound(self.wand))?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<bool, Self::Error> {
        let wand = state
            .wand_mut(self.wand)
            .ok_or(CastError::WandNotFound(self.wand))?;
        if wand.ammo_remaining == wand.capacity {
            return Ok(false);
        }
        wand.ammo_remaining = wand.capacity;
        effects.push(ammo_changed(wand));
        Ok(true)
    }
}

/// Re-arms a wand once its cast cooldown elapses.
pub(crate) fn finish_cooldown(state: &mut GameState, wand: EntityId) {
    if let Some(wand) = state.wand_mut(wand) {
        wand.cooldown_until = None;
    }
}

/// Completes a pending reload.
pub(crate) fn finish_reload(state: &mut GameState, wand: EntityId, effects: &mut Effects) {
    let Some(wand) = state.wand_mut(wand) else {
        return;
    };
    wand.reloading = false;
    wand.ammo_remaining = wand.capacity;
    effects.push(ammo_changed(wand));
    tracing::debug!(wand = %wand.id, "reload finished");
}
