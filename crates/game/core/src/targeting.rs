//! Target acquisition for the pointing hand, the wand and the pickup probe.
//!
//! A [`TargetTracker`] turns the stream of raycast results into a stable
//! current target. Every change is reported as an exit of the previous target
//! followed by an enter of the next one; identical consecutive results report
//! nothing. There is no hysteresis.

use crate::action::ActionTransition;
use crate::config::TargetingConfig;
use crate::engine::{Effect, Effects};
use crate::env::{Category, GameEnv, OracleError, RayCaster, SceneOracle};
use crate::error::{ErrorSeverity, GameError, RejectionKind};
use crate::state::{EntityId, GameState, Ray, ToolState};

/// Edge produced when the held target changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetChange {
    pub exited: Option<EntityId>,
    pub entered: Option<EntityId>,
}

/// Holds the current target of one acquisition channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetTracker {
    current: Option<EntityId>,
}

impl TargetTracker {
    pub fn current(&self) -> Option<EntityId> {
        self.current
    }

    /// Replaces the held target, returning the edge when it actually changed.
    pub fn update(&mut self, candidate: Option<EntityId>) -> Option<TargetChange> {
        if self.current == candidate {
            return None;
        }
        let exited = std::mem::replace(&mut self.current, candidate);
        Some(TargetChange {
            exited,
            entered: candidate,
        })
    }

    pub fn clear(&mut self) -> Option<TargetChange> {
        self.update(None)
    }
}

/// Ray bound and category mask for one acquisition channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetQuery {
    pub range: f32,
    pub filter: Category,
}

impl TargetQuery {
    pub fn pointing(config: &TargetingConfig) -> Self {
        Self {
            range: config.pointing_range,
            filter: Category::TARGETABLE,
        }
    }

    pub fn interaction(config: &TargetingConfig) -> Self {
        Self {
            range: config.interaction_range,
            filter: Category::INTERACTABLE,
        }
    }
}

/// Returns the player part under `aim`, excluding anything rooted at `owner`.
pub fn acquire<R, S>(
    ray_caster: &R,
    scene: &S,
    owner: EntityId,
    aim: &Ray,
    query: TargetQuery,
) -> Option<EntityId>
where
    R: RayCaster + ?Sized,
    S: SceneOracle + ?Sized,
{
    let hit = ray_caster.cast(aim, query.range, query.filter)?;
    if !scene.categories(hit.entity).intersects(query.filter) {
        return None;
    }
    if scene.root(hit.entity) == scene.root(owner) {
        tracing::trace!(
            player = %owner,
            part = %hit.entity,
            kind = %RejectionKind::SelfTargetRejected,
            "ignoring own rig"
        );
        return None;
    }
    Some(hit.entity)
}

/// Emits exit, enter and highlight for a pointing change.
pub(crate) fn emit_pointing_change(effects: &mut Effects, player: EntityId, change: TargetChange) {
    if let Some(target) = change.exited {
        effects.push(Effect::TargetExit { player, target });
    }
    if let Some(target) = change.entered {
        effects.push(Effect::TargetEnter { player, target });
    }
    effects.push(Effect::Highlight {
        player,
        on: change.entered.is_some(),
    });
}

pub(crate) fn emit_hover_change(effects: &mut Effects, player: EntityId, change: TargetChange) {
    if let Some(wand) = change.exited {
        effects.push(Effect::WandHover {
            player,
            wand,
            hovered: false,
        });
    }
    if let Some(wand) = change.entered {
        effects.push(Effect::WandHover {
            player,
            wand,
            hovered: true,
        });
    }
    effects.push(Effect::Highlight {
        player,
        on: change.entered.is_some(),
    });
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetingError {
    #[error("player {0} not found")]
    PlayerNotFound(EntityId),

    #[error("player {player} has no tool out")]
    ToolNotOut { player: EntityId },

    #[error("player {player} is not pointing with the hand")]
    HandNotOut { player: EntityId },

    #[error("player {player} has no target to point at")]
    NoTarget { player: EntityId },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for TargetingError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PlayerNotFound(_) => ErrorSeverity::Validation,
            Self::Oracle(err) => err.severity(),
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn rejection_kind(&self) -> RejectionKind {
        match self {
            Self::PlayerNotFound(_) => RejectionKind::UnknownEntity,
            Self::ToolNotOut { .. } | Self::HandNotOut { .. } => RejectionKind::ToolConflict,
            Self::NoTarget { .. } => RejectionKind::NoTarget,
            Self::Oracle(err) => err.rejection_kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PlayerNotFound(_) => "TARGETING_PLAYER_NOT_FOUND",
            Self::ToolNotOut { .. } => "TARGETING_TOOL_NOT_OUT",
            Self::HandNotOut { .. } => "TARGETING_HAND_NOT_OUT",
            Self::NoTarget { .. } => "TARGETING_NO_TARGET",
            Self::Oracle(err) => err.error_code(),
        }
    }
}

/// Samples the aim ray of a player with a tool out and updates its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AcquireTargetAction {
    pub player: EntityId,
    pub aim: Ray,
}

impl ActionTransition for AcquireTargetAction {
    type Error = TargetingError;
    type Result = Option<TargetChange>;

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "acquire_target"
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let player = state
            .player(self.player)
            .ok_or(TargetingError::PlayerNotFound(self.player))?;
        if !player.tool().is_out() {
            return Err(TargetingError::ToolNotOut {
                player: self.player,
            });
        }
        env.validate()?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<Self::Result, Self::Error> {
        let query = TargetQuery::pointing(&state.config.targeting);
        let candidate = acquire(env.ray_caster()?, env.scene()?, self.player, &self.aim, query);

        let player = state
            .player_mut(self.player)
            .ok_or(TargetingError::PlayerNotFound(self.player))?;
        let change = player.pointing.update(candidate);
        if let Some(change) = change {
            tracing::debug!(
                player = %self.player,
                exited = ?change.exited,
                entered = ?change.entered,
                "target changed"
            );
            emit_pointing_change(effects, self.player, change);
        }
        Ok(change)
    }
}

/// Samples the pickup probe and updates the hovered wand.
///
/// Only wands nobody holds qualify. Runs regardless of the tool state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeInteractionAction {
    pub player: EntityId,
    pub aim: Ray,
}

impl ProbeInteractionAction {
    fn candidate(
        &self,
        state: &GameState,
        env: &GameEnv<'_>,
    ) -> Result<Option<EntityId>, TargetingError> {
        let query = TargetQuery::interaction(&state.config.targeting);
        let scene = env.scene()?;
        let Some(hit) = env.ray_caster()?.cast(&self.aim, query.range, query.filter) else {
            return Ok(None);
        };
        let wand = [hit.entity, scene.root(hit.entity)]
            .into_iter()
            .find(|id| state.wand(*id).is_some_and(|wand| !wand.is_equipped()));
        Ok(wand)
    }
}

impl ActionTransition for ProbeInteractionAction {
    type Error = TargetingError;
    type Result = Option<TargetChange>;

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "probe_interaction"
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        state
            .player(self.player)
            .ok_or(TargetingError::PlayerNotFound(self.player))?;
        env.validate()?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<Self::Result, Self::Error> {
        let candidate = self.candidate(state, env)?;
        let player = state
            .player_mut(self.player)
            .ok_or(TargetingError::PlayerNotFound(self.player))?;
        let change = player.hover.update(candidate);
        if let Some(change) = change {
            emit_hover_change(effects, self.player, change);
        }
        Ok(change)
    }
}

/// Accuses the player owning the current pointing target.
///
/// Returns the accused player's root entity. The trial itself is run by the
/// host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccuseAction {
    pub player: EntityId,
}

impl ActionTransition for AccuseAction {
    type Error = TargetingError;
    type Result = EntityId;

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "accuse"
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let player = state
            .player(self.player)
            .ok_or(TargetingError::PlayerNotFound(self.player))?;
        if player.tool() != ToolState::HandOut {
            return Err(TargetingError::HandNotOut {
                player: self.player,
            });
        }
        if !player.can_point() {
            return Err(TargetingError::NoTarget {
                player: self.player,
            });
        }
        env.scene()?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<Self::Result, Self::Error> {
        let target = state
            .player(self.player)
            .and_then(|player| player.current_target())
            .ok_or(TargetingError::NoTarget {
                player: self.player,
            })?;
        let accused = env.scene()?.root(target);

        tracing::info!(accuser = %self.player, accused = %accused, "accusation");
        effects.push(Effect::Accusation {
            accuser: self.player,
            accused,
        });
        Ok(accused)
    }
}
