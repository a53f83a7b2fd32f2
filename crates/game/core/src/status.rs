//! Timed human/frog transformation.
//!
//! A player carries at most one pending [`Timer::FrogRevert`]. Transforming a
//! frog again is a no-op and does not refresh the timer; curing cancels it.

use crate::action::ActionTransition;
use crate::engine::{Effect, Effects};
use crate::env::GameEnv;
use crate::error::{ErrorSeverity, GameError, RejectionKind};
use crate::state::{EntityId, Form, GameState, StatusEffect, Timer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusError {
    #[error("player {0} not found")]
    PlayerNotFound(EntityId),
}

impl GameError for StatusError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn rejection_kind(&self) -> RejectionKind {
        RejectionKind::UnknownEntity
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PlayerNotFound(_) => "STATUS_PLAYER_NOT_FOUND",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FrogOutcome {
    Transformed,
    AlreadyFrog,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CureOutcome {
    Cured,
    AlreadyHuman,
}

fn move_speed(state: &GameState, form: Form) -> f32 {
    match form {
        Form::Human => state.config.status.normal_move_speed,
        Form::Frog => state.config.status.frog_move_speed,
    }
}

/// Turns a frog back into a human and re-enables casting.
///
/// Returns false when the player was already human.
fn restore_human(
    state: &mut GameState,
    player: EntityId,
    effects: &mut Effects,
) -> Result<bool, StatusError> {
    let speed = move_speed(state, Form::Human);
    let player_state = state
        .player_mut(player)
        .ok_or(StatusError::PlayerNotFound(player))?;
    if player_state.status.is_human() {
        return Ok(false);
    }
    player_state.status = StatusEffect::Human;
    player_state.can_cast = true;
    effects.push(Effect::FormChanged {
        player,
        form: Form::Human,
        move_speed: speed,
    });
    Ok(true)
}

/// Fired by the scheduler when the frog duration elapses.
pub(crate) fn revert(
    state: &mut GameState,
    player: EntityId,
    effects: &mut Effects,
) -> Result<(), StatusError> {
    if restore_human(state, player, effects)? {
        tracing::info!(player = %player, "frog transformation expired");
    }
    Ok(())
}

/// Transforms a human player into a frog for the configured duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformToFrogAction {
    pub player: EntityId,
}

impl ActionTransition for TransformToFrogAction {
    type Error = StatusError;
    type Result = FrogOutcome;

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "transform_to_frog"
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        state
            .player(self.player)
            .ok_or(StatusError::PlayerNotFound(self.player))?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<FrogOutcome, Self::Error> {
        let expires_at = state.now() + state.config.status.frog_duration_ms;
        let speed = move_speed(state, Form::Frog);
        let player = state
            .player_mut(self.player)
            .ok_or(StatusError::PlayerNotFound(self.player))?;
        if player.status.is_frog() {
            tracing::debug!(player = %self.player, "already a frog");
            return Ok(FrogOutcome::AlreadyFrog);
        }

        player.status = StatusEffect::Frog { expires_at };
        player.can_cast = false;
        state
            .scheduler
            .schedule(Timer::FrogRevert(self.player), expires_at);

        effects.push(Effect::FormChanged {
            player: self.player,
            form: Form::Frog,
            move_speed: speed,
        });
        tracing::info!(player = %self.player, %expires_at, "transformed into a frog");
        Ok(FrogOutcome::Transformed)
    }
}

/// Restores a frog immediately and cancels its pending revert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CureAction {
    pub player: EntityId,
}

impl ActionTransition for CureAction {
    type Error = StatusError;
    type Result = CureOutcome;

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "cure"
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        state
            .player(self.player)
            .ok_or(StatusError::PlayerNotFound(self.player))?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<CureOutcome, Self::Error> {
        state.scheduler.cancel(Timer::FrogRevert(self.player));
        if restore_human(state, self.player, effects)? {
            tracing::info!(player = %self.player, "cured");
            Ok(CureOutcome::Cured)
        } else {
            Ok(CureOutcome::AlreadyHuman)
        }
    }
}
