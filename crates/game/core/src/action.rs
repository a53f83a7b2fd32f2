//! Shared shape of every state-changing operation.
//!
//! Operations validate against the state **before** mutation and only then
//! apply. `pre_validate` carries every check that can reject the request, so a
//! rejection never leaves tool, ammo or status state partially updated.

use crate::engine::Effects;
use crate::env::GameEnv;
use crate::error::GameError;
use crate::state::{EntityId, GameState};

/// Defines how a concrete operation mutates game state.
pub trait ActionTransition {
    type Error: GameError;
    type Result;

    /// Returns the entity performing this operation.
    fn actor(&self) -> EntityId;

    /// Short stable name used in logs and rejection records.
    fn label(&self) -> &'static str;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the operation by mutating the game state directly.
    ///
    /// Lookups that can fail happen before the first write.
    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<Self::Result, Self::Error>;

    /// Runs `pre_validate` followed by `apply`.
    fn execute(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<Self::Result, Self::Error> {
        self.pre_validate(state, env)?;
        self.apply(state, env, effects)
    }
}
