//! State management errors.
//!
//! Errors related to spawning and despawning tracked entities.

use crate::error::{ErrorSeverity, GameError, RejectionKind};
use crate::state::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    /// An entity with this id is already tracked as a player or wand.
    #[error("entity {0} is already tracked")]
    DuplicateEntity(EntityId),

    #[error("player {0} not found")]
    PlayerNotFound(EntityId),

    /// Projectile id allocation overflow (all ids exhausted).
    #[error("projectile id overflow")]
    ProjectileIdOverflow,
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StateError::DuplicateEntity(_) | StateError::PlayerNotFound(_) => {
                ErrorSeverity::Validation
            }
            StateError::ProjectileIdOverflow => ErrorSeverity::Internal,
        }
    }

    fn rejection_kind(&self) -> RejectionKind {
        RejectionKind::UnknownEntity
    }

    fn error_code(&self) -> &'static str {
        match self {
            StateError::DuplicateEntity(_) => "STATE_DUPLICATE_ENTITY",
            StateError::PlayerNotFound(_) => "STATE_PLAYER_NOT_FOUND",
            StateError::ProjectileIdOverflow => "STATE_PROJECTILE_ID_OVERFLOW",
        }
    }
}
