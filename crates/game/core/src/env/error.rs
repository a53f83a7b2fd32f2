//! Collaborator access errors.

use crate::error::{ErrorSeverity, GameError, RejectionKind};

/// Errors raised when a required collaborator is missing from the environment.
///
/// The engine checks these once at construction, so operations never discover
/// a missing collaborator halfway through a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("RayCaster not available")]
    RayCasterNotAvailable,

    #[error("SceneOracle not available")]
    SceneNotAvailable,
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn rejection_kind(&self) -> RejectionKind {
        RejectionKind::MissingCollaborator
    }

    fn error_code(&self) -> &'static str {
        match self {
            OracleError::RayCasterNotAvailable => "ORACLE_RAY_CASTER_NOT_AVAILABLE",
            OracleError::SceneNotAvailable => "ORACLE_SCENE_NOT_AVAILABLE",
        }
    }
}
