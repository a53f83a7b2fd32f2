//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and from operations the rules
//! declined, so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use hunt_core::{GameError, OracleError, RejectionKind, StateError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime collaborators are incomplete")]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("{action} rejected ({code}): {message}")]
    Rejected {
        action: &'static str,
        kind: RejectionKind,
        code: &'static str,
        message: String,
    },
}

impl RuntimeError {
    /// Wraps an error returned by a rule operation.
    pub fn rejected<E>(action: &'static str, error: E) -> Self
    where
        E: GameError,
    {
        Self::Rejected {
            action,
            kind: error.rejection_kind(),
            code: error.error_code(),
            message: error.to_string(),
        }
    }
}
