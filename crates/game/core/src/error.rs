//! Common error infrastructure for hunt-core.
//!
//! Domain-specific errors (e.g., `ToolError`, `CastError`) are defined in their
//! respective modules alongside the operations they validate. Every one of them
//! is raised during validation, before any state is touched, so a rejected
//! operation never leaves tool, ammo or status state partially updated.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each component has its own error type with specific variants
//! - **Never Fatal**: Rejections are recovered locally and surfaced as log lines
//! - **Stable Codes**: Every variant maps to a static error code for tests and metrics

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the same request may succeed once state changes.
    ///
    /// Examples: wand cooling down, hand already out
    Recoverable,

    /// Validation error - the request references something that does not exist.
    ///
    /// Examples: unknown player, unknown wand
    Validation,

    /// Internal error - a collaborator required by the engine is missing.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

/// Gameplay-facing classification of a declined request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RejectionKind {
    /// Requested tool transition is invalid for the current tool state.
    ToolConflict,
    /// No ammunition left, still reloading or cooling down.
    OutOfResource,
    /// Attachment anchor missing on the rig; a default offset is used instead.
    NoHandAnchor,
    /// Raycast hit the acquiring player; filtered, never shown to callers.
    SelfTargetRejected,
    /// Pointing was requested without an acquired target.
    NoTarget,
    /// The request referenced an entity the state does not track.
    UnknownEntity,
    /// A collaborator the operation needs was not wired into the environment.
    MissingCollaborator,
}

/// Common trait for all hunt-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the gameplay classification used when the tick pipeline
    /// records the declined request.
    fn rejection_kind(&self) -> RejectionKind;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
