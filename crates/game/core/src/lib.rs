//! Deterministic player interaction rules for the witch hunt.
//!
//! `hunt-core` defines the canonical tool, targeting, casting and status
//! rules and exposes pure APIs that the runtime harness drives once per frame.
//! All state mutation flows through [`engine::GameEngine`]; physics, rendering
//! and input devices are reached only through the collaborator traits in
//! [`env`].
pub mod action;
pub mod casting;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod projectile;
pub mod state;
pub mod status;
pub mod targeting;
pub mod tools;

#[cfg(test)]
mod test_support;

pub use action::ActionTransition;
pub use casting::{CastAction, CastError, RechargeAction, ReloadAction};
pub use config::{
    CastingConfig, ConfigError, GameConfig, ProjectileConfig, StatusConfig, TargetingConfig,
    ToolConfig,
};
pub use engine::{
    CollisionEvent, Effect, Effects, GameEngine, HitKind, InputEdges, PlayerInput, Rejection,
    TickInput, TickOutcome,
};
pub use env::{
    AnchorKind, Category, Env, GameEnv, OracleError, RayCaster, RayHit, RigOracle, SceneOracle,
};
pub use error::{ErrorSeverity, GameError, RejectionKind};
pub use projectile::{
    CollisionOutcome, HitError, HolderLookup, IgnoreReason, ResolveHitAction, find_status_holder,
};
pub use state::{
    Attachment, EntityId, Form, GameState, Pose, ProjectileId, ProjectileState, PlayerState, Ray,
    Scheduler, StateError, StatusEffect, Timer, Timestamp, ToolState, WandState,
};
pub use status::{CureAction, CureOutcome, FrogOutcome, StatusError, TransformToFrogAction};
pub use targeting::{
    AccuseAction, AcquireTargetAction, ProbeInteractionAction, TargetChange, TargetQuery,
    TargetTracker, TargetingError,
};
pub use tools::{
    DropWandAction, EquipWandAction, ForceDropAndPointAction, ForcedPoint, HandOutAction,
    PickUpWandAction, StowAction, ToolError, WandPickedUpNotice,
};
