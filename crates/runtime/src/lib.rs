//! Runtime orchestration for the witch hunt interaction rules.
//!
//! This crate wraps [`hunt_core::GameEngine`] in a tokio harness: a single
//! worker task owns the state and the stand-in scene, clients talk to it
//! through [`RuntimeHandle`], and every effect is published on a topic-based
//! [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`world`] provides the stand-in scene, raycasts and projectile sweep
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;
pub mod world;

mod workers;

pub use api::{HighlightSink, LoggingHighlightSink, Result, RuntimeError, RuntimeHandle};
pub use events::{EffectEvent, Event, EventBus, RejectionEvent, SessionEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use world::{Body, Flight, Flights, SimWorld};
