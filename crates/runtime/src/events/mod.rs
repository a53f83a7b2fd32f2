//! What a witch-hunt session reports back to its listeners.
//!
//! The console prints [`Topic::Effects`]. [`Topic::Session`] records who
//! joined and where wands were placed.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{EffectEvent, RejectionEvent, SessionEvent};
