//! Reticle highlight output.

use hunt_core::EntityId;

/// Receives highlight toggles for a player's reticle.
///
/// Several rules may write within a single tick; the last call wins.
pub trait HighlightSink: Send + Sync {
    fn set_highlight(&self, player: EntityId, on: bool);
}

/// Sink that only traces highlight changes.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingHighlightSink;

impl HighlightSink for LoggingHighlightSink {
    fn set_highlight(&self, player: EntityId, on: bool) {
        tracing::debug!(target: "runtime::highlight", player = %player, on, "highlight");
    }
}
