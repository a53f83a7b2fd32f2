//! Session controls for clients and tests.
//!
//! Every call is queued to the simulation worker and answered once the
//! worker has applied it, so callers observe operations in submission order.
use glam::Vec3;
use tokio::sync::{broadcast, mpsc, oneshot};

use hunt_core::{CureOutcome, EntityId, GameState, TickInput, TickOutcome};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Cloneable access to one running witch-hunt session.
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Advance the simulation by one frame
    pub async fn tick(&self, input: TickInput) -> Result<TickOutcome> {
        self.request(|reply| Command::Tick { input, reply }).await?
    }

    /// Advance the clock without any player input
    pub async fn advance(&self, dt_ms: u64) -> Result<TickOutcome> {
        self.tick(TickInput::advance(dt_ms)).await
    }

    /// Spawn a player rig standing at `position`
    pub async fn spawn_player(&self, player: EntityId, position: Vec3) -> Result<()> {
        self.request(|reply| Command::SpawnPlayer {
            player,
            position,
            reply,
        })
        .await?
    }

    pub async fn despawn_player(&self, player: EntityId) -> Result<()> {
        self.request(|reply| Command::DespawnPlayer { player, reply })
            .await?
    }

    /// Place a charged wand resting at `position`
    pub async fn place_wand(
        &self,
        wand: EntityId,
        name: impl Into<String>,
        position: Vec3,
    ) -> Result<()> {
        let name = name.into();
        self.request(|reply| Command::PlaceWand {
            wand,
            name,
            position,
            reply,
        })
        .await?
    }

    /// Turn a frog back into a human immediately
    pub async fn cure(&self, player: EntityId) -> Result<CureOutcome> {
        self.request(|reply| Command::Cure { player, reply }).await?
    }

    /// Refill a wand; returns whether any ammo was added
    pub async fn recharge(&self, wand: EntityId) -> Result<bool> {
        self.request(|reply| Command::Recharge { wand, reply })
            .await?
    }

    /// Copy of the session state as of the last applied command
    pub async fn query_state(&self) -> Result<GameState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Follow one topic of session output
    ///
    /// # Topics
    ///
    /// - `Topic::Effects` - Effects produced by ticks and direct operations
    /// - `Topic::Rejections` - Operations the rules declined
    /// - `Topic::Session` - Spawns, placements and tick summaries
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use hunt_runtime::Topic;
    ///
    /// let mut effects = handle.subscribe(Topic::Effects);
    /// while let Ok(event) = effects.recv().await {
    ///     // update the reticle, HUD and frog models
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Follow several topics, one receiver each
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Bus shared by every handle of this session
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
