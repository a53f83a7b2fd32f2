//! Session startup and teardown.
//!
//! [`RuntimeBuilder`] seeds the session with its level wands and scene, then
//! starts the worker that owns the game state until every handle is gone.

use std::env;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use hunt_content::LevelSpec;
use hunt_core::{GameConfig, GameState, StateError};

use crate::api::{HighlightSink, Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::world::SimWorld;
use crate::workers::{Command, SimulationWorker};

/// Channel sizes and rule tuning for one session.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    /// Construct runtime configuration from environment variables.
    ///
    /// Environment variables:
    /// - `HUNT_EVENT_BUFFER` - Per-topic event capacity (default: 100)
    /// - `HUNT_COMMAND_BUFFER` - Command queue capacity (default: 32)
    ///
    /// The game configuration stays at its defaults; load it from content
    /// files and assign it afterwards.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(size) = read_env::<usize>("HUNT_EVENT_BUFFER") {
            config.event_buffer_size = size.max(1);
        }
        if let Some(size) = read_env::<usize>("HUNT_COMMAND_BUFFER") {
            config.command_buffer_size = size.max(1);
        }

        config
    }

    pub fn with_game_config(mut self, game_config: GameConfig) -> Self {
        self.game_config = game_config;
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// A running witch-hunt session and its simulation task.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Starts describing a session
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Handle for driving players and reading output
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Follow one topic without keeping a handle
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Waits for the simulation task to finish
    ///
    /// The worker stops once every handle clone has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Level, scene and sinks for a session that has not started yet.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    world: Option<SimWorld>,
    level: LevelSpec,
    highlight: Option<Arc<dyn HighlightSink>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            world: None,
            level: LevelSpec::default(),
            highlight: None,
        }
    }

    /// Channel sizes and rule tuning
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Resume from an existing state
    ///
    /// When omitted, an empty session is created from the configured
    /// [`GameConfig`].
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Provide a pre-built scene (defaults to an empty [`SimWorld`])
    pub fn world(mut self, world: SimWorld) -> Self {
        self.world = Some(world);
        self
    }

    /// Wands placed before the worker starts
    pub fn level(mut self, level: LevelSpec) -> Self {
        self.level = level;
        self
    }

    /// Forward reticle highlight toggles to `sink`
    pub fn highlight_sink(mut self, sink: Arc<dyn HighlightSink>) -> Self {
        self.highlight = Some(sink);
        self
    }

    /// Places the level wands and starts the simulation worker
    pub async fn build(self) -> Result<Runtime> {
        let mut state = self
            .state
            .unwrap_or_else(|| GameState::new(self.config.game_config.clone()));
        let mut world = self.world.unwrap_or_else(SimWorld::new);

        for spawn in &self.level.wands {
            let wand = spawn.entity();
            if world.body(wand).is_some() {
                return Err(StateError::DuplicateEntity(wand).into());
            }
            state.place_wand(wand, spawn.display_name())?;
            world.place_wand(wand, spawn.position());
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(state, world, command_rx, event_bus, self.highlight);

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}
