//! Simulation worker that owns the authoritative [`hunt_core::GameState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], drives
//! [`hunt_core::GameEngine`] against the stand-in [`SimWorld`], feeds the
//! produced effects back into the world and publishes them to the EventBus.

use std::sync::Arc;

use glam::Vec3;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use hunt_core::{
    CureAction, CureOutcome, Effect, EntityId, GameEngine, GameState, RechargeAction, StateError,
    TickInput, TickOutcome, Timestamp,
};

use crate::api::{HighlightSink, Result, RuntimeError};
use crate::events::{EffectEvent, Event, EventBus, RejectionEvent, SessionEvent};
use crate::world::{Flights, SimWorld};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Advance one frame with the given player inputs.
    Tick {
        input: TickInput,
        reply: oneshot::Sender<Result<TickOutcome>>,
    },
    /// Build a player rig at `position` and register it with the rules.
    SpawnPlayer {
        player: EntityId,
        position: Vec3,
        reply: oneshot::Sender<Result<()>>,
    },
    DespawnPlayer {
        player: EntityId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Place a charged wand collider at `position`.
    PlaceWand {
        wand: EntityId,
        name: String,
        position: Vec3,
        reply: oneshot::Sender<Result<()>>,
    },
    Cure {
        player: EntityId,
        reply: oneshot::Sender<Result<CureOutcome>>,
    },
    Recharge {
        wand: EntityId,
        reply: oneshot::Sender<Result<bool>>,
    },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
}

/// Background task that processes gameplay commands.
///
/// Every mutation, including hits across players, is serialized through the
/// command channel; no other task touches the state or the world.
pub struct SimulationWorker {
    state: GameState,
    world: SimWorld,
    flights: Flights,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    highlight: Option<Arc<dyn HighlightSink>>,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        state: GameState,
        world: SimWorld,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        highlight: Option<Arc<dyn HighlightSink>>,
    ) -> Self {
        tracing::info!(
            players = state.players().count(),
            wands = state.wands().count(),
            "SimulationWorker initialized"
        );

        Self {
            state,
            world,
            flights: Flights::new(),
            command_rx,
            event_bus,
            highlight,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                }
                else => break,
            }
        }
        debug!("SimulationWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Tick { input, reply } => {
                let result = self.handle_tick(input);
                if reply.send(result).is_err() {
                    debug!("Tick reply channel closed (caller dropped)");
                }
            }
            Command::SpawnPlayer {
                player,
                position,
                reply,
            } => {
                let result = self.spawn_player(player, position);
                if reply.send(result).is_err() {
                    debug!("SpawnPlayer reply channel closed (caller dropped)");
                }
            }
            Command::DespawnPlayer { player, reply } => {
                let result = self.despawn_player(player);
                if reply.send(result).is_err() {
                    debug!("DespawnPlayer reply channel closed (caller dropped)");
                }
            }
            Command::PlaceWand {
                wand,
                name,
                position,
                reply,
            } => {
                let result = self.place_wand(wand, name, position);
                if reply.send(result).is_err() {
                    debug!("PlaceWand reply channel closed (caller dropped)");
                }
            }
            Command::Cure { player, reply } => {
                let result = self.cure(player);
                if reply.send(result).is_err() {
                    debug!("Cure reply channel closed (caller dropped)");
                }
            }
            Command::Recharge { wand, reply } => {
                let result = self.recharge(wand);
                if reply.send(result).is_err() {
                    debug!("Recharge reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Moves rigs to the reported poses, sweeps projectiles, then ticks the
    /// rules with the resulting contacts appended to the host collisions.
    fn handle_tick(&mut self, mut input: TickInput) -> Result<TickOutcome> {
        for player in &input.players {
            self.world.move_body(player.player, player.pose.position);
        }
        let contacts = self.flights.sweep(&self.world, input.dt_ms);
        input.collisions.extend(contacts);

        let outcome = {
            let mut engine = GameEngine::new(&mut self.state, self.world.env())?;
            engine.tick(&input)
        };

        trace!(
            target: "runtime::worker",
            now = %outcome.now,
            effects = outcome.effects.len(),
            rejections = outcome.rejections.len(),
            in_flight = self.flights.len(),
            "tick"
        );

        self.apply_effects(&outcome.effects);
        self.publish_effects(outcome.now, &outcome.effects);
        for rejection in &outcome.rejections {
            debug!(
                target: "runtime::worker",
                actor = %rejection.actor,
                action = rejection.action,
                code = rejection.code,
                "Action rejected"
            );
            self.event_bus.publish(Event::Rejected(RejectionEvent {
                at: outcome.now,
                rejection: rejection.clone(),
            }));
        }
        self.event_bus
            .publish(Event::Session(SessionEvent::TickCompleted {
                now: outcome.now,
                effects: outcome.effects.len(),
                rejections: outcome.rejections.len(),
            }));

        Ok(outcome)
    }

    fn spawn_player(&mut self, player: EntityId, position: Vec3) -> Result<()> {
        if self.world.body(player).is_some() {
            return Err(StateError::DuplicateEntity(player).into());
        }
        self.world.spawn_body(player, position);

        let spawned = GameEngine::new(&mut self.state, self.world.env())
            .map_err(RuntimeError::from)
            .and_then(|mut engine| engine.spawn_player(player).map_err(RuntimeError::from));
        if let Err(error) = spawned {
            self.world.despawn_body(player);
            return Err(error);
        }

        self.event_bus
            .publish(Event::Session(SessionEvent::PlayerSpawned { player, position }));
        Ok(())
    }

    fn despawn_player(&mut self, player: EntityId) -> Result<()> {
        {
            let mut engine = GameEngine::new(&mut self.state, self.world.env())?;
            engine.despawn_player(player)?;
        }
        self.world.despawn_body(player);
        self.event_bus
            .publish(Event::Session(SessionEvent::PlayerDespawned { player }));
        Ok(())
    }

    fn place_wand(&mut self, wand: EntityId, name: String, position: Vec3) -> Result<()> {
        if self.world.body(wand).is_some() {
            return Err(StateError::DuplicateEntity(wand).into());
        }
        {
            let mut engine = GameEngine::new(&mut self.state, self.world.env())?;
            engine.place_wand(wand, name)?;
        }
        self.world.place_wand(wand, position);
        self.event_bus
            .publish(Event::Session(SessionEvent::WandPlaced { wand, position }));
        Ok(())
    }

    fn cure(&mut self, player: EntityId) -> Result<CureOutcome> {
        let (outcome, effects) = {
            let mut engine = GameEngine::new(&mut self.state, self.world.env())?;
            engine
                .execute(&CureAction { player })
                .map_err(|e| RuntimeError::rejected("cure", e))?
        };
        self.publish_effects(self.state.now(), &effects);
        Ok(outcome)
    }

    fn recharge(&mut self, wand: EntityId) -> Result<bool> {
        let (recharged, effects) = {
            let mut engine = GameEngine::new(&mut self.state, self.world.env())?;
            engine
                .execute(&RechargeAction { wand })
                .map_err(|e| RuntimeError::rejected("recharge", e))?
        };
        self.publish_effects(self.state.now(), &effects);
        Ok(recharged)
    }

    /// Mirrors effects that concern the physics layer into the world.
    fn apply_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::ProjectileSpawned {
                    projectile,
                    caster,
                    origin,
                    impulse,
                    ..
                } => self.flights.launch(*projectile, *caster, *origin, *impulse),
                Effect::ProjectileDespawned { projectile } => {
                    self.flights.remove(*projectile);
                }
                Effect::WandAttached { player, wand, .. } => self.world.attach_wand(*player, *wand),
                Effect::WandDropped { wand, position, .. } => {
                    self.world.release_wand(*wand, *position)
                }
                Effect::Highlight { player, on } => {
                    if let Some(sink) = &self.highlight {
                        sink.set_highlight(*player, *on);
                    }
                }
                _ => {}
            }
        }
    }

    fn publish_effects(&self, at: Timestamp, effects: &[Effect]) {
        for effect in effects {
            self.event_bus.publish(Event::Effect(EffectEvent {
                at,
                effect: effect.clone(),
            }));
        }
    }
}
