//! Per-frame orchestration of the interaction rules.
//!
//! The [`GameEngine`] is the only writer of [`GameState`]. Each tick runs in
//! a fixed order:
//!
//! 1. advance the clock and fire due timers in due order;
//! 2. resolve projectile collisions reported by the physics layer;
//! 3. per player, in ascending id order: tool edges, pickup probe, interact,
//!    target acquisition (tool out only), point, cast, reload.
//!
//! Declined operations never abort the tick. They are logged and surfaced as
//! [`Rejection`] records next to the effects.

mod effect;
mod input;

pub use effect::{Effect, Effects, HitKind, Rejection};
pub use input::{CollisionEvent, InputEdges, PlayerInput, TickInput, TickOutcome};

use crate::action::ActionTransition;
use crate::casting::{self, CastAction, ReloadAction};
use crate::env::{AnchorKind, GameEnv, OracleError};
use crate::error::{GameError, RejectionKind};
use crate::projectile::{self, ResolveHitAction};
use crate::state::{
    Attachment, EntityId, GameState, PlayerState, StateError, Timer, Timestamp, ToolState,
};
use crate::status;
use crate::targeting::{AccuseAction, AcquireTargetAction, ProbeInteractionAction};
use crate::tools::{
    DropWandAction, ForceDropAndPointAction, HandOutAction, PickUpWandAction, StowAction,
};

/// Drives [`GameState`] one tick at a time against the injected collaborators.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
    env: GameEnv<'a>,
}

impl<'a> GameEngine<'a> {
    /// Creates an engine, failing fast when a required collaborator is missing.
    pub fn new(state: &'a mut GameState, env: GameEnv<'a>) -> Result<Self, OracleError> {
        env.validate()?;
        Ok(Self { state, env })
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Registers a player, resolving its hand and wand anchors once.
    pub fn spawn_player(&mut self, player: EntityId) -> Result<(), StateError> {
        let hand = self.resolve_attachment(player, AnchorKind::Hand);
        let grip = self.resolve_attachment(player, AnchorKind::WandGrip);
        self.state
            .insert_player(PlayerState::new(player, hand, grip))?;
        tracing::debug!(player = %player, "player spawned");
        Ok(())
    }

    fn resolve_attachment(&self, player: EntityId, kind: AnchorKind) -> Attachment {
        match self.env.rig().and_then(|rig| rig.anchor(player, kind)) {
            Some(anchor) => Attachment::Anchor(anchor),
            None => {
                let offset = self.state.config.tools.fallback_anchor_offset;
                tracing::warn!(
                    player = %player,
                    anchor = %kind,
                    kind = %RejectionKind::NoHandAnchor,
                    ?offset,
                    "no anchor on rig, using root offset"
                );
                Attachment::RootOffset(offset)
            }
        }
    }

    /// Removes a player, releasing its wand and pending timers.
    pub fn despawn_player(&mut self, player: EntityId) -> Result<PlayerState, StateError> {
        let removed = self.state.remove_player(player)?;
        if let Some(wand) = removed
            .equipped_wand()
            .and_then(|wand| self.state.wand_mut(wand))
        {
            wand.equipped_by = None;
        }
        self.state.scheduler.cancel(Timer::FrogRevert(player));
        self.state.scheduler.cancel(Timer::HandSettle(player));
        tracing::debug!(player = %player, "player despawned");
        Ok(removed)
    }

    pub fn place_wand(
        &mut self,
        wand: EntityId,
        name: impl Into<String>,
    ) -> Result<(), StateError> {
        self.state.place_wand(wand, name)
    }

    /// Runs a single operation outside the tick pipeline.
    pub fn execute<A>(&mut self, action: &A) -> Result<(A::Result, Vec<Effect>), A::Error>
    where
        A: ActionTransition,
    {
        let mut effects = Effects::new();
        let result = action.execute(self.state, &self.env, &mut effects)?;
        Ok((result, effects.into_vec()))
    }

    /// Advances the simulation by one frame.
    pub fn tick(&mut self, input: &TickInput) -> TickOutcome {
        let mut frame = Frame::default();
        let target = self.state.now() + input.dt_ms;

        self.fire_due_timers(target, &mut frame);
        self.state.set_now(target);

        for collision in &input.collisions {
            let action = ResolveHitAction {
                projectile: collision.projectile,
                other: collision.other,
                point: collision.point,
            };
            if let Some(outcome) = self.run(&action, &mut frame) {
                tracing::trace!(projectile = %collision.projectile, ?outcome, "collision");
            }
        }

        let mut players = input.players.clone();
        players.sort_by_key(|input| input.player);
        for player_input in &players {
            self.process_player(player_input, &mut frame);
        }

        TickOutcome {
            now: self.state.now(),
            effects: frame.effects.into_vec(),
            rejections: frame.rejections,
        }
    }

    fn fire_due_timers(&mut self, until: Timestamp, frame: &mut Frame) {
        while let Some((timer, due)) = self.state.scheduler.pop_due(until) {
            self.state.set_now(due.max(self.state.now()));
            tracing::trace!(%timer, %due, "timer fired");
            match timer {
                Timer::FrogRevert(player) => {
                    if let Err(err) = status::revert(self.state, player, &mut frame.effects) {
                        frame.reject(player, "frog_revert", &err);
                    }
                }
                Timer::HandSettle(player) => {
                    self.run(&HandOutAction { player }, frame);
                }
                Timer::CastCooldown(wand) => casting::finish_cooldown(self.state, wand),
                Timer::Reload(wand) => casting::finish_reload(self.state, wand, &mut frame.effects),
                Timer::ProjectileExpire(id) | Timer::ProjectileDespawn(id) => {
                    projectile::despawn(self.state, id, &mut frame.effects);
                }
            }
        }
    }

    fn process_player(&mut self, input: &PlayerInput, frame: &mut Frame) {
        let player = input.player;
        let Some(tool) = self.state.player(player).map(PlayerState::tool) else {
            frame.reject(player, "tick", &StateError::PlayerNotFound(player));
            return;
        };
        let edges = input.edges;

        if edges.contains(InputEdges::TOGGLE_HAND) {
            if tool == ToolState::HandOut {
                self.run(&StowAction { player }, frame);
            } else {
                self.run(&HandOutAction { player }, frame);
            }
        }
        if edges.contains(InputEdges::FORCE_POINT) {
            self.run(
                &ForceDropAndPointAction {
                    player,
                    pose: input.pose,
                },
                frame,
            );
        }
        if edges.contains(InputEdges::DROP) {
            self.run(
                &DropWandAction {
                    player,
                    pose: input.pose,
                },
                frame,
            );
        }

        self.run(
            &ProbeInteractionAction {
                player,
                aim: input.aim,
            },
            frame,
        );
        if edges.contains(InputEdges::INTERACT) {
            match self.state.player(player).and_then(PlayerState::hovered_wand) {
                Some(wand) => {
                    self.run(&PickUpWandAction { player, wand }, frame);
                }
                None => tracing::trace!(player = %player, "nothing to interact with"),
            }
        }

        if self.state.player(player).is_some_and(|p| p.tool().is_out()) {
            self.run(
                &AcquireTargetAction {
                    player,
                    aim: input.aim,
                },
                frame,
            );
        }
        if edges.contains(InputEdges::POINT) {
            self.run(&AccuseAction { player }, frame);
        }
        if edges.contains(InputEdges::CAST) {
            self.run(
                &CastAction {
                    player,
                    aim: input.aim,
                },
                frame,
            );
        }
        if edges.contains(InputEdges::RELOAD) {
            self.run(&ReloadAction { player }, frame);
        }
    }

    /// Executes `action`, turning a declined request into a rejection record.
    fn run<A>(&mut self, action: &A, frame: &mut Frame) -> Option<A::Result>
    where
        A: ActionTransition,
    {
        match action.execute(self.state, &self.env, &mut frame.effects) {
            Ok(result) => Some(result),
            Err(err) => {
                frame.reject(action.actor(), action.label(), &err);
                None
            }
        }
    }
}

#[derive(Default)]
struct Frame {
    effects: Effects,
    rejections: Vec<Rejection>,
}

impl Frame {
    fn reject<E: GameError>(&mut self, actor: EntityId, action: &'static str, err: &E) {
        tracing::debug!(
            actor = %actor,
            action,
            code = err.error_code(),
            severity = err.severity().as_str(),
            "declined: {err}"
        );
        self.rejections.push(Rejection {
            actor,
            action,
            kind: err.rejection_kind(),
            code: err.error_code(),
            message: err.to_string(),
        });
    }
}
