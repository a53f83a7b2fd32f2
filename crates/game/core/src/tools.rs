//! Tool exclusivity between the pointing hand and the wand.
//!
//! ```text
//!   HandOut <──> None <──> WandEquipped
//! ```
//!
//! There is no direct edge between `HandOut` and `WandEquipped`. Bringing the
//! hand out while holding a wand requires dropping it first, which
//! [`ForceDropAndPointAction`] does with a short settle delay.

use glam::Vec3;

use crate::action::ActionTransition;
use crate::engine::{Effect, Effects};
use crate::env::GameEnv;
use crate::error::{ErrorSeverity, GameError, RejectionKind};
use crate::state::{EntityId, GameState, Pose, Timer, Timestamp, ToolState};
use crate::targeting::{emit_hover_change, emit_pointing_change};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ToolError {
    #[error("player {0} not found")]
    PlayerNotFound(EntityId),

    #[error("wand {0} not found")]
    WandNotFound(EntityId),

    #[error("player {player} holds wand {wand}; drop it before pointing")]
    WandEquipped { player: EntityId, wand: EntityId },

    #[error("player {player} has the hand out; stow it first")]
    HandOut { player: EntityId },

    #[error("player {player} already has the hand out")]
    HandAlreadyOut { player: EntityId },

    #[error("player {player} does not have the hand out")]
    HandNotOut { player: EntityId },

    #[error("player {player} already holds wand {wand}")]
    AlreadyHoldingWand { player: EntityId, wand: EntityId },

    #[error("player {player} holds no wand")]
    NoWandEquipped { player: EntityId },

    #[error("wand {wand} is held by {holder}")]
    WandTaken { wand: EntityId, holder: EntityId },
}

impl GameError for ToolError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PlayerNotFound(_) | Self::WandNotFound(_) => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn rejection_kind(&self) -> RejectionKind {
        match self {
            Self::PlayerNotFound(_) | Self::WandNotFound(_) => RejectionKind::UnknownEntity,
            _ => RejectionKind::ToolConflict,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PlayerNotFound(_) => "TOOL_PLAYER_NOT_FOUND",
            Self::WandNotFound(_) => "TOOL_WAND_NOT_FOUND",
            Self::WandEquipped { .. } => "TOOL_WAND_EQUIPPED",
            Self::HandOut { .. } => "TOOL_HAND_OUT",
            Self::HandAlreadyOut { .. } => "TOOL_HAND_ALREADY_OUT",
            Self::HandNotOut { .. } => "TOOL_HAND_NOT_OUT",
            Self::AlreadyHoldingWand { .. } => "TOOL_ALREADY_HOLDING_WAND",
            Self::NoWandEquipped { .. } => "TOOL_NO_WAND_EQUIPPED",
            Self::WandTaken { .. } => "TOOL_WAND_TAKEN",
        }
    }
}

fn hand_out_allowed(state: &GameState, player: EntityId) -> Result<(), ToolError> {
    let player_state = state
        .player(player)
        .ok_or(ToolError::PlayerNotFound(player))?;
    if let Some(wand) = player_state.equipped_wand() {
        return Err(ToolError::WandEquipped { player, wand });
    }
    if player_state.tool() == ToolState::HandOut {
        return Err(ToolError::HandAlreadyOut { player });
    }
    Ok(())
}

fn equip_allowed(state: &GameState, player: EntityId, wand: EntityId) -> Result<(), ToolError> {
    let player_state = state
        .player(player)
        .ok_or(ToolError::PlayerNotFound(player))?;
    let wand_state = state.wand(wand).ok_or(ToolError::WandNotFound(wand))?;
    if let Some(held) = player_state.equipped_wand() {
        return Err(ToolError::AlreadyHoldingWand { player, wand: held });
    }
    if let Some(holder) = wand_state.equipped_by() {
        return Err(ToolError::WandTaken { wand, holder });
    }
    Ok(())
}

/// Hides the hand and releases everything it was pointing at.
fn put_hand_away(
    state: &mut GameState,
    player: EntityId,
    effects: &mut Effects,
) -> Result<(), ToolError> {
    state.scheduler.cancel(Timer::HandSettle(player));
    let player_state = state
        .player_mut(player)
        .ok_or(ToolError::PlayerNotFound(player))?;
    player_state.tool = ToolState::None;
    match player_state.pointing.clear() {
        Some(change) => emit_pointing_change(effects, player, change),
        None => effects.push(Effect::Highlight { player, on: false }),
    }
    effects.push(Effect::HandHidden { player });
    Ok(())
}

/// Shows the pointing hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandOutAction {
    pub player: EntityId,
}

impl ActionTransition for HandOutAction {
    type Error = ToolError;
    type Result = ();

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "hand_out"
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        hand_out_allowed(state, self.player)
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<(), Self::Error> {
        state.scheduler.cancel(Timer::HandSettle(self.player));
        let player = state
            .player_mut(self.player)
            .ok_or(ToolError::PlayerNotFound(self.player))?;
        player.tool = ToolState::HandOut;
        effects.push(Effect::HandShown {
            player: self.player,
            attachment: player.hand_attachment,
        });
        tracing::debug!(player = %self.player, "hand out");
        Ok(())
    }
}

/// Puts the pointing hand away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StowAction {
    pub player: EntityId,
}

impl ActionTransition for StowAction {
    type Error = ToolError;
    type Result = ();

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "stow"
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let player = state
            .player(self.player)
            .ok_or(ToolError::PlayerNotFound(self.player))?;
        if player.tool() != ToolState::HandOut {
            return Err(ToolError::HandNotOut {
                player: self.player,
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<(), Self::Error> {
        put_hand_away(state, self.player, effects)?;
        tracing::debug!(player = %self.player, "hand stowed");
        Ok(())
    }
}

/// Puts a wand in an empty-handed player's grip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipWandAction {
    pub player: EntityId,
    pub wand: EntityId,
}

impl ActionTransition for EquipWandAction {
    type Error = ToolError;
    type Result = ();

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "equip_wand"
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        equip_allowed(state, self.player, self.wand)?;
        match state.player(self.player).map(|p| p.tool()) {
            Some(ToolState::HandOut) => Err(ToolError::HandOut {
                player: self.player,
            }),
            _ => Ok(()),
        }
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<(), Self::Error> {
        let player = state
            .players
            .get_mut(&self.player)
            .ok_or(ToolError::PlayerNotFound(self.player))?;
        let wand = state
            .wands
            .get_mut(&self.wand)
            .ok_or(ToolError::WandNotFound(self.wand))?;

        player.tool = ToolState::WandEquipped;
        player.equipped_wand = Some(self.wand);
        wand.equipped_by = Some(self.player);

        effects.push(Effect::WandAttached {
            player: self.player,
            wand: self.wand,
            attachment: player.wand_attachment,
        });
        effects.push(Effect::AmmoChanged {
            wand: self.wand,
            remaining: wand.ammo_remaining,
            capacity: wand.capacity,
        });
        tracing::debug!(player = %self.player, wand = %self.wand, "wand equipped");
        Ok(())
    }
}

/// Releases the held wand and tosses it in front of the player.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropWandAction {
    pub player: EntityId,
    pub pose: Pose,
}

impl DropWandAction {
    /// Resting position and launch impulse for the dropped wand.
    pub fn placement(&self, state: &GameState) -> (Vec3, Vec3) {
        let tools = &state.config.tools;
        let forward = self.pose.forward;
        let position =
            self.pose.position + forward * tools.drop_forward_offset + Vec3::Y * tools.drop_up_offset;
        let impulse = forward * tools.drop_impulse_forward + Vec3::Y * tools.drop_impulse_up;
        (position, impulse)
    }
}

impl ActionTransition for DropWandAction {
    type Error = ToolError;
    type Result = EntityId;

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "drop_wand"
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let player = state
            .player(self.player)
            .ok_or(ToolError::PlayerNotFound(self.player))?;
        let wand = player.equipped_wand().ok_or(ToolError::NoWandEquipped {
            player: self.player,
        })?;
        state.wand(wand).ok_or(ToolError::WandNotFound(wand))?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<EntityId, Self::Error> {
        let (position, impulse) = self.placement(state);
        let player = state
            .players
            .get_mut(&self.player)
            .ok_or(ToolError::PlayerNotFound(self.player))?;
        let wand_id = player.equipped_wand.ok_or(ToolError::NoWandEquipped {
            player: self.player,
        })?;
        let wand = state
            .wands
            .get_mut(&wand_id)
            .ok_or(ToolError::WandNotFound(wand_id))?;

        player.tool = ToolState::None;
        player.equipped_wand = None;
        wand.equipped_by = None;
        if let Some(change) = player.pointing.clear() {
            emit_pointing_change(effects, self.player, change);
        }

        effects.push(Effect::WandDropped {
            player: self.player,
            wand: wand_id,
            position,
            impulse,
        });
        tracing::debug!(player = %self.player, wand = %wand_id, "wand dropped");
        Ok(wand_id)
    }
}

/// Tells the coordinator a wand was just picked up; stows the hand if out.
///
/// Returns whether the hand was stowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WandPickedUpNotice {
    pub player: EntityId,
}

impl ActionTransition for WandPickedUpNotice {
    type Error = ToolError;
    type Result = bool;

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "wand_picked_up"
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        state
            .player(self.player)
            .ok_or(ToolError::PlayerNotFound(self.player))?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<bool, Self::Error> {
        let hand_out = state
            .player(self.player)
            .ok_or(ToolError::PlayerNotFound(self.player))?
            .is_hand_out();
        if hand_out {
            put_hand_away(state, self.player, effects)?;
        }
        Ok(hand_out)
    }
}

/// Picks up a free wand, stowing the hand first when it is out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PickUpWandAction {
    pub player: EntityId,
    pub wand: EntityId,
}

impl ActionTransition for PickUpWandAction {
    type Error = ToolError;
    type Result = ();

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "pick_up_wand"
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        equip_allowed(state, self.player, self.wand)
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<(), Self::Error> {
        WandPickedUpNotice {
            player: self.player,
        }
        .apply(state, env, effects)?;

        let player = state
            .player_mut(self.player)
            .ok_or(ToolError::PlayerNotFound(self.player))?;
        if let Some(change) = player.hover.clear() {
            emit_hover_change(effects, self.player, change);
        }

        EquipWandAction {
            player: self.player,
            wand: self.wand,
        }
        .apply(state, env, effects)
    }
}

/// How a forced point request was satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForcedPoint {
    /// No wand was held; the hand is out now.
    Immediate,
    /// The wand was dropped; the hand comes out when the settle timer fires.
    Settling { wand: EntityId, until: Timestamp },
}

/// Drops any held wand and brings the hand out.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForceDropAndPointAction {
    pub player: EntityId,
    pub pose: Pose,
}

impl ActionTransition for ForceDropAndPointAction {
    type Error = ToolError;
    type Result = ForcedPoint;

    fn actor(&self) -> EntityId {
        self.player
    }

    fn label(&self) -> &'static str {
        "force_drop_and_point"
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let player = state
            .player(self.player)
            .ok_or(ToolError::PlayerNotFound(self.player))?;
        match player.equipped_wand() {
            Some(_) => self.drop_action().pre_validate(state, env),
            None => hand_out_allowed(state, self.player),
        }
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        effects: &mut Effects,
    ) -> Result<ForcedPoint, Self::Error> {
        let holding = state
            .player(self.player)
            .ok_or(ToolError::PlayerNotFound(self.player))?
            .equipped_wand()
            .is_some();
        if !holding {
            HandOutAction {
                player: self.player,
            }
            .apply(state, env, effects)?;
            return Ok(ForcedPoint::Immediate);
        }

        let wand = self.drop_action().apply(state, env, effects)?;
        let until = state.now() + state.config.tools.hand_settle_delay_ms;
        state.scheduler.schedule(Timer::HandSettle(self.player), until);
        tracing::debug!(player = %self.player, %until, "hand settling after forced drop");
        Ok(ForcedPoint::Settling { wand, until })
    }
}

impl ForceDropAndPointAction {
    fn drop_action(&self) -> DropWandAction {
        DropWandAction {
            player: self.player,
            pose: self.pose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubWorld, add_player};

    const ME: EntityId = EntityId(1);
    const OTHER: EntityId = EntityId(2);
    const WAND: EntityId = EntityId(50);

    fn setup() -> GameState {
        let mut state = GameState::default();
        add_player(&mut state, ME);
        add_player(&mut state, OTHER);
        state.place_wand(WAND, "Magic Wand").unwrap();
        state
    }

    fn run<A: ActionTransition>(state: &mut GameState, action: A) -> Result<A::Result, A::Error> {
        let world = StubWorld::new();
        action.execute(state, &world.env(), &mut Effects::new())
    }

    fn tool(state: &GameState) -> ToolState {
        state.player(ME).unwrap().tool()
    }

    #[test]
    fn hand_toggles_through_none() {
        let mut state = setup();

        run(&mut state, HandOutAction { player: ME }).unwrap();
        assert_eq!(tool(&state), ToolState::HandOut);
        assert_eq!(
            run(&mut state, HandOutAction { player: ME }),
            Err(ToolError::HandAlreadyOut { player: ME })
        );

        run(&mut state, StowAction { player: ME }).unwrap();
        assert_eq!(tool(&state), ToolState::None);
        assert_eq!(
            run(&mut state, StowAction { player: ME }),
            Err(ToolError::HandNotOut { player: ME })
        );
    }

    #[test]
    fn equip_while_pointing_is_a_conflict() {
        let mut state = setup();
        run(&mut state, HandOutAction { player: ME }).unwrap();

        let err = run(&mut state, EquipWandAction { player: ME, wand: WAND }).unwrap_err();
        assert_eq!(err.rejection_kind(), RejectionKind::ToolConflict);
        assert_eq!(tool(&state), ToolState::HandOut);
        assert_eq!(state.wand(WAND).unwrap().equipped_by(), None);

        run(&mut state, StowAction { player: ME }).unwrap();
        run(&mut state, EquipWandAction { player: ME, wand: WAND }).unwrap();
        assert_eq!(tool(&state), ToolState::WandEquipped);
        assert_eq!(state.wand(WAND).unwrap().equipped_by(), Some(ME));
        assert_eq!(state.player(ME).unwrap().equipped_wand(), Some(WAND));
    }

    #[test]
    fn hand_out_with_wand_keeps_the_wand() {
        let mut state = setup();
        run(&mut state, EquipWandAction { player: ME, wand: WAND }).unwrap();

        assert_eq!(
            run(&mut state, HandOutAction { player: ME }),
            Err(ToolError::WandEquipped { player: ME, wand: WAND })
        );
        assert_eq!(tool(&state), ToolState::WandEquipped);
        assert!(state.wand(WAND).unwrap().is_equipped());
    }

    #[test]
    fn dropped_wand_lands_in_front() {
        let mut state = setup();
        run(&mut state, EquipWandAction { player: ME, wand: WAND }).unwrap();

        let world = StubWorld::new();
        let mut effects = Effects::new();
        let pose = Pose::new(Vec3::new(1.0, 0.0, 0.0), Vec3::X);
        DropWandAction { player: ME, pose }
            .execute(&mut state, &world.env(), &mut effects)
            .unwrap();

        assert_eq!(tool(&state), ToolState::None);
        assert!(!state.wand(WAND).unwrap().is_equipped());
        assert_eq!(
            effects.into_vec(),
            vec![Effect::WandDropped {
                player: ME,
                wand: WAND,
                position: Vec3::new(3.0, 1.0, 0.0),
                impulse: Vec3::new(3.0, 2.0, 0.0),
            }]
        );
    }

    #[test]
    fn forced_point_drops_then_settles() {
        let mut state = setup();
        run(&mut state, EquipWandAction { player: ME, wand: WAND }).unwrap();

        let outcome = run(
            &mut state,
            ForceDropAndPointAction {
                player: ME,
                pose: Pose::default(),
            },
        )
        .unwrap();

        let settle = state.now() + state.config.tools.hand_settle_delay_ms;
        assert_eq!(outcome, ForcedPoint::Settling { wand: WAND, until: settle });
        assert_eq!(tool(&state), ToolState::None);
        assert_eq!(state.scheduler().due_at(Timer::HandSettle(ME)), Some(settle));
    }

    #[test]
    fn forced_point_without_wand_is_a_plain_hand_out() {
        let mut state = setup();
        let outcome = run(
            &mut state,
            ForceDropAndPointAction {
                player: ME,
                pose: Pose::default(),
            },
        )
        .unwrap();

        assert_eq!(outcome, ForcedPoint::Immediate);
        assert_eq!(tool(&state), ToolState::HandOut);
        assert!(!state.scheduler().is_pending(Timer::HandSettle(ME)));
    }

    #[test]
    fn pickup_stows_the_hand() {
        let mut state = setup();
        run(&mut state, HandOutAction { player: ME }).unwrap();

        run(&mut state, PickUpWandAction { player: ME, wand: WAND }).unwrap();
        assert_eq!(tool(&state), ToolState::WandEquipped);
    }

    #[test]
    fn held_wand_cannot_be_taken() {
        let mut state = setup();
        run(&mut state, PickUpWandAction { player: OTHER, wand: WAND }).unwrap();

        assert_eq!(
            run(&mut state, PickUpWandAction { player: ME, wand: WAND }),
            Err(ToolError::WandTaken { wand: WAND, holder: OTHER })
        );
        assert_eq!(tool(&state), ToolState::None);
    }

    #[test]
    fn tool_state_never_jumps_between_tools() {
        let mut state = setup();
        let pose = Pose::default();
        let mut previous = tool(&state);

        for step in 0..40u32 {
            let _ = match step % 5 {
                0 => run(&mut state, HandOutAction { player: ME }).map(|_| ()),
                1 => run(&mut state, EquipWandAction { player: ME, wand: WAND }),
                2 => run(&mut state, StowAction { player: ME }),
                3 => run(&mut state, DropWandAction { player: ME, pose }).map(|_| ()),
                _ => run(&mut state, ForceDropAndPointAction { player: ME, pose }).map(|_| ()),
            };
            let current = tool(&state);
            assert!(
                !matches!(
                    (previous, current),
                    (ToolState::HandOut, ToolState::WandEquipped)
                        | (ToolState::WandEquipped, ToolState::HandOut)
                ),
                "jumped from {previous} to {current}"
            );
            previous = current;
        }
    }
}
