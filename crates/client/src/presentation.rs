//! Text rendering of effects and state for the console.

use hunt_core::{Effect, EntityId, GameState, Rejection, ToolState};
use hunt_runtime::{Event, Topic, RuntimeHandle};
use tokio::sync::broadcast::error::RecvError;

pub fn describe(effect: &Effect) -> Option<String> {
    let text = match effect {
        Effect::HandShown { player, .. } => format!("{player} raises a pointing hand"),
        Effect::HandHidden { player } => format!("{player} lowers the hand"),
        Effect::WandAttached { player, wand, .. } => format!("{player} picks up wand {wand}"),
        Effect::WandDropped { player, wand, .. } => format!("{player} drops wand {wand}"),
        Effect::TargetEnter { player, target } => format!("{player} is aiming at {target}"),
        Effect::TargetExit { player, target } => format!("{player} looks away from {target}"),
        Effect::WandHover {
            wand,
            hovered: true,
            ..
        } => format!("[E] pick up {wand}"),
        Effect::Accusation { accuser, accused } => format!("{accuser} accuses {accused}!"),
        Effect::ProjectileSpawned {
            projectile, caster, ..
        } => format!("{caster} casts {projectile}"),
        Effect::AmmoChanged {
            wand,
            remaining,
            capacity,
        } => format!("{wand}: {remaining} / {capacity}"),
        Effect::ReloadStarted { wand } => format!("{wand} reloading"),
        Effect::FormChanged { player, form, .. } => format!("{player} is now a {form}"),
        Effect::HitFeedback { kind, point, .. } => {
            format!("spell hit {kind} at ({:.1}, {:.1}, {:.1})", point.x, point.y, point.z)
        }
        Effect::Highlight { .. }
        | Effect::WandHover { .. }
        | Effect::ProjectileDespawned { .. } => return None,
    };
    Some(text)
}

pub fn print_rejections(rejections: &[Rejection]) {
    for rejection in rejections {
        println!("  ({}: {})", rejection.action, rejection.message);
    }
}

pub fn status_lines(state: &GameState, player: EntityId) -> Vec<String> {
    let mut lines = vec![format!("time {}", state.now())];
    let Some(me) = state.player(player) else {
        lines.push(format!("{player} is not in the session"));
        return lines;
    };

    let tool = match me.tool() {
        ToolState::None => "empty-handed".to_owned(),
        ToolState::HandOut => "hand out".to_owned(),
        ToolState::WandEquipped => state
            .equipped_wand_of(player)
            .map(|wand| format!("holding {} ({})", wand.name, wand.ammo_display()))
            .unwrap_or_else(|| "holding a wand".to_owned()),
    };
    lines.push(format!("{player}: {tool}, {}", me.status().form()));
    if let Some(left) = me.status().remaining(state.now()) {
        lines.push(format!("  frog for another {left} ms"));
    }
    if let Some(target) = me.current_target() {
        lines.push(format!("  aiming at {target}"));
    }
    if let Some(prompt) = state.interaction_prompt(player) {
        lines.push(format!("  {prompt}"));
    }
    for other in state.players().filter(|p| p.id != player) {
        lines.push(format!("{}: {}", other.id, other.status().form()));
    }
    lines
}

/// Prints effects as they are published until the runtime shuts down.
pub async fn follow_effects(handle: RuntimeHandle) {
    let mut effects = handle.subscribe(Topic::Effects);
    drop(handle);
    loop {
        match effects.recv().await {
            Ok(Event::Effect(event)) => {
                if let Some(text) = describe(&event.effect) {
                    println!("[{}] {text}", event.at);
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "effect printer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use hunt_core::{Form, GameConfig};

    use super::*;

    #[test]
    fn silent_effects_are_skipped() {
        assert_eq!(
            describe(&Effect::Highlight {
                player: EntityId(1),
                on: true
            }),
            None
        );
        assert_eq!(
            describe(&Effect::FormChanged {
                player: EntityId(2),
                form: Form::Frog,
                move_speed: 2.0
            })
            .as_deref(),
            Some("#2 is now a frog")
        );
    }

    #[test]
    fn status_reports_missing_player() {
        let state = GameState::new(GameConfig::default());
        let lines = status_lines(&state, EntityId(9));
        assert_eq!(lines.last().map(String::as_str), Some("#9 is not in the session"));
    }
}
