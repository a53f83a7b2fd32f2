use std::sync::{Arc, Mutex};

use glam::Vec3;
use hunt_content::ContentFactory;
use hunt_core::{
    CureOutcome, Effect, EntityId, Form, InputEdges, PlayerInput, Pose, Ray, TickInput,
    ToolState,
};
use hunt_runtime::{
    Event, HighlightSink, Runtime, RuntimeError, RuntimeHandle, SessionEvent, Topic,
};

const ALICE: EntityId = EntityId(1);
const BOB: EntityId = EntityId(2);
const WAND: EntityId = EntityId(100);

const FRAME_MS: u64 = 16;
/// Just in front of Alice's head so her own colliders never block the aim.
const EYE: Vec3 = Vec3::new(0.0, 1.6, -0.5);
const WAND_SPOT: Vec3 = Vec3::new(0.0, 1.6, -2.0);
const BOB_FEET: Vec3 = Vec3::new(0.0, 0.0, -6.0);
const BOB_HEAD: Vec3 = Vec3::new(0.0, 1.65, -6.0);

fn alice(edges: InputEdges, looking_at: Vec3) -> PlayerInput {
    PlayerInput::idle(
        ALICE,
        Ray::new(EYE, looking_at - EYE),
        Pose::new(Vec3::ZERO, Vec3::NEG_Z),
    )
    .with_edges(edges)
}

fn frame(players: Vec<PlayerInput>) -> TickInput {
    TickInput {
        dt_ms: FRAME_MS,
        players,
        collisions: Vec::new(),
    }
}

async fn arena() -> (Runtime, RuntimeHandle) {
    let runtime = Runtime::builder()
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.handle();

    handle.spawn_player(ALICE, Vec3::ZERO).await.unwrap();
    handle.spawn_player(BOB, BOB_FEET).await.unwrap();
    handle.place_wand(WAND, "Birch Wand", WAND_SPOT).await.unwrap();

    (runtime, handle)
}

/// Picks up the wand and fires once at Bob's head.
async fn pick_up_and_cast(handle: &RuntimeHandle) {
    let outcome = handle
        .tick(frame(vec![alice(InputEdges::INTERACT, WAND_SPOT)]))
        .await
        .unwrap();
    assert!(
        outcome
            .effects
            .iter()
            .any(|e| matches!(e, Effect::WandAttached { wand, .. } if *wand == WAND)),
        "pickup should attach the wand: {:?}",
        outcome.rejections
    );

    let outcome = handle
        .tick(frame(vec![alice(InputEdges::CAST, BOB_HEAD)]))
        .await
        .unwrap();
    assert!(
        outcome
            .effects
            .iter()
            .any(|e| matches!(e, Effect::ProjectileSpawned { caster, .. } if *caster == ALICE)),
        "cast should spawn a projectile: {:?}",
        outcome.rejections
    );
}

fn form_change(effects: &[Effect], who: EntityId) -> Option<Form> {
    effects.iter().find_map(|effect| match effect {
        Effect::FormChanged { player, form, .. } if *player == who => Some(*form),
        _ => None,
    })
}

#[tokio::test]
async fn cast_sweep_transform_and_revert() {
    let (runtime, handle) = arena().await;
    pick_up_and_cast(&handle).await;

    // 30 units/s covers the ~5.5 units to Bob within one 250 ms step.
    let outcome = handle.advance(250).await.unwrap();
    assert_eq!(form_change(&outcome.effects, BOB), Some(Form::Frog));
    assert!(
        outcome
            .effects
            .iter()
            .any(|e| matches!(e, Effect::HitFeedback { .. }))
    );

    let state = handle.query_state().await.unwrap();
    let bob = state.player(BOB).unwrap();
    assert!(bob.status().is_frog());
    assert!(!bob.can_cast());
    assert_eq!(state.wand(WAND).unwrap().ammo_remaining(), 2);

    let frog_ms = state.config.status.frog_duration_ms;
    let outcome = handle.advance(frog_ms - 1).await.unwrap();
    assert_eq!(form_change(&outcome.effects, BOB), None);

    let outcome = handle.advance(1).await.unwrap();
    assert_eq!(form_change(&outcome.effects, BOB), Some(Form::Human));

    let state = handle.query_state().await.unwrap();
    assert!(state.player(BOB).unwrap().status().is_human());
    assert!(state.player(BOB).unwrap().can_cast());
    assert_eq!(state.projectiles().count(), 0);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn cure_cancels_the_pending_revert() {
    let (runtime, handle) = arena().await;
    pick_up_and_cast(&handle).await;
    handle.advance(250).await.unwrap();

    assert_eq!(handle.cure(BOB).await.unwrap(), CureOutcome::Cured);
    assert_eq!(handle.cure(BOB).await.unwrap(), CureOutcome::AlreadyHuman);

    let frog_ms = handle.query_state().await.unwrap().config.status.frog_duration_ms;
    let outcome = handle.advance(frog_ms).await.unwrap();
    assert_eq!(form_change(&outcome.effects, BOB), None);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn declined_operations_reach_the_rejection_topic() {
    let (runtime, handle) = arena().await;
    let mut rejections = handle.subscribe(Topic::Rejections);

    let outcome = handle
        .tick(frame(vec![alice(InputEdges::CAST, BOB_HEAD)]))
        .await
        .unwrap();
    assert_eq!(outcome.rejections.len(), 1);

    match rejections.recv().await.unwrap() {
        Event::Rejected(event) => {
            assert_eq!(event.rejection.actor, ALICE);
            assert_eq!(event.rejection.action, "cast");
            assert_eq!(event.rejection.code, "CAST_NO_WAND_EQUIPPED");
        }
        other => panic!("unexpected event {other:?}"),
    }

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.player(ALICE).unwrap().tool(), ToolState::None);
    assert_eq!(state.projectiles().count(), 0);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn effects_topic_mirrors_tick_output() {
    let (runtime, handle) = arena().await;
    let mut effects = handle.subscribe(Topic::Effects);
    let mut session = handle.subscribe(Topic::Session);

    let outcome = handle
        .tick(frame(vec![alice(InputEdges::TOGGLE_HAND, BOB_HEAD)]))
        .await
        .unwrap();
    assert!(!outcome.effects.is_empty());

    for expected in &outcome.effects {
        match effects.recv().await.unwrap() {
            Event::Effect(event) => {
                assert_eq!(&event.effect, expected);
                assert_eq!(event.at, outcome.now);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    match session.recv().await.unwrap() {
        Event::Session(SessionEvent::TickCompleted { now, effects, .. }) => {
            assert_eq!(now, outcome.now);
            assert_eq!(effects, outcome.effects.len());
        }
        other => panic!("unexpected event {other:?}"),
    }

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<(EntityId, bool)>>,
}

impl HighlightSink for RecordingSink {
    fn set_highlight(&self, player: EntityId, on: bool) {
        self.calls.lock().unwrap().push((player, on));
    }
}

#[tokio::test]
async fn pointing_drives_the_highlight_sink() {
    let sink = Arc::new(RecordingSink::default());
    let runtime = Runtime::builder()
        .highlight_sink(sink.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    handle.spawn_player(ALICE, Vec3::ZERO).await.unwrap();
    handle.spawn_player(BOB, BOB_FEET).await.unwrap();

    handle
        .tick(frame(vec![alice(InputEdges::TOGGLE_HAND, BOB_HEAD)]))
        .await
        .unwrap();
    assert_eq!(sink.calls.lock().unwrap().last(), Some(&(ALICE, true)));

    let outcome = handle
        .tick(frame(vec![alice(InputEdges::POINT, BOB_HEAD)]))
        .await
        .unwrap();
    assert!(outcome.effects.contains(&Effect::Accusation {
        accuser: ALICE,
        accused: BOB,
    }));

    handle
        .tick(frame(vec![alice(InputEdges::TOGGLE_HAND, BOB_HEAD)]))
        .await
        .unwrap();
    assert_eq!(sink.calls.lock().unwrap().last(), Some(&(ALICE, false)));

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn duplicate_spawns_are_refused() {
    let (runtime, handle) = arena().await;

    let err = handle.spawn_player(ALICE, Vec3::ONE).await.unwrap_err();
    assert!(matches!(err, RuntimeError::State(_)));

    let err = handle
        .place_wand(WAND, "Again", Vec3::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::State(_)));

    let err = handle.recharge(EntityId(999)).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Rejected {
            action: "recharge",
            ..
        }
    ));

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn level_content_places_wands() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("level.toml"),
        "[[wands]]\nid = 100\nname = \"Birch Wand\"\nposition = [0.0, 1.6, -2.0]\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("config.toml"), "[casting]\nwand_capacity = 5\n").unwrap();

    let content = ContentFactory::new(dir.path());
    let config = hunt_runtime::RuntimeConfig::default()
        .with_game_config(content.load_config().unwrap());
    let runtime = Runtime::builder()
        .config(config)
        .level(content.load_level().unwrap())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    handle.spawn_player(ALICE, Vec3::ZERO).await.unwrap();

    let state = handle.query_state().await.unwrap();
    let wand = state.wand(WAND).unwrap();
    assert_eq!(wand.name, "Birch Wand");
    assert_eq!(wand.ammo_remaining(), 5);

    handle
        .tick(frame(vec![alice(InputEdges::empty(), WAND_SPOT)]))
        .await
        .unwrap();
    let state = handle.query_state().await.unwrap();
    assert_eq!(
        state.interaction_prompt(ALICE).as_deref(),
        Some("Pick up Birch Wand")
    );

    drop(handle);
    runtime.shutdown().await.unwrap();
}
