/// Integration tests for the tutorial overlay and navigation modes
///
/// The tutorial owns the screen while active: user mode requests and dialogue
/// are refused until it is dismissed.
use std::sync::Arc;

use interactive_worlds::game::{
    Difficulty, EngineOptions, GameEngine, GameError, GameMode, Intent, WorldCatalog,
    TUTORIAL_STEPS,
};

fn setup_guest() -> GameEngine {
    let catalog = Arc::new(WorldCatalog::builtin().expect("builtin catalog"));
    let options = EngineOptions {
        autosave: false,
        ..EngineOptions::default()
    };
    let mut engine = GameEngine::new(catalog, options);
    engine.initialize(None);
    engine
}

#[test]
fn tutorial_auto_starts_and_blocks_user_modes() {
    let mut engine = setup_guest();
    let snap = engine.snapshot();
    assert!(snap.tutorial.is_active);
    assert_eq!(snap.tutorial.current_step, 0);
    assert_eq!(snap.mode, GameMode::Tutorial);

    let outcome = engine.set_mode(GameMode::Inventory).unwrap();
    assert!(!outcome.changed);
    assert_eq!(engine.mode(), GameMode::Tutorial);

    let err = engine
        .enter_dialogue("fantasy-elf", "elf-greeting")
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidState(_)));

    // World selection still works; the mode stays with the tutorial
    engine.select_world("egypt").unwrap();
    let snap = engine.snapshot();
    assert_eq!(snap.progress.current_world, "egypt");
    assert_eq!(snap.mode, GameMode::Tutorial);
}

#[test]
fn steps_advance_and_clamp_independently_of_completion() {
    let mut engine = setup_guest();
    assert!(engine.tutorial_hint().is_some());

    for _ in 0..TUTORIAL_STEPS.len() + 2 {
        let _ = engine.next_tutorial_step().unwrap();
    }
    let snap = engine.snapshot();
    assert_eq!(snap.tutorial.current_step, TUTORIAL_STEPS.len() - 1);
    assert!(snap.tutorial.completed_steps.is_empty());

    assert!(engine.next_tutorial_step().map(|o| !o.changed).unwrap());

    assert!(engine.complete_tutorial_step("completion").unwrap().changed);
    assert!(!engine.complete_tutorial_step("completion").unwrap().changed);
    assert_eq!(
        engine.snapshot().tutorial.current_step,
        TUTORIAL_STEPS.len() - 1
    );

    engine.set_difficulty(Difficulty::Hard).unwrap();
    assert!(engine.tutorial_hint().is_none());
}

#[test]
fn dismissing_returns_to_exploration() {
    let mut engine = setup_guest();
    engine.next_tutorial_step().unwrap();

    let outcome = engine.dismiss_tutorial(false).unwrap();
    assert!(outcome.changed);
    let snap = engine.snapshot();
    assert!(!snap.tutorial.is_active);
    assert!(!snap.tutorial.dismissed_forever);
    assert_eq!(snap.tutorial.current_step, 0);
    assert_eq!(snap.mode, GameMode::Exploration);
    assert!(engine.tutorial_hint().is_none());

    // Stepping an inactive tutorial does nothing
    assert!(!engine.next_tutorial_step().unwrap().changed);

    let outcome = engine.dismiss_tutorial(true).unwrap();
    assert!(outcome.changed);
    assert!(engine.snapshot().tutorial.dismissed_forever);
}

#[test]
fn mode_transition_table_for_user_requests() {
    let mut engine = setup_guest();
    engine.dismiss_tutorial(false).unwrap();

    assert!(engine.set_mode(GameMode::Inventory).unwrap().changed);
    // Inventory only returns to exploration
    assert!(!engine.set_mode(GameMode::Quest).unwrap().changed);
    assert!(!engine.set_mode(GameMode::Dialogue).unwrap().changed);
    assert_eq!(engine.mode(), GameMode::Inventory);
    assert!(engine.set_mode(GameMode::Exploration).unwrap().changed);

    // Dialogue and tutorial are entered through their own intents only
    assert!(!engine.set_mode(GameMode::Dialogue).unwrap().changed);
    assert!(!engine.set_mode(GameMode::Tutorial).unwrap().changed);
    assert_eq!(engine.mode(), GameMode::Exploration);

    assert!(engine.set_mode(GameMode::Settings).unwrap().changed);
    assert!(engine.set_mode(GameMode::Exploration).unwrap().changed);
    assert!(engine.set_mode(GameMode::Quest).unwrap().changed);

    engine.start_tutorial().unwrap();
    let snap = engine.snapshot();
    assert_eq!(snap.mode, GameMode::Tutorial);
    assert!(snap.tutorial.is_active);
}

#[test]
fn scripted_session_via_intents() {
    let mut engine = setup_guest();
    let script = r#"[
        {"intent": "dismiss_tutorial"},
        {"intent": "select_world", "world_id": "sci-fi"},
        {"intent": "set_mode", "mode": "inventory"},
        {"intent": "set_mode", "mode": "exploration"},
        {"intent": "set_difficulty", "difficulty": "easy"}
    ]"#;
    let intents: Vec<Intent> = serde_json::from_str(script).unwrap();
    for intent in &intents {
        engine.apply(intent).unwrap();
    }

    let snap = engine.snapshot();
    assert_eq!(snap.progress.current_world, "sci-fi");
    assert_eq!(snap.progress.current_location, "scifi-space-station");
    assert!(snap.progress.visited_worlds.contains("fantasy"));
    assert!(snap.progress.visited_worlds.contains("sci-fi"));
    assert_eq!(snap.mode, GameMode::Exploration);
    assert_eq!(snap.difficulty, Difficulty::Easy);
}
