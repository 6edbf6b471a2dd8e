/// Integration tests for world selection and movement
///
/// Failed moves leave the committed position alone and surface the error;
/// entering a world always lands on its entry location.
use std::sync::Arc;

use interactive_worlds::game::{EngineOptions, GameEngine, GameError, Identity, WorldCatalog};

fn setup_engine() -> GameEngine {
    let catalog = Arc::new(WorldCatalog::builtin().expect("builtin catalog"));
    let options = EngineOptions {
        auto_start_tutorial: false,
        autosave: false,
        ..EngineOptions::default()
    };
    let mut engine = GameEngine::new(catalog, options);
    engine.initialize(Some(Identity::new("ivan", "Ivan")));
    engine
}

#[test]
fn unknown_world_keeps_position() {
    let mut engine = setup_engine();
    let before = engine.snapshot();

    let err = engine.select_world("does-not-exist").unwrap_err();
    assert!(matches!(err, GameError::NotFound(_)));

    let after = engine.snapshot();
    assert_eq!(after.progress.current_world, before.progress.current_world);
    assert_eq!(after.progress.current_location, before.progress.current_location);
    assert!(!after.progress.visited_worlds.contains("does-not-exist"));
    assert!(after.error.is_some());
}

#[test]
fn selected_world_starts_at_entry_location() {
    let mut engine = setup_engine();
    engine.visit_location("fantasy-forest").unwrap();

    let outcome = engine.select_world("egypt").unwrap();
    assert!(outcome.changed);

    let world = engine.current_world().expect("egypt loaded");
    let entry = world.entry_location_id().expect("entry location").to_string();
    let snap = engine.snapshot();
    assert_eq!(snap.progress.current_world, "egypt");
    assert_eq!(snap.progress.current_location, entry);
    assert!(snap.progress.visited_worlds.contains("egypt"));
    assert!(snap.error.is_none());
}

#[test]
fn unreachable_location_keeps_position() {
    let mut engine = setup_engine();
    assert_eq!(engine.snapshot().progress.current_location, "fantasy-village");

    let err = engine.visit_location("fantasy-tower").unwrap_err();
    assert!(matches!(err, GameError::Unreachable { .. }));

    let snap = engine.snapshot();
    assert_eq!(snap.progress.current_location, "fantasy-village");
    assert!(!snap.progress.visited_locations.contains("fantasy-tower"));
    assert!(snap.error.is_some());

    // A successful move clears the error
    engine.visit_location("fantasy-castle").unwrap();
    assert!(engine.snapshot().error.is_none());
}

#[test]
fn trust_for_absent_character_is_not_found() {
    let mut engine = setup_engine();

    let err = engine.update_trust("nobody-here", 5).unwrap_err();
    assert!(matches!(err, GameError::NotFound(_)));
    assert!(engine.snapshot().progress.character_trust.is_empty());

    // Known characters clamp to 100
    engine.update_trust("fantasy-elf", 500).unwrap();
    assert_eq!(engine.snapshot().progress.character_trust["fantasy-elf"], 100);
}
