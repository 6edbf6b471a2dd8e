/// Integration tests for save snapshots
///
/// Sessions write through the sled-backed save store and resume from it on
/// the next `initialize`.
use std::sync::Arc;

use interactive_worlds::game::{
    Difficulty, EngineOptions, GameEngine, GameError, GameMode, Identity, SaveSnapshot,
    SaveStore, SaveStoreBuilder, SnapshotStore, WorldCatalog,
};
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> SaveStore {
    SaveStoreBuilder::new(dir.path().join("saves"))
        .without_flush()
        .open()
        .expect("open save store")
}

fn engine_with_store(store: SaveStore, options: EngineOptions) -> GameEngine {
    let catalog = Arc::new(WorldCatalog::builtin().expect("builtin catalog"));
    GameEngine::new(catalog, options).with_store(store)
}

#[test]
fn autosave_and_resume() {
    let dir = TempDir::new().unwrap();
    {
        let mut engine = engine_with_store(open_store(&dir), EngineOptions::default());
        engine.initialize(Some(Identity::new("carol", "Carol")));
        engine.dismiss_tutorial(false).unwrap();
        engine.visit_location("fantasy-forest").unwrap();
        engine.add_item("magic-herb", 2).unwrap();
        engine.set_difficulty(Difficulty::Easy).unwrap();
    }

    let mut engine = engine_with_store(open_store(&dir), EngineOptions::default());
    let outcome = engine.initialize(Some(Identity::new("carol", "Carol the Bold")));
    assert_eq!(outcome.detail, "save loaded");

    let snap = engine.snapshot();
    assert_eq!(snap.progress.display_name, "Carol the Bold");
    assert_eq!(snap.progress.current_location, "fantasy-forest");
    assert_eq!(snap.progress.inventory["magic-herb"].quantity, 2);
    assert!(snap.progress.has_achievement("first_steps"));
    assert_eq!(snap.difficulty, Difficulty::Easy);
    // Dismissed without "forever": the tutorial auto-starts again
    assert!(snap.tutorial.is_active);
    assert_eq!(snap.mode, GameMode::Tutorial);
}

#[test]
fn saved_tutorial_is_never_active() {
    let dir = TempDir::new().unwrap();
    {
        let mut engine = engine_with_store(open_store(&dir), EngineOptions::default());
        engine.initialize(Some(Identity::new("dave", "Dave")));
        engine.next_tutorial_step().unwrap();
        engine.complete_tutorial_step("welcome").unwrap();
        assert!(engine.snapshot().tutorial.is_active);
    }

    let store = open_store(&dir);
    let saved = store.get_snapshot("dave").unwrap();
    assert!(!saved.tutorial.is_active);
    assert!(saved.tutorial.completed_steps.contains("welcome"));
}

#[test]
fn dismissed_forever_suppresses_auto_start() {
    let dir = TempDir::new().unwrap();
    {
        let mut engine = engine_with_store(open_store(&dir), EngineOptions::default());
        engine.initialize(Some(Identity::new("erin", "Erin")));
        engine.dismiss_tutorial(true).unwrap();
    }

    let mut engine = engine_with_store(open_store(&dir), EngineOptions::default());
    engine.initialize(Some(Identity::new("erin", "Erin")));
    let snap = engine.snapshot();
    assert!(!snap.tutorial.is_active);
    assert!(snap.tutorial.dismissed_forever);
    assert_eq!(snap.mode, GameMode::Exploration);
}

#[test]
fn explicit_save_without_autosave() {
    let dir = TempDir::new().unwrap();
    let options = EngineOptions {
        autosave: false,
        auto_start_tutorial: false,
        ..EngineOptions::default()
    };
    {
        let mut engine = engine_with_store(open_store(&dir), options.clone());
        engine.initialize(Some(Identity::new("frank", "Frank")));
        engine.visit_location("fantasy-castle").unwrap();
        assert!(engine.store().unwrap().get_snapshot("frank").is_err());

        let outcome = engine.save().unwrap();
        assert!(!outcome.changed);
        let saved = engine.store().unwrap().get_snapshot("frank").unwrap();
        assert_eq!(saved.progress.current_location, "fantasy-castle");
    }

    let store = open_store(&dir);
    assert_eq!(store.list_player_ids().unwrap(), vec!["frank".to_string()]);
    assert!(store.delete_snapshot("FRANK").unwrap());
    assert!(store.list_player_ids().unwrap().is_empty());
}

#[test]
fn save_pointing_at_missing_world_falls_back_to_start() {
    let dir = TempDir::new().unwrap();
    {
        let mut engine = engine_with_store(open_store(&dir), EngineOptions::default());
        engine.initialize(Some(Identity::new("gina", "Gina")));
        engine.dismiss_tutorial(true).unwrap();
        engine.select_world("egypt").unwrap();
    }

    // Same save, but a catalog without egypt
    let worlds = interactive_worlds::game::builtin_worlds()
        .into_iter()
        .filter(|w| w.id != "egypt")
        .collect();
    let catalog = Arc::new(WorldCatalog::from_worlds(worlds).unwrap());
    let mut engine =
        GameEngine::new(catalog, EngineOptions::default()).with_store(open_store(&dir));
    engine.initialize(Some(Identity::new("gina", "Gina")));

    let snap = engine.snapshot();
    assert_eq!(snap.progress.current_world, "fantasy");
    assert_eq!(snap.progress.current_location, "fantasy-village");
    assert!(snap.progress.visited_worlds.contains("egypt"));
}

#[test]
fn new_game_persists_reset() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_with_store(open_store(&dir), EngineOptions::default());
    engine.initialize(Some(Identity::new("hal", "Hal")));
    engine.dismiss_tutorial(true).unwrap();
    engine.add_item("magic-herb", 4).unwrap();
    let created_at = engine.snapshot().progress.created_at;

    engine.new_game().unwrap();
    let saved = engine.store().unwrap().get_snapshot("hal").unwrap();
    assert!(saved.progress.inventory.is_empty());
    assert_eq!(saved.progress.created_at, created_at);
    assert!(saved.tutorial.dismissed_forever);
}

#[test]
fn unreadable_save_is_not_overwritten() {
    let dir = TempDir::new().unwrap();
    let garbage: &[u8] = b"not a snapshot";
    {
        let db = sled::open(dir.path().join("saves")).unwrap();
        let tree = db.open_tree("saves").unwrap();
        tree.insert("saves:alice", garbage).unwrap();
        tree.flush().unwrap();
    }

    {
        let mut engine = engine_with_store(open_store(&dir), EngineOptions::default());
        let outcome = engine.initialize(Some(Identity::new("alice", "Alice")));
        assert!(outcome.changed);
        assert!(engine.snapshot().error.is_some());

        // Play continues in memory
        engine.dismiss_tutorial(false).unwrap();
        engine.visit_location("fantasy-forest").unwrap();
        assert_eq!(engine.snapshot().progress.current_location, "fantasy-forest");
        assert!(engine.snapshot().error.is_none());
    }

    {
        let db = sled::open(dir.path().join("saves")).unwrap();
        let tree = db.open_tree("saves").unwrap();
        let stored = tree.get("saves:alice").unwrap().expect("record kept");
        assert_eq!(stored.as_ref(), garbage);
    }

    // An explicit save replaces the record and re-enables autosave
    let mut engine = engine_with_store(open_store(&dir), EngineOptions::default());
    engine.initialize(Some(Identity::new("alice", "Alice")));
    engine.save().unwrap();
    engine.dismiss_tutorial(false).unwrap();
    engine.visit_location("fantasy-castle").unwrap();
    let saved = engine.store().unwrap().get_snapshot("alice").unwrap();
    assert_eq!(saved.progress.current_location, "fantasy-castle");
}

#[test]
fn new_game_replaces_unreadable_save() {
    let dir = TempDir::new().unwrap();
    {
        let db = sled::open(dir.path().join("saves")).unwrap();
        let tree = db.open_tree("saves").unwrap();
        tree.insert("saves:bob", &b"\xff\xff"[..]).unwrap();
        tree.flush().unwrap();
    }

    let mut engine = engine_with_store(open_store(&dir), EngineOptions::default());
    engine.initialize(Some(Identity::new("bob", "Bob")));
    assert!(engine.store().unwrap().get_snapshot("bob").is_err());

    engine.new_game().unwrap();
    let saved = engine.store().unwrap().get_snapshot("bob").unwrap();
    assert_eq!(saved.progress.id, "bob");
}

#[test]
fn reading_status_without_autosave_creates_no_save() {
    let dir = TempDir::new().unwrap();
    let options = EngineOptions {
        autosave: false,
        ..EngineOptions::default()
    };
    let mut engine = engine_with_store(open_store(&dir), options);
    let outcome = engine.initialize(Some(Identity::new("nadia", "Nadia")));
    assert_eq!(outcome.detail, "new player");

    let err = engine.store().unwrap().get_snapshot("nadia").unwrap_err();
    assert!(matches!(err, GameError::NotFound(_)));
}

/// Accepts reads but refuses every write.
struct ReadOnlyStore;

impl SnapshotStore for ReadOnlyStore {
    fn put_snapshot(&self, _snapshot: SaveSnapshot) -> Result<(), GameError> {
        Err(GameError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }

    fn get_snapshot(&self, player_id: &str) -> Result<SaveSnapshot, GameError> {
        Err(GameError::NotFound(format!("save {}", player_id)))
    }
}

#[test]
fn failed_autosave_keeps_the_change() {
    let catalog = Arc::new(WorldCatalog::builtin().expect("builtin catalog"));
    let options = EngineOptions {
        auto_start_tutorial: false,
        ..EngineOptions::default()
    };
    let mut engine = GameEngine::new(catalog, options).with_store(ReadOnlyStore);
    engine.initialize(Some(Identity::new("olga", "Olga")));

    let outcome = engine.visit_location("fantasy-forest").unwrap();
    assert!(outcome.changed);

    let snap = engine.snapshot();
    assert_eq!(snap.progress.current_location, "fantasy-forest");
    assert!(snap.progress.visited_locations.contains("fantasy-forest"));
    let error = snap.error.as_deref().expect("save error recorded");
    assert!(error.starts_with("save failed:"), "unexpected error: {}", error);

    // An explicit save reports the failure instead
    let err = engine.save().unwrap_err();
    assert!(err.is_persistence());
    assert_eq!(engine.snapshot().progress.current_location, "fantasy-forest");
}
