//! World pack loader.
//!
//! Loads world definitions from a JSON file so content can be customised
//! without recompiling. The file holds a JSON array of worlds in the same shape
//! as [`World`]'s serde representation.

use crate::game::catalog::WorldCatalog;
use crate::game::errors::GameError;
use crate::game::types::World;
use log::info;
use std::fs;
use std::path::Path;

/// Load worlds from a JSON pack (e.g. data/worlds.json)
pub fn load_worlds_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<World>, GameError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let worlds: Vec<World> = serde_json::from_str(&contents).map_err(|e| {
        GameError::InvalidContent(format!("failed to parse {}: {}", path.display(), e))
    })?;

    info!("loaded {} worlds from {}", worlds.len(), path.display());
    Ok(worlds)
}

/// Build a validated catalog from a pack file, or the built-in worlds when no
/// file is configured.
pub fn load_catalog(path: Option<&Path>) -> Result<WorldCatalog, GameError> {
    match path {
        Some(path) => WorldCatalog::from_worlds(load_worlds_from_json(path)?),
        None => WorldCatalog::builtin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::content::builtin_worlds;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_worlds_from_json("nonexistent.json");
        assert!(matches!(result, Err(GameError::Io(_))));
    }

    #[test]
    fn test_load_malformed_pack() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("worlds.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_worlds_from_json(&path),
            Err(GameError::InvalidContent(_))
        ));
    }

    #[test]
    fn test_builtin_worlds_survive_json_export() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("worlds.json");
        let json = serde_json::to_string_pretty(&builtin_worlds()).unwrap();
        fs::write(&path, json).unwrap();

        let catalog = load_catalog(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 4);
        let fantasy = catalog.get_world("fantasy").unwrap();
        assert!(fantasy.location("fantasy-secret-chamber").unwrap().locked);
    }

    #[test]
    fn test_minimal_pack_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("worlds.json");
        let json = r#"[{
            "id": "tiny",
            "name": "Tiny",
            "description": "",
            "genre": "medieval",
            "locations": [{"id": "hall", "name": "Hall", "description": ""}],
            "characters": [],
            "quests": []
        }]"#;
        fs::write(&path, json).unwrap();

        let catalog = load_catalog(Some(&path)).unwrap();
        let world = catalog.get_world("tiny").unwrap();
        assert!(world.is_unlocked);
        assert_eq!(world.entry_location_id(), Some("hall"));
    }
}
