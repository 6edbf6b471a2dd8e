//! Read-only world registry.
//!
//! The catalog is built once at startup and shared by reference. Anything that
//! looks like a per-player flag on catalog content ("visited", "unlocked") is a
//! derived view joining the catalog entry with [`PlayerProgress`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::game::content::builtin_worlds;
use crate::game::errors::GameError;
use crate::game::types::{Location, PlayerProgress, World};

#[derive(Debug, Clone)]
pub struct WorldCatalog {
    worlds: Vec<Arc<World>>,
    index: HashMap<String, usize>,
}

impl WorldCatalog {
    /// Build a catalog from world definitions, rejecting inconsistent content.
    pub fn from_worlds(worlds: Vec<World>) -> Result<Self, GameError> {
        let mut index = HashMap::new();
        for (pos, world) in worlds.iter().enumerate() {
            validate_world(world)?;
            if index.insert(world.id.clone(), pos).is_some() {
                return Err(GameError::InvalidContent(format!(
                    "duplicate world id: {}",
                    world.id
                )));
            }
        }
        Ok(Self {
            worlds: worlds.into_iter().map(Arc::new).collect(),
            index,
        })
    }

    /// Catalog of the built-in worlds.
    pub fn builtin() -> Result<Self, GameError> {
        Self::from_worlds(builtin_worlds())
    }

    /// Look up a world; empty or unknown ids are `NotFound`.
    pub fn get_world(&self, world_id: &str) -> Result<&World, GameError> {
        if world_id.is_empty() {
            return Err(GameError::not_found("world", "<empty>"));
        }
        self.index
            .get(world_id)
            .map(|&pos| self.worlds[pos].as_ref())
            .ok_or_else(|| GameError::not_found("world", world_id))
    }

    pub fn contains(&self, world_id: &str) -> bool {
        self.index.contains_key(world_id)
    }

    pub fn worlds(&self) -> impl Iterator<Item = &World> {
        self.worlds.iter().map(|w| w.as_ref())
    }

    pub fn world_ids(&self) -> Vec<String> {
        self.worlds.iter().map(|w| w.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }
}

fn validate_world(world: &World) -> Result<(), GameError> {
    if world.id.trim().is_empty() {
        return Err(GameError::InvalidContent("world with empty id".to_string()));
    }
    if world.locations.is_empty() {
        return Err(GameError::InvalidContent(format!(
            "world {} has no locations",
            world.id
        )));
    }

    let mut location_ids = HashSet::new();
    for location in &world.locations {
        if !location_ids.insert(location.id.as_str()) {
            return Err(GameError::InvalidContent(format!(
                "duplicate location {} in world {}",
                location.id, world.id
            )));
        }
    }
    for location in &world.locations {
        if let Some(missing) = location
            .connections
            .iter()
            .find(|id| !location_ids.contains(id.as_str()))
        {
            return Err(GameError::InvalidContent(format!(
                "location {} connects to unknown location {}",
                location.id, missing
            )));
        }
    }

    match world.entry_location_id() {
        Some(entry) if location_ids.contains(entry) => {}
        Some(entry) => {
            return Err(GameError::InvalidContent(format!(
                "world {} entry location {} does not exist",
                world.id, entry
            )))
        }
        None => {
            return Err(GameError::InvalidContent(format!(
                "world {} has no entry location",
                world.id
            )))
        }
    }

    let mut quest_ids = HashSet::new();
    for quest in &world.quests {
        if !quest_ids.insert(quest.id.as_str()) {
            return Err(GameError::InvalidContent(format!(
                "duplicate quest {} in world {}",
                quest.id, world.id
            )));
        }
    }
    Ok(())
}

/// Is the location currently visible to this player?
pub fn is_accessible(location: &Location, progress: &PlayerProgress) -> bool {
    !location.locked || progress.unlocked_locations.contains(&location.id)
}

/// A catalog location joined with one player's progress.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationView<'a> {
    pub location: &'a Location,
    pub is_current: bool,
    pub visited: bool,
    /// The player can travel here with a single `visit_location`.
    pub reachable: bool,
}

/// Derived map of a world as seen by the player. Locked locations the player
/// has not unlocked are omitted.
pub fn world_view<'a>(world: &'a World, progress: &PlayerProgress) -> Vec<LocationView<'a>> {
    let current = world.location(&progress.current_location);
    world
        .locations
        .iter()
        .filter(|loc| is_accessible(loc, progress))
        .map(|loc| {
            let is_current = loc.id == progress.current_location;
            let reachable =
                is_current || current.map(|cur| cur.connects_to(&loc.id)).unwrap_or(false);
            LocationView {
                location: loc,
                is_current,
                visited: progress.visited_locations.contains(&loc.id),
                reachable,
            }
        })
        .collect()
}
