//! Player progress transitions.
//!
//! Free functions over a working copy of [`PlayerProgress`]. The engine clones
//! the committed progress, applies one or more of these, and swaps the result
//! in only when every step succeeded.

use crate::game::catalog::is_accessible;
use crate::game::errors::GameError;
use crate::game::types::{Location, PlayerProgress, World, TRUST_MAX, TRUST_MIN};

/// Resolve a travel target, enforcing the connection graph and lock state.
pub fn reachable_location<'w>(
    world: &'w World,
    progress: &PlayerProgress,
    location_id: &str,
) -> Result<&'w Location, GameError> {
    let target = world
        .location(location_id)
        .ok_or_else(|| GameError::not_found("location", location_id))?;

    if target.id == progress.current_location {
        return Ok(target);
    }

    let connected = world
        .location(&progress.current_location)
        .map(|current| current.connects_to(&target.id))
        .unwrap_or(false);

    if !connected || !is_accessible(target, progress) {
        return Err(GameError::Unreachable {
            from: progress.current_location.clone(),
            to: target.id.clone(),
        });
    }
    Ok(target)
}

/// Place the player at a world's entry location.
pub fn enter_world(progress: &mut PlayerProgress, world: &World) -> Result<(), GameError> {
    let entry = world.entry_location_id().ok_or_else(|| {
        GameError::InvalidContent(format!("world {} has no entry location", world.id))
    })?;
    progress.current_world = world.id.clone();
    progress.current_location = entry.to_string();
    progress.visited_worlds.insert(world.id.clone());
    progress.touch();
    Ok(())
}

/// Move to a reachable location. Returns `true` on the first visit.
pub fn visit_location(
    progress: &mut PlayerProgress,
    world: &World,
    location_id: &str,
) -> Result<bool, GameError> {
    let target = reachable_location(world, progress, location_id)?;
    progress.current_location = target.id.clone();
    let first_visit = progress.visited_locations.insert(target.id.clone());
    progress.touch();
    Ok(first_visit)
}

/// Trust the player currently has with a character. Characters the player has
/// not interacted with start at their catalog trust level.
pub fn current_trust(world: Option<&World>, progress: &PlayerProgress, character_id: &str) -> u8 {
    if let Some(trust) = progress.character_trust.get(character_id) {
        return *trust;
    }
    world
        .and_then(|w| w.character(character_id))
        .map(|c| c.trust_level)
        .unwrap_or(TRUST_MIN)
}

/// Clamped trust change; returns the new value.
pub fn update_trust(
    progress: &mut PlayerProgress,
    world: Option<&World>,
    character_id: &str,
    delta: i32,
) -> u8 {
    let current = current_trust(world, progress, character_id) as i32;
    let updated = current
        .saturating_add(delta)
        .clamp(TRUST_MIN as i32, TRUST_MAX as i32) as u8;
    progress
        .character_trust
        .insert(character_id.to_string(), updated);
    progress.touch();
    updated
}

/// Monotonic story counter increment; non-positive deltas leave the counter
/// untouched. Returns the counter value.
pub fn advance_story(progress: &mut PlayerProgress, flag: &str, delta: i32) -> u32 {
    if delta <= 0 || flag.is_empty() {
        return progress.story_value(flag);
    }
    let counter = progress.story_progress.entry(flag.to_string()).or_insert(0);
    *counter = counter.saturating_add(delta as u32);
    let value = *counter;
    progress.touch();
    value
}

/// Make a location of the given world reachable for this player. Returns
/// `false` when the location does not exist or was already unlocked.
pub fn unlock_location(progress: &mut PlayerProgress, world: &World, location_id: &str) -> bool {
    if world.location(location_id).is_none() {
        return false;
    }
    let inserted = progress.unlocked_locations.insert(location_id.to_string());
    if inserted {
        progress.touch();
    }
    inserted
}
