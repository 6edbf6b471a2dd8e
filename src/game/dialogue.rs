//! Dialogue resolution.
//!
//! Options are resolved against the dialogue currently on screen. Consequences
//! apply strictly in list order on the working copy of the player's progress,
//! so a later consequence observes the effects of earlier ones.
//!
//! Requirements are a presentation filter: [`available_options`] tells the
//! caller what to offer, and [`choose_option`] only re-checks them when the
//! engine runs with strict requirements.

use log::debug;

use crate::game::errors::GameError;
use crate::game::inventory::{add_item_to_inventory, has_item, remove_item_from_inventory};
use crate::game::progress::{advance_story, current_trust, unlock_location, update_trust};
use crate::game::quest::start_quest;
use crate::game::types::{
    ActiveDialogue, Consequence, ConsequenceKind, Dialogue, DialogueOption, PlayerProgress,
    Requirement, RequirementKind, World,
};

/// What happened when an option was picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionResult {
    /// The option (or the dialogue holding it) no longer resolves
    Stale,
    /// Consequences were applied; `next` is `None` when the conversation ended
    Chosen {
        applied: usize,
        next: Option<ActiveDialogue>,
    },
}

pub fn requirement_met(requirement: &Requirement, progress: &PlayerProgress, world: &World) -> bool {
    match requirement.kind {
        RequirementKind::QuestCompleted => progress.completed_quests.contains(&requirement.target),
        RequirementKind::ItemOwned => {
            has_item(progress, &requirement.target, requirement.value.max(1) as u32)
        }
        RequirementKind::TrustThreshold => {
            current_trust(Some(world), progress, &requirement.target) as i32 >= requirement.value
        }
        RequirementKind::LocationVisited => {
            progress.visited_locations.contains(&requirement.target)
        }
    }
}

/// Whether a dialogue's preconditions hold for this player
pub fn dialogue_available(dialogue: &Dialogue, progress: &PlayerProgress, world: &World) -> bool {
    dialogue
        .conditions
        .iter()
        .all(|c| requirement_met(c, progress, world))
}

pub fn option_available(option: &DialogueOption, progress: &PlayerProgress, world: &World) -> bool {
    option
        .requirements
        .iter()
        .all(|r| requirement_met(r, progress, world))
}

/// Options the presentation layer should offer, in catalog order
pub fn available_options<'a>(
    dialogue: &'a Dialogue,
    progress: &PlayerProgress,
    world: &World,
) -> Vec<&'a DialogueOption> {
    dialogue
        .options
        .iter()
        .filter(|opt| option_available(opt, progress, world))
        .collect()
}

/// Resolve the start of a conversation with a character.
pub fn enter<'w>(
    world: &'w World,
    character_id: &str,
    dialogue_id: &str,
) -> Result<&'w Dialogue, GameError> {
    let character = world
        .character(character_id)
        .ok_or_else(|| GameError::not_found("character", character_id))?;
    character
        .dialogue(dialogue_id)
        .ok_or_else(|| GameError::not_found("dialogue", dialogue_id))
}

/// Apply one consequence. Returns `false` when it was skipped because its
/// target does not resolve or its value has no effect.
pub fn apply_consequence(
    progress: &mut PlayerProgress,
    world: &World,
    consequence: &Consequence,
) -> bool {
    let target = consequence.target.as_str();
    match consequence.kind {
        ConsequenceKind::AdvanceQuest => match start_quest(progress, world, target) {
            Ok(_) => true,
            Err(e) => {
                debug!("skipping quest consequence: {}", e);
                false
            }
        },
        ConsequenceKind::GainItem => {
            if consequence.value <= 0 || world.item(target).is_none() {
                debug!("skipping item gain {} x{}", target, consequence.value);
                return false;
            }
            add_item_to_inventory(progress, target, consequence.value as u32);
            true
        }
        ConsequenceKind::LoseItem => {
            if consequence.value <= 0 {
                return false;
            }
            remove_item_from_inventory(progress, target, consequence.value as u32);
            true
        }
        ConsequenceKind::ChangeTrust => {
            update_trust(progress, Some(world), target, consequence.value);
            true
        }
        ConsequenceKind::UnlockLocation => unlock_location(progress, world, target),
        ConsequenceKind::AdvanceStory => {
            if consequence.value <= 0 {
                return false;
            }
            advance_story(progress, target, consequence.value);
            true
        }
    }
}

/// Pick an option of the active dialogue.
///
/// Stale references are a silent no-op. The next node is searched among every
/// character's dialogues in the world; a missing or unresolved next id ends the
/// conversation.
pub fn choose_option(
    progress: &mut PlayerProgress,
    world: &World,
    active: &ActiveDialogue,
    option_id: &str,
    strict_requirements: bool,
) -> Result<OptionResult, GameError> {
    let dialogue = world
        .character(&active.character_id)
        .and_then(|c| c.dialogue(&active.dialogue_id))
        .or_else(|| world.find_dialogue(&active.dialogue_id).map(|(_, d)| d));
    let Some(option) = dialogue.and_then(|d| d.option(option_id)) else {
        debug!("stale dialogue option {}/{}", active.dialogue_id, option_id);
        return Ok(OptionResult::Stale);
    };

    if strict_requirements && !option_available(option, progress, world) {
        return Err(GameError::InvalidState(format!(
            "requirements for option {} are not met",
            option_id
        )));
    }

    let applied = option
        .consequences
        .iter()
        .filter(|c| apply_consequence(progress, world, c))
        .count();

    let next = option
        .next_dialogue_id
        .as_deref()
        .and_then(|id| world.find_dialogue(id))
        .map(|(owner, next)| ActiveDialogue {
            character_id: owner.id.clone(),
            dialogue_id: next.id.clone(),
        });

    Ok(OptionResult::Chosen { applied, next })
}
