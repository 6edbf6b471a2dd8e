//! Tutorial progression logic
//!
//! This module handles:
//! - The fixed step sequence and per-step hints
//! - Step advancement and completion marking (independent tracks)
//! - Dismissal, including the persistent "never again" flag
//! - The auto-start rule applied on session start

use crate::game::types::{Difficulty, TutorialState};

/// The ordered tutorial steps.
pub const TUTORIAL_STEPS: [&str; 8] = [
    "welcome",
    "world-selection",
    "location-navigation",
    "character-interaction",
    "quests",
    "inventory",
    "difficulty",
    "completion",
];

pub const FINAL_STEP: &str = "completion";

/// Check if a session should auto-start the tutorial
pub fn should_auto_start_tutorial(state: &TutorialState, auto_start: bool) -> bool {
    auto_start && !state.dismissed_forever && !state.completed_steps.contains(FINAL_STEP)
}

/// Start (or restart) the tutorial from the first step. Completed steps are kept.
pub fn start_tutorial(state: &mut TutorialState) {
    state.is_active = true;
    state.current_step = 0;
}

/// Advance to the next step; clamps at the last step. Returns `true` when the
/// index moved.
pub fn next_step(state: &mut TutorialState) -> bool {
    if !state.is_active || state.current_step + 1 >= TUTORIAL_STEPS.len() {
        return false;
    }
    state.current_step += 1;
    true
}

/// Mark a step complete without moving the index. Returns `true` when newly marked.
pub fn complete_step(state: &mut TutorialState, step_id: &str) -> bool {
    if step_id.is_empty() {
        return false;
    }
    state.completed_steps.insert(step_id.to_string())
}

/// Deactivate the tutorial. With `forever`, it will not auto-start again.
pub fn dismiss_tutorial(state: &mut TutorialState, forever: bool) {
    state.is_active = false;
    state.current_step = 0;
    if forever {
        state.dismissed_forever = true;
    }
}

pub fn current_step_id(state: &TutorialState) -> Option<&'static str> {
    if state.is_active {
        TUTORIAL_STEPS.get(state.current_step).copied()
    } else {
        None
    }
}

/// Get helpful hint message for a tutorial step. Hard difficulty gives none.
pub fn get_tutorial_hint(step_id: &str, difficulty: Difficulty) -> Option<&'static str> {
    if difficulty == Difficulty::Hard {
        return None;
    }
    let hint = match step_id {
        "welcome" => "Welcome, traveller! This short guide shows you around.",
        "world-selection" => "Pick a world to explore. Each has its own story and characters.",
        "location-navigation" => "Travel only to places connected to where you stand.",
        "character-interaction" => "Talk to characters. Your choices change how much they trust you.",
        "quests" => "Accept quests from characters and complete every objective for a reward.",
        "inventory" => "Items you collect are kept in your inventory.",
        "difficulty" => "Change the difficulty in settings. Hard mode hides these hints.",
        "completion" => "That's everything. Good luck on your journey!",
        _ => return None,
    };
    Some(hint)
}

/// Format tutorial status message
pub fn format_tutorial_status(state: &TutorialState, difficulty: Difficulty) -> String {
    match current_step_id(state) {
        Some(step) => {
            let position = format!("Tutorial {}/{}: {}", state.current_step + 1, TUTORIAL_STEPS.len(), step);
            match get_tutorial_hint(step, difficulty) {
                Some(hint) => format!("{}. {}", position, hint),
                None => position,
            }
        }
        None if state.dismissed_forever => "Tutorial: dismissed.".to_string(),
        None if state.completed_steps.contains(FINAL_STEP) => "Tutorial: complete!".to_string(),
        None => "Tutorial: not running.".to_string(),
    }
}
