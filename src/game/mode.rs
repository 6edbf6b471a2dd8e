//! Navigation mode state machine.
//!
//! Exactly one mode is addressable at a time. Every mode change goes through
//! [`ModeController::request`], which enforces the transition table and the
//! tutorial lock in one place.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Exploration,
    Dialogue,
    Inventory,
    Quest,
    Tutorial,
    Settings,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameMode::Exploration => "exploration",
            GameMode::Dialogue => "dialogue",
            GameMode::Inventory => "inventory",
            GameMode::Quest => "quest",
            GameMode::Tutorial => "tutorial",
            GameMode::Settings => "settings",
        };
        f.write_str(name)
    }
}

/// Who is asking for the mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Explicit player navigation
    User,
    /// The dialogue resolver entering or leaving a conversation
    Dialogue,
    /// The tutorial system starting or dismissing itself
    Tutorial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed { from: GameMode, to: GameMode },
    Unchanged,
    Rejected,
}

impl Transition {
    pub fn is_changed(&self) -> bool {
        matches!(self, Transition::Changed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeController {
    mode: GameMode,
}

impl ModeController {
    pub fn new(mode: GameMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Apply a transition request. Rejections are no-ops, never errors.
    pub fn request(&mut self, target: GameMode, origin: Origin, tutorial_active: bool) -> Transition {
        if !allowed(self.mode, target, origin, tutorial_active) {
            if tutorial_active {
                warn!("mode change to {} rejected while tutorial is active", target);
            } else {
                debug!("mode change {} -> {} rejected ({:?})", self.mode, target, origin);
            }
            return Transition::Rejected;
        }
        if self.mode == target {
            return Transition::Unchanged;
        }
        let from = self.mode;
        self.mode = target;
        debug!("mode {} -> {}", from, target);
        Transition::Changed { from, to: target }
    }
}

/// The transition table.
pub fn allowed(from: GameMode, to: GameMode, origin: Origin, tutorial_active: bool) -> bool {
    if tutorial_active {
        return to == GameMode::Exploration && origin == Origin::Tutorial;
    }
    match (from, to, origin) {
        (_, GameMode::Exploration, _) => true,
        (_, GameMode::Tutorial, Origin::Tutorial) => true,
        (GameMode::Exploration, GameMode::Dialogue, Origin::Dialogue) => true,
        // Chained dialogue nodes keep the player in dialogue mode.
        (GameMode::Dialogue, GameMode::Dialogue, Origin::Dialogue) => true,
        (
            GameMode::Exploration,
            GameMode::Inventory | GameMode::Quest | GameMode::Settings,
            Origin::User,
        ) => true,
        (from, to, Origin::User) if from == to && to != GameMode::Tutorial => true,
        _ => false,
    }
}
