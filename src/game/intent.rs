//! Serializable player intents.
//!
//! Every engine operation has an [`Intent`] variant so a session can be
//! scripted from JSON and replayed through [`crate::game::GameEngine::apply`].

use serde::{Deserialize, Serialize};

use crate::game::mode::GameMode;
use crate::game::types::Difficulty;

fn default_quantity() -> u32 {
    1
}

fn default_delta() -> i32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    SelectWorld {
        world_id: String,
    },
    VisitLocation {
        location_id: String,
    },
    EnterDialogue {
        character_id: String,
        dialogue_id: String,
    },
    ChooseOption {
        option_id: String,
    },
    StartQuest {
        quest_id: String,
    },
    CompleteObjective {
        quest_id: String,
        objective_id: String,
    },
    AddItem {
        item_id: String,
        #[serde(default = "default_quantity")]
        quantity: u32,
    },
    RemoveItem {
        item_id: String,
        #[serde(default = "default_quantity")]
        quantity: u32,
    },
    UpdateTrust {
        character_id: String,
        delta: i32,
    },
    AdvanceStory {
        flag: String,
        #[serde(default = "default_delta")]
        delta: i32,
    },
    SetMode {
        mode: GameMode,
    },
    StartTutorial,
    NextTutorialStep,
    CompleteTutorialStep {
        step_id: String,
    },
    DismissTutorial {
        #[serde(default)]
        forever: bool,
    },
    SetDifficulty {
        difficulty: Difficulty,
    },
    NewGame,
    Save,
}

impl Intent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::SelectWorld { .. } => "select_world",
            Intent::VisitLocation { .. } => "visit_location",
            Intent::EnterDialogue { .. } => "enter_dialogue",
            Intent::ChooseOption { .. } => "choose_option",
            Intent::StartQuest { .. } => "start_quest",
            Intent::CompleteObjective { .. } => "complete_objective",
            Intent::AddItem { .. } => "add_item",
            Intent::RemoveItem { .. } => "remove_item",
            Intent::UpdateTrust { .. } => "update_trust",
            Intent::AdvanceStory { .. } => "advance_story",
            Intent::SetMode { .. } => "set_mode",
            Intent::StartTutorial => "start_tutorial",
            Intent::NextTutorialStep => "next_tutorial_step",
            Intent::CompleteTutorialStep { .. } => "complete_tutorial_step",
            Intent::DismissTutorial { .. } => "dismiss_tutorial",
            Intent::SetDifficulty { .. } => "set_difficulty",
            Intent::NewGame => "new_game",
            Intent::Save => "save",
        }
    }
}

/// Summary of one processed intent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentOutcome {
    /// Whether committed state changed
    pub changed: bool,
    pub detail: String,
    /// Achievements earned as a result, in award order
    pub achievements: Vec<String>,
}

impl IntentOutcome {
    pub fn changed(detail: impl Into<String>) -> Self {
        Self {
            changed: true,
            detail: detail.into(),
            achievements: Vec::new(),
        }
    }

    pub fn unchanged(reason: impl Into<String>) -> Self {
        Self {
            changed: false,
            detail: reason.into(),
            achievements: Vec::new(),
        }
    }
}
