//! Game state engine: world catalog, player progress, dialogue resolution,
//! quest ledger, navigation modes and persistence.
//!
//! The catalog is immutable content; everything that varies per player lives
//! in [`PlayerProgress`] and is driven through [`GameEngine`].

pub mod achievement;
pub mod catalog;
pub mod content;
pub mod dialogue;
pub mod engine;
pub mod errors;
pub mod intent;
pub mod inventory;
pub mod mode;
pub mod progress;
pub mod quest;
pub mod seed_loader;
pub mod storage;
pub mod tutorial;
pub mod types;

pub use achievement::{check_achievements, default_rules, AchievementRule, AchievementTrigger};
pub use catalog::{is_accessible, world_view, LocationView, WorldCatalog};
pub use content::{builtin_worlds, DEFAULT_WORLD_ID};
pub use dialogue::{available_options, dialogue_available, option_available, OptionResult};
pub use engine::{EngineOptions, GameEngine, GameSnapshot, Identity, GUEST_NAME};
pub use errors::GameError;
pub use intent::{Intent, IntentOutcome};
pub use inventory::{
    add_item_to_inventory, format_inventory, get_item_quantity, has_item,
    remove_item_from_inventory,
};
pub use mode::{GameMode, ModeController, Origin, Transition};
pub use quest::{
    active_quests, available_quests, completed_quests, format_quest_status, quest_view,
    ObjectiveOutcome, QuestStart, QuestStatus, QuestView,
};
pub use seed_loader::{load_catalog, load_worlds_from_json};
pub use storage::{SaveSnapshot, SaveStore, SaveStoreBuilder, SnapshotStore};
pub use tutorial::{format_tutorial_status, get_tutorial_hint, TUTORIAL_STEPS};
pub use types::*;
