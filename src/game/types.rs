use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const PROGRESS_SCHEMA_VERSION: u8 = 1;
pub const SNAPSHOT_SCHEMA_VERSION: u8 = 1;

pub const TRUST_MIN: u8 = 0;
pub const TRUST_MAX: u8 = 100;

fn default_true() -> bool {
    true
}

fn default_quantity() -> i32 {
    1
}

// ============================================================================
// Catalog content (immutable after load)
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    Fantasy,
    SciFi,
    Medieval,
    Egypt,
}

/// A self-contained narrative setting. Never mutated once the catalog is built;
/// per-player flags (visited, unlocked, quest progress) live in [`PlayerProgress`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct World {
    pub id: String,
    pub name: String,
    pub description: String,
    pub genre: Genre,
    pub locations: Vec<Location>,
    pub characters: Vec<Character>,
    pub quests: Vec<Quest>,
    /// Every item the world's content can hand out.
    #[serde(default)]
    pub items: Vec<Item>,
    /// Designated entry location; the first location when unset.
    #[serde(default)]
    pub entry_location: Option<String>,
    #[serde(default = "default_true")]
    pub is_unlocked: bool,
}

impl World {
    pub fn new(id: &str, name: &str, description: &str, genre: Genre) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            genre,
            locations: Vec::new(),
            characters: Vec::new(),
            quests: Vec::new(),
            items: Vec::new(),
            entry_location: None,
            is_unlocked: true,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    pub fn with_character(mut self, character: Character) -> Self {
        self.characters.push(character);
        self
    }

    pub fn with_quest(mut self, quest: Quest) -> Self {
        self.quests.push(quest);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_entry_location(mut self, location_id: &str) -> Self {
        self.entry_location = Some(location_id.to_string());
        self
    }

    /// The location a player lands on when selecting this world.
    pub fn entry_location_id(&self) -> Option<&str> {
        self.entry_location
            .as_deref()
            .or_else(|| self.locations.first().map(|loc| loc.id.as_str()))
    }

    pub fn location(&self, location_id: &str) -> Option<&Location> {
        self.locations.iter().find(|loc| loc.id == location_id)
    }

    pub fn character(&self, character_id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == character_id)
    }

    pub fn quest(&self, quest_id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == quest_id)
    }

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Search the dialogues of every character in the world. Dialogue chains may
    /// cross from one character to another.
    pub fn find_dialogue(&self, dialogue_id: &str) -> Option<(&Character, &Dialogue)> {
        self.characters.iter().find_map(|character| {
            character
                .dialogue(dialogue_id)
                .map(|dialogue| (character, dialogue))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Adjacent location ids (travel graph).
    #[serde(default)]
    pub connections: Vec<String>,
    /// Character ids present here.
    #[serde(default)]
    pub characters: Vec<String>,
    /// Item ids obtainable here.
    #[serde(default)]
    pub items: Vec<String>,
    /// Hidden and unreachable until unlocked by a consequence or reward.
    #[serde(default)]
    pub locked: bool,
}

impl Location {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            connections: Vec::new(),
            characters: Vec::new(),
            items: Vec::new(),
            locked: false,
        }
    }

    pub fn connected_to(mut self, ids: &[&str]) -> Self {
        self.connections.extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn with_characters(mut self, ids: &[&str]) -> Self {
        self.characters.extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn with_items(mut self, ids: &[&str]) -> Self {
        self.items.extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn connects_to(&self, location_id: &str) -> bool {
        self.connections.iter().any(|id| id == location_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub description: String,
    pub personality: String,
    pub dialogues: Vec<Dialogue>,
    /// Quest ids this character offers.
    #[serde(default)]
    pub quests: Vec<String>,
    #[serde(default = "default_true")]
    pub is_friendly: bool,
    /// Starting trust (0-100) before any player interaction.
    pub trust_level: u8,
}

impl Character {
    pub fn new(id: &str, name: &str, description: &str, personality: &str, trust_level: u8) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            personality: personality.to_string(),
            dialogues: Vec::new(),
            quests: Vec::new(),
            is_friendly: true,
            trust_level: trust_level.min(TRUST_MAX),
        }
    }

    pub fn with_dialogue(mut self, dialogue: Dialogue) -> Self {
        self.dialogues.push(dialogue);
        self
    }

    pub fn offering(mut self, quest_id: &str) -> Self {
        self.quests.push(quest_id.to_string());
        self
    }

    pub fn hostile(mut self) -> Self {
        self.is_friendly = false;
        self
    }

    pub fn dialogue(&self, dialogue_id: &str) -> Option<&Dialogue> {
        self.dialogues.iter().find(|d| d.id == dialogue_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dialogue {
    pub id: String,
    pub text: String,
    pub options: Vec<DialogueOption>,
    /// Preconditions for the dialogue to be offered at all.
    #[serde(default)]
    pub conditions: Vec<Requirement>,
}

impl Dialogue {
    pub fn new(id: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            options: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn with_option(mut self, option: DialogueOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_condition(mut self, condition: Requirement) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn option(&self, option_id: &str) -> Option<&DialogueOption> {
        self.options.iter().find(|opt| opt.id == option_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogueOption {
    pub id: String,
    pub text: String,
    /// Absent means the conversation ends and the player returns to exploration.
    #[serde(default)]
    pub next_dialogue_id: Option<String>,
    #[serde(default)]
    pub consequences: Vec<Consequence>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

impl DialogueOption {
    pub fn new(id: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            next_dialogue_id: None,
            consequences: Vec::new(),
            requirements: Vec::new(),
        }
    }

    pub fn goto(mut self, dialogue_id: &str) -> Self {
        self.next_dialogue_id = Some(dialogue_id.to_string());
        self
    }

    pub fn with_consequence(mut self, kind: ConsequenceKind, target: &str, value: i32) -> Self {
        self.consequences.push(Consequence {
            kind,
            target: target.to_string(),
            value,
        });
        self
    }

    pub fn requires(mut self, kind: RequirementKind, target: &str, value: i32) -> Self {
        self.requirements.push(Requirement {
            kind,
            target: target.to_string(),
            value,
        });
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConsequenceKind {
    #[serde(alias = "quest_progress")]
    AdvanceQuest,
    #[serde(alias = "item_gain")]
    GainItem,
    #[serde(alias = "item_lose")]
    LoseItem,
    #[serde(alias = "trust_change")]
    ChangeTrust,
    #[serde(alias = "location_unlock")]
    UnlockLocation,
    #[serde(alias = "story_progress")]
    AdvanceStory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Consequence {
    pub kind: ConsequenceKind,
    pub target: String,
    #[serde(default = "default_quantity")]
    pub value: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    QuestCompleted,
    ItemOwned,
    #[serde(alias = "trust_level")]
    TrustThreshold,
    LocationVisited,
}

/// Gate on a dialogue or option. `value` is the minimum quantity for
/// `ItemOwned` and the minimum trust for `TrustThreshold`; ignored otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requirement {
    pub kind: RequirementKind,
    pub target: String,
    #[serde(default = "default_quantity")]
    pub value: i32,
}

impl Requirement {
    pub fn new(kind: RequirementKind, target: &str, value: i32) -> Self {
        Self {
            kind,
            target: target.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub objectives: Vec<QuestObjective>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    /// Content defaults; live status is tracked per player.
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_active: bool,
    pub giver_id: String,
}

impl Quest {
    pub fn new(id: &str, name: &str, description: &str, giver_id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            objectives: Vec::new(),
            rewards: Vec::new(),
            is_completed: false,
            is_active: false,
            giver_id: giver_id.to_string(),
        }
    }

    pub fn with_objective(mut self, id: &str, description: &str, kind: ObjectiveKind, target: &str) -> Self {
        self.objectives.push(QuestObjective {
            id: id.to_string(),
            description: description.to_string(),
            kind,
            target: target.to_string(),
            is_completed: false,
        });
        self
    }

    pub fn with_reward(mut self, kind: RewardKind, target: &str, value: i32) -> Self {
        self.rewards.push(Reward {
            kind,
            target: target.to_string(),
            value,
        });
        self
    }

    pub fn objective(&self, objective_id: &str) -> Option<&QuestObjective> {
        self.objectives.iter().find(|obj| obj.id == objective_id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    CollectItem,
    TalkToCharacter,
    VisitLocation,
    SolvePuzzle,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestObjective {
    pub id: String,
    pub description: String,
    pub kind: ObjectiveKind,
    pub target: String,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Item,
    Experience,
    Trust,
    LocationUnlock,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reward {
    pub kind: RewardKind,
    pub target: String,
    pub value: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Armor,
    Consumable,
    Key,
    Artifact,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Damage,
    Healing,
    Protection,
    Special,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemEffect {
    pub kind: EffectKind,
    pub value: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub item_type: ItemType,
    pub rarity: Rarity,
    #[serde(default)]
    pub effects: Vec<ItemEffect>,
}

impl Item {
    pub fn new(id: &str, name: &str, description: &str, item_type: ItemType, rarity: Rarity) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            item_type,
            rarity,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, kind: EffectKind, value: i32) -> Self {
        self.effects.push(ItemEffect { kind, value });
        self
    }
}

// ============================================================================
// Player progress (one per session/save)
// ============================================================================

/// An owned stack of one catalog item. Quantity is never zero while the stack exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerItem {
    pub item_id: String,
    pub quantity: u32,
    pub acquired_at: DateTime<Utc>,
}

impl PlayerItem {
    pub fn new(item_id: &str, quantity: u32) -> Self {
        Self {
            item_id: item_id.to_string(),
            quantity,
            acquired_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked_at: DateTime<Utc>,
}

/// Per-player state of one quest instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestProgress {
    pub quest_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_objectives: BTreeSet<String>,
}

impl QuestProgress {
    pub fn new(quest_id: &str) -> Self {
        Self {
            quest_id: quest_id.to_string(),
            started_at: Utc::now(),
            completed_at: None,
            completed_objectives: BTreeSet::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn objective_done(&self, objective_id: &str) -> bool {
        self.completed_objectives.contains(objective_id)
    }

    /// Logical AND over the quest's objective set, independent of marking order.
    pub fn all_objectives_complete(&self, quest: &Quest) -> bool {
        quest
            .objectives
            .iter()
            .all(|obj| self.completed_objectives.contains(&obj.id))
    }

    pub fn mark_complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerProgress {
    pub id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub current_world: String,
    pub current_location: String,
    /// item id -> owned stack
    pub inventory: BTreeMap<String, PlayerItem>,
    pub active_quests: BTreeSet<String>,
    pub completed_quests: BTreeSet<String>,
    pub quest_log: BTreeMap<String, QuestProgress>,
    pub visited_locations: BTreeSet<String>,
    pub unlocked_locations: BTreeSet<String>,
    pub visited_worlds: BTreeSet<String>,
    /// character id -> trust 0..=100
    pub character_trust: BTreeMap<String, u8>,
    /// story flag -> monotonically increasing counter
    pub story_progress: BTreeMap<String, u32>,
    pub experience: u32,
    /// Append-only.
    pub achievements: Vec<Achievement>,
    pub schema_version: u8,
}

impl PlayerProgress {
    pub fn new(id: &str, display_name: &str, world_id: &str, location_id: &str) -> Self {
        let now = Utc::now();
        let mut visited_worlds = BTreeSet::new();
        if !world_id.is_empty() {
            visited_worlds.insert(world_id.to_string());
        }
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            created_at: now,
            updated_at: now,
            current_world: world_id.to_string(),
            current_location: location_id.to_string(),
            inventory: BTreeMap::new(),
            active_quests: BTreeSet::new(),
            completed_quests: BTreeSet::new(),
            quest_log: BTreeMap::new(),
            visited_locations: BTreeSet::new(),
            unlocked_locations: BTreeSet::new(),
            visited_worlds,
            character_trust: BTreeMap::new(),
            story_progress: BTreeMap::new(),
            experience: 0,
            achievements: Vec::new(),
            schema_version: PROGRESS_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn has_achievement(&self, achievement_id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == achievement_id)
    }

    pub fn story_value(&self, flag: &str) -> u32 {
        self.story_progress.get(flag).copied().unwrap_or(0)
    }
}

// ============================================================================
// Settings and tutorial
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Tutorial overlay progress. Step index and completed-step set are independent
/// tracks: advancing does not mark complete and marking does not advance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TutorialState {
    pub is_active: bool,
    pub current_step: usize,
    pub completed_steps: BTreeSet<String>,
    pub dismissed_forever: bool,
}

/// The conversation currently on screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveDialogue {
    pub character_id: String,
    pub dialogue_id: String,
}

/// Inventory mutation result
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryResult {
    /// Items added; `stacked` when merged into an existing entry
    Added { quantity: u32, stacked: bool },
    /// Items removed; `emptied` when the entry was dropped
    Removed { quantity: u32, emptied: bool },
    /// Nothing changed
    Unchanged { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_step_quest() -> Quest {
        Quest::new("q", "Q", "", "giver")
            .with_objective("a", "", ObjectiveKind::VisitLocation, "loc")
            .with_objective("b", "", ObjectiveKind::CollectItem, "item")
    }

    #[test]
    fn quest_completion_is_order_independent() {
        let quest = two_step_quest();
        let mut progress = QuestProgress::new("q");
        progress.completed_objectives.insert("b".into());
        assert!(!progress.all_objectives_complete(&quest));
        progress.completed_objectives.insert("a".into());
        assert!(progress.all_objectives_complete(&quest));
    }

    #[test]
    fn entry_location_defaults_to_first() {
        let world = World::new("w", "W", "", Genre::Fantasy)
            .with_location(Location::new("first", "", ""))
            .with_location(Location::new("second", "", ""));
        assert_eq!(world.entry_location_id(), Some("first"));

        let world = world.with_entry_location("second");
        assert_eq!(world.entry_location_id(), Some("second"));
    }

    #[test]
    fn find_dialogue_crosses_characters() {
        let world = World::new("w", "W", "", Genre::Fantasy)
            .with_character(
                Character::new("a", "A", "", "", 10).with_dialogue(Dialogue::new("a-1", "hi")),
            )
            .with_character(
                Character::new("b", "B", "", "", 10).with_dialogue(Dialogue::new("b-1", "yo")),
            );
        let (owner, dialogue) = world.find_dialogue("b-1").unwrap();
        assert_eq!(owner.id, "b");
        assert_eq!(dialogue.text, "yo");
        assert!(world.find_dialogue("c-1").is_none());
    }

    #[test]
    fn consequence_kind_accepts_legacy_names() {
        let c: Consequence =
            serde_json::from_str(r#"{"kind":"quest_progress","target":"q","value":1}"#).unwrap();
        assert_eq!(c.kind, ConsequenceKind::AdvanceQuest);

        let c: Consequence = serde_json::from_str(r#"{"kind":"item_gain","target":"x"}"#).unwrap();
        assert_eq!(c.kind, ConsequenceKind::GainItem);
        assert_eq!(c.value, 1);
    }

    #[test]
    fn genre_uses_kebab_case() {
        assert_eq!(serde_json::to_string(&Genre::SciFi).unwrap(), "\"sci-fi\"");
    }
}
