/// Achievement rules and evaluation
///
/// Achievements are derived from progress: after each committed change the
/// engine evaluates every rule and appends the ones newly earned. The list on
/// `PlayerProgress` is append-only.
use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use crate::game::inventory::total_item_count;
use crate::game::types::{Achievement, PlayerProgress, TRUST_MAX};

/// Condition that earns an achievement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AchievementTrigger {
    LocationsVisited { required: u32 },
    QuestsCompleted { required: u32 },
    CompleteQuest { quest_id: String },
    /// Any single character reaching this trust level
    TrustReached { level: u8 },
    WorldsVisited { required: u32 },
    ItemsCollected { required: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AchievementRule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub trigger: AchievementTrigger,
}

impl AchievementRule {
    pub fn new(id: &str, name: &str, description: &str, trigger: AchievementTrigger) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            trigger,
        }
    }
}

/// The built-in rule table. `world_count` is the number of worlds in the
/// catalog the rules will run against.
pub fn default_rules(world_count: usize) -> Vec<AchievementRule> {
    use AchievementTrigger::*;
    vec![
        AchievementRule::new(
            "first_steps",
            "First Steps",
            "Visit your first location",
            LocationsVisited { required: 1 },
        ),
        AchievementRule::new(
            "wanderer",
            "Wanderer",
            "Visit 10 different locations",
            LocationsVisited { required: 10 },
        ),
        AchievementRule::new(
            "quest_beginner",
            "Quest Beginner",
            "Complete your first quest",
            QuestsCompleted { required: 1 },
        ),
        AchievementRule::new(
            "hero",
            "Hero",
            "Complete 5 quests",
            QuestsCompleted { required: 5 },
        ),
        AchievementRule::new(
            "kingdom_saved",
            "Saviour of Eldaria",
            "Complete the quest to save the kingdom",
            CompleteQuest {
                quest_id: "fantasy-main-quest".to_string(),
            },
        ),
        AchievementRule::new(
            "curse_breaker",
            "Curse Breaker",
            "Lift the pharaoh's curse",
            CompleteQuest {
                quest_id: "egypt-curse-quest".to_string(),
            },
        ),
        AchievementRule::new(
            "trusted_friend",
            "Trusted Friend",
            "Earn complete trust from a character",
            TrustReached { level: TRUST_MAX },
        ),
        AchievementRule::new(
            "world_traveler",
            "World Traveller",
            "Visit every world",
            WorldsVisited {
                required: world_count.max(1) as u32,
            },
        ),
        AchievementRule::new(
            "collector",
            "Collector",
            "Hold 10 items at once",
            ItemsCollected { required: 10 },
        ),
    ]
}

/// Whether the progress currently satisfies a trigger
pub fn trigger_satisfied(trigger: &AchievementTrigger, progress: &PlayerProgress) -> bool {
    use AchievementTrigger::*;

    match trigger {
        LocationsVisited { required } => progress.visited_locations.len() as u32 >= *required,
        QuestsCompleted { required } => progress.completed_quests.len() as u32 >= *required,
        CompleteQuest { quest_id } => progress.completed_quests.contains(quest_id),
        TrustReached { level } => progress.character_trust.values().any(|t| t >= level),
        WorldsVisited { required } => progress.visited_worlds.len() as u32 >= *required,
        ItemsCollected { required } => total_item_count(progress) >= *required,
    }
}

/// Append every newly earned achievement; returns the ids awarded.
pub fn check_achievements(progress: &mut PlayerProgress, rules: &[AchievementRule]) -> Vec<String> {
    let mut awarded = Vec::new();

    for rule in rules {
        if progress.has_achievement(&rule.id) || !trigger_satisfied(&rule.trigger, progress) {
            continue;
        }
        progress.achievements.push(Achievement {
            id: rule.id.clone(),
            name: rule.name.clone(),
            description: rule.description.clone(),
            unlocked_at: Utc::now(),
        });
        info!("{} earned achievement {}", progress.id, rule.id);
        awarded.push(rule.id.clone());
    }

    awarded
}

/// Rules not yet earned, for display
pub fn get_available_achievements<'a>(
    progress: &PlayerProgress,
    rules: &'a [AchievementRule],
) -> Vec<&'a AchievementRule> {
    rules
        .iter()
        .filter(|rule| !progress.has_achievement(&rule.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::inventory::add_item_to_inventory;

    fn create_test_player() -> PlayerProgress {
        PlayerProgress::new("testuser", "Test User", "fantasy", "fantasy-village")
    }

    #[test]
    fn test_first_visit_awards_once() {
        let rules = default_rules(4);
        let mut player = create_test_player();
        assert!(check_achievements(&mut player, &rules).is_empty());

        player.visited_locations.insert("fantasy-forest".into());
        assert_eq!(check_achievements(&mut player, &rules), vec!["first_steps"]);
        assert!(check_achievements(&mut player, &rules).is_empty());
        assert_eq!(player.achievements.len(), 1);
    }

    #[test]
    fn test_specific_quest_and_count() {
        let rules = default_rules(4);
        let mut player = create_test_player();
        player.completed_quests.insert("fantasy-main-quest".into());

        let awarded = check_achievements(&mut player, &rules);
        assert!(awarded.contains(&"quest_beginner".to_string()));
        assert!(awarded.contains(&"kingdom_saved".to_string()));
        assert!(!awarded.contains(&"hero".to_string()));
    }

    #[test]
    fn test_trust_and_items() {
        let rules = default_rules(4);
        let mut player = create_test_player();
        player.character_trust.insert("fantasy-elf".into(), 100);
        add_item_to_inventory(&mut player, "magic-herb", 10);

        let awarded = check_achievements(&mut player, &rules);
        assert!(awarded.contains(&"trusted_friend".to_string()));
        assert!(awarded.contains(&"collector".to_string()));
    }

    #[test]
    fn test_available_shrinks() {
        let rules = default_rules(4);
        let mut player = create_test_player();
        let before = get_available_achievements(&player, &rules).len();
        player.visited_locations.insert("x".into());
        check_achievements(&mut player, &rules);
        assert_eq!(get_available_achievements(&player, &rules).len(), before - 1);
    }

    #[test]
    fn test_world_traveler_follows_catalog_size() {
        let rules = default_rules(2);
        let mut player = create_test_player();
        assert!(!check_achievements(&mut player, &rules).contains(&"world_traveler".to_string()));

        player.visited_worlds.insert("egypt".into());
        assert!(check_achievements(&mut player, &rules).contains(&"world_traveler".to_string()));

        let rules = default_rules(4);
        let mut player = create_test_player();
        player.visited_worlds.insert("egypt".into());
        assert!(!check_achievements(&mut player, &rules).contains(&"world_traveler".to_string()));
    }

    #[test]
    fn test_trigger_serialization() {
        let trigger = AchievementTrigger::TrustReached { level: 80 };
        let json = serde_json::to_string(&trigger).unwrap();
        assert_eq!(json, r#"{"trust_reached":{"level":80}}"#);
    }
}
