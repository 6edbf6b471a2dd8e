/// Quest ledger: activation, objective tracking and reward disbursement
///
/// Quest definitions are catalog content and never change; a player's live
/// quest state is the `active_quests`/`completed_quests` pair plus the
/// per-quest entry in `quest_log`.
use log::{debug, info};

use crate::game::errors::GameError;
use crate::game::inventory::{add_item_to_inventory, has_item};
use crate::game::progress::{unlock_location, update_trust};
use crate::game::types::{
    ObjectiveKind, PlayerProgress, Quest, QuestObjective, QuestProgress, Reward, RewardKind, World,
};

/// Result of a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestStart {
    Started,
    AlreadyActive,
    AlreadyCompleted,
}

/// Result of marking an objective
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectiveOutcome {
    /// Objective (or its quest) was already complete; nothing changed
    AlreadyComplete,
    /// Objective marked, quest still open
    Marked,
    /// Last objective marked; rewards were paid out in list order
    QuestCompleted { rewards: Vec<Reward> },
}

/// Where a quest stands for one player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestStatus {
    NotStarted,
    Active,
    Completed,
}

/// Catalog quest joined with one player's progress
#[derive(Debug, Clone, PartialEq)]
pub struct QuestView<'a> {
    pub quest: &'a Quest,
    pub status: QuestStatus,
    /// Objective plus its per-player completion flag, in catalog order
    pub objectives: Vec<(&'a QuestObjective, bool)>,
}

impl QuestView<'_> {
    pub fn completed_count(&self) -> usize {
        self.objectives.iter().filter(|(_, done)| *done).count()
    }
}

pub fn quest_status(progress: &PlayerProgress, quest_id: &str) -> QuestStatus {
    if progress.completed_quests.contains(quest_id) {
        QuestStatus::Completed
    } else if progress.active_quests.contains(quest_id) {
        QuestStatus::Active
    } else {
        QuestStatus::NotStarted
    }
}

pub fn quest_view<'a>(quest: &'a Quest, progress: &PlayerProgress) -> QuestView<'a> {
    let entry = progress.quest_log.get(&quest.id);
    QuestView {
        quest,
        status: quest_status(progress, &quest.id),
        objectives: quest
            .objectives
            .iter()
            .map(|obj| (obj, entry.map(|e| e.objective_done(&obj.id)).unwrap_or(false)))
            .collect(),
    }
}

/// Activate a quest. Idempotent: active or completed quests are left alone.
pub fn start_quest(
    progress: &mut PlayerProgress,
    world: &World,
    quest_id: &str,
) -> Result<QuestStart, GameError> {
    if world.quest(quest_id).is_none() {
        return Err(GameError::not_found("quest", quest_id));
    }

    match quest_status(progress, quest_id) {
        QuestStatus::Completed => return Ok(QuestStart::AlreadyCompleted),
        QuestStatus::Active => return Ok(QuestStart::AlreadyActive),
        QuestStatus::NotStarted => {}
    }

    progress.active_quests.insert(quest_id.to_string());
    progress
        .quest_log
        .entry(quest_id.to_string())
        .or_insert_with(|| QuestProgress::new(quest_id));
    progress.touch();
    debug!("{} started quest {}", progress.id, quest_id);
    Ok(QuestStart::Started)
}

/// Mark one objective of an active quest complete. When that completes the
/// quest, rewards are disbursed and the quest moves from active to completed.
///
/// With `strict` set, `collect_item` and `visit_location` objectives are only
/// accepted when the player holds the item or has visited the location.
pub fn complete_objective(
    progress: &mut PlayerProgress,
    world: &World,
    quest_id: &str,
    objective_id: &str,
    strict: bool,
) -> Result<ObjectiveOutcome, GameError> {
    let quest = world
        .quest(quest_id)
        .ok_or_else(|| GameError::not_found("quest", quest_id))?;
    let objective = quest.objective(objective_id).ok_or_else(|| {
        GameError::not_found("objective", &format!("{}/{}", quest_id, objective_id))
    })?;

    match quest_status(progress, quest_id) {
        QuestStatus::Completed => return Ok(ObjectiveOutcome::AlreadyComplete),
        QuestStatus::NotStarted => {
            return Err(GameError::InvalidState(format!(
                "quest {} has not been started",
                quest_id
            )))
        }
        QuestStatus::Active => {}
    }

    let already_done = progress
        .quest_log
        .get(quest_id)
        .map(|entry| entry.objective_done(objective_id))
        .unwrap_or(false);
    if already_done {
        return Ok(ObjectiveOutcome::AlreadyComplete);
    }

    if strict {
        verify_objective(progress, objective)?;
    }

    let entry = progress
        .quest_log
        .entry(quest_id.to_string())
        .or_insert_with(|| QuestProgress::new(quest_id));
    entry.completed_objectives.insert(objective_id.to_string());
    let finished = entry.all_objectives_complete(quest);
    progress.touch();

    if !finished {
        debug!("{} completed objective {}/{}", progress.id, quest_id, objective_id);
        return Ok(ObjectiveOutcome::Marked);
    }

    for reward in &quest.rewards {
        disburse_reward(progress, world, quest, reward);
    }
    if let Some(entry) = progress.quest_log.get_mut(quest_id) {
        entry.mark_complete();
    }
    progress.active_quests.remove(quest_id);
    progress.completed_quests.insert(quest_id.to_string());
    info!("{} completed quest {}", progress.id, quest_id);

    Ok(ObjectiveOutcome::QuestCompleted {
        rewards: quest.rewards.clone(),
    })
}

fn verify_objective(progress: &PlayerProgress, objective: &QuestObjective) -> Result<(), GameError> {
    let satisfied = match objective.kind {
        ObjectiveKind::CollectItem => has_item(progress, &objective.target, 1),
        ObjectiveKind::VisitLocation => {
            progress.visited_locations.contains(&objective.target)
                || progress.current_location == objective.target
        }
        ObjectiveKind::TalkToCharacter | ObjectiveKind::SolvePuzzle => true,
    };
    if satisfied {
        Ok(())
    } else {
        Err(GameError::InvalidState(format!(
            "objective {} not satisfied: {:?} {}",
            objective.id, objective.kind, objective.target
        )))
    }
}

fn disburse_reward(progress: &mut PlayerProgress, world: &World, quest: &Quest, reward: &Reward) {
    match reward.kind {
        RewardKind::Item => {
            if reward.value <= 0 || world.item(&reward.target).is_none() {
                debug!("skipping item reward {} for quest {}", reward.target, quest.id);
                return;
            }
            add_item_to_inventory(progress, &reward.target, reward.value as u32);
        }
        RewardKind::Experience => {
            if reward.value > 0 {
                progress.experience = progress.experience.saturating_add(reward.value as u32);
            }
        }
        RewardKind::Trust => {
            let character_id = if reward.target.is_empty() {
                quest.giver_id.as_str()
            } else {
                reward.target.as_str()
            };
            update_trust(progress, Some(world), character_id, reward.value);
        }
        RewardKind::LocationUnlock => {
            if !unlock_location(progress, world, &reward.target) {
                debug!("location {} already unlocked or unknown", reward.target);
            }
        }
    }
}

/// Player's active quests in the current world
pub fn active_quests<'a>(world: &'a World, progress: &PlayerProgress) -> Vec<QuestView<'a>> {
    quests_with_status(world, progress, QuestStatus::Active)
}

/// Player's completed quests in the current world
pub fn completed_quests<'a>(world: &'a World, progress: &PlayerProgress) -> Vec<QuestView<'a>> {
    quests_with_status(world, progress, QuestStatus::Completed)
}

/// Quests offered by characters of this world that the player has not started
pub fn available_quests<'a>(world: &'a World, progress: &PlayerProgress) -> Vec<QuestView<'a>> {
    let mut seen = std::collections::BTreeSet::new();
    world
        .characters
        .iter()
        .flat_map(|c| c.quests.iter())
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| world.quest(id))
        .filter(|q| quest_status(progress, &q.id) == QuestStatus::NotStarted)
        .map(|q| quest_view(q, progress))
        .collect()
}

fn quests_with_status<'a>(
    world: &'a World,
    progress: &PlayerProgress,
    status: QuestStatus,
) -> Vec<QuestView<'a>> {
    world
        .quests
        .iter()
        .filter(|q| quest_status(progress, &q.id) == status)
        .map(|q| quest_view(q, progress))
        .collect()
}

/// Format quest status message for display
pub fn format_quest_status(
    world: &World,
    progress: &PlayerProgress,
    quest_id: &str,
) -> Result<String, GameError> {
    let quest = world
        .quest(quest_id)
        .ok_or_else(|| GameError::not_found("quest", quest_id))?;
    let view = quest_view(quest, progress);

    let label = match view.status {
        QuestStatus::NotStarted => "available",
        QuestStatus::Active => "active",
        QuestStatus::Completed => "completed",
    };
    let mut output = format!("=== {} ({}) ===\n", quest.name, label);
    for (obj, done) in &view.objectives {
        let status = if *done { "✓" } else { " " };
        output.push_str(&format!("[{}] {}\n", status, obj.description));
    }
    output.push_str(&format!(
        "{}/{} objectives",
        view.completed_count(),
        view.objectives.len()
    ));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::inventory::get_item_quantity;
    use crate::game::types::{Character, Genre, Item, ItemType, Location, Rarity};

    fn create_test_world() -> World {
        World::new("w", "W", "", Genre::Fantasy)
            .with_location(Location::new("camp", "Camp", "").connected_to(&["ruins"]))
            .with_location(Location::new("ruins", "Ruins", "").connected_to(&["camp", "crypt"]))
            .with_location(Location::new("crypt", "Crypt", "").connected_to(&["ruins"]).locked())
            .with_character(Character::new("sage", "Sage", "", "", 20).offering("relic"))
            .with_quest(
                Quest::new("relic", "Relic", "", "sage")
                    .with_objective("explore", "Explore the ruins", ObjectiveKind::VisitLocation, "ruins")
                    .with_objective("take", "Take the relic", ObjectiveKind::CollectItem, "relic-item")
                    .with_reward(RewardKind::Item, "reward-blade", 1)
                    .with_reward(RewardKind::Trust, "", 15)
                    .with_reward(RewardKind::Experience, "", 40)
                    .with_reward(RewardKind::LocationUnlock, "crypt", 1),
            )
            .with_quest(Quest::new("side", "Side", "", "sage").with_objective(
                "only",
                "Do it",
                ObjectiveKind::SolvePuzzle,
                "riddle",
            ))
            .with_item(Item::new("reward-blade", "Blade", "", ItemType::Weapon, Rarity::Rare))
    }

    fn create_test_player() -> PlayerProgress {
        PlayerProgress::new("alice", "Alice", "w", "camp")
    }

    #[test]
    fn test_start_quest_is_idempotent() {
        let world = create_test_world();
        let mut player = create_test_player();
        assert_eq!(start_quest(&mut player, &world, "relic").unwrap(), QuestStart::Started);
        assert_eq!(
            start_quest(&mut player, &world, "relic").unwrap(),
            QuestStart::AlreadyActive
        );
        assert_eq!(player.active_quests.len(), 1);
        assert!(matches!(
            start_quest(&mut player, &world, "missing"),
            Err(GameError::NotFound(_))
        ));
    }

    #[test]
    fn test_completion_pays_rewards_once() {
        let world = create_test_world();
        let mut player = create_test_player();
        start_quest(&mut player, &world, "relic").unwrap();

        let first = complete_objective(&mut player, &world, "relic", "take", false).unwrap();
        assert_eq!(first, ObjectiveOutcome::Marked);
        let second = complete_objective(&mut player, &world, "relic", "explore", false).unwrap();
        assert!(matches!(second, ObjectiveOutcome::QuestCompleted { .. }));

        assert!(player.completed_quests.contains("relic"));
        assert!(!player.active_quests.contains("relic"));
        assert_eq!(get_item_quantity(&player, "reward-blade"), 1);
        assert_eq!(player.character_trust.get("sage"), Some(&35));
        assert_eq!(player.experience, 40);
        assert!(player.unlocked_locations.contains("crypt"));

        let again = complete_objective(&mut player, &world, "relic", "explore", false).unwrap();
        assert_eq!(again, ObjectiveOutcome::AlreadyComplete);
        assert_eq!(get_item_quantity(&player, "reward-blade"), 1);
        assert_eq!(player.experience, 40);
    }

    #[test]
    fn test_repeat_objective_is_noop() {
        let world = create_test_world();
        let mut player = create_test_player();
        start_quest(&mut player, &world, "relic").unwrap();
        complete_objective(&mut player, &world, "relic", "take", false).unwrap();
        assert_eq!(
            complete_objective(&mut player, &world, "relic", "take", false).unwrap(),
            ObjectiveOutcome::AlreadyComplete
        );
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let world = create_test_world();
        let mut player = create_test_player();
        start_quest(&mut player, &world, "relic").unwrap();
        assert!(matches!(
            complete_objective(&mut player, &world, "nope", "take", false),
            Err(GameError::NotFound(_))
        ));
        assert!(matches!(
            complete_objective(&mut player, &world, "relic", "nope", false),
            Err(GameError::NotFound(_))
        ));
    }

    #[test]
    fn test_unstarted_quest_is_rejected() {
        let world = create_test_world();
        let mut player = create_test_player();
        assert!(matches!(
            complete_objective(&mut player, &world, "side", "only", false),
            Err(GameError::InvalidState(_))
        ));
        assert!(player.completed_quests.is_empty());
    }

    #[test]
    fn test_strict_objectives_check_preconditions() {
        let world = create_test_world();
        let mut player = create_test_player();
        start_quest(&mut player, &world, "relic").unwrap();

        assert!(matches!(
            complete_objective(&mut player, &world, "relic", "take", true),
            Err(GameError::InvalidState(_))
        ));
        add_item_to_inventory(&mut player, "relic-item", 1);
        assert_eq!(
            complete_objective(&mut player, &world, "relic", "take", true).unwrap(),
            ObjectiveOutcome::Marked
        );

        assert!(complete_objective(&mut player, &world, "relic", "explore", true).is_err());
        player.visited_locations.insert("ruins".into());
        assert!(complete_objective(&mut player, &world, "relic", "explore", true).is_ok());
    }

    #[test]
    fn test_quest_queries() {
        let world = create_test_world();
        let mut player = create_test_player();
        assert_eq!(available_quests(&world, &player).len(), 1);

        start_quest(&mut player, &world, "relic").unwrap();
        start_quest(&mut player, &world, "side").unwrap();
        assert!(available_quests(&world, &player).is_empty());
        assert_eq!(active_quests(&world, &player).len(), 2);

        complete_objective(&mut player, &world, "side", "only", false).unwrap();
        let done = completed_quests(&world, &player);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].quest.id, "side");
    }

    #[test]
    fn test_format_quest_status() {
        let world = create_test_world();
        let mut player = create_test_player();
        start_quest(&mut player, &world, "relic").unwrap();
        complete_objective(&mut player, &world, "relic", "explore", false).unwrap();

        let text = format_quest_status(&world, &player, "relic").unwrap();
        assert!(text.starts_with("=== Relic (active) ==="));
        assert!(text.contains("[✓] Explore the ruins"));
        assert!(text.ends_with("1/2 objectives"));
    }
}
