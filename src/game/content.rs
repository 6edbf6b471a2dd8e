//! Built-in world definitions.
//!
//! Four self-contained settings ship with the engine. Content packs loaded via
//! [`crate::game::seed_loader`] can replace them at startup.

use crate::game::types::{
    Character, ConsequenceKind, Dialogue, DialogueOption, EffectKind, Genre, Item, ItemType,
    Location, ObjectiveKind, Quest, Rarity, RequirementKind, RewardKind, World,
};

pub const DEFAULT_WORLD_ID: &str = "fantasy";

/// Every built-in world in catalog order.
pub fn builtin_worlds() -> Vec<World> {
    vec![fantasy_world(), scifi_world(), medieval_world(), egypt_world()]
}

fn fantasy_world() -> World {
    World::new(
        "fantasy",
        "Kingdom of Eldaria",
        "An ancient kingdom where magic and steel rule. Elves, dwarves and men share the land \
         while dark forces gather at its borders.",
        Genre::Fantasy,
    )
    .with_entry_location("fantasy-village")
    .with_location(
        Location::new(
            "fantasy-forest",
            "Dark Forest",
            "An ancient forest full of secrets. Branches creak in the wind and strange sounds \
             drift out of the deep.",
        )
        .connected_to(&["fantasy-village", "fantasy-cave"])
        .with_characters(&["fantasy-elf", "fantasy-druid"])
        .with_items(&["magic-herb"]),
    )
    .with_location(
        Location::new(
            "fantasy-village",
            "Rivendale Village",
            "A cosy village among green hills. The locals are always ready to help a traveller.",
        )
        .connected_to(&["fantasy-forest", "fantasy-castle"])
        .with_characters(&["fantasy-villager", "fantasy-merchant"]),
    )
    .with_location(
        Location::new(
            "fantasy-castle",
            "King's Castle",
            "A towering castle above the realm where the king and his court hold council.",
        )
        .connected_to(&["fantasy-village", "fantasy-tower"])
        .with_characters(&["fantasy-king", "fantasy-wizard"]),
    )
    .with_location(
        Location::new(
            "fantasy-cave",
            "Dragon's Cave",
            "A gloomy cave where an ancient dragon sleeps on its hoard.",
        )
        .connected_to(&["fantasy-forest", "fantasy-secret-chamber"])
        .with_characters(&["fantasy-dragon"])
        .with_items(&["artifact-piece", "ancient-artifact"]),
    )
    .with_location(
        Location::new(
            "fantasy-tower",
            "Mages' Tower",
            "A tall tower where the old arts are studied and the secrets of ages are kept.",
        )
        .connected_to(&["fantasy-castle"])
        .with_characters(&["fantasy-archmage"]),
    )
    .with_location(
        Location::new(
            "fantasy-secret-chamber",
            "Secret Chamber",
            "A sealed vault behind the dragon's hoard, untouched for a thousand years.",
        )
        .connected_to(&["fantasy-cave"])
        .locked(),
    )
    .with_character(
        Character::new(
            "fantasy-elf",
            "Elara",
            "A wise elf, guardian of the forest, who knows every secret of the wild.",
            "Wise and caring, but wary of strangers",
            50,
        )
        .offering("fantasy-artifact-quest")
        .with_dialogue(
            Dialogue::new(
                "elf-greeting",
                "Greetings, traveller. I am Elara, keeper of this forest. What brings you here?",
            )
            .with_option(
                DialogueOption::new("elf-help", "I need help finding an ancient artifact")
                    .with_consequence(ConsequenceKind::AdvanceQuest, "fantasy-artifact-quest", 1)
                    .goto("elf-artifact-lore"),
            )
            .with_option(
                DialogueOption::new("elf-explore", "I am just exploring these lands")
                    .with_consequence(ConsequenceKind::ChangeTrust, "fantasy-elf", 10),
            )
            .with_option(
                DialogueOption::new("elf-show-piece", "I found a piece of the artifact")
                    .requires(RequirementKind::ItemOwned, "artifact-piece", 1)
                    .with_consequence(ConsequenceKind::LoseItem, "artifact-piece", 1)
                    .with_consequence(ConsequenceKind::ChangeTrust, "fantasy-elf", 15)
                    .with_consequence(ConsequenceKind::AdvanceStory, "forest-secrets", 1),
            ),
        )
        .with_dialogue(
            Dialogue::new(
                "elf-artifact-lore",
                "The artifact was shattered long ago. Search the forest, and look for a shard \
                 near the dragon's lair.",
            )
            .with_option(DialogueOption::new("elf-thanks", "Thank you, Elara")),
        ),
    )
    .with_character(
        Character::new(
            "fantasy-king",
            "King Thorin",
            "A just ruler who seeks a way to shield his people from the gathering dark.",
            "Wise and fair, but troubled by threats",
            80,
        )
        .offering("fantasy-main-quest")
        .with_dialogue(
            Dialogue::new(
                "king-greeting",
                "Welcome to my castle, hero. The kingdom needs your help against the dark.",
            )
            .with_option(
                DialogueOption::new("king-accept", "I am ready to serve the kingdom")
                    .with_consequence(ConsequenceKind::AdvanceQuest, "fantasy-main-quest", 1)
                    .with_consequence(ConsequenceKind::ChangeTrust, "fantasy-king", 20),
            )
            .with_option(
                DialogueOption::new("king-decline", "I need time to think")
                    .with_consequence(ConsequenceKind::ChangeTrust, "fantasy-king", -10),
            )
            .with_option(
                DialogueOption::new("king-report", "The forest is safe again")
                    .requires(RequirementKind::QuestCompleted, "fantasy-artifact-quest", 1)
                    .with_consequence(ConsequenceKind::AdvanceStory, "royal-favour", 1)
                    .goto("king-gratitude"),
            ),
        )
        .with_dialogue(
            Dialogue::new(
                "king-gratitude",
                "Word of your deeds reached the court. Eldaria owes you much.",
            )
            .with_option(
                DialogueOption::new("king-humble", "I only did what was needed")
                    .with_consequence(ConsequenceKind::ChangeTrust, "fantasy-king", 5),
            ),
        ),
    )
    .with_quest(
        Quest::new(
            "fantasy-main-quest",
            "Saving the Kingdom",
            "Dark forces threaten the kingdom. Find the ancient artifact and defeat the evil.",
            "fantasy-king",
        )
        .with_objective(
            "find-artifact",
            "Find the ancient artifact in the dragon's cave",
            ObjectiveKind::CollectItem,
            "ancient-artifact",
        )
        .with_objective(
            "defeat-dark-lord",
            "Defeat the dark lord",
            ObjectiveKind::TalkToCharacter,
            "fantasy-dark-lord",
        )
        .with_reward(RewardKind::Item, "legendary-sword", 1)
        .with_reward(RewardKind::LocationUnlock, "fantasy-secret-chamber", 1),
    )
    .with_quest(
        Quest::new(
            "fantasy-artifact-quest",
            "The Artifact Hunt",
            "Elara asks you to recover the ancient artifact that protects the forest.",
            "fantasy-elf",
        )
        .with_objective(
            "search-forest",
            "Explore the dark forest",
            ObjectiveKind::VisitLocation,
            "fantasy-forest",
        )
        .with_objective(
            "find-artifact-piece",
            "Find a piece of the artifact",
            ObjectiveKind::CollectItem,
            "artifact-piece",
        )
        .with_reward(RewardKind::Trust, "fantasy-elf", 30)
        .with_reward(RewardKind::Item, "magic-herb", 3)
        .with_reward(RewardKind::Experience, "", 50),
    )
    .with_item(
        Item::new(
            "legendary-sword",
            "Legendary Sword",
            "A blade forged for the kingdom's champion.",
            ItemType::Weapon,
            Rarity::Legendary,
        )
        .with_effect(EffectKind::Damage, 50),
    )
    .with_item(
        Item::new(
            "magic-herb",
            "Magic Herb",
            "A fragrant herb that mends wounds.",
            ItemType::Consumable,
            Rarity::Common,
        )
        .with_effect(EffectKind::Healing, 10),
    )
    .with_item(Item::new(
        "ancient-artifact",
        "Ancient Artifact",
        "A relic humming with old power.",
        ItemType::Artifact,
        Rarity::Epic,
    ))
    .with_item(Item::new(
        "artifact-piece",
        "Artifact Shard",
        "A glowing shard broken from a greater whole.",
        ItemType::Artifact,
        Rarity::Rare,
    ))
}

fn scifi_world() -> World {
    World::new(
        "sci-fi",
        "Nexus Galaxy",
        "The far future: humanity has reached the stars and met other civilisations in a \
         tangled web of politics and technology.",
        Genre::SciFi,
    )
    .with_location(
        Location::new(
            "scifi-space-station",
            "Alpha Station",
            "A vast station, hub of trade and diplomacy between the galaxy's races.",
        )
        .connected_to(&["scifi-planet", "scifi-ship"])
        .with_characters(&["scifi-captain", "scifi-alien"]),
    )
    .with_location(
        Location::new(
            "scifi-planet",
            "Planet Xenon",
            "A strange world with an unusual ecosystem, rich in rare resources.",
        )
        .connected_to(&["scifi-space-station", "scifi-ruins"])
        .with_characters(&["scifi-scientist", "scifi-native"]),
    )
    .with_location(
        Location::new(
            "scifi-ship",
            "Starship Meridian",
            "The captain's exploration vessel, docked and ready to launch.",
        )
        .connected_to(&["scifi-space-station"]),
    )
    .with_location(
        Location::new(
            "scifi-ruins",
            "Xenon Ruins",
            "Crumbling structures left by a civilisation older than the stars' names.",
        )
        .connected_to(&["scifi-planet", "scifi-secret-lab"])
        .with_items(&["ancient-tech"]),
    )
    .with_location(
        Location::new(
            "scifi-secret-lab",
            "Sealed Laboratory",
            "A laboratory hidden beneath the ruins, its systems still humming.",
        )
        .connected_to(&["scifi-ruins"])
        .locked(),
    )
    .with_character(
        Character::new(
            "scifi-captain",
            "Captain Sarah Connors",
            "A seasoned starship captain known for charting the galaxy's far reaches.",
            "Brave and decisive, but careful",
            60,
        )
        .offering("scifi-exploration-quest")
        .with_dialogue(
            Dialogue::new(
                "captain-greeting",
                "Welcome aboard, explorer. Ready for an adventure in deep space?",
            )
            .with_option(
                DialogueOption::new("captain-ready", "Ready for anything!").with_consequence(
                    ConsequenceKind::AdvanceQuest,
                    "scifi-exploration-quest",
                    1,
                ),
            ),
        ),
    )
    .with_quest(
        Quest::new(
            "scifi-exploration-quest",
            "Into the Unknown",
            "Explore the mysterious ruins on planet Xenon and recover ancient technology.",
            "scifi-captain",
        )
        .with_objective(
            "explore-ruins",
            "Explore the ancient ruins",
            ObjectiveKind::VisitLocation,
            "scifi-ruins",
        )
        .with_objective(
            "find-tech",
            "Recover the ancient technology",
            ObjectiveKind::CollectItem,
            "ancient-tech",
        )
        .with_reward(RewardKind::Item, "advanced-weapon", 1)
        .with_reward(RewardKind::LocationUnlock, "scifi-secret-lab", 1),
    )
    .with_item(
        Item::new(
            "advanced-weapon",
            "Plasma Rifle",
            "A weapon of unknown make, light and frighteningly precise.",
            ItemType::Weapon,
            Rarity::Epic,
        )
        .with_effect(EffectKind::Damage, 40),
    )
    .with_item(Item::new(
        "ancient-tech",
        "Ancient Technology",
        "A device whose purpose nobody on the station can explain.",
        ItemType::Artifact,
        Rarity::Rare,
    ))
}

fn medieval_world() -> World {
    World::new(
        "medieval",
        "Kingdom of Westmark",
        "A medieval realm of knights, castles and crowns, where intrigue, battle and honour \
         decide every fate.",
        Genre::Medieval,
    )
    .with_location(
        Location::new(
            "medieval-castle",
            "Westmark Castle",
            "The king's seat and the heart of the realm's politics.",
        )
        .connected_to(&["medieval-town", "medieval-dungeon"])
        .with_characters(&["medieval-king", "medieval-knight"]),
    )
    .with_location(
        Location::new(
            "medieval-town",
            "Knights' Town",
            "A lively town of craftsmen, merchants and knights.",
        )
        .connected_to(&["medieval-castle", "medieval-tavern", "medieval-forest"])
        .with_characters(&["medieval-merchant", "medieval-bard"]),
    )
    .with_location(
        Location::new(
            "medieval-dungeon",
            "Castle Dungeon",
            "Damp cells beneath the castle where the realm's enemies wait.",
        )
        .connected_to(&["medieval-castle"]),
    )
    .with_location(
        Location::new(
            "medieval-tavern",
            "The Crooked Lance",
            "A smoky tavern where rumours travel faster than riders.",
        )
        .connected_to(&["medieval-town"]),
    )
    .with_location(
        Location::new(
            "medieval-forest",
            "Bandit Woods",
            "Thick woods on the town's edge, home to a band of outlaws.",
        )
        .connected_to(&["medieval-town"]),
    )
    .with_character(
        Character::new(
            "medieval-king",
            "King Richard",
            "A wise king who rules with honour and dignity.",
            "Wise and fair, but stern",
            70,
        )
        .offering("medieval-knight-quest")
        .with_dialogue(
            Dialogue::new(
                "medieval-king-greeting",
                "Welcome to my castle, traveller. The realm needs loyal knights.",
            )
            .with_option(
                DialogueOption::new("medieval-king-serve", "I am ready to serve as a knight")
                    .with_consequence(ConsequenceKind::AdvanceQuest, "medieval-knight-quest", 1),
            ),
        ),
    )
    .with_quest(
        Quest::new(
            "medieval-knight-quest",
            "The Knight's Path",
            "Become a true knight of the realm by passing the trials of honour and courage.",
            "medieval-king",
        )
        .with_objective(
            "prove-honor",
            "Prove your honour and courage",
            ObjectiveKind::TalkToCharacter,
            "medieval-knight",
        )
        .with_objective(
            "defeat-bandits",
            "Defeat the bandits threatening the town",
            ObjectiveKind::VisitLocation,
            "medieval-forest",
        )
        .with_reward(RewardKind::Item, "knight-armor", 1)
        .with_reward(RewardKind::Item, "noble-sword", 1),
    )
    .with_item(
        Item::new(
            "knight-armor",
            "Knight's Armour",
            "Polished plate bearing the royal crest.",
            ItemType::Armor,
            Rarity::Rare,
        )
        .with_effect(EffectKind::Protection, 30),
    )
    .with_item(
        Item::new(
            "noble-sword",
            "Noble Sword",
            "A finely balanced blade granted to knights of Westmark.",
            ItemType::Weapon,
            Rarity::Rare,
        )
        .with_effect(EffectKind::Damage, 25),
    )
}

fn egypt_world() -> World {
    World::new(
        "egypt",
        "Ancient Egypt",
        "Land of pharaohs, pyramids and old gods, where myth and magic weave through reality.",
        Genre::Egypt,
    )
    .with_location(
        Location::new(
            "egypt-pyramid",
            "Great Pyramid",
            "An ancient pyramid full of secrets and traps, guarding the pharaohs' treasures.",
        )
        .connected_to(&["egypt-temple", "egypt-tomb"])
        .with_characters(&["egypt-pharaoh", "egypt-priest"]),
    )
    .with_location(
        Location::new(
            "egypt-temple",
            "Temple of the Gods",
            "A sacred temple where the old gods are worshipped and blessings are given.",
        )
        .connected_to(&["egypt-pyramid", "egypt-oasis"])
        .with_characters(&["egypt-high-priest", "egypt-oracle"]),
    )
    .with_location(
        Location::new(
            "egypt-tomb",
            "Royal Tomb",
            "A narrow burial chamber lined with painted spells.",
        )
        .connected_to(&["egypt-pyramid", "egypt-secret-chamber"])
        .with_items(&["ancient-scroll"]),
    )
    .with_location(
        Location::new(
            "egypt-oasis",
            "Desert Oasis",
            "Palms and cool water in the middle of the burning sands.",
        )
        .connected_to(&["egypt-temple"]),
    )
    .with_location(
        Location::new(
            "egypt-secret-chamber",
            "Hidden Sanctum",
            "A chamber sealed by the curse itself, now open to the one who lifted it.",
        )
        .connected_to(&["egypt-tomb"])
        .locked(),
    )
    .with_character(
        Character::new(
            "egypt-pharaoh",
            "Pharaoh Tutankhamun",
            "The young ruler of Egypt, searching for a way to lift a curse from his land.",
            "Wise, but haunted by the curse",
            80,
        )
        .offering("egypt-curse-quest")
        .with_dialogue(
            Dialogue::new(
                "pharaoh-greeting",
                "Greetings, traveller. The gods have led you to my kingdom. Will you help me \
                 lift the curse?",
            )
            .with_option(
                DialogueOption::new("pharaoh-help", "I am ready to help lift the curse")
                    .with_consequence(ConsequenceKind::AdvanceQuest, "egypt-curse-quest", 1),
            ),
        ),
    )
    .with_quest(
        Quest::new(
            "egypt-curse-quest",
            "The Pharaoh's Curse",
            "Help the pharaoh lift the ancient curse that threatens all of Egypt.",
            "egypt-pharaoh",
        )
        .with_objective(
            "find-scroll",
            "Find the ancient scroll with the spell",
            ObjectiveKind::CollectItem,
            "ancient-scroll",
        )
        .with_objective(
            "perform-ritual",
            "Perform the ritual in the temple of the gods",
            ObjectiveKind::VisitLocation,
            "egypt-temple",
        )
        .with_reward(RewardKind::Item, "pharaoh-crown", 1)
        .with_reward(RewardKind::LocationUnlock, "egypt-secret-chamber", 1),
    )
    .with_item(
        Item::new(
            "pharaoh-crown",
            "Crown of the Pharaoh",
            "The double crown of Upper and Lower Egypt.",
            ItemType::Artifact,
            Rarity::Legendary,
        )
        .with_effect(EffectKind::Special, 1),
    )
    .with_item(Item::new(
        "ancient-scroll",
        "Ancient Scroll",
        "Papyrus inscribed with a ritual of unbinding.",
        ItemType::Key,
        Rarity::Rare,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_reward_item_is_in_the_world_registry() {
        for world in builtin_worlds() {
            for quest in &world.quests {
                for reward in &quest.rewards {
                    if reward.kind == RewardKind::Item {
                        assert!(
                            world.item(&reward.target).is_some(),
                            "{} rewards unknown item {}",
                            quest.id,
                            reward.target
                        );
                    }
                    if reward.kind == RewardKind::LocationUnlock {
                        let location = world.location(&reward.target).expect("unlock target");
                        assert!(location.locked);
                    }
                }
            }
        }
    }

    #[test]
    fn fantasy_entry_is_the_village() {
        let worlds = builtin_worlds();
        let fantasy = worlds.iter().find(|w| w.id == DEFAULT_WORLD_ID).unwrap();
        assert_eq!(fantasy.entry_location_id(), Some("fantasy-village"));
    }

    #[test]
    fn offered_quests_exist() {
        for world in builtin_worlds() {
            for character in &world.characters {
                for quest_id in &character.quests {
                    assert!(world.quest(quest_id).is_some(), "missing {}", quest_id);
                }
            }
        }
    }
}
