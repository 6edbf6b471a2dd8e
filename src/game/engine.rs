//! The game state engine.
//!
//! [`GameEngine`] owns the committed [`GameSnapshot`] behind an `Arc`. Every
//! intent runs against a private clone of the snapshot; the clone replaces the
//! committed state only when the intent succeeds, so readers holding an older
//! `Arc` keep a consistent point-in-time view. A failed intent leaves the
//! committed state as it was and records the error message in
//! [`GameSnapshot::error`].

use std::sync::Arc;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::game::achievement::{check_achievements, default_rules, AchievementRule};
use crate::game::catalog::{world_view, LocationView, WorldCatalog};
use crate::game::dialogue::{self, OptionResult};
use crate::game::errors::GameError;
use crate::game::intent::{Intent, IntentOutcome};
use crate::game::inventory::{add_item_to_inventory, remove_item_from_inventory};
use crate::game::mode::{GameMode, ModeController, Origin, Transition};
use crate::game::progress;
use crate::game::quest::{self, ObjectiveOutcome, QuestStart};
use crate::game::storage::{SaveSnapshot, SnapshotStore};
use crate::game::tutorial;
use crate::game::types::{
    ActiveDialogue, Dialogue, DialogueOption, Difficulty, InventoryResult, PlayerProgress,
    TutorialState, World,
};

pub const GUEST_NAME: &str = "Traveler";

/// Engine behaviour switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// World a fresh player starts in
    pub starting_world: String,
    pub default_difficulty: Difficulty,
    pub auto_start_tutorial: bool,
    /// Persist after every committed mutation when a store is attached
    pub autosave: bool,
    /// Re-check option requirements when an option is chosen
    pub strict_requirements: bool,
    /// Verify collect/visit objectives before marking them
    pub strict_objectives: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            starting_world: crate::game::content::DEFAULT_WORLD_ID.to_string(),
            default_difficulty: Difficulty::default(),
            auto_start_tutorial: true,
            autosave: true,
            strict_requirements: false,
            strict_objectives: false,
        }
    }
}

/// Who is playing. Supplied by the host; a guest identity is generated otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
}

impl Identity {
    pub fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
        }
    }

    pub fn guest() -> Self {
        Self {
            id: format!("guest-{}", Uuid::new_v4().simple()),
            display_name: GUEST_NAME.to_string(),
        }
    }
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub progress: PlayerProgress,
    pub current_dialogue: Option<ActiveDialogue>,
    pub mode: GameMode,
    pub tutorial: TutorialState,
    pub difficulty: Difficulty,
    /// Message of the most recent failure; cleared by the next successful intent
    pub error: Option<String>,
}

impl GameSnapshot {
    fn empty(difficulty: Difficulty) -> Self {
        Self {
            progress: PlayerProgress::new("", "", "", ""),
            current_dialogue: None,
            mode: GameMode::Exploration,
            tutorial: TutorialState::default(),
            difficulty,
            error: None,
        }
    }

    fn request_mode(&mut self, target: GameMode, origin: Origin) -> Transition {
        let mut controller = ModeController::new(self.mode);
        let transition = controller.request(target, origin, self.tutorial.is_active);
        self.mode = controller.mode();
        if self.mode != GameMode::Dialogue {
            self.current_dialogue = None;
        }
        transition
    }
}

fn current_world<'c>(catalog: &'c WorldCatalog, progress: &PlayerProgress) -> Result<&'c World, GameError> {
    catalog.get_world(&progress.current_world)
}

fn transition_outcome(transition: Transition) -> IntentOutcome {
    match transition {
        Transition::Changed { from, to } => IntentOutcome::changed(format!("mode {} -> {}", from, to)),
        Transition::Unchanged => IntentOutcome::unchanged("mode unchanged"),
        Transition::Rejected => IntentOutcome::unchanged("mode change rejected"),
    }
}

pub struct GameEngine {
    catalog: Arc<WorldCatalog>,
    options: EngineOptions,
    rules: Vec<AchievementRule>,
    store: Option<Box<dyn SnapshotStore>>,
    state: Arc<GameSnapshot>,
    /// Set when the player's save could not be read; autosave stays off so
    /// the unreadable record is not overwritten.
    save_blocked: bool,
}

impl GameEngine {
    pub fn new(catalog: Arc<WorldCatalog>, options: EngineOptions) -> Self {
        let state = Arc::new(GameSnapshot::empty(options.default_difficulty));
        let rules = default_rules(catalog.len());
        Self {
            catalog,
            options,
            rules,
            store: None,
            state,
            save_blocked: false,
        }
    }

    /// Attach a save store; enables loading in `initialize` and autosave.
    pub fn with_store<S: SnapshotStore + 'static>(mut self, store: S) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn with_achievement_rules(mut self, rules: Vec<AchievementRule>) -> Self {
        self.rules = rules;
        self
    }

    /// The committed state. Cheap to clone and never mutated after hand-out.
    pub fn snapshot(&self) -> Arc<GameSnapshot> {
        Arc::clone(&self.state)
    }

    pub fn catalog(&self) -> &WorldCatalog {
        &self.catalog
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn store(&self) -> Option<&dyn SnapshotStore> {
        self.store.as_deref()
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn current_world(&self) -> Option<&World> {
        self.catalog.get_world(&self.state.progress.current_world).ok()
    }

    /// Locations of the current world as this player sees them.
    pub fn location_views(&self) -> Vec<LocationView<'_>> {
        match self.current_world() {
            Some(world) => world_view(world, &self.state.progress),
            None => Vec::new(),
        }
    }

    /// The dialogue node on screen, if any.
    pub fn current_dialogue(&self) -> Option<&Dialogue> {
        let active = self.state.current_dialogue.as_ref()?;
        self.current_world()?
            .character(&active.character_id)?
            .dialogue(&active.dialogue_id)
    }

    /// Options of the current dialogue whose requirements the player meets.
    pub fn available_options(&self) -> Vec<&DialogueOption> {
        match (self.current_dialogue(), self.current_world()) {
            (Some(node), Some(world)) => dialogue::available_options(node, &self.state.progress, world),
            _ => Vec::new(),
        }
    }

    pub fn tutorial_hint(&self) -> Option<&'static str> {
        let step = tutorial::current_step_id(&self.state.tutorial)?;
        tutorial::get_tutorial_hint(step, self.state.difficulty)
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Start a session. Loads the player's save when a store holds one,
    /// otherwise seeds fresh progress in the starting world. Never fails;
    /// load problems are logged and surfaced through `error`, and autosave is
    /// suspended until an explicit `save` or `new_game`.
    pub fn initialize(&mut self, identity: Option<Identity>) -> IntentOutcome {
        let identity = match identity {
            Some(id) if !id.id.trim().is_empty() => id,
            _ => Identity::guest(),
        };
        let display_name = if identity.display_name.trim().is_empty() {
            GUEST_NAME.to_string()
        } else {
            identity.display_name.clone()
        };

        let mut state = GameSnapshot::empty(self.options.default_difficulty);
        let mut load_error = None;
        let mut detail = "new player";
        self.save_blocked = false;

        match self.load_saved(&identity.id) {
            Ok(Some(saved)) => {
                state.progress = saved.progress;
                state.progress.display_name = display_name;
                state.difficulty = saved.difficulty;
                state.tutorial = saved.tutorial;
                detail = "save loaded";
                info!("loaded save for {}", identity.id);
            }
            Ok(None) => {
                state.progress = PlayerProgress::new(&identity.id, &display_name, "", "");
            }
            Err(e) => {
                warn!("failed to load save for {}: {}", identity.id, e);
                load_error = Some(e.to_string());
                self.save_blocked = true;
                state.progress = PlayerProgress::new(&identity.id, &display_name, "", "");
            }
        }

        self.place_in_valid_location(&mut state.progress);

        if tutorial::should_auto_start_tutorial(&state.tutorial, self.options.auto_start_tutorial) {
            tutorial::start_tutorial(&mut state.tutorial);
            state.mode = GameMode::Tutorial;
        }
        state.error = load_error;

        info!(
            "session started for {} in {}/{}",
            state.progress.id, state.progress.current_world, state.progress.current_location
        );
        self.state = Arc::new(state);
        self.autosave();
        IntentOutcome::changed(detail)
    }

    fn load_saved(&self, player_id: &str) -> Result<Option<SaveSnapshot>, GameError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        match store.get_snapshot(player_id) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(GameError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Ensure progress points at a world and location that exist in the catalog.
    fn place_in_valid_location(&self, progress: &mut PlayerProgress) {
        if let Ok(world) = self.catalog.get_world(&progress.current_world) {
            if world.location(&progress.current_location).is_some() {
                return;
            }
            if progress::enter_world(progress, world).is_ok() {
                return;
            }
        }
        let fallback = self
            .catalog
            .get_world(&self.options.starting_world)
            .ok()
            .or_else(|| self.catalog.worlds().next());
        match fallback {
            Some(world) => {
                if world.id != self.options.starting_world {
                    warn!(
                        "starting world {} not in catalog, using {}",
                        self.options.starting_world, world.id
                    );
                }
                if let Err(e) = progress::enter_world(progress, world) {
                    warn!("cannot enter world {}: {}", world.id, e);
                }
            }
            None => warn!("world catalog is empty"),
        }
    }

    /// Reset progress, keeping identity, difficulty and the tutorial's
    /// "dismissed forever" flag.
    pub fn new_game(&mut self) -> Result<IntentOutcome, GameError> {
        let was_blocked = std::mem::replace(&mut self.save_blocked, false);
        let result = self.commit("new_game", |engine, snap| {
            let mut fresh =
                PlayerProgress::new(&snap.progress.id, &snap.progress.display_name, "", "");
            fresh.created_at = snap.progress.created_at;
            engine.place_in_valid_location(&mut fresh);

            snap.progress = fresh;
            snap.current_dialogue = None;
            snap.mode = GameMode::Exploration;
            snap.tutorial = TutorialState {
                dismissed_forever: snap.tutorial.dismissed_forever,
                ..TutorialState::default()
            };
            info!("new game for {}", snap.progress.id);
            Ok(IntentOutcome::changed("new game"))
        });
        if result.is_err() {
            self.save_blocked = was_blocked;
        }
        result
    }

    /// Persist the committed state now.
    pub fn save(&mut self) -> Result<IntentOutcome, GameError> {
        match self.persist() {
            Ok(true) => {
                self.save_blocked = false;
                info!("saved {}", self.state.progress.id);
                Ok(IntentOutcome::unchanged("saved"))
            }
            Ok(false) => Ok(IntentOutcome::unchanged("no save store attached")),
            Err(e) => {
                warn!("save failed for {}: {}", self.state.progress.id, e);
                Arc::make_mut(&mut self.state).error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    pub fn select_world(&mut self, world_id: &str) -> Result<IntentOutcome, GameError> {
        self.commit("select_world", |engine, snap| {
            let world = engine.catalog.get_world(world_id)?;
            progress::enter_world(&mut snap.progress, world)?;
            snap.current_dialogue = None;
            snap.request_mode(GameMode::Exploration, Origin::User);
            info!("{} entered world {}", snap.progress.id, world.id);
            Ok(IntentOutcome::changed(format!(
                "entered {} at {}",
                world.id, snap.progress.current_location
            )))
        })
    }

    pub fn visit_location(&mut self, location_id: &str) -> Result<IntentOutcome, GameError> {
        self.commit("visit_location", |engine, snap| {
            let world = current_world(&engine.catalog, &snap.progress)?;
            let moved = snap.progress.current_location != location_id;
            let first = progress::visit_location(&mut snap.progress, world, location_id)?;
            if !moved && !first {
                return Ok(IntentOutcome::unchanged("already here"));
            }
            snap.request_mode(GameMode::Exploration, Origin::User);
            Ok(IntentOutcome::changed(if first {
                format!("discovered {}", location_id)
            } else {
                format!("returned to {}", location_id)
            }))
        })
    }

    pub fn set_mode(&mut self, mode: GameMode) -> Result<IntentOutcome, GameError> {
        self.commit("set_mode", |_, snap| {
            Ok(transition_outcome(snap.request_mode(mode, Origin::User)))
        })
    }

    // ------------------------------------------------------------------------
    // Dialogue
    // ------------------------------------------------------------------------

    pub fn enter_dialogue(
        &mut self,
        character_id: &str,
        dialogue_id: &str,
    ) -> Result<IntentOutcome, GameError> {
        self.commit("enter_dialogue", |engine, snap| {
            let world = current_world(&engine.catalog, &snap.progress)?;
            let node = dialogue::enter(world, character_id, dialogue_id)?;
            if engine.options.strict_requirements
                && !dialogue::dialogue_available(node, &snap.progress, world)
            {
                return Err(GameError::InvalidState(format!(
                    "conditions for dialogue {} are not met",
                    dialogue_id
                )));
            }
            if snap.tutorial.is_active {
                return Err(GameError::InvalidState(
                    "dialogue is locked while the tutorial is active".to_string(),
                ));
            }
            if snap.request_mode(GameMode::Dialogue, Origin::Dialogue) == Transition::Rejected {
                return Err(GameError::InvalidState(format!(
                    "cannot start a dialogue from {}",
                    snap.mode
                )));
            }
            snap.current_dialogue = Some(ActiveDialogue {
                character_id: character_id.to_string(),
                dialogue_id: dialogue_id.to_string(),
            });
            Ok(IntentOutcome::changed(format!("talking to {}", character_id)))
        })
    }

    pub fn choose_option(&mut self, option_id: &str) -> Result<IntentOutcome, GameError> {
        self.commit("choose_option", |engine, snap| {
            let Some(active) = snap.current_dialogue.clone() else {
                return Ok(IntentOutcome::unchanged("no active dialogue"));
            };
            let world = current_world(&engine.catalog, &snap.progress)?;
            let result = dialogue::choose_option(
                &mut snap.progress,
                world,
                &active,
                option_id,
                engine.options.strict_requirements,
            )?;
            match result {
                OptionResult::Stale => Ok(IntentOutcome::unchanged("stale option")),
                OptionResult::Chosen {
                    applied,
                    next: Some(next),
                } => {
                    let detail = format!("{} consequences, next {}", applied, next.dialogue_id);
                    snap.current_dialogue = Some(next);
                    Ok(IntentOutcome::changed(detail))
                }
                OptionResult::Chosen { applied, next: None } => {
                    snap.request_mode(GameMode::Exploration, Origin::Dialogue);
                    snap.current_dialogue = None;
                    Ok(IntentOutcome::changed(format!(
                        "{} consequences, dialogue ended",
                        applied
                    )))
                }
            }
        })
    }

    // ------------------------------------------------------------------------
    // Quests
    // ------------------------------------------------------------------------

    pub fn start_quest(&mut self, quest_id: &str) -> Result<IntentOutcome, GameError> {
        self.commit("start_quest", |engine, snap| {
            let world = current_world(&engine.catalog, &snap.progress)?;
            Ok(match quest::start_quest(&mut snap.progress, world, quest_id)? {
                QuestStart::Started => IntentOutcome::changed(format!("started {}", quest_id)),
                QuestStart::AlreadyActive => IntentOutcome::unchanged("quest already active"),
                QuestStart::AlreadyCompleted => IntentOutcome::unchanged("quest already completed"),
            })
        })
    }

    pub fn complete_objective(
        &mut self,
        quest_id: &str,
        objective_id: &str,
    ) -> Result<IntentOutcome, GameError> {
        self.commit("complete_objective", |engine, snap| {
            let world = current_world(&engine.catalog, &snap.progress)?;
            let outcome = quest::complete_objective(
                &mut snap.progress,
                world,
                quest_id,
                objective_id,
                engine.options.strict_objectives,
            )?;
            Ok(match outcome {
                ObjectiveOutcome::AlreadyComplete => {
                    IntentOutcome::unchanged("objective already complete")
                }
                ObjectiveOutcome::Marked => {
                    IntentOutcome::changed(format!("completed {}/{}", quest_id, objective_id))
                }
                ObjectiveOutcome::QuestCompleted { rewards } => IntentOutcome::changed(format!(
                    "quest {} completed, {} rewards",
                    quest_id,
                    rewards.len()
                )),
            })
        })
    }

    // ------------------------------------------------------------------------
    // Inventory, trust and story
    // ------------------------------------------------------------------------

    pub fn add_item(&mut self, item_id: &str, quantity: u32) -> Result<IntentOutcome, GameError> {
        self.commit("add_item", |engine, snap| {
            let world = current_world(&engine.catalog, &snap.progress)?;
            if world.item(item_id).is_none() {
                return Err(GameError::not_found("item", item_id));
            }
            Ok(inventory_outcome(add_item_to_inventory(
                &mut snap.progress,
                item_id,
                quantity,
            )))
        })
    }

    pub fn remove_item(&mut self, item_id: &str, quantity: u32) -> Result<IntentOutcome, GameError> {
        self.commit("remove_item", |_, snap| {
            Ok(inventory_outcome(remove_item_from_inventory(
                &mut snap.progress,
                item_id,
                quantity,
            )))
        })
    }

    pub fn update_trust(&mut self, character_id: &str, delta: i32) -> Result<IntentOutcome, GameError> {
        self.commit("update_trust", |engine, snap| {
            let world = current_world(&engine.catalog, &snap.progress)?;
            if world.character(character_id).is_none() {
                return Err(GameError::not_found("character", character_id));
            }
            let before = progress::current_trust(Some(world), &snap.progress, character_id);
            let after = progress::update_trust(&mut snap.progress, Some(world), character_id, delta);
            if before == after {
                return Ok(IntentOutcome::unchanged(format!("trust stays at {}", after)));
            }
            Ok(IntentOutcome::changed(format!("trust {} -> {}", before, after)))
        })
    }

    pub fn advance_story(&mut self, flag: &str, delta: i32) -> Result<IntentOutcome, GameError> {
        self.commit("advance_story", |_, snap| {
            let before = snap.progress.story_value(flag);
            let after = progress::advance_story(&mut snap.progress, flag, delta);
            if before == after {
                return Ok(IntentOutcome::unchanged("story counter unchanged"));
            }
            Ok(IntentOutcome::changed(format!("{} = {}", flag, after)))
        })
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<IntentOutcome, GameError> {
        self.commit("set_difficulty", |_, snap| {
            if snap.difficulty == difficulty {
                return Ok(IntentOutcome::unchanged("difficulty unchanged"));
            }
            snap.difficulty = difficulty;
            Ok(IntentOutcome::changed(format!("difficulty {:?}", difficulty)))
        })
    }

    // ------------------------------------------------------------------------
    // Tutorial
    // ------------------------------------------------------------------------

    pub fn start_tutorial(&mut self) -> Result<IntentOutcome, GameError> {
        self.commit("start_tutorial", |_, snap| {
            if snap.tutorial.is_active {
                tutorial::start_tutorial(&mut snap.tutorial);
                return Ok(IntentOutcome::changed("tutorial restarted"));
            }
            snap.request_mode(GameMode::Tutorial, Origin::Tutorial);
            tutorial::start_tutorial(&mut snap.tutorial);
            Ok(IntentOutcome::changed("tutorial started"))
        })
    }

    pub fn next_tutorial_step(&mut self) -> Result<IntentOutcome, GameError> {
        self.commit("next_tutorial_step", |_, snap| {
            if tutorial::next_step(&mut snap.tutorial) {
                Ok(IntentOutcome::changed(format!(
                    "tutorial step {}",
                    snap.tutorial.current_step
                )))
            } else {
                Ok(IntentOutcome::unchanged("tutorial step unchanged"))
            }
        })
    }

    pub fn complete_tutorial_step(&mut self, step_id: &str) -> Result<IntentOutcome, GameError> {
        self.commit("complete_tutorial_step", |_, snap| {
            if tutorial::complete_step(&mut snap.tutorial, step_id) {
                Ok(IntentOutcome::changed(format!("tutorial step {} complete", step_id)))
            } else {
                Ok(IntentOutcome::unchanged("tutorial step already complete"))
            }
        })
    }

    pub fn dismiss_tutorial(&mut self, forever: bool) -> Result<IntentOutcome, GameError> {
        self.commit("dismiss_tutorial", |_, snap| {
            let was_active = snap.tutorial.is_active;
            if was_active {
                snap.request_mode(GameMode::Exploration, Origin::Tutorial);
            }
            let was_forever = snap.tutorial.dismissed_forever;
            tutorial::dismiss_tutorial(&mut snap.tutorial, forever);
            if !was_active && was_forever == snap.tutorial.dismissed_forever {
                return Ok(IntentOutcome::unchanged("tutorial not running"));
            }
            Ok(IntentOutcome::changed("tutorial dismissed"))
        })
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    pub fn apply(&mut self, intent: &Intent) -> Result<IntentOutcome, GameError> {
        debug!("intent {}", intent.name());
        match intent {
            Intent::SelectWorld { world_id } => self.select_world(world_id),
            Intent::VisitLocation { location_id } => self.visit_location(location_id),
            Intent::EnterDialogue {
                character_id,
                dialogue_id,
            } => self.enter_dialogue(character_id, dialogue_id),
            Intent::ChooseOption { option_id } => self.choose_option(option_id),
            Intent::StartQuest { quest_id } => self.start_quest(quest_id),
            Intent::CompleteObjective {
                quest_id,
                objective_id,
            } => self.complete_objective(quest_id, objective_id),
            Intent::AddItem { item_id, quantity } => self.add_item(item_id, *quantity),
            Intent::RemoveItem { item_id, quantity } => self.remove_item(item_id, *quantity),
            Intent::UpdateTrust {
                character_id,
                delta,
            } => self.update_trust(character_id, *delta),
            Intent::AdvanceStory { flag, delta } => self.advance_story(flag, *delta),
            Intent::SetMode { mode } => self.set_mode(*mode),
            Intent::StartTutorial => self.start_tutorial(),
            Intent::NextTutorialStep => self.next_tutorial_step(),
            Intent::CompleteTutorialStep { step_id } => self.complete_tutorial_step(step_id),
            Intent::DismissTutorial { forever } => self.dismiss_tutorial(*forever),
            Intent::SetDifficulty { difficulty } => self.set_difficulty(*difficulty),
            Intent::NewGame => self.new_game(),
            Intent::Save => self.save(),
        }
    }

    // ------------------------------------------------------------------------
    // Commit and persistence
    // ------------------------------------------------------------------------

    /// Run `f` on a working copy and swap it in on success. Achievements are
    /// evaluated and autosave runs only when state actually changed.
    fn commit<F>(&mut self, label: &str, f: F) -> Result<IntentOutcome, GameError>
    where
        F: FnOnce(&GameEngine, &mut GameSnapshot) -> Result<IntentOutcome, GameError>,
    {
        let mut working = (*self.state).clone();
        working.error = None;

        match f(self, &mut working) {
            Ok(mut outcome) => {
                if outcome.changed {
                    outcome.achievements = check_achievements(&mut working.progress, &self.rules);
                    working.progress.touch();
                }
                debug!("{}: {}", label, outcome.detail);
                self.state = Arc::new(working);
                if outcome.changed {
                    self.autosave();
                }
                Ok(outcome)
            }
            Err(e) => {
                if e.is_persistence() {
                    warn!("{} failed: {}", label, e);
                } else {
                    debug!("{} failed: {}", label, e);
                }
                Arc::make_mut(&mut self.state).error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn persist(&self) -> Result<bool, GameError> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        let snapshot = SaveSnapshot::new(
            self.state.progress.clone(),
            self.state.difficulty,
            self.state.tutorial.clone(),
        );
        store.put_snapshot(snapshot)?;
        Ok(true)
    }

    /// Best-effort save; a failure is reported but never rolls back.
    fn autosave(&mut self) {
        if !self.options.autosave {
            return;
        }
        if self.save_blocked {
            debug!("autosave skipped for {}: save unreadable", self.state.progress.id);
            return;
        }
        if let Err(e) = self.persist() {
            warn!("autosave failed for {}: {}", self.state.progress.id, e);
            Arc::make_mut(&mut self.state).error = Some(format!("save failed: {}", e));
        }
    }
}

fn inventory_outcome(result: InventoryResult) -> IntentOutcome {
    match result {
        InventoryResult::Added { quantity, stacked } => IntentOutcome::changed(format!(
            "added {}{}",
            quantity,
            if stacked { " (stacked)" } else { "" }
        )),
        InventoryResult::Removed { quantity, emptied } => IntentOutcome::changed(format!(
            "removed {}{}",
            quantity,
            if emptied { " (emptied)" } else { "" }
        )),
        InventoryResult::Unchanged { reason } => IntentOutcome::unchanged(reason),
    }
}
