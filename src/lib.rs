//! # Interactive Worlds - game state engine for multi-world stories
//!
//! Interactive Worlds keeps the state of a player's journey through a catalog
//! of narrative worlds: where they are, who trusts them, what they carry, which
//! quests they have taken on and how far the tutorial has got. A presentation
//! layer drives it with intents and renders the snapshots it hands back.
//!
//! ## Features
//!
//! - **World Catalog**: Four built-in worlds (fantasy, sci-fi, medieval, egypt) or a JSON content pack.
//! - **Dialogue Trees**: Requirement-gated options with ordered consequences.
//! - **Quest Ledger**: Objectives, ordered reward disbursement and location unlocks.
//! - **Inventory**: Stacking item ledger that never holds an empty stack.
//! - **Navigation Modes**: Exploration, dialogue, inventory, quest, tutorial and settings with an explicit transition table.
//! - **Persistence**: Versioned save snapshots in an embedded sled database.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use interactive_worlds::game::{EngineOptions, GameEngine, Identity, WorldCatalog};
//!
//! fn main() -> anyhow::Result<()> {
//!     let catalog = Arc::new(WorldCatalog::builtin()?);
//!     let mut engine = GameEngine::new(catalog, EngineOptions::default());
//!     engine.initialize(Some(Identity::new("alice", "Alice")));
//!     engine.dismiss_tutorial(false)?;
//!     engine.visit_location("fantasy-forest")?;
//!     println!("{}", engine.snapshot().progress.current_location);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - Catalog, progress, dialogue, quests, modes, tutorial, achievements and saves
//! - [`config`] - Configuration management and validation
//! - [`validation`] - Player identity and input validation

pub mod config;
pub mod game;
pub mod validation;
