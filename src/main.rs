//! Binary entrypoint for the interactive-worlds CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml`
//! - `worlds` - list the worlds in the configured catalog
//! - `status --player <id>` - print a player's saved progress
//! - `apply --player <id> [--name <name>] <intents.json>` - replay a script of intents
//! - `new-game --player <id>` - reset a player's progress, keeping identity and settings
//! - `saves` - list player ids with a save
//!
//! See the library crate docs for module-level details: `interactive_worlds::`.
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use interactive_worlds::config::Config;
use interactive_worlds::game::{
    self, available_quests, format_inventory, format_quest_status, format_tutorial_status,
    load_catalog, GameEngine, GameError, Identity, Intent, SaveStore, WorldCatalog,
};
use interactive_worlds::validation::{secure_json_parse, validate_display_name, validate_player_id};

/// Upper bound for an intent script file.
const MAX_SCRIPT_BYTES: usize = 1024 * 1024;

#[derive(Parser)]
#[command(name = "interactive-worlds")]
#[command(about = "Game state engine for multi-world interactive stories")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// List available worlds
    Worlds,
    /// Show a player's saved progress
    Status {
        #[arg(short, long)]
        player: String,
    },
    /// Apply a JSON array of intents to a player's session
    Apply {
        #[arg(short, long)]
        player: String,
        /// Display name for the session (defaults to the saved name)
        #[arg(short, long)]
        name: Option<String>,
        /// Path to the intents file
        script: String,
    },
    /// Start over, keeping identity, difficulty and tutorial preference
    NewGame {
        #[arg(short, long)]
        player: String,
    },
    /// List players that have a save
    Saves,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init has no config yet; everything else loads it first to configure logging
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Init => {
            info!("Initializing new configuration");
            Config::create_default(&cli.config).await?;
            let cfg = Config::default();
            tokio::fs::create_dir_all(&cfg.storage.data_dir).await?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::Worlds => {
            let config = load_or_default(pre_config, &cli.config);
            let catalog = open_catalog(&config)?;
            for world in catalog.worlds() {
                println!(
                    "{:<10} {:<28} {:?}, {} locations, {} quests",
                    world.id,
                    world.name,
                    world.genre,
                    world.locations.len(),
                    world.quests.len()
                );
            }
        }
        Commands::Status { player } => {
            let config = load_or_default(pre_config, &cli.config);
            let player = validate_player_id(&player)?;
            let store = SaveStore::open(config.storage.save_db_path())?;
            match store.get_snapshot(&player) {
                Err(GameError::NotFound(_)) => {
                    println!("No save for {}", player);
                    return Ok(());
                }
                Err(e) => warn!("Save for {} unreadable: {}", player, e),
                Ok(_) => {}
            }
            // Read-only: never write back while reporting
            let engine = start_session(&config, store, &player, None, false)?;
            print_status(&engine);
        }
        Commands::Apply {
            player,
            name,
            script,
        } => {
            let config = load_or_default(pre_config, &cli.config);
            let player = validate_player_id(&player)?;
            let name = name.map(|n| validate_display_name(&n)).transpose()?;

            let content = tokio::fs::read_to_string(&script)
                .await
                .map_err(|e| anyhow!("Failed to read script {}: {}", script, e))?;
            let intents: Vec<Intent> = secure_json_parse(&content, MAX_SCRIPT_BYTES)?;

            let store = SaveStore::open(config.storage.save_db_path())?;
            let mut engine = start_session(&config, store, &player, name.as_deref(), true)?;
            let mut failures = 0usize;
            for (idx, intent) in intents.iter().enumerate() {
                match engine.apply(intent) {
                    Ok(outcome) => {
                        let marker = if outcome.changed { "+" } else { "=" };
                        println!("{:>3} {} {}: {}", idx + 1, marker, intent.name(), outcome.detail);
                        for achievement in outcome.achievements {
                            println!("      achievement unlocked: {}", achievement);
                        }
                    }
                    Err(e) => {
                        failures += 1;
                        println!("{:>3} ! {}: {}", idx + 1, intent.name(), e);
                    }
                }
            }
            println!();
            print_status(&engine);
            if failures > 0 {
                warn!("{} of {} intents failed", failures, intents.len());
            }
        }
        Commands::NewGame { player } => {
            let config = load_or_default(pre_config, &cli.config);
            let player = validate_player_id(&player)?;
            let store = SaveStore::open(config.storage.save_db_path())?;
            let mut engine = start_session(&config, store, &player, None, true)?;
            engine.new_game()?;
            engine.save()?;
            println!("New game started for {}", player);
        }
        Commands::Saves => {
            let config = load_or_default(pre_config, &cli.config);
            let store = SaveStore::open(config.storage.save_db_path())?;
            for id in store.list_player_ids()? {
                println!("{}", id);
            }
        }
    }

    Ok(())
}

fn load_or_default(pre_config: Option<Config>, path: &str) -> Config {
    pre_config.unwrap_or_else(|| {
        warn!("Config {} not loaded, using defaults", path);
        Config::default()
    })
}

fn open_catalog(config: &Config) -> Result<WorldCatalog> {
    let worlds_file = config.game.worlds_file.as_deref().map(Path::new);
    Ok(load_catalog(worlds_file)?)
}

/// Open the catalog and initialize a session for `player` on `store`.
/// The saved display name wins unless a new one is given. `autosave` is
/// further limited by the configured setting.
fn start_session(
    config: &Config,
    store: SaveStore,
    player: &str,
    name: Option<&str>,
    autosave: bool,
) -> Result<GameEngine> {
    let catalog = Arc::new(open_catalog(config)?);

    let display_name = match name {
        Some(name) => name.to_string(),
        None => match store.get_snapshot(player) {
            Ok(saved) => saved.progress.display_name,
            Err(_) => game::GUEST_NAME.to_string(),
        },
    };

    let mut options = config.engine_options();
    options.autosave &= autosave;
    let mut engine = GameEngine::new(catalog, options).with_store(store);
    engine.initialize(Some(Identity::new(player, &display_name)));
    if let Some(err) = &engine.snapshot().error {
        warn!("Session for {} started with error: {}", player, err);
    }
    Ok(engine)
}

fn print_status(engine: &GameEngine) {
    let snap = engine.snapshot();
    let progress = &snap.progress;
    println!("Player:     {} ({})", progress.display_name, progress.id);
    println!("World:      {}", progress.current_world);
    println!("Location:   {}", progress.current_location);
    println!("Mode:       {}", snap.mode);
    println!("Difficulty: {:?}", snap.difficulty);
    println!("Experience: {}", progress.experience);
    println!("{}", format_tutorial_status(&snap.tutorial, snap.difficulty));

    let Some(world) = engine.current_world() else {
        return;
    };

    println!("\nMap:");
    for view in engine.location_views() {
        let marker = if view.is_current {
            "*"
        } else if view.reachable {
            ">"
        } else {
            " "
        };
        let seen = if view.visited { "" } else { " (unexplored)" };
        println!("  {} {}{}", marker, view.location.name, seen);
    }

    println!("\nInventory:");
    for line in format_inventory(progress, |id| world.item(id).cloned()) {
        println!("  {}", line);
    }

    let quests: Vec<&String> = progress
        .active_quests
        .iter()
        .chain(progress.completed_quests.iter())
        .collect();
    if !quests.is_empty() {
        println!("\nQuests:");
        for quest_id in quests {
            if let Ok(text) = format_quest_status(world, progress, quest_id) {
                println!("{}", text);
            }
        }
    }

    let available = available_quests(world, progress);
    if !available.is_empty() {
        println!("\nOffered quests:");
        for view in available {
            println!("  {} - {}", view.quest.name, view.quest.description);
        }
    }

    if !progress.achievements.is_empty() {
        println!("\nAchievements:");
        for achievement in &progress.achievements {
            println!("  {} - {}", achievement.name, achievement.description);
        }
    }
    if let Some(err) = &snap.error {
        println!("\nLast error: {}", err);
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity raises the configured level
    let configured = config
        .as_ref()
        .and_then(|cfg| cfg.logging.level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    let base_level = match verbosity {
        0 => configured,
        1 => configured.max(log::LevelFilter::Debug),
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    match log_file {
        Some(f) => {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            // Mirror to the console only when attached to a terminal
            let is_tty = atty::is(atty::Stream::Stdout);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}
