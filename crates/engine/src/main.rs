//! Taleforge Engine - interactive terminal entry point.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taleforge_domain::{AbilityOverrides, Character, CharacterClass};
use taleforge_engine::infrastructure::{
    backup::HttpBackupClient,
    clock::{SystemClock, SystemRandom},
    config::{EngineConfig, StoreBackend},
    memory::{InMemoryCharacterRepo, InMemoryGameStateRepo},
    narrator::{LlmNarrator, NarratorConfig},
    ollama::OllamaClient,
    ports::{BackupPort, CharacterRepo, GameStateRepo},
    resilient_llm::ResilientLlmClient,
    sqlite::SqliteDocumentStore,
};
use taleforge_engine::{App, AppPorts};

const HELP: &str = "\
Commands:
  new <name> <class>     create a character (Warrior, Mage, Rogue, Cleric, Ranger, Paladin)
  load <name>            continue as an existing character
  list                   list characters
  encounter <enemy> [n]  start a fight against a level n enemy
  sync                   back up the current character
  restore <name>         restore a character from backup
  backups                list your cloud backups
  top [n]                show the leaderboard
  quit                   exit
Anything else is played as an action.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taleforge_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Taleforge Engine");

    let config = EngineConfig::from_env();
    let app = build_app(&config).await?;

    if !app.repositories.narrator.is_available().await {
        tracing::warn!(
            url = %config.ollama_base_url,
            model = %config.ollama_model,
            "Narrator unreachable, fallback narration will be used"
        );
    }

    run(&app).await
}

async fn build_app(config: &EngineConfig) -> anyhow::Result<App> {
    let (character_repo, game_state_repo): (Arc<dyn CharacterRepo>, Arc<dyn GameStateRepo>) =
        match &config.store {
            StoreBackend::Memory => {
                tracing::info!("Using in-memory store");
                (
                    Arc::new(InMemoryCharacterRepo::new()),
                    Arc::new(InMemoryGameStateRepo::new()),
                )
            }
            StoreBackend::Sqlite { path } => {
                tracing::info!(path = %path, "Using SQLite store");
                let store = Arc::new(
                    SqliteDocumentStore::new(path)
                        .await
                        .with_context(|| format!("opening {path}"))?,
                );
                (store.clone(), store)
            }
        };

    let ollama = Arc::new(OllamaClient::new(&config.ollama_base_url, &config.ollama_model));
    tracing::info!(
        max_retries = config.retry.max_retries,
        base_delay_ms = config.retry.base_delay_ms,
        "LLM client configured with retry"
    );
    let llm = Arc::new(ResilientLlmClient::new(ollama, config.retry.clone()));
    let narrator = Arc::new(LlmNarrator::new(llm, NarratorConfig::default()));

    let backup = config.backup_url.as_deref().map(|url| {
        tracing::info!(url, "Cloud sync enabled");
        Arc::new(HttpBackupClient::new(url)) as Arc<dyn BackupPort>
    });

    let random = match config.rng_seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded dice");
            SystemRandom::seeded(seed)
        }
        None => SystemRandom::new(),
    };

    Ok(App::new(AppPorts {
        character_repo,
        game_state_repo,
        narrator,
        backup,
        clock: Arc::new(SystemClock::new()),
        random: Arc::new(random),
        user_id: config.user_id.clone(),
    }))
}

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Help,
    List,
    New(&'a str),
    Load(&'a str),
    Restore(&'a str),
    Backups,
    Top(usize),
    Encounter { enemy: &'a str, level: i32 },
    Sync,
    /// Free text, including "attack" and "fight" during combat.
    Act(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "quit" | "exit" => Command::Quit,
        "help" => Command::Help,
        "list" => Command::List,
        "new" => Command::New(rest),
        "load" => Command::Load(rest),
        "restore" => Command::Restore(rest),
        "backups" => Command::Backups,
        "top" => Command::Top(rest.parse().unwrap_or(10)),
        "encounter" => {
            let (enemy, level) = match rest.rsplit_once(' ') {
                Some((enemy, level)) => match level.parse::<i32>() {
                    Ok(level) => (enemy.trim(), level),
                    Err(_) => (rest, 1),
                },
                None => (rest, 1),
            };
            let enemy = if enemy.is_empty() { "Goblin" } else { enemy };
            Command::Encounter { enemy, level }
        }
        "sync" => Command::Sync,
        _ => Command::Act(line),
    }
}

async fn run(app: &App) -> anyhow::Result<()> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut current: Option<Character> = None;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_command(line) {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::List => {
                for c in app.use_cases.character.manage.list().await? {
                    println!(
                        "{} - level {} {} ({}/{} HP)",
                        c.name, c.level, c.class, c.hit_points, c.max_hit_points
                    );
                }
            }
            Command::New(args) => {
                let Some((name, class)) = args.rsplit_once(' ') else {
                    println!("usage: new <name> <class>");
                    continue;
                };
                let class: CharacterClass = match class.parse() {
                    Ok(class) => class,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                let character = app
                    .use_cases
                    .character
                    .create
                    .execute(name, class, AbilityOverrides::default())
                    .await?;
                let intro = app.use_cases.character.introduce.execute(character.id).await?;
                if let Some(intro) = intro {
                    println!("{intro}");
                }
                current = Some(character);
            }
            Command::Load(name) => match app.use_cases.character.manage.find_by_name(name).await? {
                Some(character) => {
                    println!("Welcome back, {}.", character.name);
                    current = Some(character);
                }
                None => println!("No character named {name}."),
            },
            Command::Restore(name) => match app.use_cases.sync.cloud.restore_character(name).await {
                Ok(Some(character)) => {
                    println!("Restored {} (level {}).", character.name, character.level);
                    current = Some(character);
                }
                Ok(None) => println!("No backup named {name}."),
                Err(e) => println!("{e}"),
            },
            Command::Backups => match app.use_cases.sync.cloud.list_backups().await {
                Ok(backups) => {
                    for b in backups {
                        let when = b
                            .last_backup_date
                            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                            .unwrap_or_default();
                        println!("{} - level {} {when}", b.character_name, b.level);
                    }
                }
                Err(e) => println!("{e}"),
            },
            Command::Top(limit) => match app.use_cases.sync.cloud.leaderboard(limit).await {
                Ok(entries) => {
                    for (rank, e) in entries.iter().enumerate() {
                        println!(
                            "{:>3}. {} - level {} {} ({} XP)",
                            rank + 1,
                            e.character_name,
                            e.level,
                            e.class,
                            e.experience
                        );
                    }
                }
                Err(e) => println!("{e}"),
            },
            command => {
                let Some(character) = current.as_ref() else {
                    println!("Create or load a character first.");
                    continue;
                };
                let id = character.id;
                match command {
                    Command::Encounter { enemy, level } => {
                        let combat = app.use_cases.combat.start.execute(id, enemy, level).await?;
                        if let Some(combat) = combat {
                            println!(
                                "A {} appears! ({} HP, AC {})",
                                combat.enemy_name, combat.enemy_hit_points, combat.enemy_armor_class
                            );
                        }
                    }
                    Command::Sync => match app.use_cases.sync.cloud.sync_character(id).await {
                        Ok(_) => println!("Synced."),
                        Err(e) => println!("{e}"),
                    },
                    _ => {
                        let outcome = app.use_cases.player_action.process.execute(id, line).await?;
                        println!("{}", outcome.text());
                    }
                }
            }
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
    let _ = dotenvy::dotenv();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fight_text_is_played_as_an_action() {
        assert_eq!(parse_command("fight the goblin"), Command::Act("fight the goblin"));
        assert_eq!(parse_command("attack"), Command::Act("attack"));
        assert_eq!(parse_command("run away"), Command::Act("run away"));
    }

    #[test]
    fn encounter_takes_an_optional_trailing_level() {
        assert_eq!(
            parse_command("encounter Cave Troll 3"),
            Command::Encounter {
                enemy: "Cave Troll",
                level: 3
            }
        );
        assert_eq!(
            parse_command("encounter Cave Troll"),
            Command::Encounter {
                enemy: "Cave Troll",
                level: 1
            }
        );
        assert_eq!(
            parse_command("encounter"),
            Command::Encounter {
                enemy: "Goblin",
                level: 1
            }
        );
    }

    #[test]
    fn other_commands_take_the_rest_of_the_line() {
        assert_eq!(parse_command("new Brom Warrior"), Command::New("Brom Warrior"));
        assert_eq!(parse_command("top"), Command::Top(10));
        assert_eq!(parse_command("top 25"), Command::Top(25));
        assert_eq!(parse_command("backups"), Command::Backups);
    }
}
