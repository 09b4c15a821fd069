//! Highscores CLI - record and rank game session results from the command line

use anyhow::Context;
use clap::{Parser, Subcommand};
use highscores::config::{self, HighscoresConfig};
use highscores::output::is_quiet;
use highscores::ui::{self, Icons};
use highscores::{ScoreRecord, StoreHandle, DEFAULT_LEVEL};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "highscores")]
#[command(version)]
#[command(about = "Local high score table for game sessions")]
#[command(long_about = r#"
Highscores keeps finished game sessions in a local SQLite file and answers
ranked queries over them.

Example usage:
  highscores add --player Ada --score 500 --level L1 --time 12.5
  highscores top --limit 10
  highscores top --level L1 --format json
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database (and optionally a config file)
    Init {
        /// Also write a config file pointing at the database
        #[arg(long)]
        write_config: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Record a finished session
    Add {
        /// Player name
        #[arg(short, long)]
        player: String,

        /// Score achieved
        #[arg(short, long, allow_negative_numbers = true)]
        score: i64,

        /// Level name
        #[arg(short, long)]
        level: Option<String>,

        /// Completion time in seconds
        #[arg(short, long)]
        time: Option<f64>,
    },

    /// Show the highest scores
    Top {
        /// Maximum number of results
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Only scores on this level
        #[arg(short = 'L', long)]
        level: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show how many records are stored
    Count,

    /// Delete every record
    Clear,
}

const DEFAULT_LIMIT: i64 = 10;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let settings = config::load_config(cli.config.as_deref())?;
    let database = config::resolve_database_path(cli.database.as_deref(), settings.as_ref());
    let settings = settings.unwrap_or_default();

    // The one store handle for this process; everything below borrows it.
    let mut handle = StoreHandle::new(&database);

    let result = run(cli, &settings, &mut handle);
    handle.shutdown();
    if let Err(e) = result {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: Cli, settings: &HighscoresConfig, handle: &mut StoreHandle) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init { write_config, force } => {
            handle.get().context("failed to initialize store")?;
            ui::success("Store ready");
            ui::info("Database", &handle.path().display().to_string());

            if write_config {
                let path = cli.config.unwrap_or_else(config::default_config_path);
                let new_config = HighscoresConfig {
                    database: Some(handle.path().display().to_string()),
                    ..settings.clone()
                };
                config::write_config(&path, &new_config, force)?;
                ui::info("Config", &path.display().to_string());
            }
        }

        Commands::Add {
            player,
            score,
            level,
            time,
        } => {
            let level = level
                .or_else(|| settings.level.clone())
                .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
            let mut record = ScoreRecord::new(player, score).with_level(level);
            if let Some(seconds) = time {
                record = record.with_completion_time(seconds);
            }

            let id = handle
                .get()?
                .insert(&mut record)
                .context("failed to add high score")?;
            tracing::debug!("Inserted record {}", id);

            ui::success(&format!(
                "High score added: {} - {} points",
                record.player_name, record.score
            ));
        }

        Commands::Top {
            limit,
            level,
            format,
        } => {
            let limit = limit.or(settings.limit).unwrap_or(DEFAULT_LIMIT);
            let level = level.or_else(|| settings.level.clone());
            let store = handle.get()?;

            let records = match &level {
                Some(level) => store.query_top_for_level(level, limit),
                None => store.query_top(limit),
            }
            .context("failed to load high scores")?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&records)?);
                return Ok(());
            }
            if is_quiet() {
                return Ok(());
            }

            match &level {
                Some(level) => ui::header(&format!("Top High Scores ({})", level)),
                None => ui::header("Top High Scores"),
            }

            match records.first() {
                None => ui::warn("No high scores found"),
                Some(leader) => {
                    println!(
                        "{} {}",
                        Icons::STAR,
                        leader.to_string().style(ui::theme().leader.clone())
                    );
                    println!("{}", ui::score_table(&records));
                }
            }
        }

        Commands::Count => {
            let count = handle.get()?.count().context("failed to count high scores")?;
            if !is_quiet() {
                ui::section(&format!("{} Statistics", Icons::STATS));
                println!(
                    "{}",
                    ui::stats_table(&[
                        ("Records", count.to_string()),
                        ("Database", handle.path().display().to_string()),
                    ])
                );
            }
        }

        Commands::Clear => {
            handle
                .get()?
                .clear_all()
                .context("failed to clear high scores")?;
            ui::success(&format!("{} All high scores cleared", Icons::DEL));
        }
    }

    Ok(())
}
