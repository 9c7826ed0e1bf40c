mod commands;
mod config;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    cmd_dashboard, cmd_history, cmd_log, cmd_profile_set, cmd_profile_show, cmd_recommend,
    cmd_reminder_list, cmd_reminder_toggle, cmd_series, cmd_symptom_list, cmd_symptom_log,
};
use crate::config::Config;
use vitalog_core::db::Database;
use vitalog_core::engine::HealthEngine;
use vitalog_core::series::DEFAULT_WINDOW;

#[derive(Parser)]
#[command(
    name = "vitalog",
    version,
    about = "Track weight and mood, get a health dashboard and lifestyle suggestions"
)]
struct Cli {
    /// Path to the database file (default: vitalog.db in the data directory)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a weight and mood entry
    Log {
        /// Weight value (number)
        weight: f64,
        /// Unit: kg or lbs (default: kg)
        #[arg(short, long, default_value = "kg")]
        unit: String,
        /// Mood: happy, neutral, sad, stressed, anxious
        #[arg(short, long, default_value = "neutral")]
        mood: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show logged entries, newest first
    History {
        /// Show at most this many entries (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show BMI, health score, recent weight and food suggestions
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the recent weight series, oldest first
    Series {
        /// Number of entries to include
        #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
        window: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show recommendations for a category: food, exercise, emotional
    Recommend {
        /// Recommendation category
        category: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage your height and activity level
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Track physical and mental symptoms
    Symptom {
        #[command(subcommand)]
        command: SymptomCommands,
    },
    /// List and toggle reminders
    Reminder {
        #[command(subcommand)]
        command: ReminderCommands,
    },
    /// Start the REST API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Address to bind to (default: 127.0.0.1, use 0.0.0.0 to expose to network)
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,
        /// Disable API key authentication (for development/testing)
        #[arg(long)]
        no_auth: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Set height and (optionally) activity level
    Set {
        /// Height in meters (e.g. 1.75)
        #[arg(long)]
        height: f64,
        /// Activity level: sedentary, light, moderate, active
        #[arg(long)]
        activity: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SymptomCommands {
    /// Log a symptom
    Log {
        /// Symptom name (e.g. "insomnia", "joint pain")
        name: String,
        /// Kind: physical or mental
        #[arg(short, long, default_value = "physical")]
        kind: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List logged symptoms, newest first
    List {
        /// Show at most this many symptoms (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ReminderCommands {
    /// List reminders
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Turn a reminder on or off
    Toggle {
        /// Reminder ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("VITALOG_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let default_level = if matches!(cli.command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };
    init_tracing(default_level);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.db)?;
    let db = Database::open(&config.db_path)?;

    match cli.command {
        Commands::Serve {
            port,
            bind,
            no_auth,
        } => {
            let api_key = if no_auth {
                None
            } else {
                Some(config.load_or_create_api_key()?.0)
            };
            server::start_server(db, port, &bind, api_key).await
        }
        command => run_command(&HealthEngine::new(db), command),
    }
}

fn run_command(engine: &HealthEngine<Database>, command: Commands) -> Result<()> {
    match command {
        Commands::Log {
            weight,
            unit,
            mood,
            json,
        } => cmd_log(engine, weight, &unit, &mood, json),
        Commands::History { limit, json } => cmd_history(engine, limit, json),
        Commands::Dashboard { json } => cmd_dashboard(engine, json),
        Commands::Series { window, json } => cmd_series(engine, window, json),
        Commands::Recommend { category, json } => cmd_recommend(engine, &category, json),
        Commands::Profile { command } => match command {
            ProfileCommands::Set {
                height,
                activity,
                json,
            } => cmd_profile_set(engine, height, activity.as_deref(), json),
            ProfileCommands::Show { json } => cmd_profile_show(engine, json),
        },
        Commands::Symptom { command } => match command {
            SymptomCommands::Log { name, kind, json } => cmd_symptom_log(engine, &name, &kind, json),
            SymptomCommands::List { limit, json } => cmd_symptom_list(engine, limit, json),
        },
        Commands::Reminder { command } => match command {
            ReminderCommands::List { json } => cmd_reminder_list(engine, json),
            ReminderCommands::Toggle { id, json } => cmd_reminder_toggle(engine, id, json),
        },
        Commands::Serve { .. } => anyhow::bail!("serve is not a one-shot command"),
    }
}
