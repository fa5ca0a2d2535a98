use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use daynotes::ai::{ActionKind, ChatAction, ChatSession, GatewayClient};
use daynotes::api;
use daynotes::config::Config;
use daynotes::db::{self, Database};
use daynotes::insights::{quotes, week_activity, DayStatus, TimeRemaining};
use daynotes::models::{ChatRole, Note};
use daynotes::notify::{Notifier, Severity};
use daynotes::store::NoteStore;

#[derive(Parser)]
#[command(name = "daynotes")]
#[command(about = "Daily notes with an AI writing assistant")]
struct Cli {
    /// Database file (overrides DAYNOTES_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Port for HTTP API (overrides DAYNOTES_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List notes, most recently updated first
    List {
        /// Only show notes whose title or content contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a note
    Add { title: String, content: String },
    /// Replace a note's title and content
    Edit {
        id: Uuid,
        title: String,
        content: String,
    },
    /// Mark a note as completed
    Done { id: Uuid },
    /// Mark a note as pending again
    Undo { id: Uuid },
    /// Delete a note
    Rm { id: Uuid },
    /// Show progress, this week's activity, and days remaining
    Stats,
    /// Ask the AI assistant, optionally about a note
    Ask {
        prompt: String,
        /// Note to use as context
        #[arg(short, long)]
        note: Option<Uuid>,
        #[arg(short, long, value_enum, default_value_t = ActionArg::Chat)]
        action: ActionArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    Summarize,
    Rewrite,
    Improve,
    Chat,
}

impl From<ActionArg> for ActionKind {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Summarize => Self::Summarize,
            ActionArg::Rewrite => Self::Rewrite,
            ActionArg::Improve => Self::Improve,
            ActionArg::Chat => Self::Chat,
        }
    }
}

/// Initialize tracing to stderr (CLI commands) or stdout (server)
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "daynotes=info,tower_http=info".into()),
    );

    if use_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn open_database(config: &Config) -> anyhow::Result<Database> {
    let path = match &config.database_path {
        Some(path) => path.clone(),
        None => db::default_path()?,
    };
    let db = Database::open(path.clone())
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    db.migrate()?;
    Ok(db)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(!matches!(cli.command, Commands::Serve { .. }));

    let mut config = Config::from_env();
    if let Some(path) = cli.db {
        config.database_path = Some(path);
    }

    let db = open_database(&config)?;
    let notifier = Notifier::new();
    let store = NoteStore::new(Arc::new(db.clone()), notifier.clone());

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let ai = GatewayClient::new(&config.gateway)?;
            if config.gateway.api_key.is_none() {
                tracing::warn!("DAYNOTES_AI_KEY is not set; /ai-chat will fail");
            } else {
                tracing::info!(model = ai.model(), "AI gateway configured");
            }
            let app = api::create_router_with_auth(
                api::AppState::new(db, Arc::new(ai)),
                config.api_key.clone(),
            );

            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
            tracing::info!("daynotes server listening on http://127.0.0.1:{}", port);

            axum::serve(listener, app).await?;
        }
        Commands::List { search } => {
            store.load().await;
            let notes = store.search(search.as_deref().unwrap_or(""));
            if notes.is_empty() {
                println!("No notes yet.");
            }
            for note in &notes {
                print_note(note);
            }
        }
        Commands::Add { title, content } => {
            if let Some(note) = store.create(&title, &content).await {
                print_note(&note);
            }
        }
        Commands::Edit { id, title, content } => {
            store.load().await;
            if let Some(note) = store.update(id, &title, &content).await {
                print_note(&note);
            }
        }
        Commands::Done { id } => {
            store.toggle_complete(id, true).await;
        }
        Commands::Undo { id } => {
            store.toggle_complete(id, false).await;
        }
        Commands::Rm { id } => {
            store.delete(id).await;
        }
        Commands::Stats => {
            store.load().await;
            print_stats(&store);
        }
        Commands::Ask {
            prompt,
            note,
            action,
        } => {
            let note_content = match note {
                Some(id) => {
                    let note = db
                        .get_note(id)?
                        .ok_or_else(|| anyhow::anyhow!("Note {} not found", id))?;
                    Some(note.content)
                }
                None => None,
            };
            let action = ChatAction::new(action.into(), note_content.as_deref());

            let session = ChatSession::new(GatewayClient::new(&config.gateway)?, notifier.clone());
            session.send(prompt.trim(), action).await;

            for message in session.messages() {
                if message.role == ChatRole::Assistant {
                    println!("{}", message.content);
                }
            }
        }
    }

    report(&notifier);
    Ok(())
}

fn print_note(note: &Note) {
    let mark = if note.completed { "x" } else { " " };
    println!("[{}] {}  {}", mark, note.id, note.title);
    println!("    {}", note.content.replace('\n', "\n    "));
    println!(
        "    created {}  updated {}",
        note.created_at.with_timezone(&Local).format("%b %-d, %Y"),
        note.updated_at.with_timezone(&Local).format("%b %-d at %-I:%M %p"),
    );
}

fn print_stats(store: &NoteStore) {
    let notes = store.notes();
    let progress = store.progress();
    let today = Local::now().date_naive();
    let remaining = TimeRemaining::from_date(today);

    println!(
        "Task progress: {}/{} completed ({}%)",
        progress.completed, progress.total, progress.percentage
    );

    let week: Vec<String> = week_activity(&notes, today, &Local)
        .iter()
        .map(|day| {
            let status = match day.status {
                DayStatus::Completed => "done",
                DayStatus::Pending => "pending",
                DayStatus::Empty => "-",
            };
            format!("{} {}", day.weekday, status)
        })
        .collect();
    println!("Last 7 days: {}", week.join(" | "));

    println!(
        "{} days left in week, {} days left in month",
        remaining.days_left_in_week, remaining.days_left_in_month
    );

    let quote = quotes::random_quote();
    println!("\n\"{}\" - {}", quote.text, quote.author);
}

/// Print the last notification so failures are visible without RUST_LOG.
fn report(notifier: &Notifier) {
    if let Some(toast) = notifier.latest() {
        match toast.severity {
            Severity::Error => eprintln!("{}: {}", toast.title, toast.description),
            _ => println!("{}: {}", toast.title, toast.description),
        }
    }
}
