//! Student directory CLI - list, inspect and edit student records.
//!
//! Reads go straight through the view cache. Mutating commands require a
//! signed-in session.

mod cli;
mod output;

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use studentdir_core::auth::{Identity, Session};
use studentdir_core::{
    Config, NewStudent, RecordService, SortDirection, SortSpec, StudentFilter, StudentPatch,
    StudentApi, StudentStore, ViewCache,
};

use cli::{Cli, Commands};

// ============================================================================
// Constants
// ============================================================================

/// Log file name inside the data directory's `logs/` folder
const LOG_FILE: &str = "studentdir.log";

/// Initialize the tracing subscriber for logging.
///
/// Console output goes to stderr; a copy is written to the log file when the
/// log directory is usable. The returned guard flushes the file on drop.
fn init_tracing(log_dir: &Path) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::fs::create_dir_all(log_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn require_login(session: &Session) -> Result<()> {
    if !session.is_authenticated() {
        bail!("Not signed in. Run `studentdir login <email>` first.");
    }
    Ok(())
}

/// Sort order the view starts with: `list` flags win over the configured default.
fn initial_sort(command: &Commands, config: &Config) -> SortSpec {
    match command {
        Commands::List { sort, desc, .. } => {
            let direction = if *desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            SortSpec::new(sort.unwrap_or(config.default_sort), direction)
        }
        _ => SortSpec::new(config.default_sort, SortDirection::Ascending),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if cli.no_latency {
        config.no_latency = true;
    }

    let data_dir = config.data_dir()?;
    let _log_guard = init_tracing(&config.log_dir()?);
    info!(data_dir = %data_dir.display(), "studentdir starting");

    let store = StudentStore::open(&data_dir)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    let store_location = store.location();
    let service = RecordService::with_latency(Arc::new(store), config.latency_profile());
    debug!(location = %store_location, latency = ?service.latency(), "Record service ready");
    let sort = initial_sort(&cli.command, &config);
    let view = ViewCache::with_sort(service, sort);

    let mut session = Session::new(data_dir.clone());
    if let Err(e) = session.load() {
        warn!(error = %e, "Ignoring unreadable session");
    }

    match cli.command {
        Commands::List { course, search, .. } => {
            view.set_filter(StudentFilter {
                course,
                search_term: search,
            })
            .await;

            let snapshot = view.snapshot();
            if let Some(msg) = snapshot.error() {
                bail!("Failed to list students: {}", msg);
            }
            output::print_table(&snapshot.students);
        }

        Commands::Show { id } => {
            let student = view.get_by_id(&id).await?;
            output::print_student(&student);
        }

        Commands::Add(args) => {
            require_login(&session)?;
            let input = NewStudent::from(args);
            input.validate()?;
            let created = view.create(input).await?;
            println!("Created student {}", created.id);
            output::print_student(&created);
        }

        Commands::Edit { id, fields } => {
            require_login(&session)?;
            let patch = StudentPatch::from(fields);
            if patch.is_empty() {
                bail!("Nothing to change. Pass at least one field, e.g. --year 3");
            }
            patch.validate()?;
            let updated = view.update(&id, patch).await?;
            output::print_student(&updated);
        }

        Commands::Delete { id } => {
            require_login(&session)?;
            view.remove(&id).await?;
            println!("Deleted student {}", id);
        }

        Commands::Courses => {
            let courses = view.api().list_courses().await?;
            output::print_courses(&courses);
        }

        Commands::Login { email } => {
            let user = session.login(&email)?;
            println!("Signed in as {} <{}>", user.display_name(), user.email);
        }

        Commands::Logout => {
            session.clear()?;
            println!("Signed out");
        }

        Commands::Whoami => match (session.current_user(), session.data()) {
            (Some(user), Some(data)) => println!(
                "{} <{}> ({} minutes left)",
                user.display_name(),
                user.email,
                data.minutes_until_expiry()
            ),
            _ => println!("Not signed in"),
        },
    }

    Ok(())
}
