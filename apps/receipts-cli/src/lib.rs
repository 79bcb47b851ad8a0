//! # Receiptly CLI Library
//!
//! Command-line front end for the receipt generator. Parses arguments, opens
//! the store and dispatches to the command handlers.
//!
//! ## Module Organization
//! ```text
//! receipts_cli/
//! ├── lib.rs          ◄─── You are here (argument parsing & dispatch)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   └── config.rs   ◄─── Front-end configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── AppContext shared by all handlers
//! │   ├── settings.rs ◄─── Business settings & signature
//! │   ├── receipt.rs  ◄─── Create / edit / list / print receipts
//! │   └── backup.rs   ◄─── Export & import
//! ├── pdf.rs          ◄─── External HTML to PDF converter
//! ├── signature.rs    ◄─── Signature image capture
//! └── error.rs        ◄─── CLI error type and exit codes
//! ```

pub mod commands;
pub mod error;
pub mod pdf;
pub mod signature;
pub mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use receipts_core::filter::ReceiptFilter;
use receipts_db::{Database, DbConfig, SqliteKvStore};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::backup::BackupArgs;
use commands::receipt::ReceiptArgs;
use commands::settings::SettingsArgs;
use commands::AppContext;
use error::{CliError, CliResult};
use pdf::CommandPdfExporter;
use state::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "receipts", version, about = "Create, store and print receipts")]
pub struct Cli {
    /// Config file (default: platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Store file, overrides the config file and RECEIPTS_DB_PATH
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Print records and errors as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Business settings
    Settings(SettingsArgs),
    /// Receipts
    Receipt(ReceiptArgs),
    /// Backup export and import
    Backup(BackupArgs),
    /// Store location and health
    Status,
}

/// Runs the CLI and returns the process exit code.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Parse arguments                                                     │
/// │  2. Initialize logging (stderr, RUST_LOG or default filter)             │
/// │  3. Load config: defaults ──► config.toml ──► RECEIPTS_* ──► --db       │
/// │  4. Open the store (SQLite, WAL, migrations applied)                    │
/// │  5. Run the command; print the result to stdout or the error to stderr │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    match dispatch(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err, json);
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<String> {
    let mut config = AppConfig::load(cli.config)?;
    if let Some(db) = cli.db {
        config.database_path = Some(db);
    }

    let db_path = config.resolve_database_path()?;
    debug!(?db_path, "Opening receipts store");
    let db = Database::new(DbConfig::new(db_path)).await?;

    let result = match cli.command {
        Command::Status => status(&db).await,
        Command::Settings(args) => {
            let ctx = context(&db, config, cli.json)?;
            commands::settings::run(&ctx, args).await
        }
        Command::Receipt(args) => {
            let ctx = context(&db, config, cli.json)?;
            commands::receipt::run(&ctx, args).await
        }
        Command::Backup(args) => {
            let ctx = context(&db, config, cli.json)?;
            commands::backup::run(&ctx, args).await
        }
    };

    db.close().await;
    result
}

fn context(
    db: &Database,
    config: AppConfig,
    json: bool,
) -> CliResult<AppContext<SqliteKvStore, CommandPdfExporter>> {
    let pdf = CommandPdfExporter::from_command_line(&config.pdf_command)
        .map_err(|_| CliError::config("pdf_command must not be empty"))?;
    Ok(AppContext::new(db.book(), config, pdf).with_json(json))
}

async fn status(db: &Database) -> CliResult<String> {
    let migrations = db.migration_status().await?;
    let healthy = db.health_check().await;
    let book = db.book();
    let receipts = book.list(&ReceiptFilter::new()).await.len();
    let next = book.next_receipt_number().await;

    info!(receipts, next, healthy, "Status checked");

    let store = db
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(in memory)".to_string());
    Ok(format!(
        "Store:               {}\n\
         Migrations:          {}/{} applied\n\
         Health:              {}\n\
         Receipts:            {}\n\
         Next receipt number: {}",
        store,
        migrations.applied,
        migrations.embedded,
        if healthy { "ok" } else { "FAILED" },
        receipts,
        next,
    ))
}

fn report(err: &CliError, json: bool) {
    if json {
        match serde_json::to_string(err) {
            Ok(body) => eprintln!("{}", body),
            Err(_) => eprintln!("error: {}", err.message),
        }
    } else {
        eprintln!("error: {}", err.message);
    }
}

/// Initializes the tracing subscriber. Logs go to stderr so command output
/// on stdout stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=receipts_db=trace` - Trace the store only
/// - Default: WARN, INFO for the receipts crates (`-v`: DEBUG)
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,receipts=debug,sqlx=warn"
    } else {
        "warn,receipts=info,sqlx=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_new_receipt() {
        let cli = Cli::try_parse_from([
            "receipts",
            "receipt",
            "new",
            "--to",
            "Acme Ltd",
            "--item",
            "Widget:3:19.99",
            "--item",
            "Gadget:1:5",
            "--mode",
            "pdf",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Receipt(ReceiptArgs {
                command: commands::receipt::ReceiptCommand::New(args),
            }) => {
                assert_eq!(args.to.as_deref(), Some("Acme Ltd"));
                assert_eq!(args.items.len(), 2);
                assert_eq!(args.mode, commands::receipt::SaveMode::Pdf);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_signature_needs_file_or_clear() {
        assert!(Cli::try_parse_from(["receipts", "settings", "signature"]).is_err());
        assert!(Cli::try_parse_from(["receipts", "settings", "signature", "--clear"]).is_ok());
        assert!(
            Cli::try_parse_from(["receipts", "settings", "signature", "sig.png", "--clear"])
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_status_on_fresh_store() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let out = status(&db).await.unwrap();
        assert!(out.contains("(in memory)"));
        assert!(out.contains("Migrations:          1/1 applied"));
        assert!(out.contains("Receipts:            0"));
        assert!(out.contains("Next receipt number: 1"));
    }
}
