//! Backup export and import.
//!
//! `export` writes `receipts-backup-<YYYY-MM-DD>.json` (UTC date) to the
//! output directory unless `--out` is given. `import` replaces whichever
//! records the file carries and leaves the rest alone.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use receipts_core::backup_file_name;
use receipts_db::{export_all, import_all, ImportSummary, KeyValueStore};

use super::AppContext;
use crate::error::CliResult;
use crate::pdf::PdfExporter;

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub command: BackupCommand,
}

#[derive(Debug, Subcommand)]
pub enum BackupCommand {
    /// Write all receipts, settings and the counter to a JSON file
    Export(ExportArgs),
    /// Restore from a JSON backup file
    Import(ImportArgs),
}

#[derive(Debug, Default, Args)]
pub struct ExportArgs {
    /// Destination file
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Backup file to read
    pub file: PathBuf,
}

pub async fn run<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    args: BackupArgs,
) -> CliResult<String> {
    match args.command {
        BackupCommand::Export(export_args) => export(ctx, export_args).await,
        BackupCommand::Import(import_args) => import(ctx, import_args).await,
    }
}

async fn export<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    args: ExportArgs,
) -> CliResult<String> {
    let document = export_all(ctx.book.records()).await?;
    let path = match args.out {
        Some(path) => path,
        None => ctx.config.output_path(&backup_file_name(ctx.today))?,
    };
    tokio::fs::write(&path, document).await?;
    Ok(format!("Backup written to {}", path.display()))
}

async fn import<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    args: ImportArgs,
) -> CliResult<String> {
    let document = tokio::fs::read_to_string(&args.file).await?;
    let summary = import_all(ctx.book.records(), &document).await?;
    Ok(describe(&summary))
}

fn describe(summary: &ImportSummary) -> String {
    if summary.is_empty() {
        return "Backup contained no records; nothing was changed.".to_string();
    }

    let mut lines = vec!["Backup imported.".to_string()];
    if let Some(count) = summary.receipts {
        lines.push(format!("  receipts replaced: {}", count));
    }
    if summary.settings {
        lines.push("  settings replaced".to_string());
    }
    if let Some(next) = summary.next_receipt {
        lines.push(format!("  next receipt number: {}", next));
    }
    lines.join("\n")
}
