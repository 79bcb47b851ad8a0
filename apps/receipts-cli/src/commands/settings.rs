//! # Settings Commands
//!
//! Show and edit the business settings record.
//!
//! `set` loads the current record, changes the given fields and writes the
//! whole record back. Receipts saved earlier keep their own snapshot.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use receipts_core::validation::validate_receipt_number;
use receipts_core::BusinessSettings;
use receipts_db::KeyValueStore;

use super::AppContext;
use crate::error::{CliError, CliResult};
use crate::pdf::PdfExporter;
use crate::signature;

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the business settings
    Show,
    /// Change one or more business settings
    Set(SetArgs),
    /// Store a signature image, or clear it
    Signature(SignatureArgs),
}

#[derive(Debug, Default, Args)]
pub struct SetArgs {
    #[arg(long)]
    pub business_name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub owner_name: Option<String>,

    #[arg(long)]
    pub business_number: Option<String>,

    /// First receipt number when no counter has been stored yet
    #[arg(long, conflicts_with = "clear_default_receipt_number")]
    pub default_receipt_number: Option<u64>,

    #[arg(long)]
    pub clear_default_receipt_number: bool,
}

#[derive(Debug, Args)]
pub struct SignatureArgs {
    /// Image file (png, jpg, gif, svg)
    #[arg(required_unless_present = "clear", conflicts_with = "clear")]
    pub file: Option<PathBuf>,

    /// Remove the stored signature
    #[arg(long)]
    pub clear: bool,
}

pub async fn run<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    args: SettingsArgs,
) -> CliResult<String> {
    match args.command {
        SettingsCommand::Show => show(ctx).await,
        SettingsCommand::Set(set_args) => set(ctx, set_args).await,
        SettingsCommand::Signature(sig_args) => set_signature(ctx, sig_args).await,
    }
}

async fn show<S: KeyValueStore, P: PdfExporter>(ctx: &AppContext<S, P>) -> CliResult<String> {
    let settings = ctx.book.settings().await;
    if ctx.json {
        return Ok(serde_json::to_string_pretty(&settings)?);
    }
    Ok(describe(&settings))
}

async fn set<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    args: SetArgs,
) -> CliResult<String> {
    let mut settings = ctx.book.settings().await;

    if let Some(name) = args.business_name {
        settings.business_name = name;
    }
    if let Some(phone) = args.phone {
        settings.phone = phone;
    }
    if let Some(owner) = args.owner_name {
        settings.owner_name = owner;
    }
    if let Some(number) = args.business_number {
        settings.business_number = number;
    }
    if let Some(n) = args.default_receipt_number {
        settings.default_receipt_number = Some(validate_receipt_number(n)?);
    }
    if args.clear_default_receipt_number {
        settings.default_receipt_number = None;
    }

    ctx.book.save_settings(&settings).await?;

    let mut out = String::from("Settings saved.\n");
    out.push_str(&describe(&settings));
    if !settings.has_business_identity() {
        out.push_str("\nNote: receipts can't be saved until business name and business number are set.");
    }
    Ok(out)
}

async fn set_signature<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    args: SignatureArgs,
) -> CliResult<String> {
    let mut settings = ctx.book.settings().await;

    let message = if args.clear {
        settings.signature_data_url = None;
        "Signature cleared.".to_string()
    } else {
        let path = args
            .file
            .ok_or_else(|| CliError::validation("a signature image file is required"))?;
        settings.signature_data_url = Some(signature::capture_from_file(&path).await?);
        format!("Signature stored from {}.", path.display())
    };

    ctx.book.save_settings(&settings).await?;
    Ok(message)
}

fn describe(settings: &BusinessSettings) -> String {
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    let default_number = settings
        .default_receipt_number
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    let signature = if settings.signature_data_url.is_some() {
        "stored"
    } else {
        "none"
    };

    format!(
        "Business name:          {}\n\
         Owner name:             {}\n\
         Phone:                  {}\n\
         Business number:        {}\n\
         Default receipt number: {}\n\
         Signature:              {}",
        or_dash(&settings.business_name),
        or_dash(&settings.owner_name),
        or_dash(&settings.phone),
        or_dash(&settings.business_number),
        default_number,
        signature,
    )
}
