//! # Receipt Commands
//!
//! Create, edit, browse and print receipts.
//!
//! ## Save Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  new / edit --mode <mode>                                               │
//! │                                                                         │
//! │  save   book.save()                                                     │
//! │  print  book.save() ──► render ──► out/receipt-<n>.html                 │
//! │  pdf    book.save() ──► render ──► converter ──► out/receipt-<n>.pdf    │
//! │                                                                         │
//! │  Rendering always happens after the save and uses the settings as they  │
//! │  are now. A converter failure does not undo the save.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Receipts are addressed by id, or by `#<number>` when that number is
//! unique in the history.

use clap::{Args, Subcommand, ValueEnum};
use receipts_core::filter::ReceiptFilter;
use receipts_core::ledger::WorkingReceipt;
use receipts_core::render::{format_amount, format_display_date, render_print_document};
use receipts_core::validation::{
    validate_amount, validate_iso_date, validate_line_total, validate_receipt_number,
};
use receipts_core::{LineItem, Receipt, ValidationError};
use receipts_db::KeyValueStore;

use super::AppContext;
use crate::error::{CliError, CliResult};
use crate::pdf::PdfExporter;

#[derive(Debug, Args)]
pub struct ReceiptArgs {
    #[command(subcommand)]
    pub command: ReceiptCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReceiptCommand {
    /// Show the number the next new receipt will get
    Next,
    /// Create and save a new receipt
    New(NewArgs),
    /// Change a saved receipt
    Edit(EditArgs),
    /// List saved receipts, newest first
    List(ListArgs),
    /// Show one saved receipt
    Show(TargetArgs),
    /// Write the print document of a saved receipt
    Print(TargetArgs),
    /// Write the PDF of a saved receipt
    Pdf(TargetArgs),
}

/// What happens after a successful save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SaveMode {
    #[default]
    Save,
    Print,
    Pdf,
}

#[derive(Debug, Default, Args)]
pub struct NewArgs {
    /// Client name
    #[arg(long)]
    pub to: Option<String>,

    /// Receipt date (YYYY-MM-DD), default today
    #[arg(long)]
    pub date: Option<String>,

    /// Override the suggested receipt number
    #[arg(long)]
    pub number: Option<u64>,

    /// Line item as "description:qty:unit_price" (repeatable)
    #[arg(long = "item", value_name = "DESC:QTY:PRICE")]
    pub items: Vec<String>,

    #[arg(long, value_enum, default_value_t = SaveMode::Save)]
    pub mode: SaveMode,
}

#[derive(Debug, Default, Args)]
pub struct EditArgs {
    /// Receipt id, or #<number>
    pub target: String,

    #[arg(long)]
    pub to: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub number: Option<u64>,

    /// Replace all line items (repeatable)
    #[arg(long = "item", value_name = "DESC:QTY:PRICE")]
    pub items: Vec<String>,

    /// Append a line item (repeatable)
    #[arg(long = "add-item", value_name = "DESC:QTY:PRICE")]
    pub add_items: Vec<String>,

    /// Remove a line item by its id (repeatable)
    #[arg(long = "remove-item", value_name = "LINE_ID")]
    pub remove_items: Vec<String>,

    /// Change a line item in place (repeatable)
    #[arg(long = "update-item", value_name = "LINE_ID=DESC:QTY:PRICE")]
    pub update_items: Vec<String>,

    #[arg(long, value_enum, default_value_t = SaveMode::Save)]
    pub mode: SaveMode,
}

#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Match client name or receipt number
    #[arg(long)]
    pub search: Option<String>,

    /// Earliest date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub from: Option<String>,

    /// Latest date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub until: Option<String>,
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Receipt id, or #<number>
    pub target: String,
}

pub async fn run<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    args: ReceiptArgs,
) -> CliResult<String> {
    match args.command {
        ReceiptCommand::Next => Ok(ctx.book.next_receipt_number().await.to_string()),
        ReceiptCommand::New(new_args) => create(ctx, new_args).await,
        ReceiptCommand::Edit(edit_args) => edit(ctx, edit_args).await,
        ReceiptCommand::List(list_args) => list(ctx, list_args).await,
        ReceiptCommand::Show(target) => show(ctx, &target.target).await,
        ReceiptCommand::Print(target) => {
            let receipt = resolve(ctx, &target.target).await?;
            write_print_document(ctx, &receipt).await
        }
        ReceiptCommand::Pdf(target) => {
            let receipt = resolve(ctx, &target.target).await?;
            write_pdf(ctx, &receipt).await
        }
    }
}

// =============================================================================
// Create / Edit
// =============================================================================

async fn create<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    args: NewArgs,
) -> CliResult<String> {
    let mut working = ctx.book.begin_new(ctx.today).await;
    apply_header(&mut working, args.to, args.date, args.number)?;

    if !args.items.is_empty() {
        working.receipt.line_items = parse_items(&args.items)?;
    }

    save_with_mode(ctx, working, args.mode).await
}

async fn edit<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    args: EditArgs,
) -> CliResult<String> {
    let stored = resolve(ctx, &args.target).await?;
    let mut working = ctx.book.begin_edit(&stored.id).await?;
    apply_header(&mut working, args.to, args.date, args.number)?;

    let receipt = &mut working.receipt;
    if !args.items.is_empty() {
        receipt.line_items = parse_items(&args.items)?;
    }
    for line_id in &args.remove_items {
        if !receipt.remove_line_item(line_id) {
            return Err(CliError::not_found("Line item", line_id));
        }
    }
    for arg in &args.update_items {
        let (line_id, item) = arg
            .split_once('=')
            .ok_or_else(|| invalid_item(arg, "expected LINE_ID=DESC:QTY:PRICE"))?;
        let replacement = parse_item(item)?;
        let found = receipt.update_line_item(line_id, |line| {
            line.set_description(replacement.description);
            line.set_qty(replacement.qty);
            line.set_unit_price(replacement.unit_price);
        });
        if !found {
            return Err(CliError::not_found("Line item", line_id));
        }
    }
    for arg in &args.add_items {
        receipt.add_line_item(parse_item(arg)?);
    }

    save_with_mode(ctx, working, args.mode).await
}

fn apply_header(
    working: &mut WorkingReceipt,
    to: Option<String>,
    date: Option<String>,
    number: Option<u64>,
) -> CliResult<()> {
    if let Some(to) = to {
        working.receipt.to = to;
    }
    if let Some(date) = date {
        validate_iso_date(&date)?;
        working.receipt.date = date;
    }
    if let Some(number) = number {
        working.receipt.receipt_number = validate_receipt_number(number)?;
    }
    Ok(())
}

async fn save_with_mode<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    working: WorkingReceipt,
    mode: SaveMode,
) -> CliResult<String> {
    let outcome = ctx.book.save(working).await?;
    let receipt = &outcome.receipt;

    let mut out = if ctx.json {
        serde_json::to_string_pretty(receipt)?
    } else {
        let verb = if outcome.was_edit { "Updated" } else { "Saved" };
        let mut line = format!(
            "{} receipt #{} ({}), total {}",
            verb,
            receipt.receipt_number,
            receipt.id,
            format_amount(receipt.total, &ctx.config.currency_symbol)
        );
        if let Some(next) = outcome.next_receipt {
            line.push_str(&format!("\nNext receipt number: {}", next));
        }
        line
    };

    let written = match mode {
        SaveMode::Save => None,
        SaveMode::Print => Some(
            write_print_document(ctx, receipt)
                .await
                .map_err(|err| saved_but(receipt, "the print document could not be written", err))?,
        ),
        SaveMode::Pdf => Some(
            write_pdf(ctx, receipt)
                .await
                .map_err(|err| saved_but(receipt, "PDF generation failed", err))?,
        ),
    };
    if let Some(message) = written {
        if !ctx.json {
            out.push('\n');
            out.push_str(&message);
        }
    }
    Ok(out)
}

/// A follow-up step failed after the receipt was already stored.
fn saved_but(receipt: &Receipt, what: &str, err: CliError) -> CliError {
    tracing::warn!(number = receipt.receipt_number, error = %err, "Post-save step failed");
    CliError::new(
        err.code,
        format!("Receipt #{} was saved, but {}", receipt.receipt_number, what),
    )
}

// =============================================================================
// Line Item Parsing
// =============================================================================

/// Parses `description:qty:unit_price`. The description may itself contain
/// colons; the last two fields are always the numbers.
fn parse_item(arg: &str) -> CliResult<LineItem> {
    let mut parts = arg.rsplitn(3, ':');
    let (price, qty, description) = match (parts.next(), parts.next(), parts.next()) {
        (Some(price), Some(qty), Some(description)) => (price, qty, description),
        _ => return Err(invalid_item(arg, "expected DESC:QTY:PRICE")),
    };

    let qty = parse_number("qty", qty)?;
    let unit_price = parse_number("unit price", price)?;
    validate_line_total(qty, unit_price)?;
    Ok(LineItem::new(description.trim(), qty, unit_price))
}

fn parse_items(args: &[String]) -> CliResult<Vec<LineItem>> {
    args.iter().map(|s| parse_item(s)).collect()
}

fn parse_number(field: &str, raw: &str) -> CliResult<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}' is not a number", raw.trim()),
    })?;
    Ok(validate_amount(field, value)?)
}

fn invalid_item(arg: &str, reason: &str) -> CliError {
    ValidationError::InvalidFormat {
        field: format!("line item '{}'", arg),
        reason: reason.to_string(),
    }
    .into()
}

// =============================================================================
// History
// =============================================================================

async fn list<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    args: ListArgs,
) -> CliResult<String> {
    let mut filter = ReceiptFilter::new();
    if let Some(text) = args.search {
        filter = filter.text(text);
    }
    if let Some(from) = args.from {
        filter = filter.from_date(from);
    }
    if let Some(until) = args.until {
        filter = filter.to_date(until);
    }

    let receipts = ctx.book.list(&filter).await;
    if ctx.json {
        return Ok(serde_json::to_string_pretty(&receipts)?);
    }
    if receipts.is_empty() {
        return Ok("No receipts found.".to_string());
    }

    let mut out = format!(
        "{:>6}  {:<10}  {:<24}  {:>14}  {}\n",
        "No.", "Date", "Client", "Total", "Id"
    );
    for r in &receipts {
        out.push_str(&format!(
            "{:>6}  {:<10}  {:<24}  {:>14}  {}\n",
            r.receipt_number,
            format_display_date(&r.date),
            truncate(&r.to, 24),
            format_amount(r.total, &ctx.config.currency_symbol),
            r.id
        ));
    }
    out.push_str(&format!("{} receipt(s)", receipts.len()));
    Ok(out)
}

async fn show<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    target: &str,
) -> CliResult<String> {
    let receipt = resolve(ctx, target).await?;
    if ctx.json {
        return Ok(serde_json::to_string_pretty(&receipt)?);
    }

    let symbol = &ctx.config.currency_symbol;
    let mut out = format!(
        "Receipt #{}\nId:              {}\nDate:            {}\nClient:          {}\nBusiness number: {}\n\nItems:\n",
        receipt.receipt_number,
        receipt.id,
        format_display_date(&receipt.date),
        receipt.to,
        receipt.business_number,
    );
    for item in &receipt.line_items {
        out.push_str(&format!(
            "  {}  {} x {} = {}  [{}]\n",
            item.description,
            item.qty,
            format_amount(item.unit_price, symbol),
            format_amount(item.total, symbol),
            item.id
        ));
    }
    out.push_str(&format!("\nTotal: {}", format_amount(receipt.total, symbol)));
    Ok(out)
}

/// Finds a receipt by id, or by `#<number>` when exactly one has it.
async fn resolve<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    target: &str,
) -> CliResult<Receipt> {
    if let Some(number) = target.strip_prefix('#') {
        let number: u64 = number
            .parse()
            .map_err(|_| CliError::validation(format!("'{}' is not a receipt number", target)))?;
        let mut matches = ctx.book.find_by_number(number).await;
        return match matches.len() {
            0 => Err(CliError::not_found("Receipt", target)),
            1 => Ok(matches.remove(0)),
            _ => {
                let ids: Vec<&str> = matches.iter().map(|r| r.id.as_str()).collect();
                Err(CliError::validation(format!(
                    "Receipt number {} is used by {} receipts, use an id: {}",
                    number,
                    matches.len(),
                    ids.join(", ")
                )))
            }
        };
    }

    ctx.book
        .find_by_id(target)
        .await
        .ok_or_else(|| CliError::not_found("Receipt", target))
}

// =============================================================================
// Output Documents
// =============================================================================

async fn write_print_document<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    receipt: &Receipt,
) -> CliResult<String> {
    let settings = ctx.book.settings().await;
    let html = render_print_document(receipt, &settings, &ctx.config.currency_symbol);
    let path = ctx.config.output_path(&receipt.print_file_name())?;
    tokio::fs::write(&path, html).await?;
    Ok(format!("Print document written to {}", path.display()))
}

async fn write_pdf<S: KeyValueStore, P: PdfExporter>(
    ctx: &AppContext<S, P>,
    receipt: &Receipt,
) -> CliResult<String> {
    let settings = ctx.book.settings().await;
    let html = render_print_document(receipt, &settings, &ctx.config.currency_symbol);
    let path = ctx.config.output_path(&receipt.pdf_file_name())?;
    ctx.pdf.export(&html, &path).await?;
    Ok(format!("PDF written to {}", path.display()))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
