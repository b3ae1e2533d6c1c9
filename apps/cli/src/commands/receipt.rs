//! # Receipt Commands
//!
//! Generating receipts from the active scope's records and browsing the
//! local archive.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;

use tillbox_core::receipt::{build_receipt, render_text};
use tillbox_core::validation::{coerce_amount, coerce_rate, normalize_quantity};
use tillbox_core::{LineSelection, Notice, Receipt, ReceiptRequest};

use crate::context::AppContext;
use crate::feedback;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Args)]
pub struct ReceiptCommand {
    #[command(subcommand)]
    command: ReceiptSubcommand,
}

#[derive(Debug, clap::Subcommand)]
enum ReceiptSubcommand {
    /// Generate a receipt from barcodes in the active store
    New(NewArgs),
    /// List archived receipts, newest first
    History,
    /// Re-render one archived receipt as text
    Show(ShowArgs),
    /// Empty the receipt archive
    Clear(ClearArgs),
}

#[derive(Debug, Args)]
struct NewArgs {
    /// Item as `<barcode>` or `<barcode>:<qty>`; repeatable
    #[arg(long = "item", required = true)]
    items: Vec<String>,

    /// Customer name (default: "Walk-in Customer")
    #[arg(long)]
    customer: Option<String>,

    /// Receipt date as YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<String>,

    /// Discount amount, e.g. 2.50 (invalid or negative input becomes 0)
    #[arg(long)]
    discount: Option<String>,

    /// Tax rate percent, e.g. 8.25 (default from config)
    #[arg(long)]
    tax_rate: Option<String>,

    /// Business name override (default from config)
    #[arg(long)]
    business_name: Option<String>,

    /// Business address override (default from config)
    #[arg(long)]
    business_address: Option<String>,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Receipt number, e.g. RCP-1714000000000
    number: String,
}

#[derive(Debug, Args)]
struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
}

// =============================================================================
// Dispatch
// =============================================================================

pub async fn run(ctx: &AppContext, command: ReceiptCommand) -> Result<()> {
    match command.command {
        ReceiptSubcommand::New(args) => run_new(ctx, args).await,
        ReceiptSubcommand::History => run_history(ctx).await,
        ReceiptSubcommand::Show(args) => run_show(ctx, args).await,
        ReceiptSubcommand::Clear(args) => run_clear(ctx, args).await,
    }
}

// =============================================================================
// Commands
// =============================================================================

async fn run_new(ctx: &AppContext, args: NewArgs) -> Result<()> {
    let mut selections = Vec::with_capacity(args.items.len());

    for spec in &args.items {
        let (barcode, quantity) = parse_item_spec(spec);

        match ctx.service.find_by_barcode(&ctx.mode, barcode).await? {
            Some(record) => selections.push(LineSelection { record, quantity }),
            None => {
                feedback::emit(&Notice::error(format!(
                    "Barcode {} is not in {} storage; receipt not generated",
                    barcode,
                    ctx.mode.label()
                )));
                return Ok(());
            }
        }
    }

    let date = args
        .date
        .as_deref()
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
        })
        .transpose()?;

    let request = ReceiptRequest {
        selections,
        customer_name: args.customer,
        date,
        business_name: args
            .business_name
            .or_else(|| Some(ctx.config.business.name.clone())),
        business_address: args
            .business_address
            .or_else(|| Some(ctx.config.business.address.clone())),
        discount_amount: coerce_amount(args.discount.as_deref().unwrap_or("")),
        tax_rate_percent: args
            .tax_rate
            .as_deref()
            .map(coerce_rate)
            .unwrap_or(ctx.config.receipt.default_tax_rate_percent),
    };

    let receipt = build_receipt(request, Utc::now())?;
    ctx.archive.prepend(receipt.clone()).await?;

    print!("{}", render_text(&receipt));
    feedback::emit(&Notice::success(format!(
        "Receipt {} generated and archived",
        receipt.receipt_number
    )));
    Ok(())
}

async fn run_history(ctx: &AppContext) -> Result<()> {
    let receipts = ctx.archive.list().await?;

    if receipts.is_empty() {
        feedback::emit(&Notice::info("No receipts archived"));
        return Ok(());
    }

    for receipt in &receipts {
        print_summary(receipt);
    }
    feedback::emit(&Notice::info(format!("{} receipt(s)", receipts.len())));
    Ok(())
}

async fn run_show(ctx: &AppContext, args: ShowArgs) -> Result<()> {
    match ctx.archive.find(&args.number).await? {
        Some(receipt) => {
            print!("{}", render_text(&receipt));
            Ok(())
        }
        None => {
            feedback::emit(&Notice::error(format!("Receipt not found: {}", args.number)));
            Ok(())
        }
    }
}

async fn run_clear(ctx: &AppContext, args: ClearArgs) -> Result<()> {
    if !feedback::confirm("Delete the entire receipt history?", args.yes)? {
        feedback::emit(&Notice::info("Cancelled"));
        return Ok(());
    }

    let removed = ctx.archive.clear().await?;
    feedback::emit(&Notice::success(format!("Removed {removed} receipt(s)")));
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

/// Splits `<barcode>` or `<barcode>:<qty>`. An unparseable quantity falls
/// back to 1, matching the other quantity coercions.
fn parse_item_spec(spec: &str) -> (&str, i64) {
    match spec.split_once(':') {
        Some((barcode, qty)) => {
            let quantity = qty.trim().parse().unwrap_or(1);
            (barcode, normalize_quantity(quantity))
        }
        None => (spec, 1),
    }
}

fn print_summary(receipt: &Receipt) {
    println!(
        "{}  {}  {:<24}  {} item(s)  {}",
        receipt.receipt_number,
        receipt.date,
        receipt.customer_name,
        receipt.items.len(),
        receipt.total
    );
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_spec() {
        assert_eq!(parse_item_spec("12345"), ("12345", 1));
        assert_eq!(parse_item_spec("12345:3"), ("12345", 3));
        assert_eq!(parse_item_spec("12345:0"), ("12345", 1));
        assert_eq!(parse_item_spec("12345:junk"), ("12345", 1));
    }
}
