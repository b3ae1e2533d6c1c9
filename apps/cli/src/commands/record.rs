//! # Record Commands
//!
//! CRUD commands over the active storage scope. Every command reads the mode
//! from the context and hands it to the record service; no command talks to
//! a store directly.

use anyhow::Result;
use clap::Args;

use tillbox_core::validation::coerce_amount;
use tillbox_core::{BarcodeType, Notice, ProductRecord, RecordDraft, RecordPatch};
use tillbox_store::StoreError;

use crate::context::AppContext;
use crate::feedback;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Product name
    #[arg(long)]
    name: String,

    /// Barcode value; generated when omitted
    #[arg(long)]
    barcode: Option<String>,

    /// Barcode symbology (CODE128, EAN13, EAN8, CODE39, UPC)
    #[arg(long, default_value = "CODE128")]
    barcode_type: String,

    /// Unit price, e.g. 9.99 (invalid or negative input becomes 0)
    #[arg(long)]
    amount: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    serial_number: Option<String>,

    #[arg(long)]
    shipping_address: Option<String>,

    #[arg(long)]
    shipping_company: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Record id
    id: String,
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Barcode to look up
    barcode: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Record id
    id: String,

    /// New name
    #[arg(long)]
    name: Option<String>,

    /// New barcode symbology
    #[arg(long)]
    barcode_type: Option<String>,

    /// New unit price
    #[arg(long)]
    amount: Option<String>,

    /// New description (pass an empty string to clear)
    #[arg(long)]
    description: Option<String>,

    /// New serial number (pass an empty string to clear)
    #[arg(long)]
    serial_number: Option<String>,

    /// New shipping address (pass an empty string to clear)
    #[arg(long)]
    shipping_address: Option<String>,

    /// New shipping company (pass an empty string to clear)
    #[arg(long)]
    shipping_company: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Record id
    id: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
}

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
}

// =============================================================================
// Commands
// =============================================================================

pub async fn run_add(ctx: &AppContext, args: AddArgs) -> Result<()> {
    let draft = RecordDraft {
        barcode: args.barcode,
        name: args.name,
        description: args.description,
        serial_number: args.serial_number,
        barcode_type: BarcodeType::parse_or_default(&args.barcode_type),
        amount: coerce_amount(args.amount.as_deref().unwrap_or("")),
        shipping_address: args.shipping_address,
        shipping_company: args.shipping_company,
    };

    match ctx.service.add(&ctx.mode, draft).await {
        Ok(record) => {
            print_record(&record);
            feedback::emit(&Notice::success(format!(
                "Saved '{}' to {} storage",
                record.name,
                ctx.mode.label()
            )));
            Ok(())
        }
        Err(StoreError::Validation(err)) => {
            feedback::emit(&Notice::warning(err.to_string()));
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn run_list(ctx: &AppContext) -> Result<()> {
    let records = ctx.service.list(&ctx.mode).await?;

    if records.is_empty() {
        feedback::emit(&Notice::info(format!(
            "No records in {} storage",
            ctx.mode.label()
        )));
        return Ok(());
    }

    for record in &records {
        print_summary(record);
    }
    feedback::emit(&Notice::info(format!(
        "{} record(s) in {} storage",
        records.len(),
        ctx.mode.label()
    )));
    Ok(())
}

pub async fn run_show(ctx: &AppContext, args: ShowArgs) -> Result<()> {
    match ctx.service.get(&ctx.mode, &args.id).await? {
        Some(record) => {
            print_record(&record);
            Ok(())
        }
        None => {
            feedback::emit(&Notice::error(format!("Record not found: {}", args.id)));
            Ok(())
        }
    }
}

pub async fn run_lookup(ctx: &AppContext, args: LookupArgs) -> Result<()> {
    match ctx.service.find_by_barcode(&ctx.mode, &args.barcode).await? {
        Some(record) => {
            print_record(&record);
            feedback::emit(&Notice::success(format!("Barcode {} found", args.barcode)));
        }
        None => {
            feedback::emit(&Notice::info(format!(
                "Barcode {} is not in your records. Add it with: tillbox add --barcode {} --name <name>",
                args.barcode, args.barcode
            )));
        }
    }
    Ok(())
}

pub async fn run_edit(ctx: &AppContext, args: EditArgs) -> Result<()> {
    // Load first so editing a missing record reports cleanly before any
    // patch work happens.
    if ctx.service.get(&ctx.mode, &args.id).await?.is_none() {
        feedback::emit(&Notice::error(format!("Record not found: {}", args.id)));
        return Ok(());
    }

    let patch = RecordPatch {
        name: args.name,
        description: args.description,
        serial_number: args.serial_number,
        barcode_type: args
            .barcode_type
            .as_deref()
            .map(BarcodeType::parse_or_default),
        amount: args.amount.as_deref().map(coerce_amount),
        shipping_address: args.shipping_address,
        shipping_company: args.shipping_company,
    };

    if patch.is_empty() {
        feedback::emit(&Notice::info("Nothing to change"));
        return Ok(());
    }

    match ctx.service.update(&ctx.mode, &args.id, &patch).await {
        Ok(record) => {
            print_record(&record);
            feedback::emit(&Notice::success(format!("Updated '{}'", record.name)));
            Ok(())
        }
        Err(StoreError::Validation(err)) => {
            feedback::emit(&Notice::warning(err.to_string()));
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn run_delete(ctx: &AppContext, args: DeleteArgs) -> Result<()> {
    if !feedback::confirm("Delete this record?", args.yes)? {
        feedback::emit(&Notice::info("Cancelled"));
        return Ok(());
    }

    match ctx.service.delete(&ctx.mode, &args.id).await {
        Ok(()) => {
            feedback::emit(&Notice::success("Record deleted"));
            Ok(())
        }
        Err(StoreError::NotFound { .. }) => {
            feedback::emit(&Notice::error(format!("Record not found: {}", args.id)));
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn run_clear(ctx: &AppContext, args: ClearArgs) -> Result<()> {
    let prompt = format!(
        "Delete ALL records in {} storage? This cannot be undone.",
        ctx.mode.label()
    );
    if !feedback::confirm(&prompt, args.yes)? {
        feedback::emit(&Notice::info("Cancelled"));
        return Ok(());
    }

    let removed = ctx.service.clear(&ctx.mode).await?;
    feedback::emit(&Notice::success(format!("Removed {removed} record(s)")));
    Ok(())
}

// =============================================================================
// Rendering
// =============================================================================

fn print_summary(record: &ProductRecord) {
    println!(
        "{}  {:<14}  {:<24}  {}",
        record.id, record.barcode, record.name, record.amount
    );
}

fn print_record(record: &ProductRecord) {
    println!("Id:            {}", record.id);
    println!("Barcode:       {} ({})", record.barcode, record.barcode_type);
    println!("Name:          {}", record.name);
    if let Some(description) = &record.description {
        println!("Description:   {description}");
    }
    if let Some(serial) = &record.serial_number {
        println!("Serial #:      {serial}");
    }
    println!("Amount:        {}", record.amount);
    if let Some(address) = &record.shipping_address {
        println!("Ship to:       {address}");
    }
    if let Some(company) = &record.shipping_company {
        println!("Carrier:       {company}");
    }
    println!("Created:       {}", record.created_at);
    println!("Updated:       {}", record.updated_at);
}
