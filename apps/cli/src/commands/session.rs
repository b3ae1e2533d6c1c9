//! # Session Commands
//!
//! Sign-in, sign-out, and status. Login triggers the one-shot migration of
//! local records into the signed-in owner's scope.

use anyhow::Result;
use clap::Args;

use tillbox_core::{Notice, StorageMode};
use tillbox_sync::migrate_local_records;

use crate::context::AppContext;
use crate::feedback;

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account identity to sign in as
    owner_id: String,
}

pub async fn run_login(ctx: &AppContext, args: LoginArgs) -> Result<()> {
    if let StorageMode::Authenticated { owner_id } = &ctx.mode {
        feedback::emit(&Notice::warning(format!(
            "Already signed in as {owner_id}; log out first to switch accounts"
        )));
        return Ok(());
    }

    let mode = ctx.sessions.sign_in(&args.owner_id)?;
    feedback::emit(&Notice::success(format!(
        "Signed in as {}",
        args.owner_id
    )));

    // One-shot reconciliation: local records move into the account scope.
    let report = migrate_local_records(
        ctx.service.local(),
        ctx.service.gateway().as_ref(),
        mode.owner_id(),
    )
    .await?;

    feedback::emit(&report.notice());
    for failure in &report.failed {
        feedback::emit(&Notice::warning(format!(
            "Lost during sync: '{}' (barcode {}): {}",
            failure.name, failure.barcode, failure.reason
        )));
    }
    Ok(())
}

pub async fn run_logout(ctx: &AppContext) -> Result<()> {
    match &ctx.mode {
        StorageMode::Authenticated { owner_id } => {
            ctx.sessions.sign_out()?;
            feedback::emit(&Notice::success(format!(
                "Signed out of {owner_id}; new records stay on this machine"
            )));
        }
        StorageMode::Offline => {
            feedback::emit(&Notice::info("Not signed in"));
        }
    }
    Ok(())
}

pub async fn run_status(ctx: &AppContext) -> Result<()> {
    let records = ctx.service.list(&ctx.mode).await?;
    let receipts = ctx.archive.list().await?;

    match &ctx.mode {
        StorageMode::Authenticated { owner_id } => {
            println!("Mode:      cloud (signed in as {owner_id})");
        }
        StorageMode::Offline => {
            println!("Mode:      local (not signed in)");
        }
    }
    println!("Records:   {}", records.len());
    println!("Receipts:  {}", receipts.len());
    Ok(())
}
