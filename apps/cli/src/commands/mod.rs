//! # Command Dispatch
//!
//! The `tillbox` command tree.
//!
//! ```text
//! tillbox add --name ... [--barcode ...] [--amount ...]
//! tillbox list
//! tillbox show <id>
//! tillbox lookup <barcode>
//! tillbox edit <id> [--name ...] [--description ...] ...
//! tillbox delete <id> [--yes]
//! tillbox clear [--yes]
//! tillbox receipt new --item <barcode[:qty]> ... [--discount ...] [--tax-rate ...]
//! tillbox receipt history
//! tillbox receipt show <number>
//! tillbox receipt clear [--yes]
//! tillbox login <owner-id>
//! tillbox logout
//! tillbox status
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::context::AppContext;

pub mod receipt;
pub mod record;
pub mod session;

#[derive(Debug, Parser)]
#[command(name = "tillbox", about = "Barcode inventory and receipt tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add a record to the active store
    Add(record::AddArgs),
    /// List records in the active store, newest first
    List,
    /// Show a single record
    Show(record::ShowArgs),
    /// Look a barcode up in the active store
    Lookup(record::LookupArgs),
    /// Edit fields of an existing record
    Edit(record::EditArgs),
    /// Delete a record
    Delete(record::DeleteArgs),
    /// Delete every record in the active store
    Clear(record::ClearArgs),
    /// Receipt generation and history
    Receipt(receipt::ReceiptCommand),
    /// Sign in and migrate local records to your account
    Login(session::LoginArgs),
    /// Sign out and return to local storage
    Logout,
    /// Show the active storage mode and record count
    Status,
}

impl Cli {
    pub async fn run(self, ctx: AppContext) -> Result<()> {
        match self.command {
            Commands::Add(args) => record::run_add(&ctx, args).await,
            Commands::List => record::run_list(&ctx).await,
            Commands::Show(args) => record::run_show(&ctx, args).await,
            Commands::Lookup(args) => record::run_lookup(&ctx, args).await,
            Commands::Edit(args) => record::run_edit(&ctx, args).await,
            Commands::Delete(args) => record::run_delete(&ctx, args).await,
            Commands::Clear(args) => record::run_clear(&ctx, args).await,
            Commands::Receipt(command) => receipt::run(&ctx, command).await,
            Commands::Login(args) => session::run_login(&ctx, args).await,
            Commands::Logout => session::run_logout(&ctx).await,
            Commands::Status => session::run_status(&ctx).await,
        }
    }
}
