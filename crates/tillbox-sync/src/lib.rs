//! # tillbox-sync: Sign-In Reconciliation for tillbox
//!
//! When a user signs in, any records created offline are migrated into
//! their account scope. This crate owns that pass and its reporting.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Sign-In Reconciliation                           │
//! │                                                                     │
//! │  CLI `login`                                                        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                tillbox-sync (THIS CRATE)                      │  │
//! │  │                                                               │  │
//! │  │   migrate_local_records(local, gateway, owner)                │  │
//! │  │        │                                                      │  │
//! │  │        ├── LocalStore.snapshot()   (tillbox-store)            │  │
//! │  │        ├── RecordGateway.insert()  per record, sequential     │  │
//! │  │        └── LocalStore.clear()      unconditional              │  │
//! │  │        │                                                      │  │
//! │  │        ▼                                                      │  │
//! │  │   SyncReport ──► Notice (displayed by the CLI)                │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`reconciler`] - The migration pass and its [`reconciler::SyncReport`]
//! - [`error`] - Sync error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod reconciler;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{SyncError, SyncResult};
pub use reconciler::{migrate_local_records, SyncFailure, SyncReport};
