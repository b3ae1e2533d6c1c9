//! # Sign-In Reconciler
//!
//! Migrates the offline record collection into a signed-in owner's scope.
//!
//! ## The Migration Pass
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Local → Cloud Migration                          │
//! │                                                                     │
//! │  LocalStore.snapshot()          (stored order, oldest first)        │
//! │       │                                                             │
//! │       ├── empty? ──► done, nothing touched                          │
//! │       ▼                                                             │
//! │  for each record, in order:                                         │
//! │       strip local identity ──► RecordDraft                          │
//! │       gateway.insert(owner, draft)                                  │
//! │            ├── Ok  ──► report.migrated                              │
//! │            └── Err ──► report.failed (run continues)                │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  LocalStore.clear()    ← UNCONDITIONAL, even after failures         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SyncReport { migrated, failed, cleared }                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Unconditional Clear
//! The local collection is emptied after the pass even when some inserts
//! failed, so a record that failed to migrate is gone. The report makes
//! that loss visible instead of silent: callers surface a warning notice
//! naming how many records were dropped. Inserts run sequentially, so the
//! cloud receives records in their original insertion order.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tillbox_core::{Notice, ProductRecord, RecordDraft};
use tillbox_store::{LocalStore, RecordGateway};

use crate::error::SyncResult;

// =============================================================================
// Sync Report
// =============================================================================

/// One record the migration pass could not insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncFailure {
    pub name: String,
    pub barcode: String,
    pub reason: String,
}

/// Outcome of a migration pass. Nothing is swallowed: every record ends up
/// in exactly one of the two lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Records now present in the owner's scope, in migration order.
    pub migrated: Vec<ProductRecord>,

    /// Records that failed to insert and were lost to the clear.
    pub failed: Vec<SyncFailure>,

    /// How many records the local clear removed.
    pub cleared: u64,
}

impl SyncReport {
    /// How many records the pass attempted.
    pub fn attempted(&self) -> usize {
        self.migrated.len() + self.failed.len()
    }

    /// True when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// True when there was nothing to migrate.
    pub fn is_empty(&self) -> bool {
        self.attempted() == 0
    }

    /// User-facing summary of the pass.
    pub fn notice(&self) -> Notice {
        if self.is_empty() {
            Notice::info("No local records to sync")
        } else if self.is_clean() {
            Notice::success(format!(
                "Synced {} local record(s) to your account",
                self.migrated.len()
            ))
        } else {
            Notice::warning(format!(
                "Synced {} of {} local record(s); {} could not be migrated and were removed locally",
                self.migrated.len(),
                self.attempted(),
                self.failed.len()
            ))
        }
    }
}

// =============================================================================
// Reconciler
// =============================================================================

/// Runs one migration pass from the local store into `owner_id`'s scope.
///
/// ## Rules
/// - An empty local store is a no-op: nothing is inserted or cleared
/// - Inserts are sequential and in stored (insertion) order
/// - A failed insert is recorded and the run continues
/// - The local store is cleared after the pass regardless of failures
pub async fn migrate_local_records(
    local: &LocalStore,
    gateway: &dyn RecordGateway,
    owner_id: &str,
) -> SyncResult<SyncReport> {
    let snapshot = local.snapshot().await?;

    if snapshot.is_empty() {
        info!(owner = %owner_id, "No local records, skipping migration");
        return Ok(SyncReport::default());
    }

    info!(
        owner = %owner_id,
        count = snapshot.len(),
        "Migrating local records to cloud scope"
    );

    let mut report = SyncReport::default();

    for record in snapshot {
        let name = record.name.clone();
        let barcode = record.barcode.clone();
        let draft = RecordDraft::from(record);

        match gateway.insert(owner_id, draft).await {
            Ok(migrated) => report.migrated.push(migrated),
            Err(err) => {
                warn!(
                    name = %name,
                    barcode = %barcode,
                    error = %err,
                    "Record failed to migrate; it will be lost to the local clear"
                );
                report.failed.push(SyncFailure {
                    name,
                    barcode,
                    reason: err.to_string(),
                });
            }
        }
    }

    // The local scope is emptied even when some inserts failed. The report
    // carries the loss; the caller decides how loudly to surface it.
    report.cleared = local.clear().await?;

    info!(
        owner = %owner_id,
        migrated = report.migrated.len(),
        failed = report.failed.len(),
        "Migration pass complete"
    );

    Ok(report)
}

// =============================================================================
// Unit Tests
// =============================================================================
