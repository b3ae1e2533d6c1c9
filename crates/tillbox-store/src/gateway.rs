//! # Record Gateway
//!
//! The contract every remote (authenticated-scope) record backend fulfils.
//!
//! ## Why a trait?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Gateway Seam                                      │
//! │                                                                     │
//! │  RecordService ──► dyn RecordGateway                                │
//! │                         │                                           │
//! │            ┌────────────┴────────────┐                              │
//! │            ▼                         ▼                              │
//! │      SqliteGateway             MemoryGateway                        │
//! │      (production)              (tests, failure injection)           │
//! │                                                                     │
//! │  The sync reconciler and the record service only see the trait,     │
//! │  so partial-failure behavior is testable without a database.        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Scoping
//! Every method takes an `owner_id` and touches only that owner's records.
//! Gateways never see the `"local"` sentinel; offline traffic goes to
//! [`crate::local::LocalStore`] instead.

use async_trait::async_trait;

use tillbox_core::{ProductRecord, RecordDraft, RecordPatch};

use crate::error::StoreResult;

/// Remote record backend, scoped per owner.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Inserts a new record for the owner.
    ///
    /// ## Rules
    /// - The gateway assigns the id (UUID v4) and both timestamps
    /// - A blank draft barcode is filled with a generated one
    async fn insert(&self, owner_id: &str, draft: RecordDraft) -> StoreResult<ProductRecord>;

    /// Gets one of the owner's records by id.
    async fn get(&self, owner_id: &str, id: &str) -> StoreResult<Option<ProductRecord>>;

    /// Lists the owner's records newest-first.
    async fn list(&self, owner_id: &str) -> StoreResult<Vec<ProductRecord>>;

    /// Finds the owner's first record with the given barcode.
    async fn find_by_barcode(
        &self,
        owner_id: &str,
        barcode: &str,
    ) -> StoreResult<Option<ProductRecord>>;

    /// Applies a patch to one of the owner's records and stamps `updated_at`.
    ///
    /// ## Returns
    /// * `Ok(record)` - the record after the patch
    /// * `Err(StoreError::NotFound)` - no such record in this owner's scope
    async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: &RecordPatch,
    ) -> StoreResult<ProductRecord>;

    /// Deletes one of the owner's records.
    async fn delete(&self, owner_id: &str, id: &str) -> StoreResult<()>;

    /// Deletes all of the owner's records in one statement.
    ///
    /// ## Returns
    /// How many records were removed.
    async fn delete_all(&self, owner_id: &str) -> StoreResult<u64>;
}
