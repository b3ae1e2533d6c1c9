//! # Local Record Store
//!
//! Record persistence for the offline scope, backed by the JSON vault.
//!
//! ## Identity Rules
//! - `id` = millisecond timestamp rendered as a string
//! - `owner_id` = the `"local"` sentinel
//! - Timestamps come from the caller's clock
//!
//! ## Ordering
//! The blob keeps records in append order (oldest first). `list` sorts a
//! copy newest-first for display; `snapshot` returns the stored order, which
//! is what the sync reconciler migrates in.

use chrono::{DateTime, Utc};
use tracing::debug;

use tillbox_core::validation::generate_barcode;
use tillbox_core::{ProductRecord, RecordDraft, RecordPatch, LOCAL_OWNER_ID};

use crate::error::{StoreError, StoreResult};
use crate::vault::Vault;

/// Vault slot holding the offline record collection.
pub const RECORDS_SLOT: &str = "barcode_manager_products";

/// Record store for the offline scope.
#[derive(Debug, Clone)]
pub struct LocalStore {
    vault: Vault,
}

impl LocalStore {
    /// Creates a local store over the given vault.
    pub fn new(vault: Vault) -> Self {
        LocalStore { vault }
    }

    /// Inserts a new record built from a draft.
    ///
    /// ## Identity
    /// The id is the caller's clock in milliseconds. A blank barcode is
    /// filled with a generated one.
    pub async fn insert(
        &self,
        draft: RecordDraft,
        now: DateTime<Utc>,
    ) -> StoreResult<ProductRecord> {
        let record = ProductRecord {
            id: now.timestamp_millis().to_string(),
            barcode: draft
                .barcode
                .filter(|code| !code.trim().is_empty())
                .unwrap_or_else(|| generate_barcode(now)),
            name: draft.name,
            description: draft.description,
            serial_number: draft.serial_number,
            barcode_type: draft.barcode_type,
            amount: draft.amount,
            shipping_address: draft.shipping_address,
            shipping_company: draft.shipping_company,
            created_at: now,
            updated_at: now,
            owner_id: LOCAL_OWNER_ID.to_string(),
        };

        debug!(id = %record.id, name = %record.name, "Inserting local record");

        let mut records = self.vault.load::<ProductRecord>(RECORDS_SLOT).await?;
        records.push(record.clone());
        self.vault.save(RECORDS_SLOT, &records).await?;

        Ok(record)
    }

    /// Lists records newest-first for display.
    pub async fn list(&self) -> StoreResult<Vec<ProductRecord>> {
        let mut records = self.vault.load::<ProductRecord>(RECORDS_SLOT).await?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// Returns the collection in stored (append) order.
    ///
    /// The reconciler uses this so migration preserves insertion order.
    pub async fn snapshot(&self) -> StoreResult<Vec<ProductRecord>> {
        self.vault.load(RECORDS_SLOT).await
    }

    /// Gets a record by id.
    pub async fn get(&self, id: &str) -> StoreResult<Option<ProductRecord>> {
        let records = self.vault.load::<ProductRecord>(RECORDS_SLOT).await?;
        Ok(records.into_iter().find(|record| record.id == id))
    }

    /// Finds the first record with the given barcode.
    pub async fn find_by_barcode(&self, barcode: &str) -> StoreResult<Option<ProductRecord>> {
        let records = self.vault.load::<ProductRecord>(RECORDS_SLOT).await?;
        Ok(records.into_iter().find(|record| record.barcode == barcode))
    }

    /// Applies a patch to an existing record and stamps `updated_at`.
    pub async fn update(
        &self,
        id: &str,
        patch: &RecordPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<ProductRecord> {
        let mut records = self.vault.load::<ProductRecord>(RECORDS_SLOT).await?;

        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| StoreError::not_found("Record", id))?;

        patch.apply(record, now);
        let updated = record.clone();

        debug!(id = %id, "Updated local record");

        self.vault.save(RECORDS_SLOT, &records).await?;
        Ok(updated)
    }

    /// Removes a record by id.
    pub async fn remove(&self, id: &str) -> StoreResult<()> {
        let mut records = self.vault.load::<ProductRecord>(RECORDS_SLOT).await?;
        let before = records.len();

        records.retain(|record| record.id != id);
        if records.len() == before {
            return Err(StoreError::not_found("Record", id));
        }

        debug!(id = %id, "Removed local record");

        self.vault.save(RECORDS_SLOT, &records).await
    }

    /// Empties the collection. Returns how many records were removed.
    pub async fn clear(&self) -> StoreResult<u64> {
        let records = self.vault.load::<ProductRecord>(RECORDS_SLOT).await?;
        let count = records.len() as u64;

        self.vault.clear(RECORDS_SLOT).await?;

        debug!(count = count, "Cleared local records");
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tillbox_core::Money;

    fn store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(Vault::new(dir.path()));
        (dir, store)
    }

    fn draft(name: &str, barcode: &str) -> RecordDraft {
        RecordDraft {
            barcode: Some(barcode.to_string()),
            name: name.to_string(),
            amount: Money::from_major_minor(5, 0),
            ..Default::default()
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_714_000_000 + secs, 0).unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_local_identity() {
        let (_dir, store) = store();
        let now = at(0);

        let record = store.insert(draft("Widget", "111"), now).await.unwrap();

        assert_eq!(record.id, now.timestamp_millis().to_string());
        assert_eq!(record.owner_id, LOCAL_OWNER_ID);
        assert_eq!(record.created_at, now);
    }

    #[tokio::test]
    async fn test_insert_fills_blank_barcode() {
        let (_dir, store) = store();
        let blank = RecordDraft {
            barcode: Some("   ".to_string()),
            name: "Widget".to_string(),
            ..Default::default()
        };

        let record = store.insert(blank, at(0)).await.unwrap();
        assert!(!record.barcode.trim().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_snapshot_is_stored_order() {
        let (_dir, store) = store();

        store.insert(draft("First", "111"), at(0)).await.unwrap();
        store.insert(draft("Second", "222"), at(10)).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed[0].name, "Second");
        assert_eq!(listed[1].name, "First");

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot[0].name, "First");
        assert_eq!(snapshot[1].name, "Second");
    }

    #[tokio::test]
    async fn test_update_patches_and_stamps() {
        let (_dir, store) = store();
        let record = store.insert(draft("Widget", "111"), at(0)).await.unwrap();

        let patch = RecordPatch {
            name: Some("Gadget".to_string()),
            ..Default::default()
        };
        let updated = store.update(&record.id, &patch, at(60)).await.unwrap();

        assert_eq!(updated.name, "Gadget");
        assert_eq!(updated.updated_at, at(60));
        assert_eq!(updated.created_at, at(0));
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let (_dir, store) = store();
        let err = store
            .update("999", &RecordPatch::default(), at(0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let (_dir, store) = store();
        let record = store.insert(draft("Widget", "111"), at(0)).await.unwrap();
        store.insert(draft("Gadget", "222"), at(10)).await.unwrap();

        store.remove(&record.id).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);

        let cleared = store.clear().await.unwrap();
        assert_eq!(cleared, 1);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_on_empty_store_is_a_no_op() {
        let (_dir, store) = store();
        assert_eq!(store.clear().await.unwrap(), 0);
        assert_eq!(store.clear().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_records_round_trip_through_the_blob() {
        let (dir, store) = store();
        let full = RecordDraft {
            barcode: Some("111".to_string()),
            name: "Widget".to_string(),
            description: Some("Blue, boxed".to_string()),
            serial_number: Some("SN-42".to_string()),
            amount: Money::from_major_minor(10, 99),
            shipping_address: Some("12 High Street".to_string()),
            shipping_company: Some("FastShip".to_string()),
            ..Default::default()
        };
        let inserted = store.insert(full, at(0)).await.unwrap();

        // A fresh handle over the same directory reads the record back
        // field-for-field.
        let reopened = LocalStore::new(Vault::new(dir.path()));
        let loaded = reopened.snapshot().await.unwrap();
        assert_eq!(loaded, vec![inserted]);
    }

    #[tokio::test]
    async fn test_find_by_barcode() {
        let (_dir, store) = store();
        store.insert(draft("Widget", "111"), at(0)).await.unwrap();

        let found = store.find_by_barcode("111").await.unwrap();
        assert_eq!(found.unwrap().name, "Widget");
        assert!(store.find_by_barcode("999").await.unwrap().is_none());
    }
}
