//! # In-Memory Record Gateway
//!
//! A [`RecordGateway`] that keeps everything in a `Vec` behind a mutex.
//!
//! ## What It's For
//! - Tests that exercise routing and sync without a database
//! - Failure injection: specific barcodes can be marked as poisoned so a
//!   partial-failure migration can be reproduced deterministically
//!
//! The semantics mirror [`crate::sqlite::SqliteGateway`]: UUID ids,
//! gateway-assigned timestamps, per-owner scoping, newest-first listing.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use tillbox_core::validation::generate_barcode;
use tillbox_core::{ProductRecord, RecordDraft, RecordPatch};

use crate::error::{StoreError, StoreResult};
use crate::gateway::RecordGateway;

/// Mutex-guarded in-memory gateway.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    records: Mutex<Vec<ProductRecord>>,
    poisoned_barcodes: Mutex<HashSet<String>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a barcode as poisoned: inserting a draft with it fails with a
    /// query error. Lets tests reproduce a mid-batch insert failure.
    pub fn poison_barcode(&self, barcode: impl Into<String>) {
        self.poisoned_barcodes
            .lock()
            .expect("poisoned barcode lock")
            .insert(barcode.into());
    }

    fn lock_records(&self) -> std::sync::MutexGuard<'_, Vec<ProductRecord>> {
        self.records.lock().expect("record lock")
    }
}

#[async_trait]
impl RecordGateway for MemoryGateway {
    async fn insert(&self, owner_id: &str, draft: RecordDraft) -> StoreResult<ProductRecord> {
        let now = Utc::now();
        let barcode = draft
            .barcode
            .filter(|code| !code.trim().is_empty())
            .unwrap_or_else(|| generate_barcode(now));

        if self
            .poisoned_barcodes
            .lock()
            .expect("poisoned barcode lock")
            .contains(&barcode)
        {
            return Err(StoreError::QueryFailed(format!(
                "insert rejected for barcode '{barcode}'"
            )));
        }

        let record = ProductRecord {
            id: Uuid::new_v4().to_string(),
            barcode,
            name: draft.name,
            description: draft.description,
            serial_number: draft.serial_number,
            barcode_type: draft.barcode_type,
            amount: draft.amount,
            shipping_address: draft.shipping_address,
            shipping_company: draft.shipping_company,
            created_at: now,
            updated_at: now,
            owner_id: owner_id.to_string(),
        };

        debug!(id = %record.id, owner = %owner_id, "Inserting record (memory)");

        self.lock_records().push(record.clone());
        Ok(record)
    }

    async fn get(&self, owner_id: &str, id: &str) -> StoreResult<Option<ProductRecord>> {
        Ok(self
            .lock_records()
            .iter()
            .find(|record| record.owner_id == owner_id && record.id == id)
            .cloned())
    }

    async fn list(&self, owner_id: &str) -> StoreResult<Vec<ProductRecord>> {
        let mut records: Vec<ProductRecord> = self
            .lock_records()
            .iter()
            .filter(|record| record.owner_id == owner_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn find_by_barcode(
        &self,
        owner_id: &str,
        barcode: &str,
    ) -> StoreResult<Option<ProductRecord>> {
        Ok(self
            .lock_records()
            .iter()
            .find(|record| record.owner_id == owner_id && record.barcode == barcode)
            .cloned())
    }

    async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: &RecordPatch,
    ) -> StoreResult<ProductRecord> {
        let mut records = self.lock_records();
        let record = records
            .iter_mut()
            .find(|record| record.owner_id == owner_id && record.id == id)
            .ok_or_else(|| StoreError::not_found("Record", id))?;

        patch.apply(record, Utc::now());
        Ok(record.clone())
    }

    async fn delete(&self, owner_id: &str, id: &str) -> StoreResult<()> {
        let mut records = self.lock_records();
        let before = records.len();

        records.retain(|record| !(record.owner_id == owner_id && record.id == id));
        if records.len() == before {
            return Err(StoreError::not_found("Record", id));
        }
        Ok(())
    }

    async fn delete_all(&self, owner_id: &str) -> StoreResult<u64> {
        let mut records = self.lock_records();
        let before = records.len();

        records.retain(|record| record.owner_id != owner_id);
        Ok((before - records.len()) as u64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tillbox_core::Money;

    fn draft(name: &str, barcode: &str) -> RecordDraft {
        RecordDraft {
            barcode: Some(barcode.to_string()),
            name: name.to_string(),
            amount: Money::from_major_minor(1, 0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_poisoned_barcode_fails_insert() {
        let gateway = MemoryGateway::new();
        gateway.poison_barcode("bad");

        let err = gateway.insert("user-1", draft("Widget", "bad")).await;
        assert!(matches!(err, Err(StoreError::QueryFailed(_))));

        // Other barcodes are unaffected
        assert!(gateway.insert("user-1", draft("Widget", "ok")).await.is_ok());
    }

    #[tokio::test]
    async fn test_scoping_matches_sqlite_gateway() {
        let gateway = MemoryGateway::new();
        let record = gateway.insert("user-1", draft("Widget", "111")).await.unwrap();

        assert!(gateway.get("user-2", &record.id).await.unwrap().is_none());
        assert_eq!(gateway.delete_all("user-2").await.unwrap(), 0);
        assert_eq!(gateway.delete_all("user-1").await.unwrap(), 1);
    }
}
