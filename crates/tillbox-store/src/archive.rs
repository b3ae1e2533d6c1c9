//! # Receipt Archive
//!
//! Prepend-only history of generated receipts, backed by the JSON vault.
//!
//! ## Rules
//! - New receipts go to the FRONT of the collection, so stored order is
//!   already newest-first
//! - Archived receipts are never edited; the only mutations are prepend
//!   and clear
//! - The archive is local regardless of storage mode

use tracing::debug;

use tillbox_core::Receipt;

use crate::error::StoreResult;
use crate::vault::Vault;

/// Vault slot holding the receipt history.
pub const RECEIPTS_SLOT: &str = "barcode_manager_receipts";

/// Prepend-only receipt history.
#[derive(Debug, Clone)]
pub struct ReceiptArchive {
    vault: Vault,
}

impl ReceiptArchive {
    /// Creates an archive over the given vault.
    pub fn new(vault: Vault) -> Self {
        ReceiptArchive { vault }
    }

    /// Adds a receipt to the front of the history.
    pub async fn prepend(&self, receipt: Receipt) -> StoreResult<()> {
        debug!(number = %receipt.receipt_number, "Archiving receipt");

        let mut receipts = self.vault.load::<Receipt>(RECEIPTS_SLOT).await?;
        receipts.insert(0, receipt);
        self.vault.save(RECEIPTS_SLOT, &receipts).await
    }

    /// Lists the full history, newest first.
    pub async fn list(&self) -> StoreResult<Vec<Receipt>> {
        self.vault.load(RECEIPTS_SLOT).await
    }

    /// Finds a receipt by its number.
    pub async fn find(&self, receipt_number: &str) -> StoreResult<Option<Receipt>> {
        let receipts = self.vault.load::<Receipt>(RECEIPTS_SLOT).await?;
        Ok(receipts
            .into_iter()
            .find(|receipt| receipt.receipt_number == receipt_number))
    }

    /// Empties the history. Returns how many receipts were removed.
    pub async fn clear(&self) -> StoreResult<u64> {
        let receipts = self.vault.load::<Receipt>(RECEIPTS_SLOT).await?;
        let count = receipts.len() as u64;

        self.vault.clear(RECEIPTS_SLOT).await?;

        debug!(count = count, "Cleared receipt history");
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use tillbox_core::receipt::build_receipt;
    use tillbox_core::{LineSelection, Money, ProductRecord, ReceiptRequest};
    use tillbox_core::{BarcodeType, LOCAL_OWNER_ID};

    fn archive() -> (tempfile::TempDir, ReceiptArchive) {
        let dir = tempfile::tempdir().unwrap();
        let archive = ReceiptArchive::new(Vault::new(dir.path()));
        (dir, archive)
    }

    fn receipt_at(secs: i64) -> Receipt {
        let now = Utc.timestamp_opt(1_714_000_000 + secs, 0).unwrap();
        let record = ProductRecord {
            id: "1".to_string(),
            barcode: "111".to_string(),
            name: "Widget".to_string(),
            description: None,
            serial_number: None,
            barcode_type: BarcodeType::Code128,
            amount: Money::from_major_minor(10, 0),
            shipping_address: None,
            shipping_company: None,
            created_at: now,
            updated_at: now,
            owner_id: LOCAL_OWNER_ID.to_string(),
        };
        let request = ReceiptRequest {
            selections: vec![LineSelection { record, quantity: 1 }],
            tax_rate_percent: Decimal::from(10),
            ..Default::default()
        };
        build_receipt(request, now).unwrap()
    }

    #[tokio::test]
    async fn test_prepend_puts_newest_first() {
        let (_dir, archive) = archive();

        let first = receipt_at(0);
        let second = receipt_at(60);
        archive.prepend(first.clone()).await.unwrap();
        archive.prepend(second.clone()).await.unwrap();

        let listed = archive.list().await.unwrap();
        assert_eq!(listed[0].receipt_number, second.receipt_number);
        assert_eq!(listed[1].receipt_number, first.receipt_number);
    }

    #[tokio::test]
    async fn test_archived_receipts_survive_reload() {
        let (dir, archive) = archive();
        let receipt = receipt_at(0);
        archive.prepend(receipt.clone()).await.unwrap();

        // A fresh handle over the same directory sees the same history.
        let reopened = ReceiptArchive::new(Vault::new(dir.path()));
        let listed = reopened.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], receipt);
    }

    #[tokio::test]
    async fn test_find_by_number() {
        let (_dir, archive) = archive();
        let receipt = receipt_at(0);
        archive.prepend(receipt.clone()).await.unwrap();

        let found = archive.find(&receipt.receipt_number).await.unwrap();
        assert_eq!(found, Some(receipt));
        assert!(archive.find("RCP-0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let (_dir, archive) = archive();
        archive.prepend(receipt_at(0)).await.unwrap();

        assert_eq!(archive.clear().await.unwrap(), 1);
        assert!(archive.list().await.unwrap().is_empty());

        // Clearing an already-empty archive is fine
        assert_eq!(archive.clear().await.unwrap(), 0);
    }
}
