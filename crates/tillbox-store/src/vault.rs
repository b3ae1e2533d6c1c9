//! # JSON Vault
//!
//! File-backed blob storage for the offline scope.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Vault Layout                                  │
//! │                                                                     │
//! │  <data dir>/                                                        │
//! │  ├── barcode_manager_products.json   ← whole collection, one blob   │
//! │  └── barcode_manager_receipts.json   ← whole collection, one blob   │
//! │                                                                     │
//! │  Every write re-serializes the full collection. There is no         │
//! │  per-record file and no partial update. At this tool's scale        │
//! │  (hundreds of records) that is simpler and plenty fast.             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Corruption Policy
//! A slot that fails to parse is treated as empty: the vault logs a warning
//! and returns a fresh collection. The damaged file is overwritten on the
//! next save. Missing files are simply empty slots.

use std::io::ErrorKind;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::StoreResult;

/// File-per-slot JSON storage rooted at a single directory.
#[derive(Debug, Clone)]
pub struct Vault {
    dir: PathBuf,
}

impl Vault {
    /// Creates a vault rooted at `dir`. The directory is created lazily on
    /// first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Vault { dir: dir.into() }
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }

    /// Loads a slot's collection.
    ///
    /// ## Returns
    /// * Missing file → empty collection
    /// * Unparseable file → empty collection (with a warning)
    /// * I/O failure other than not-found → error
    pub async fn load<T: DeserializeOwned>(&self, slot: &str) -> StoreResult<Vec<T>> {
        let path = self.slot_path(slot);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(slot = %slot, "Vault slot missing, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!(
                    slot = %slot,
                    error = %err,
                    "Vault slot is corrupt, starting empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Saves a slot's collection, replacing whatever was there.
    pub async fn save<T: Serialize>(&self, slot: &str, items: &[T]) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).await?;

        let bytes = serde_json::to_vec(items)?;
        fs::write(self.slot_path(slot), bytes).await?;

        debug!(slot = %slot, count = items.len(), "Vault slot saved");
        Ok(())
    }

    /// Resets a slot to an empty collection.
    ///
    /// The slot file is kept and rewritten as `[]` rather than deleted, so a
    /// cleared slot and a never-used slot read identically.
    pub async fn clear(&self, slot: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.slot_path(slot), b"[]").await?;

        debug!(slot = %slot, "Vault slot cleared");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: String,
        value: i64,
    }

    fn entry(id: &str, value: i64) -> Entry {
        Entry {
            id: id.to_string(),
            value,
        }
    }

    #[tokio::test]
    async fn test_missing_slot_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::new(dir.path());

        let items: Vec<Entry> = vault.load("nothing_here").await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::new(dir.path());

        vault
            .save("slot", &[entry("a", 1), entry("b", 2)])
            .await
            .unwrap();

        let items: Vec<Entry> = vault.load("slot").await.unwrap();
        assert_eq!(items, vec![entry("a", 1), entry("b", 2)]);
    }

    #[tokio::test]
    async fn test_corrupt_slot_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::new(dir.path());

        tokio::fs::write(dir.path().join("slot.json"), b"{not json!")
            .await
            .unwrap();

        let items: Vec<Entry> = vault.load("slot").await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_clear_resets_slot() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::new(dir.path());

        vault.save("slot", &[entry("a", 1)]).await.unwrap();
        vault.clear("slot").await.unwrap();

        let items: Vec<Entry> = vault.load("slot").await.unwrap();
        assert!(items.is_empty());
        assert!(dir.path().join("slot.json").exists());
    }
}
