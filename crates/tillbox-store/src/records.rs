//! # Record Service
//!
//! The single routing point between the two storage scopes.
//!
//! ## Routing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      RecordService                                  │
//! │                                                                     │
//! │   operation + &StorageMode                                          │
//! │        │                                                            │
//! │        ├── Authenticated { owner_id } ──► RecordGateway (SQLite)    │
//! │        │                                                            │
//! │        └── Offline ──────────────────────► LocalStore (JSON vault)  │
//! │                                                                     │
//! │  Every method matches on the mode exhaustively. There is no         │
//! │  default arm and no shared fallthrough, so adding a third mode      │
//! │  is a compile error until every operation handles it.               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The mode is an argument, not a field: the service holds no session state
//! and a caller can hit both scopes through one instance (the sync
//! reconciler does exactly that).

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use tillbox_core::validation::validate_draft;
use tillbox_core::{ProductRecord, RecordDraft, RecordPatch, StorageMode};

use crate::error::StoreResult;
use crate::gateway::RecordGateway;
use crate::local::LocalStore;

/// Mode-routing facade over both record stores.
#[derive(Clone)]
pub struct RecordService {
    local: LocalStore,
    gateway: Arc<dyn RecordGateway>,
}

impl RecordService {
    /// Creates a service over the given local store and remote gateway.
    pub fn new(local: LocalStore, gateway: Arc<dyn RecordGateway>) -> Self {
        RecordService { local, gateway }
    }

    /// The local store (offline scope).
    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// The remote gateway (authenticated scope).
    pub fn gateway(&self) -> &Arc<dyn RecordGateway> {
        &self.gateway
    }

    /// Validates a draft and inserts it into the active scope.
    pub async fn add(&self, mode: &StorageMode, draft: RecordDraft) -> StoreResult<ProductRecord> {
        validate_draft(&draft)?;

        debug!(scope = mode.label(), name = %draft.name, "Adding record");

        match mode {
            StorageMode::Authenticated { owner_id } => self.gateway.insert(owner_id, draft).await,
            StorageMode::Offline => self.local.insert(draft, Utc::now()).await,
        }
    }

    /// Lists the active scope's records newest-first.
    pub async fn list(&self, mode: &StorageMode) -> StoreResult<Vec<ProductRecord>> {
        match mode {
            StorageMode::Authenticated { owner_id } => self.gateway.list(owner_id).await,
            StorageMode::Offline => self.local.list().await,
        }
    }

    /// Gets a record by id from the active scope.
    pub async fn get(&self, mode: &StorageMode, id: &str) -> StoreResult<Option<ProductRecord>> {
        match mode {
            StorageMode::Authenticated { owner_id } => self.gateway.get(owner_id, id).await,
            StorageMode::Offline => self.local.get(id).await,
        }
    }

    /// Finds the first record with the given barcode in the active scope.
    pub async fn find_by_barcode(
        &self,
        mode: &StorageMode,
        barcode: &str,
    ) -> StoreResult<Option<ProductRecord>> {
        match mode {
            StorageMode::Authenticated { owner_id } => {
                self.gateway.find_by_barcode(owner_id, barcode).await
            }
            StorageMode::Offline => self.local.find_by_barcode(barcode).await,
        }
    }

    /// Applies a patch to one of the active scope's records.
    pub async fn update(
        &self,
        mode: &StorageMode,
        id: &str,
        patch: &RecordPatch,
    ) -> StoreResult<ProductRecord> {
        if let Some(name) = &patch.name {
            tillbox_core::validation::validate_name(name)?;
        }

        debug!(scope = mode.label(), id = %id, "Updating record");

        match mode {
            StorageMode::Authenticated { owner_id } => {
                self.gateway.update(owner_id, id, patch).await
            }
            StorageMode::Offline => self.local.update(id, patch, Utc::now()).await,
        }
    }

    /// Deletes a record from the active scope.
    pub async fn delete(&self, mode: &StorageMode, id: &str) -> StoreResult<()> {
        debug!(scope = mode.label(), id = %id, "Deleting record");

        match mode {
            StorageMode::Authenticated { owner_id } => self.gateway.delete(owner_id, id).await,
            StorageMode::Offline => self.local.remove(id).await,
        }
    }

    /// Clears the active scope entirely. Returns how many records were
    /// removed. The other scope is untouched.
    pub async fn clear(&self, mode: &StorageMode) -> StoreResult<u64> {
        debug!(scope = mode.label(), "Clearing records");

        match mode {
            StorageMode::Authenticated { owner_id } => self.gateway.delete_all(owner_id).await,
            StorageMode::Offline => self.local.clear().await,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::memory::MemoryGateway;
    use crate::vault::Vault;
    use tillbox_core::Money;

    fn service() -> (tempfile::TempDir, RecordService) {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStore::new(Vault::new(dir.path()));
        let service = RecordService::new(local, Arc::new(MemoryGateway::new()));
        (dir, service)
    }

    fn draft(name: &str, barcode: &str) -> RecordDraft {
        RecordDraft {
            barcode: Some(barcode.to_string()),
            name: name.to_string(),
            amount: Money::from_major_minor(3, 0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_offline_routes_to_local_store() {
        let (_dir, service) = service();
        let mode = StorageMode::Offline;

        let added = RecordDraft {
            barcode: Some("123".to_string()),
            name: "Widget".to_string(),
            amount: Money::from_major_minor(9, 99),
            ..Default::default()
        };
        let record = service.add(&mode, added).await.unwrap();
        assert_eq!(record.owner_id, tillbox_core::LOCAL_OWNER_ID);

        // Visible offline, invisible to any authenticated scope
        let listed = service.list(&mode).await.unwrap();
        assert_eq!(listed, vec![record]);
        let cloud = StorageMode::authenticated("user-1");
        assert!(service.list(&cloud).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_authenticated_routes_to_gateway() {
        let (_dir, service) = service();
        let mode = StorageMode::authenticated("user-1");

        let record = service.add(&mode, draft("Widget", "111")).await.unwrap();
        assert_eq!(record.owner_id, "user-1");

        assert!(service.list(&StorageMode::Offline).await.unwrap().is_empty());
        assert_eq!(service.list(&mode).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_draft() {
        let (_dir, service) = service();
        let nameless = RecordDraft {
            barcode: Some("111".to_string()),
            ..Default::default()
        };

        let err = service.add(&StorageMode::Offline, nameless).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_clear_touches_only_the_active_scope() {
        let (_dir, service) = service();
        let cloud = StorageMode::authenticated("user-1");

        service.add(&StorageMode::Offline, draft("Local", "1")).await.unwrap();
        service.add(&cloud, draft("Cloud", "2")).await.unwrap();

        assert_eq!(service.clear(&StorageMode::Offline).await.unwrap(), 1);
        assert_eq!(service.list(&cloud).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_and_delete_round_trip() {
        let (_dir, service) = service();
        let mode = StorageMode::Offline;
        let record = service.add(&mode, draft("Widget", "111")).await.unwrap();

        let found = service.find_by_barcode(&mode, "111").await.unwrap();
        assert_eq!(found.unwrap().id, record.id);

        service.delete(&mode, &record.id).await.unwrap();
        assert!(service.get(&mode, &record.id).await.unwrap().is_none());
    }
}
