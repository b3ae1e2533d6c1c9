//! # Application Context
//!
//! Everything a command needs, wired once at startup.

use std::sync::Arc;

use anyhow::{Context as _, Result};

use tillbox_core::StorageMode;
use tillbox_store::{
    GatewayConfig, LocalStore, ReceiptArchive, RecordService, SqliteGateway, Vault,
};

use crate::config::AppConfig;
use crate::session::SessionStore;

/// Shared state handed to every command.
pub struct AppContext {
    pub config: AppConfig,
    pub mode: StorageMode,
    pub service: RecordService,
    pub archive: ReceiptArchive,
    pub sessions: SessionStore,
}

impl AppContext {
    /// Builds the context: resolves the data directory, opens both stores,
    /// and reads the session file to pick the storage mode.
    pub async fn init(config: AppConfig) -> Result<Self> {
        let data_dir = config.data_dir()?;
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data dir: {}", data_dir.display()))?;

        let vault = Vault::new(&data_dir);
        let local = LocalStore::new(vault.clone());
        let archive = ReceiptArchive::new(vault);

        let gateway = SqliteGateway::connect(GatewayConfig::new(config.database_path()?))
            .await
            .context("failed to open the record database")?;

        let sessions = SessionStore::new(&data_dir);
        let mode = sessions.current_mode();

        Ok(AppContext {
            config,
            mode,
            service: RecordService::new(local, Arc::new(gateway)),
            archive,
            sessions,
        })
    }
}
