//! # SQLite Record Gateway
//!
//! The production [`RecordGateway`] for the authenticated scope.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    SQLite Record Gateway                            │
//! │                                                                     │
//! │  GatewayConfig::new(path) ← Configure pool settings                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SqliteGateway::connect(config).await ← Create pool + migrations    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────┐                        │
//! │  │            SqlitePool                   │                        │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │  (max_connections)     │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │                        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                        │
//! │  └─────────────────────────────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Better concurrent read performance
//! - Readers don't block writers
//! - Better crash recovery
//!
//! ## Column Encoding
//! Amounts are decimal TEXT, parsed into [`Money`] on read so arithmetic
//! stays exact. An unreadable amount is a decode error, never a silent zero.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use tillbox_core::validation::generate_barcode;
use tillbox_core::{BarcodeType, Money, ProductRecord, RecordDraft, RecordPatch};

use crate::error::{StoreError, StoreResult};
use crate::gateway::RecordGateway;
use crate::migrations;

// =============================================================================
// Configuration
// =============================================================================

/// Gateway database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = GatewayConfig::new("/path/to/tillbox.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl GatewayConfig {
    /// Creates a new configuration with the given database path.
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        GatewayConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    pub fn in_memory() -> Self {
        GatewayConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Gateway
// =============================================================================

/// SQLite-backed record gateway.
#[derive(Debug, Clone)]
pub struct SqliteGateway {
    pool: SqlitePool,
}

impl SqliteGateway {
    /// Creates the connection pool and runs migrations.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite: WAL mode, NORMAL synchronous, foreign keys on
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn connect(config: GatewayConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing record gateway"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            // WAL mode: readers don't block writers and vice versa
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL synchronous: good balance of durability and speed
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Gateway pool created"
        );

        let gateway = SqliteGateway { pool };

        if config.run_migrations {
            migrations::run_migrations(&gateway.pool).await?;
        }

        Ok(gateway)
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by the gateway methods.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        info!("Closing gateway connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

const RECORD_COLUMNS: &str = "id, owner_id, barcode, name, description, serial_number, \
     barcode_type, amount, shipping_address, shipping_company, created_at, updated_at";

fn record_from_row(row: &SqliteRow) -> StoreResult<ProductRecord> {
    let amount_text: String = row.try_get("amount")?;
    let amount = Money::parse(&amount_text)
        .ok_or_else(|| StoreError::decode("amount", format!("not a decimal: '{amount_text}'")))?;

    let barcode_type: String = row.try_get("barcode_type")?;

    Ok(ProductRecord {
        id: row.try_get("id")?,
        barcode: row.try_get("barcode")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        serial_number: row.try_get("serial_number")?,
        // Unknown symbology labels fall back to the CODE128 default
        barcode_type: BarcodeType::parse_or_default(&barcode_type),
        amount,
        shipping_address: row.try_get("shipping_address")?,
        shipping_company: row.try_get("shipping_company")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        owner_id: row.try_get("owner_id")?,
    })
}

// =============================================================================
// RecordGateway Implementation
// =============================================================================

#[async_trait]
impl RecordGateway for SqliteGateway {
    async fn insert(&self, owner_id: &str, draft: RecordDraft) -> StoreResult<ProductRecord> {
        let now = Utc::now();
        let record = ProductRecord {
            id: Uuid::new_v4().to_string(),
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
            owner_id: owner_id.to_string(),
        };

        debug!(id = %record.id, owner = %owner_id, "Inserting record");

        sqlx::query(
            r#"
            INSERT INTO records (
                id, owner_id, barcode, name, description, serial_number,
                barcode_type, amount, shipping_address, shipping_company,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&record.id)
        .bind(&record.owner_id)
        .bind(&record.barcode)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.serial_number)
        .bind(record.barcode_type.label())
        .bind(record.amount.amount().to_string())
        .bind(&record.shipping_address)
        .bind(&record.shipping_company)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get(&self, owner_id: &str, id: &str) -> StoreResult<Option<ProductRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1 AND owner_id = ?2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn list(&self, owner_id: &str) -> StoreResult<Vec<ProductRecord>> {
        debug!(owner = %owner_id, "Listing records");

        let rows = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM records \
             WHERE owner_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn find_by_barcode(
        &self,
        owner_id: &str,
        barcode: &str,
    ) -> StoreResult<Option<ProductRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM records \
             WHERE owner_id = ?1 AND barcode = ?2 \
             ORDER BY created_at ASC LIMIT 1"
        ))
        .bind(owner_id)
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: &RecordPatch,
    ) -> StoreResult<ProductRecord> {
        // Fetch-then-write: the patch is applied to the domain type so the
        // clearing rules for blanked-out fields live in exactly one place.
        let mut record = self
            .get(owner_id, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Record", id))?;

        patch.apply(&mut record, Utc::now());

        debug!(id = %id, owner = %owner_id, "Updating record");

        let result = sqlx::query(
            r#"
            UPDATE records SET
                barcode = ?3,
                name = ?4,
                description = ?5,
                serial_number = ?6,
                barcode_type = ?7,
                amount = ?8,
                shipping_address = ?9,
                shipping_company = ?10,
                updated_at = ?11
            WHERE id = ?1 AND owner_id = ?2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&record.barcode)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.serial_number)
        .bind(record.barcode_type.label())
        .bind(record.amount.amount().to_string())
        .bind(&record.shipping_address)
        .bind(&record.shipping_company)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Record", id));
        }

        Ok(record)
    }

    async fn delete(&self, owner_id: &str, id: &str) -> StoreResult<()> {
        debug!(id = %id, owner = %owner_id, "Deleting record");

        let result = sqlx::query("DELETE FROM records WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Record", id));
        }

        Ok(())
    }

    async fn delete_all(&self, owner_id: &str) -> StoreResult<u64> {
        debug!(owner = %owner_id, "Deleting all records for owner");

        // Single statement, so a clear is all-or-nothing.
        let result = sqlx::query("DELETE FROM records WHERE owner_id = ?1")
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, barcode: &str, major: i64, minor: i64) -> RecordDraft {
        RecordDraft {
            barcode: Some(barcode.to_string()),
            name: name.to_string(),
            amount: Money::from_major_minor(major, minor),
            ..Default::default()
        }
    }

    async fn gateway() -> SqliteGateway {
        SqliteGateway::connect(GatewayConfig::in_memory())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let gateway = gateway().await;
        assert!(gateway.health_check().await);

        let (total, applied) = migrations::migration_status(gateway.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = GatewayConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
    }

    #[tokio::test]
    async fn test_insert_assigns_uuid_and_owner() {
        let gateway = gateway().await;

        let record = gateway
            .insert("user-1", draft("Widget", "111", 10, 99))
            .await
            .unwrap();

        assert_eq!(record.owner_id, "user-1");
        assert!(Uuid::parse_str(&record.id).is_ok());
        assert_eq!(record.amount, Money::from_major_minor(10, 99));
    }

    #[tokio::test]
    async fn test_round_trip_preserves_amount_precision() {
        let gateway = gateway().await;

        let inserted = gateway
            .insert("user-1", draft("Widget", "111", 10, 99))
            .await
            .unwrap();

        let fetched = gateway.get("user-1", &inserted.id).await.unwrap().unwrap();
        assert_eq!(fetched, inserted);
    }

    #[tokio::test]
    async fn test_owner_scoping() {
        let gateway = gateway().await;

        let record = gateway
            .insert("user-1", draft("Widget", "111", 1, 0))
            .await
            .unwrap();

        // Another owner can't see, update, or delete it
        assert!(gateway.get("user-2", &record.id).await.unwrap().is_none());
        assert!(gateway.list("user-2").await.unwrap().is_empty());
        assert!(gateway.delete("user-2", &record.id).await.is_err());

        assert_eq!(gateway.list("user-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let gateway = gateway().await;
        let record = gateway
            .insert("user-1", draft("Widget", "111", 1, 0))
            .await
            .unwrap();

        let patch = RecordPatch {
            name: Some("Gadget".to_string()),
            amount: Some(Money::from_major_minor(2, 50)),
            ..Default::default()
        };
        let updated = gateway.update("user-1", &record.id, &patch).await.unwrap();

        assert_eq!(updated.name, "Gadget");
        assert_eq!(updated.amount, Money::from_major_minor(2, 50));

        let fetched = gateway.get("user-1", &record.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Gadget");
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let gateway = gateway().await;
        let err = gateway
            .update("user-1", "nope", &RecordPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_find_by_barcode() {
        let gateway = gateway().await;
        gateway
            .insert("user-1", draft("Widget", "111", 1, 0))
            .await
            .unwrap();

        let found = gateway.find_by_barcode("user-1", "111").await.unwrap();
        assert_eq!(found.unwrap().name, "Widget");
        assert!(gateway
            .find_by_barcode("user-1", "999")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_all_is_scoped() {
        let gateway = gateway().await;
        gateway
            .insert("user-1", draft("A", "1", 1, 0))
            .await
            .unwrap();
        gateway
            .insert("user-1", draft("B", "2", 1, 0))
            .await
            .unwrap();
        gateway
            .insert("user-2", draft("C", "3", 1, 0))
            .await
            .unwrap();

        let removed = gateway.delete_all("user-1").await.unwrap();
        assert_eq!(removed, 2);
        assert!(gateway.list("user-1").await.unwrap().is_empty());
        assert_eq!(gateway.list("user-2").await.unwrap().len(), 1);
    }
}
