//! # Store Error Types
//!
//! Error types for persistence operations, local and remote.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Error Propagation                              │
//! │                                                                     │
//! │  sqlx::Error (remote)        std::io::Error (local vault)           │
//! │       │                            │                                │
//! │       └──────────┬─────────────────┘                                │
//! │                  ▼                                                  │
//! │             StoreError  ← Adds context and categorization           │
//! │                  │                                                  │
//! │                  ▼                                                  │
//! │             Notice (in CLI) ← User-friendly message                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One exception: a corrupt vault blob is NOT an error. The vault logs a
//! warning and starts from an empty collection, so a damaged file never
//! bricks the tool.

use thiserror::Error;

/// Persistence operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found in the active scope.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - ID doesn't exist in the local blob
    /// - Record belongs to a different owner
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored column could not be decoded into its domain type.
    ///
    /// ## When This Occurs
    /// - Amount column holds a non-decimal string
    /// - Timestamp column is malformed
    #[error("Failed to decode column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Input failed domain validation before reaching a store.
    #[error(transparent)]
    Validation(#[from] tillbox_core::ValidationError),

    /// Local vault file I/O failed.
    #[error("Vault I/O failed: {0}")]
    VaultIo(#[from] std::io::Error),

    /// Serializing a collection for the vault failed.
    #[error("Vault encoding failed: {0}")]
    VaultEncoding(#[from] serde_json::Error),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Decode error for a given column.
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Decode {
            column: column.into(),
            message: message.into(),
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → StoreError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    StoreError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else {
                    StoreError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => {
                StoreError::ConnectionFailed("Pool is closed".to_string())
            }

            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;
