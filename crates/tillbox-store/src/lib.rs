//! # tillbox-store: Persistence Layer for tillbox
//!
//! Both backing stores live in this crate, plus the service that routes
//! between them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       tillbox Data Flow                             │
//! │                                                                     │
//! │  CLI command (add / list / edit / receipt new ...)                  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                  tillbox-store (THIS CRATE)                   │  │
//! │  │                                                               │  │
//! │  │   RecordService ── matches on StorageMode ──┐                 │  │
//! │  │        │                                    │                 │  │
//! │  │        ▼ Offline                            ▼ Authenticated   │  │
//! │  │   ┌──────────────┐                  ┌──────────────────┐      │  │
//! │  │   │  LocalStore  │                  │  RecordGateway   │      │  │
//! │  │   │  (vault.rs)  │                  │  (gateway.rs)    │      │  │
//! │  │   │              │                  │                  │      │  │
//! │  │   │ JSON blobs   │                  │ SqliteGateway    │      │  │
//! │  │   │ per slot     │                  │ MemoryGateway    │      │  │
//! │  │   └──────────────┘                  └──────────────────┘      │  │
//! │  │        │                                                      │  │
//! │  │   ReceiptArchive (archive.rs, always local)                   │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`vault`] - File-per-slot JSON blob storage
//! - [`local`] - Offline-scope record store over the vault
//! - [`archive`] - Prepend-only receipt history over the vault
//! - [`gateway`] - The remote record backend trait
//! - [`sqlite`] - SQLite gateway implementation + pool configuration
//! - [`memory`] - In-memory gateway with failure injection
//! - [`records`] - Mode-routing record service
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod archive;
pub mod error;
pub mod gateway;
pub mod local;
pub mod memory;
pub mod migrations;
pub mod records;
pub mod sqlite;
pub mod vault;

// =============================================================================
// Re-exports
// =============================================================================

pub use archive::{ReceiptArchive, RECEIPTS_SLOT};
pub use error::{StoreError, StoreResult};
pub use gateway::RecordGateway;
pub use local::{LocalStore, RECORDS_SLOT};
pub use memory::MemoryGateway;
pub use records::RecordService;
pub use sqlite::{GatewayConfig, SqliteGateway};
pub use vault::Vault;
