//! # tillbox-core: Pure Business Logic for tillbox
//!
//! This crate is the heart of tillbox. It contains all business logic as pure
//! functions and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       tillbox Architecture                          │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                      CLI (apps/cli)                           │  │
//! │  │     add ──► list ──► edit ──► receipt new ──► login           │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │                ★ tillbox-core (THIS CRATE) ★                  │  │
//! │  │                                                               │  │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌────────────┐      │  │
//! │  │   │  types  │  │  money  │  │ receipt │  │ validation │      │  │
//! │  │   │ Record  │  │  Money  │  │ Receipt │  │   rules    │      │  │
//! │  │   │  Mode   │  │  math   │  │  math   │  │  coercion  │      │  │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └────────────┘      │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS            │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │                 tillbox-store (Persistence)                   │  │
//! │  │         JSON vault (local) + SQLite gateway (remote)          │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ProductRecord, StorageMode, Notice, etc.)
//! - [`money`] - Money type with exact decimal arithmetic
//! - [`receipt`] - Receipt computation and plain-text rendering
//! - [`validation`] - Input validation and coercion rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: every function is deterministic; the clock is an
//!    argument, never an ambient read
//! 2. **No I/O**: database, network, and file system access are forbidden here
//! 3. **Exact money**: all monetary values are `rust_decimal` decimals;
//!    rounding happens only when formatting for display
//! 4. **Explicit errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use receipt::{build_receipt, render_text, LineSelection, Receipt, ReceiptItem, ReceiptRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sentinel owner identity for records that live in the local store.
///
/// ## Why a constant?
/// Offline records still carry an `owner_id` so the record shape is identical
/// in both storage scopes. The reconciler replaces this sentinel with the real
/// owner when records migrate to the remote store.
pub const LOCAL_OWNER_ID: &str = "local";

/// Prefix for generated receipt numbers ("RCP-" + millisecond timestamp).
pub const RECEIPT_NUMBER_PREFIX: &str = "RCP-";

/// Customer name used when the receipt form leaves it blank.
pub const DEFAULT_CUSTOMER_NAME: &str = "Walk-in Customer";

/// Business name used when no configuration provides one.
pub const DEFAULT_BUSINESS_NAME: &str = "Your Business";
