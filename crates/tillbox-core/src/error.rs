//! # Error Types
//!
//! Domain-specific error types for tillbox-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Error Types                             │
//! │                                                                 │
//! │  tillbox-core errors (this file)                                │
//! │  ├── CoreError        - Business rule violations                │
//! │  └── ValidationError  - Input validation failures               │
//! │                                                                 │
//! │  tillbox-store errors (separate crate)                          │
//! │  └── StoreError       - Vault and gateway failures              │
//! │                                                                 │
//! │  Flow: ValidationError → CoreError → StoreError → CLI notice    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impls)
//! 2. Include context in error messages (field name, id, etc.)
//! 3. Errors are enum variants, never bare strings
//! 4. Each variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Reported to the user as a warning or error notice; the triggering
/// operation aborts before any store mutation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Receipt generation was requested with zero selected records.
    ///
    /// ## When This Occurs
    /// - The user generated a receipt without ticking any record
    ///
    /// An empty selection is a user-facing validation failure, never a
    /// computed empty receipt.
    #[error("select at least one record for the receipt")]
    EmptyReceipt,

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. Used for early
/// validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// A monetary value may not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::EmptyReceipt.to_string(),
            "select at least one record for the receipt"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Negative {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
