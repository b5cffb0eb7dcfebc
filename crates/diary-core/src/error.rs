//! # Error Types
//!
//! Domain-specific error types for diary-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  diary-core errors (this file)                                         │
//! │  ├── CoreError        - Session and business rule failures             │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  diary-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  diary-engine errors                                                   │
//! │  └── EngineError      - What the UI sees (code + message)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError ← DbError             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is recoverable: the session or record it concerns is left
/// exactly as it was before the failing call.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No active item matches the requested name and unit.
    ///
    /// ## When This Occurs
    /// - Item name typed on the sales page does not exist
    /// - The unit does not belong to that item
    /// - The item was deactivated
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// The item already has a line in the current order.
    ///
    /// ## When This Occurs
    /// - Adding the same item twice to one cart. The user must remove the
    ///   first line to change its quantity or price.
    #[error("{0} already in the cart")]
    DuplicateLine(String),

    /// A line was referenced that the cart does not hold.
    #[error("No cart line for item {0}")]
    LineNotFound(i64),

    /// Commit was requested on a cart without lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// The session has been committed or abandoned.
    #[error("Session {session_id} is {state}, cannot perform operation")]
    SessionClosed { session_id: String, state: String },

    /// The cart reached its line limit.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// A deduction would take stock below zero.
    ///
    /// ## When This Occurs
    /// - Committing an order for more units than are on hand
    /// - Another order consumed the stock after this line was added
    #[error("Insufficient stock for {item}: available {available}, requested {requested}")]
    InsufficientStock {
        item: String,
        available: i64,
        requested: i64,
    },

    /// An active supplier already carries this full name.
    #[error("Supplier already exists: {0}")]
    DuplicateSupplier(String),

    /// Supplier cannot be found.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business rule runs, usually while parsing the text
/// fields of the sales page.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. "12,5" for a price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value differs from the one the order header is locked to.
    ///
    /// ## When This Occurs
    /// - A second line names another customer or other dates than the first
    #[error("{field} is locked to '{locked}' for this order")]
    HeaderLocked { field: String, locked: String },
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
        let err = CoreError::InsufficientStock {
            item: "Rice (kg)".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Rice (kg): available 3, requested 5"
        );

        let err = CoreError::DuplicateLine("Rice".to_string());
        assert_eq!(err.to_string(), "Rice already in the cart");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer".to_string(),
        };
        assert_eq!(err.to_string(), "customer is required");

        let err = ValidationError::HeaderLocked {
            field: "customer".to_string(),
            locked: "Ana".to_string(),
        };
        assert_eq!(err.to_string(), "customer is locked to 'Ana' for this order");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
