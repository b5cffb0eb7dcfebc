//! # Engine Error Type
//!
//! The one error type callers of the engine see.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Mobile Diary                       │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Engine operation                                                │  │
//! │  │  Result<T, EngineError>                                          │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store error? ──── DbError::QueryFailed("...") ────┐            │  │
//! │  │         │                 logged, generic message  │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Rule broken? ──── CoreError::DuplicateLine ──── EngineError ──►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Serialized for the UI:                                                 │
//! │    { "code": "DUPLICATE_LINE", "message": "Rice already in the cart" }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error except `PersistenceFailure` is recoverable: the session and
//! the store are exactly as they were before the failing call.

use diary_core::CoreError;
use diary_db::DbError;
use serde::Serialize;

/// Error returned by every engine operation.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Rice (kg): available 2, requested 5"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct EngineError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for engine results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Item, cart line, order or supplier does not exist
    NotFound,

    /// The item already has a line in the cart
    DuplicateLine,

    /// Input rejected before any rule ran
    ValidationFailure,

    /// A commit would take an item below zero
    InsufficientStock,

    /// The session was committed or abandoned
    SessionClosed,

    /// The store failed or wrote nothing
    PersistenceFailure,

    /// A report session was cancelled
    Cancelled,
}

impl EngineError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        EngineError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        EngineError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::new(ErrorCode::ValidationFailure, message)
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        EngineError::new(ErrorCode::PersistenceFailure, message)
    }

    /// A save that reported zero affected rows.
    pub fn update_failed(what: &str) -> Self {
        EngineError::persistence(format!("Update failed: {} was not saved", what))
    }

    pub fn cancelled() -> Self {
        EngineError::new(ErrorCode::Cancelled, "Report generation was cancelled")
    }
}

/// Converts database errors to engine errors.
///
/// Store internals are logged and replaced with a generic message.
impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => EngineError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => EngineError::validation(format!(
                "{} '{}' already exists",
                field, value
            )),
            DbError::CheckViolation { message } => {
                tracing::error!("Check constraint failed: {}", message);
                EngineError::validation("Value rejected by the store")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                EngineError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                EngineError::persistence("Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                EngineError::persistence("Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                EngineError::persistence("Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                EngineError::persistence("Database transaction failed")
            }
            DbError::PoolExhausted => EngineError::persistence("Database pool exhausted"),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                EngineError::persistence("Database operation failed")
            }
        }
    }
}

/// Converts core errors to engine errors.
impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        let code = match err {
            CoreError::ItemNotFound(_)
            | CoreError::LineNotFound(_)
            | CoreError::SupplierNotFound(_) => ErrorCode::NotFound,
            CoreError::DuplicateLine(_) => ErrorCode::DuplicateLine,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::SessionClosed { .. } => ErrorCode::SessionClosed,
            CoreError::EmptyCart
            | CoreError::CartTooLarge { .. }
            | CoreError::DuplicateSupplier(_)
            | CoreError::Validation(_) => ErrorCode::ValidationFailure,
        };
        EngineError::new(code, message)
    }
}

impl From<diary_core::ValidationError> for EngineError {
    fn from(err: diary_core::ValidationError) -> Self {
        EngineError::validation(err.to_string())
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use diary_core::ValidationError;

    #[test]
    fn test_core_codes() {
        let dup: EngineError = CoreError::DuplicateLine("Rice".into()).into();
        assert_eq!(dup.code, ErrorCode::DuplicateLine);
        assert_eq!(dup.message, "Rice already in the cart");

        let empty: EngineError = CoreError::EmptyCart.into();
        assert_eq!(empty.code, ErrorCode::ValidationFailure);

        let invalid: EngineError = CoreError::Validation(ValidationError::MustBePositive {
            field: "quantity".into(),
        })
        .into();
        assert_eq!(invalid.code, ErrorCode::ValidationFailure);
    }

    #[test]
    fn test_db_internals_are_hidden() {
        let err: EngineError = DbError::QueryFailed("near \"SELEC\": syntax error".into()).into();
        assert_eq!(err.code, ErrorCode::PersistenceFailure);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_serialized_shape() {
        let err = EngineError::not_found("Order", "ORD#9");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Order not found: ORD#9");
    }
}
