//! # Validation Module
//!
//! Parsing and field rules for what the user types into the diary.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI text fields                                               │
//! │  └── "3", "12.50", "Ana Reyes"                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Text → i64 quantity / Money                                       │
//! │  └── Required and length rules                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Session / services                                           │
//! │  └── Duplicate lines, header lock, stock checks                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: SQLite                                                        │
//! │  └── NOT NULL, CHECK (quantity >= 0), foreign keys                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use diary_core::validation::{parse_money, parse_quantity};
//!
//! assert_eq!(parse_quantity("3").unwrap(), 3);
//! assert_eq!(parse_money("price", "12.5").unwrap().cents(), 1250);
//! assert!(parse_money("price", "12,50").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_FILTER_LEN: usize = 100;

// =============================================================================
// Numeric Parsers
// =============================================================================

/// Parses a line quantity.
///
/// ## Rules
/// - Whole number, surrounding whitespace ignored
/// - Greater than zero
/// - At most [`MAX_LINE_QUANTITY`]
pub fn parse_quantity(text: &str) -> ValidationResult<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::Required {
            field: "quantity".to_string(),
        });
    }

    let qty: i64 = text.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: format!("'{}' is not a whole number", text),
    })?;

    validate_quantity(qty)?;
    Ok(qty)
}

/// Validates an already-typed line quantity.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Parses a decimal amount ("12", "12.5", "12.50") into [`Money`].
///
/// ## Rules
/// - Digits with an optional `.` and at most two decimals
/// - No sign: prices and costs are never negative
pub fn parse_money(field: &str, text: &str) -> ValidationResult<Money> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if text.starts_with('-') {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let (major, minor) = match text.split_once('.') {
        Some((major, minor)) => (major, minor),
        None => (text, ""),
    };

    if major.is_empty() && minor.is_empty() {
        return Err(invalid("no digits"));
    }
    if !major.chars().all(|c| c.is_ascii_digit()) || !minor.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected digits with an optional decimal point"));
    }
    if minor.len() > 2 {
        return Err(invalid("at most two decimals"));
    }

    let major: i64 = if major.is_empty() {
        0
    } else {
        major.parse().map_err(|_| invalid("amount too large"))?
    };
    let minor: i64 = match minor.len() {
        0 => 0,
        1 => minor.parse::<i64>().map_err(|_| invalid("bad decimals"))? * 10,
        _ => minor.parse().map_err(|_| invalid("bad decimals"))?,
    };

    major
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(minor))
        .map(Money::from_cents)
        .ok_or_else(|| invalid("amount too large"))
}

/// Validates a typed amount is not negative.
pub fn validate_price(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

fn validate_required_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates the customer an order is for.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_required_name("customer", name)
}

/// Validates a supplier's full name. Only the name is mandatory when
/// registering a supplier.
pub fn validate_supplier_name(name: &str) -> ValidationResult<()> {
    validate_required_name("full name", name)
}

/// Validates the item name typed on the sales page.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_required_name("item", name)
}

/// Validates a list filter.
///
/// ## Returns
/// The trimmed filter; empty means "no filter".
pub fn validate_name_filter(filter: &str) -> ValidationResult<String> {
    let filter = filter.trim();

    if filter.chars().count() > MAX_FILTER_LEN {
        return Err(ValidationError::TooLong {
            field: "filter".to_string(),
            max: MAX_FILTER_LEN,
        });
    }

    Ok(filter.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
