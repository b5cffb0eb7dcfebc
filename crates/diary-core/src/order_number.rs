//! # Order Numbering
//!
//! Orders are numbered `ORD#1`, `ORD#2`, ... in creation order. The next
//! number is derived from the newest persisted sale line, so the sequence
//! survives restarts without a separate counter table.
//!
//! ```text
//!   newest Sold.order_no      next_order_number
//!   ───────────────────────   ─────────────────
//!   (none)                    ORD#1
//!   ORD#7                     ORD#8
//!   ORD#abc / "7" / ""        ORD#1
//! ```
//!
//! A malformed stored number restarts the sequence rather than blocking
//! sales.

use crate::ORDER_PREFIX;

/// Extracts the numeric part after the last `#`.
///
/// ## Example
/// ```rust
/// use diary_core::order_number::order_sequence;
///
/// assert_eq!(order_sequence("ORD#41"), Some(41));
/// assert_eq!(order_sequence("ORD#"), None);
/// assert_eq!(order_sequence("41"), None);
/// ```
pub fn order_sequence(order_no: &str) -> Option<u64> {
    let (_, suffix) = order_no.rsplit_once('#')?;
    suffix.trim().parse().ok()
}

/// Formats an order number from its sequence.
pub fn format_order_number(sequence: u64) -> String {
    format!("{}{}", ORDER_PREFIX, sequence)
}

/// Derives the next order number from the newest stored one.
///
/// Never fails: no stored number or an unparseable one yields `ORD#1`.
pub fn next_order_number(latest: Option<&str>) -> String {
    let next = latest
        .and_then(order_sequence)
        .and_then(|seq| seq.checked_add(1))
        .unwrap_or(1);
    format_order_number(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_order() {
        assert_eq!(next_order_number(None), "ORD#1");
    }

    #[test]
    fn test_increments_latest() {
        assert_eq!(next_order_number(Some("ORD#7")), "ORD#8");
        assert_eq!(next_order_number(Some("ORD#99")), "ORD#100");
    }

    #[test]
    fn test_malformed_restarts_sequence() {
        assert_eq!(next_order_number(Some("ORD#abc")), "ORD#1");
        assert_eq!(next_order_number(Some("7")), "ORD#1");
        assert_eq!(next_order_number(Some("")), "ORD#1");
        assert_eq!(next_order_number(Some("ORD#18446744073709551615")), "ORD#1");
    }

    #[test]
    fn test_uses_last_hash() {
        assert_eq!(order_sequence("A#B#12"), Some(12));
    }
}
