//! # Delivery Rules
//!
//! Date rules shared by the transaction session (initial status of a line)
//! and the delivery sweep (ORDERED → DELIVERED).

use chrono::NaiveDate;

use crate::types::{Sold, SoldStatus};

/// Status a new line gets from its delivery date.
///
/// Only a delivery strictly after today is still pending.
pub fn status_for_delivery(date_delivered: NaiveDate, today: NaiveDate) -> SoldStatus {
    if date_delivered > today {
        SoldStatus::Ordered
    } else {
        SoldStatus::Delivered
    }
}

/// Whether a stored line should be flipped by the sweep.
#[inline]
pub fn is_due(sold: &Sold, today: NaiveDate) -> bool {
    sold.status == SoldStatus::Ordered && sold.date_delivered <= today
}

/// Lines the sweep should flip, in input order.
pub fn due_for_delivery(solds: Vec<Sold>, today: NaiveDate) -> Vec<Sold> {
    solds
        .into_iter()
        .filter(|sold| is_due(sold, today))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sold(id: i64, delivered: NaiveDate, status: SoldStatus) -> Sold {
        Sold {
            id,
            item_id: 1,
            order_no: "ORD#1".to_string(),
            customer_name: "Ana".to_string(),
            date_ordered: date(2024, 1, 1),
            date_delivered: delivered,
            quantity: 1,
            total_price_cents: 100,
            profit_cents: 10,
            status,
        }
    }

    #[test]
    fn test_status_for_delivery() {
        let today = date(2024, 3, 10);
        assert_eq!(status_for_delivery(date(2024, 3, 11), today), SoldStatus::Ordered);
        assert_eq!(status_for_delivery(today, today), SoldStatus::Delivered);
        assert_eq!(status_for_delivery(date(2024, 3, 1), today), SoldStatus::Delivered);
    }

    #[test]
    fn test_due_for_delivery() {
        let today = date(2024, 3, 10);
        let lines = vec![
            sold(1, date(2024, 3, 9), SoldStatus::Ordered),
            sold(2, date(2024, 3, 10), SoldStatus::Ordered),
            sold(3, date(2024, 3, 11), SoldStatus::Ordered),
            sold(4, date(2024, 3, 1), SoldStatus::Delivered),
        ];
        let ids: Vec<i64> = due_for_delivery(lines, today).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
