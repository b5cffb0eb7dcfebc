//! # Order Lookup
//!
//! Shows a stored order and deletes one. Deleting an order removes its sale
//! lines only; stock taken at commit is not put back.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::Engine;
use diary_core::{Money, OrderLine, SoldStatus};

/// One order as shown on the order details page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetails {
    pub order_no: String,
    pub customer_name: String,
    pub date_ordered: NaiveDate,
    pub date_delivered: NaiveDate,
    pub status: SoldStatus,
    pub lines: Vec<OrderLine>,
    pub net_amount_cents: i64,
    pub net_profit_cents: i64,
}

impl Engine {
    /// The order stamped `order_no`, or `None` when it has no lines.
    pub async fn order_details(&self, order_no: &str) -> EngineResult<Option<OrderDetails>> {
        let order_no = order_no.trim();
        let solds = self.db.solds().get_with_order_no(order_no).await?;
        let Some(first) = solds.first() else {
            return Ok(None);
        };

        let lines = self.db.solds().order_lines(order_no).await?;
        let net_amount: Money = solds.iter().map(|s| s.total_price()).sum();
        let net_profit: Money = solds.iter().map(|s| s.profit()).sum();

        Ok(Some(OrderDetails {
            order_no: first.order_no.clone(),
            customer_name: first.customer_name.clone(),
            date_ordered: first.date_ordered,
            date_delivered: first.date_delivered,
            status: first.status,
            lines,
            net_amount_cents: net_amount.cents(),
            net_profit_cents: net_profit.cents(),
        }))
    }

    /// Every stored order number, newest first.
    pub async fn order_numbers(&self) -> EngineResult<Vec<String>> {
        Ok(self.db.solds().order_numbers().await?)
    }

    /// Deletes every line of an order in one transaction.
    ///
    /// ## Returns
    /// The number of lines removed.
    pub async fn delete_order(&self, order_no: &str) -> EngineResult<u64> {
        let order_no = order_no.trim();
        let solds = self.db.solds().get_with_order_no(order_no).await?;
        if solds.is_empty() {
            return Err(EngineError::not_found("Order", order_no));
        }

        let mut uow = self.db.begin().await?;
        let removed = uow.solds().remove_range(&solds).await?;
        if removed == 0 {
            uow.rollback().await?;
            return Err(EngineError::update_failed("order deletion"));
        }
        uow.complete().await?;

        info!(order_no = %order_no, removed, "Order deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{date, engine, stock_item};
    use crate::ErrorCode;
    use diary_core::{LineInput, Money};

    #[tokio::test]
    async fn test_order_details_and_delete() {
        let engine = engine().await;
        let rice = stock_item(&engine, "Rice", "kg", 10, 500).await;
        stock_item(&engine, "Eggs", "tray", 5, 2000).await;

        let mut session = engine.start_session().await;
        for (name, unit, qty, price, cost) in [("Rice", "kg", 2, 700, 500), ("Eggs", "tray", 1, 2300, 2000)] {
            let input = LineInput {
                quantity: qty,
                price: Money::from_cents(price),
                original_price: Money::from_cents(cost),
                customer_name: "Dan".to_string(),
                date_ordered: date(2024, 7, 1),
                date_delivered: date(2024, 7, 3),
            };
            engine.add_line(&mut session, name, unit, input).await.unwrap();
        }
        let receipt = engine.commit(&mut session).await.unwrap();

        let details = engine.order_details(&receipt.order_no).await.unwrap().unwrap();
        assert_eq!(details.customer_name, "Dan");
        assert_eq!(details.lines.len(), 2);
        assert_eq!(details.lines[0].item_name, "Rice");
        assert_eq!(details.net_amount_cents, 3700);
        assert_eq!(details.net_profit_cents, 700);
        assert_eq!(engine.order_numbers().await.unwrap(), vec![receipt.order_no.clone()]);

        assert_eq!(engine.delete_order(&receipt.order_no).await.unwrap(), 2);
        assert!(engine.order_details(&receipt.order_no).await.unwrap().is_none());

        // Stock stays deducted.
        let item = engine.database().items().get(rice).await.unwrap().unwrap();
        assert_eq!(item.quantity, 8);
    }

    #[tokio::test]
    async fn test_delete_missing_order() {
        let engine = engine().await;
        let err = engine.delete_order("ORD#404").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
