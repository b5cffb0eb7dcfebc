//! # Transaction Service
//!
//! Order numbering, cart lookups and the commit of a session.
//!
//! ## Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  commit(&mut session)                                                   │
//! │    │                                                                    │
//! │    ├── no lines? ───────────────────────────► EmptyCart, store untouched│
//! │    │                                                                    │
//! │    ├── take commit lock                                                 │
//! │    ├── BEGIN                                                            │
//! │    │    ├── order_no = latest order + 1   (seen inside the tx)          │
//! │    │    ├── deduct each line ── short? ──► ROLLBACK, InsufficientStock  │
//! │    │    ├── insert sale lines stamped order_no                          │
//! │    │    └── nothing written? ────────────► ROLLBACK, PersistenceFailure │
//! │    ├── COMMIT                                                           │
//! │    └── session: Committed → renewed Empty with the next number          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::Engine;
use diary_core::order_number::next_order_number;
use diary_core::validation::validate_item_name;
use diary_core::{
    CartLine, CommitReceipt, CoreError, Item, LineInput, Money, TransactionSession,
};

/// The sales page form, as typed.
///
/// `original_price` left empty is filled with the item's latest unit cost.
#[derive(Debug, Clone, Deserialize)]
pub struct LineForm {
    pub item_name: String,
    pub unit_of_measurement: String,
    pub quantity: String,
    pub price: String,
    #[serde(default)]
    pub original_price: Option<String>,
    pub customer_name: String,
    pub date_ordered: NaiveDate,
    pub date_delivered: NaiveDate,
}

impl Engine {
    /// Next order number from the newest stored sale line.
    ///
    /// Never fails: a store error is logged and yields `ORD#1`.
    pub async fn next_order_number(&self) -> String {
        match self.db.solds().latest_order_no().await {
            Ok(latest) => next_order_number(latest.as_deref()),
            Err(e) => {
                warn!(error = %e, "Could not read latest order number, starting at ORD#1");
                next_order_number(None)
            }
        }
    }

    /// Opens an empty session carrying the provisional next order number.
    pub async fn start_session(&self) -> TransactionSession {
        let session = TransactionSession::new(self.next_order_number().await);
        debug!(session_id = %session.session_id(), order_no = %session.order_no(), "Session started");
        session
    }

    /// Units an item name is stocked in. Empty when the name is unknown.
    pub async fn units_for(&self, item_name: &str) -> EngineResult<Vec<String>> {
        let items = self.db.items().get_with_name(item_name).await?;
        Ok(items.into_iter().map(|item| item.unit_of_measurement).collect())
    }

    /// The active item for a (name, unit) pair.
    pub async fn resolve_item(&self, item_name: &str, unit: &str) -> EngineResult<Item> {
        validate_item_name(item_name)?;

        self.db
            .items()
            .get_with_name_and_unit(item_name, unit)
            .await?
            .ok_or_else(|| CoreError::ItemNotFound(format!("{} ({})", item_name.trim(), unit.trim())).into())
    }

    /// Unit price of the item's most recent purchase.
    pub async fn latest_unit_cost(&self, item_id: i64) -> EngineResult<Option<Money>> {
        Ok(self.db.stocks().latest_unit_cost(item_id).await?)
    }

    /// Adds a line for the (name, unit) item, dated against today.
    pub async fn add_line(
        &self,
        session: &mut TransactionSession,
        item_name: &str,
        unit: &str,
        input: LineInput,
    ) -> EngineResult<CartLine> {
        self.add_line_on(session, item_name, unit, input, crate::today()).await
    }

    /// Adds a line, deciding ORDERED or DELIVERED against `today`.
    pub async fn add_line_on(
        &self,
        session: &mut TransactionSession,
        item_name: &str,
        unit: &str,
        input: LineInput,
        today: NaiveDate,
    ) -> EngineResult<CartLine> {
        let item = self.resolve_item(item_name, unit).await?;
        push_line(session, &item, input, today)
    }

    /// Parses the form and adds its line. Bad text leaves the cart as it was.
    pub async fn add_line_from_input(
        &self,
        session: &mut TransactionSession,
        form: &LineForm,
    ) -> EngineResult<CartLine> {
        let item = self
            .resolve_item(&form.item_name, &form.unit_of_measurement)
            .await?;

        let original_price = match form.original_price.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => self
                .latest_unit_cost(item.id)
                .await?
                .unwrap_or_else(Money::zero)
                .to_string(),
        };

        let input = LineInput::from_text(
            &form.quantity,
            &form.price,
            &original_price,
            &form.customer_name,
            form.date_ordered,
            form.date_delivered,
        )?;

        push_line(session, &item, input, crate::today())
    }

    /// Removes the line for `item_id`.
    pub fn remove_line(
        &self,
        session: &mut TransactionSession,
        item_id: i64,
    ) -> EngineResult<CartLine> {
        Ok(session.remove_line(item_id)?)
    }

    /// Persists the session as one order.
    ///
    /// On success the session is renewed for the next order and the receipt
    /// names the number actually stamped. On failure the session and the
    /// store are unchanged.
    pub async fn commit(&self, session: &mut TransactionSession) -> EngineResult<CommitReceipt> {
        // EmptyCart / SessionClosed before touching the store.
        session.drafts(session.order_no())?;

        let _guard = self.commit_lock.lock().await;
        let mut uow = self.db.begin().await?;

        let latest = uow.solds().latest_order_no().await?;
        let order_no = next_order_number(latest.as_deref());
        if order_no != session.order_no() {
            debug!(provisional = %session.order_no(), stamped = %order_no, "Order number moved on");
        }

        for line in session.lines() {
            if !uow.items().deduct(line.item_id, line.quantity).await? {
                let item = uow.items().get(line.item_id).await?;
                uow.rollback().await?;
                return Err(shortfall(line, item));
            }
        }

        let drafts = session.drafts(&order_no)?;
        uow.solds().add_range(&drafts).await?;

        if uow.affected() == 0 {
            uow.rollback().await?;
            return Err(EngineError::update_failed("order"));
        }
        let affected = uow.complete().await?;

        let receipt = session.mark_committed(order_no);
        info!(
            order_no = %receipt.order_no,
            lines = receipt.line_count,
            affected,
            net = %Money::from_cents(receipt.net_amount_cents),
            "Order committed"
        );

        session.renew(next_order_number(Some(&receipt.order_no)));
        Ok(receipt)
    }

    /// Drops the cart without persisting anything.
    pub fn abandon(&self, session: &mut TransactionSession) -> EngineResult<()> {
        session.abandon()?;
        debug!(session_id = %session.session_id(), "Session abandoned");
        Ok(())
    }
}

fn push_line(
    session: &mut TransactionSession,
    item: &Item,
    input: LineInput,
    today: NaiveDate,
) -> EngineResult<CartLine> {
    let line = session.add_line(item, input, today)?.clone();

    debug!(
        order_no = %session.order_no(),
        item = %item.label(),
        total = %line.total_price(),
        "Line added"
    );
    Ok(line)
}

/// Error for a line whose deduction was refused.
fn shortfall(line: &CartLine, item: Option<Item>) -> EngineError {
    match item {
        Some(item) if item.active => CoreError::InsufficientStock {
            item: item.label(),
            available: item.quantity,
            requested: line.quantity,
        }
        .into(),
        _ => CoreError::ItemNotFound(format!("{} ({})", line.item_name, line.unit_of_measurement))
            .into(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
