//! # Transaction Session
//!
//! One in-progress order on the sales page: its provisional order number,
//! the customer and dates it is locked to, and one line per item.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │             add_line                       commit (engine)              │
//! │   ┌───────┐ ─────────► ┌──────────────┐ ─────────────────► ┌─────────┐ │
//! │   │ Empty │            │ Accumulating │                    │Committed│ │
//! │   └───────┘ ◄───────── └──────────────┘                    └────┬────┘ │
//! │       ▲    last line          │ abandon                         │      │
//! │       │    removed            ▼                                 │      │
//! │       │               ┌───────────┐                             │      │
//! │       │               │ Abandoned │                             │      │
//! │       │               └─────┬─────┘                             │      │
//! │       └──────── renew ──────┴───────────── renew ───────────────┘      │
//! │                                                                         │
//! │  Customer and dates lock with the first line, unlock when empty.       │
//! │  Committed and Abandoned reject every mutation with SessionClosed.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is plain data owned by one caller. Every mutation takes
//! `&mut self`, so a second add or commit cannot start while one is running.
//! Persisting the order is the engine's job; this module only produces the
//! [`NewSold`] drafts and records the outcome.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::delivery::status_for_delivery;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Item, NewSold, SoldStatus};
use crate::validation::{
    parse_money, parse_quantity, validate_customer_name, validate_price, validate_quantity,
    ValidationResult,
};
use crate::{MAX_CART_LINES, MAX_LINE_AMOUNT_CENTS};

// =============================================================================
// Session State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SessionState {
    Empty,
    Accumulating,
    Committed,
    Abandoned,
}

impl SessionState {
    /// Whether lines can still be added, removed or committed.
    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self, SessionState::Empty | SessionState::Accumulating)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Empty => write!(f, "empty"),
            SessionState::Accumulating => write!(f, "accumulating"),
            SessionState::Committed => write!(f, "committed"),
            SessionState::Abandoned => write!(f, "abandoned"),
        }
    }
}

// =============================================================================
// Line Input
// =============================================================================

/// What the user entered for one line, already parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    pub quantity: i64,

    /// Selling price per unit.
    pub price: Money,

    /// Cost per unit, seeded from the latest purchase of the item.
    pub original_price: Money,

    pub customer_name: String,
    pub date_ordered: NaiveDate,
    pub date_delivered: NaiveDate,
}

impl LineInput {
    /// Builds a line from the raw text fields of the sales page.
    ///
    /// ## Errors
    /// Malformed quantity or amounts give a [`ValidationError`]; nothing is
    /// partially applied.
    pub fn from_text(
        quantity: &str,
        price: &str,
        original_price: &str,
        customer_name: &str,
        date_ordered: NaiveDate,
        date_delivered: NaiveDate,
    ) -> ValidationResult<Self> {
        Ok(LineInput {
            quantity: parse_quantity(quantity)?,
            price: parse_money("price", price)?,
            original_price: parse_money("original price", original_price)?,
            customer_name: customer_name.trim().to_string(),
            date_ordered,
            date_delivered,
        })
    }

    fn validate(&self) -> ValidationResult<()> {
        validate_quantity(self.quantity)?;
        validate_price("price", self.price)?;
        validate_price("original price", self.original_price)?;
        validate_customer_name(&self.customer_name)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One item of the current order, with its computed totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub item_id: i64,
    pub item_name: String,
    pub unit_of_measurement: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub original_price_cents: i64,

    /// `price * quantity`
    pub total_price_cents: i64,

    /// `(price - original_price) * quantity`
    pub profit_cents: i64,

    pub status: SoldStatus,

    /// "12.50 (3 kg)"
    pub price_label: String,
}

impl CartLine {
    /// Builds the line for validated input.
    ///
    /// ## Errors
    /// [`ValidationError::OutOfRange`] when the total or profit exceeds
    /// [`MAX_LINE_AMOUNT_CENTS`].
    fn new(item: &Item, input: &LineInput, today: NaiveDate) -> ValidationResult<Self> {
        // Both prices are non-negative here, so the difference cannot overflow.
        let total = line_amount("line total", input.price, input.quantity)?;
        let profit = line_amount(
            "line profit",
            input.price - input.original_price,
            input.quantity,
        )?;

        Ok(CartLine {
            item_id: item.id,
            item_name: item.name.clone(),
            unit_of_measurement: item.unit_of_measurement.clone(),
            quantity: input.quantity,
            price_cents: input.price.cents(),
            original_price_cents: input.original_price.cents(),
            total_price_cents: total.cents(),
            profit_cents: profit.cents(),
            status: status_for_delivery(input.date_delivered, today),
            price_label: format!(
                "{} ({} {})",
                input.price, input.quantity, item.unit_of_measurement
            ),
        })
    }

    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }

    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents(self.profit_cents)
    }
}

fn line_amount(field: &str, per_unit: Money, quantity: i64) -> ValidationResult<Money> {
    per_unit
        .checked_mul_quantity(quantity)
        .filter(|amount| amount.cents().unsigned_abs() <= MAX_LINE_AMOUNT_CENTS as u64)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: field.to_string(),
            min: -MAX_LINE_AMOUNT_CENTS,
            max: MAX_LINE_AMOUNT_CENTS,
        })
}

// =============================================================================
// Order Header
// =============================================================================

/// Customer and dates shared by every line of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHeader {
    pub customer_name: String,
    pub date_ordered: NaiveDate,
    pub date_delivered: NaiveDate,
}

impl OrderHeader {
    fn from_input(input: &LineInput) -> Self {
        OrderHeader {
            customer_name: input.customer_name.clone(),
            date_ordered: input.date_ordered,
            date_delivered: input.date_delivered,
        }
    }

    fn check(&self, input: &LineInput) -> ValidationResult<()> {
        let locked = |field: &str, value: String| ValidationError::HeaderLocked {
            field: field.to_string(),
            locked: value,
        };

        if self.customer_name != input.customer_name {
            return Err(locked("customer", self.customer_name.clone()));
        }
        if self.date_ordered != input.date_ordered {
            return Err(locked("order date", self.date_ordered.to_string()));
        }
        if self.date_delivered != input.date_delivered {
            return Err(locked("delivery date", self.date_delivered.to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// Commit Receipt
// =============================================================================

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommitReceipt {
    /// The number actually stamped on the persisted lines.
    pub order_no: String,
    pub line_count: usize,
    pub net_amount_cents: i64,
    pub net_profit_cents: i64,
}

/// Read-only view of a session for the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub order_no: String,
    pub state: SessionState,
    pub header: Option<OrderHeader>,
    pub lines: Vec<CartLine>,
    pub net_amount_cents: i64,
    pub net_profit_cents: i64,
}

// =============================================================================
// Transaction Session
// =============================================================================

/// The in-progress order.
///
/// ## Invariants
/// - At most one line per item id
/// - Every line shares the locked header
/// - `net_amount` / `net_profit` are sums over the current lines
#[derive(Debug, Clone)]
pub struct TransactionSession {
    session_id: Uuid,
    order_no: String,
    state: SessionState,
    header: Option<OrderHeader>,
    lines: Vec<CartLine>,
}

impl TransactionSession {
    /// Starts an empty session with a provisional order number.
    pub fn new(order_no: impl Into<String>) -> Self {
        TransactionSession {
            session_id: Uuid::new_v4(),
            order_no: order_no.into(),
            state: SessionState::Empty,
            header: None,
            lines: Vec::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Provisional order number shown while the cart is built.
    pub fn order_no(&self) -> &str {
        &self.order_no
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn header(&self) -> Option<&OrderHeader> {
        self.header.as_ref()
    }

    /// Whether customer and dates are locked by existing lines.
    pub fn is_header_locked(&self) -> bool {
        self.header.is_some()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn contains_item(&self, item_id: i64) -> bool {
        self.lines.iter().any(|line| line.item_id == item_id)
    }

    /// Sum of line totals.
    pub fn net_amount(&self) -> Money {
        self.lines.iter().map(CartLine::total_price).sum()
    }

    /// Sum of line profits.
    pub fn net_profit(&self) -> Money {
        self.lines.iter().map(CartLine::profit).sum()
    }

    /// Adds one line for `item`.
    ///
    /// ## Errors
    /// - [`CoreError::SessionClosed`] after commit or abandon
    /// - [`CoreError::ItemNotFound`] when the item is inactive
    /// - [`CoreError::Validation`] for bad amounts or a header mismatch
    /// - [`CoreError::DuplicateLine`] when the item is already in the cart
    ///
    /// On any error the session is unchanged.
    pub fn add_line(
        &mut self,
        item: &Item,
        input: LineInput,
        today: NaiveDate,
    ) -> CoreResult<&CartLine> {
        self.ensure_open()?;

        if !item.active {
            return Err(CoreError::ItemNotFound(item.label()));
        }

        input.validate()?;

        if let Some(header) = &self.header {
            header.check(&input)?;
        }

        if self.contains_item(item.id) {
            return Err(CoreError::DuplicateLine(item.name.clone()));
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        let line = CartLine::new(item, &input, today)?;

        if self.header.is_none() {
            self.header = Some(OrderHeader::from_input(&input));
        }
        self.lines.push(line);
        self.state = SessionState::Accumulating;

        let index = self.lines.len() - 1;
        Ok(&self.lines[index])
    }

    /// Removes the line for `item_id`. The header unlocks once the cart is
    /// empty.
    pub fn remove_line(&mut self, item_id: i64) -> CoreResult<CartLine> {
        self.ensure_open()?;

        let position = self
            .lines
            .iter()
            .position(|line| line.item_id == item_id)
            .ok_or(CoreError::LineNotFound(item_id))?;

        let removed = self.lines.remove(position);

        if self.lines.is_empty() {
            self.header = None;
            self.state = SessionState::Empty;
        }

        Ok(removed)
    }

    /// Drafts to persist, stamped with `order_no`.
    ///
    /// ## Errors
    /// [`CoreError::EmptyCart`] when there is nothing to commit.
    pub fn drafts(&self, order_no: &str) -> CoreResult<Vec<NewSold>> {
        self.ensure_open()?;

        let header = match (&self.header, self.lines.is_empty()) {
            (Some(header), false) => header,
            _ => return Err(CoreError::EmptyCart),
        };

        Ok(self
            .lines
            .iter()
            .map(|line| NewSold {
                item_id: line.item_id,
                order_no: order_no.to_string(),
                customer_name: header.customer_name.clone(),
                date_ordered: header.date_ordered,
                date_delivered: header.date_delivered,
                quantity: line.quantity,
                total_price_cents: line.total_price_cents,
                profit_cents: line.profit_cents,
                status: line.status,
            })
            .collect())
    }

    /// Records a persisted commit and clears the cart.
    pub fn mark_committed(&mut self, order_no: impl Into<String>) -> CommitReceipt {
        let order_no = order_no.into();
        let receipt = CommitReceipt {
            order_no: order_no.clone(),
            line_count: self.lines.len(),
            net_amount_cents: self.net_amount().cents(),
            net_profit_cents: self.net_profit().cents(),
        };

        self.order_no = order_no;
        self.lines.clear();
        self.header = None;
        self.state = SessionState::Committed;
        receipt
    }

    /// Discards the cart without persisting anything.
    pub fn abandon(&mut self) -> CoreResult<()> {
        self.ensure_open()?;
        self.lines.clear();
        self.header = None;
        self.state = SessionState::Abandoned;
        Ok(())
    }

    /// Reopens the session for a new order.
    pub fn renew(&mut self, order_no: impl Into<String>) {
        self.session_id = Uuid::new_v4();
        self.order_no = order_no.into();
        self.lines.clear();
        self.header = None;
        self.state = SessionState::Empty;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            order_no: self.order_no.clone(),
            state: self.state,
            header: self.header.clone(),
            lines: self.lines.clone(),
            net_amount_cents: self.net_amount().cents(),
            net_profit_cents: self.net_profit().cents(),
        }
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.state.is_open() {
            Ok(())
        } else {
            Err(CoreError::SessionClosed {
                session_id: self.session_id.to_string(),
                state: self.state.to_string(),
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_LINE_QUANTITY;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 5, 10)
    }

    fn item(id: i64, name: &str) -> Item {
        Item {
            id,
            name: name.to_string(),
            unit_of_measurement: "kg".to_string(),
            quantity: 50,
            critical: 5,
            active: true,
        }
    }

    fn input(qty: i64, price: i64, cost: i64) -> LineInput {
        LineInput {
            quantity: qty,
            price: Money::from_cents(price),
            original_price: Money::from_cents(cost),
            customer_name: "Ana".to_string(),
            date_ordered: date(2024, 5, 10),
            date_delivered: date(2024, 5, 12),
        }
    }

    fn assert_totals_match_lines(session: &TransactionSession) {
        let amount: i64 = session.lines().iter().map(|l| l.total_price_cents).sum();
        let profit: i64 = session.lines().iter().map(|l| l.profit_cents).sum();
        assert_eq!(session.net_amount().cents(), amount);
        assert_eq!(session.net_profit().cents(), profit);
    }

    #[test]
    fn test_add_line_computes_totals() {
        let mut session = TransactionSession::new("ORD#1");
        let line = session
            .add_line(&item(1, "Rice"), input(3, 1250, 1000), today())
            .unwrap();

        assert_eq!(line.total_price_cents, 3750);
        assert_eq!(line.profit_cents, 750);
        assert_eq!(line.status, SoldStatus::Ordered);
        assert_eq!(line.price_label, "12.50 (3 kg)");
        assert_eq!(session.state(), SessionState::Accumulating);
        assert!(session.is_header_locked());
    }

    #[test]
    fn test_delivery_today_is_delivered() {
        let mut session = TransactionSession::new("ORD#1");
        let mut line = input(1, 100, 50);
        line.date_delivered = today();
        let added = session.add_line(&item(1, "Rice"), line, today()).unwrap();
        assert_eq!(added.status, SoldStatus::Delivered);
    }

    #[test]
    fn test_totals_follow_every_change() {
        let mut session = TransactionSession::new("ORD#1");
        session.add_line(&item(1, "Rice"), input(3, 1250, 1000), today()).unwrap();
        assert_totals_match_lines(&session);
        session.add_line(&item(2, "Beans"), input(2, 500, 600), today()).unwrap();
        assert_totals_match_lines(&session);
        assert_eq!(session.net_amount().cents(), 4750);
        assert_eq!(session.net_profit().cents(), 550);

        session.remove_line(1).unwrap();
        assert_totals_match_lines(&session);
        assert_eq!(session.net_amount().cents(), 1000);
        assert_eq!(session.net_profit().cents(), -200);
    }

    #[test]
    fn test_duplicate_line_leaves_cart_unchanged() {
        let mut session = TransactionSession::new("ORD#1");
        session.add_line(&item(1, "Rice"), input(3, 1250, 1000), today()).unwrap();
        let before = session.lines().to_vec();

        let err = session
            .add_line(&item(1, "Rice"), input(9, 999, 1), today())
            .unwrap_err();

        assert!(matches!(err, CoreError::DuplicateLine(ref name) if name == "Rice"));
        assert_eq!(err.to_string(), "Rice already in the cart");
        assert_eq!(session.lines(), before.as_slice());
    }

    #[test]
    fn test_inactive_item_is_not_found() {
        let mut session = TransactionSession::new("ORD#1");
        let mut retired = item(1, "Rice");
        retired.active = false;
        let err = session.add_line(&retired, input(1, 100, 50), today()).unwrap_err();
        assert!(matches!(err, CoreError::ItemNotFound(_)));
        assert!(session.is_empty());
    }

    #[test]
    fn test_header_locks_and_unlocks() {
        let mut session = TransactionSession::new("ORD#1");
        session.add_line(&item(1, "Rice"), input(1, 100, 50), today()).unwrap();

        let mut other_customer = input(1, 100, 50);
        other_customer.customer_name = "Ben".to_string();
        let err = session
            .add_line(&item(2, "Beans"), other_customer.clone(), today())
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::HeaderLocked { .. })
        ));

        session.remove_line(1).unwrap();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(!session.is_header_locked());
        session.add_line(&item(2, "Beans"), other_customer, today()).unwrap();
        assert_eq!(session.header().unwrap().customer_name, "Ben");
    }

    #[test]
    fn test_invalid_input_rejected() {
        let mut session = TransactionSession::new("ORD#1");
        assert!(session.add_line(&item(1, "Rice"), input(0, 100, 50), today()).is_err());
        assert!(session.add_line(&item(1, "Rice"), input(1, -1, 50), today()).is_err());
        let mut nameless = input(1, 100, 50);
        nameless.customer_name = String::new();
        assert!(session.add_line(&item(1, "Rice"), nameless, today()).is_err());
        assert!(session.is_empty());
    }

    #[test]
    fn test_line_amount_overflow_rejected() {
        let mut session = TransactionSession::new("ORD#1");
        let huge = LineInput::from_text("2", "50000000000000000", "0", "Ana", today(), today())
            .unwrap();

        let err = session.add_line(&item(1, "Rice"), huge, today()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));
        assert!(session.is_empty());
        assert!(!session.is_header_locked());
        assert_eq!(session.state(), SessionState::Empty);

        // Largest accepted line still leaves room for a full cart.
        let max_price = MAX_LINE_AMOUNT_CENTS / MAX_LINE_QUANTITY;
        session
            .add_line(&item(1, "Rice"), input(MAX_LINE_QUANTITY, max_price, 0), today())
            .unwrap();
        let over = input(MAX_LINE_QUANTITY, max_price + 1, 0);
        assert!(session.add_line(&item(2, "Beans"), over, today()).is_err());
        assert_eq!(session.lines().len(), 1);
    }

    #[test]
    fn test_snapshot_mirrors_session() {
        let mut session = TransactionSession::new("ORD#4");
        session.add_line(&item(1, "Rice"), input(3, 1250, 1000), today()).unwrap();
        session.add_line(&item(2, "Beans"), input(2, 500, 400), today()).unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.session_id, session.session_id());
        assert_eq!(snapshot.order_no, "ORD#4");
        assert_eq!(snapshot.state, SessionState::Accumulating);
        assert_eq!(snapshot.header.as_ref().unwrap().customer_name, "Ana");
        assert_eq!(snapshot.lines.len(), 2);
        assert_eq!(snapshot.net_amount_cents, 4750);
        assert_eq!(snapshot.net_profit_cents, 950);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"], "accumulating");
        assert_eq!(json["lines"][1]["item_name"], "Beans");

        session.abandon().unwrap();
        let closed = session.snapshot();
        assert_eq!(closed.state, SessionState::Abandoned);
        assert!(closed.lines.is_empty());
        assert!(closed.header.is_none());
        assert_eq!(closed.net_amount_cents, 0);
    }

    #[test]
    fn test_line_input_from_text() {
        let parsed = LineInput::from_text(" 2 ", "3.5", "2", " Ana ", today(), today()).unwrap();
        assert_eq!(parsed.quantity, 2);
        assert_eq!(parsed.price.cents(), 350);
        assert_eq!(parsed.original_price.cents(), 200);
        assert_eq!(parsed.customer_name, "Ana");

        assert!(LineInput::from_text("two", "3.5", "2", "Ana", today(), today()).is_err());
        assert!(LineInput::from_text("2", "3,5", "2", "Ana", today(), today()).is_err());
    }

    #[test]
    fn test_remove_missing_line() {
        let mut session = TransactionSession::new("ORD#1");
        assert!(matches!(session.remove_line(7), Err(CoreError::LineNotFound(7))));
    }

    #[test]
    fn test_drafts_require_lines() {
        let session = TransactionSession::new("ORD#1");
        assert!(matches!(session.drafts("ORD#1"), Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_drafts_carry_header_and_stamp() {
        let mut session = TransactionSession::new("ORD#1");
        session.add_line(&item(1, "Rice"), input(3, 1250, 1000), today()).unwrap();
        session.add_line(&item(2, "Beans"), input(1, 500, 400), today()).unwrap();

        let drafts = session.drafts("ORD#9").unwrap();
        assert_eq!(drafts.len(), 2);
        assert!(drafts.iter().all(|d| d.order_no == "ORD#9"));
        assert!(drafts.iter().all(|d| d.customer_name == "Ana"));
        assert_eq!(drafts[0].total_price_cents, 3750);
    }

    #[test]
    fn test_commit_then_renew() {
        let mut session = TransactionSession::new("ORD#1");
        let first_id = session.session_id();
        session.add_line(&item(1, "Rice"), input(3, 1250, 1000), today()).unwrap();

        let receipt = session.mark_committed("ORD#2");
        assert_eq!(receipt.order_no, "ORD#2");
        assert_eq!(receipt.line_count, 1);
        assert_eq!(receipt.net_amount_cents, 3750);
        assert_eq!(session.state(), SessionState::Committed);
        assert!(session.is_empty());

        let err = session
            .add_line(&item(1, "Rice"), input(1, 100, 50), today())
            .unwrap_err();
        assert!(matches!(err, CoreError::SessionClosed { .. }));

        session.renew("ORD#3");
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.order_no(), "ORD#3");
        assert_ne!(session.session_id(), first_id);
    }

    #[test]
    fn test_abandon() {
        let mut session = TransactionSession::new("ORD#1");
        session.add_line(&item(1, "Rice"), input(1, 100, 50), today()).unwrap();
        session.abandon().unwrap();
        assert_eq!(session.state(), SessionState::Abandoned);
        assert!(session.is_empty());
        assert!(session.abandon().is_err());
        assert!(matches!(session.drafts("ORD#1"), Err(CoreError::SessionClosed { .. })));
    }
}
