//! # Domain Types
//!
//! Records of the diary and the draft forms used to create them.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Supplier ──1:N──► Stock ◄──N:1── Item ──1:N──► Sold                   │
//! │   (who we buy       (purchase      (what we      (one line of an        │
//! │    from)             receipt)       carry)        order, by order_no)   │
//! │                                                                         │
//! │   Order = all Sold rows sharing one order_no                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identities are SQLite integer keys. Amounts are stored as `*_cents`
//! integers with [`Money`] accessors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Item
// =============================================================================

/// An article the shop stocks, in one unit of measurement.
///
/// The same name may exist in several units ("Rice" in kg and in sack);
/// each pair is its own Item with its own stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub unit_of_measurement: String,

    /// Units currently on hand. Never negative.
    pub quantity: i64,

    /// Reorder threshold.
    pub critical: i64,

    /// Inactive items cannot be sold.
    pub active: bool,
}

impl Item {
    /// "Rice (kg)", used in notices and error messages.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.unit_of_measurement)
    }

    /// Whether stock has fallen under the reorder threshold.
    #[inline]
    pub fn is_critical(&self) -> bool {
        self.critical > self.quantity
    }

    /// Whether `quantity` units can be taken without going negative.
    #[inline]
    pub fn can_deduct(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }
}

/// Fields for inserting an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub unit_of_measurement: String,
    pub quantity: i64,
    pub critical: i64,
}

// =============================================================================
// Stock
// =============================================================================

/// A purchase receipt line: units of an item bought from a supplier.
///
/// Immutable once written. Feeds the disbursement report and the latest
/// unit cost shown when an item is added to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Stock {
    pub id: i64,
    pub item_id: i64,
    pub supplier_id: i64,
    pub receipt_no: String,
    pub quantity: i64,
    pub price_per_unit_cents: i64,
    pub total_price_cents: i64,
    #[ts(as = "String")]
    pub date_ordered: NaiveDate,
}

impl Stock {
    #[inline]
    pub fn price_per_unit(&self) -> Money {
        Money::from_cents(self.price_per_unit_cents)
    }

    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// Fields for recording a purchase. The total is derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStock {
    pub item_id: i64,
    pub supplier_id: i64,
    pub receipt_no: String,
    pub quantity: i64,
    pub price_per_unit_cents: i64,
    pub date_ordered: NaiveDate,
}

impl NewStock {
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.price_per_unit_cents) * self.quantity
    }
}

// =============================================================================
// Sold Status
// =============================================================================

/// Delivery state of a sale line.
///
/// ## Lifecycle
/// ```text
///   delivery date > today          delivery date <= today
///   ┌─────────┐   sweep on or after delivery date   ┌───────────┐
///   │ ORDERED │ ──────────────────────────────────► │ DELIVERED │
///   └─────────┘                                     └───────────┘
///        ▲                                                ▲
///        └──── line added with future date               │
///                     line added with past/today date ───┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum SoldStatus {
    #[default]
    Ordered,
    Delivered,
}

impl SoldStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoldStatus::Ordered => "ORDERED",
            SoldStatus::Delivered => "DELIVERED",
        }
    }
}

impl std::fmt::Display for SoldStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sold
// =============================================================================

/// One persisted line of a committed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sold {
    pub id: i64,
    pub item_id: i64,
    pub order_no: String,
    pub customer_name: String,
    #[ts(as = "String")]
    pub date_ordered: NaiveDate,
    #[ts(as = "String")]
    pub date_delivered: NaiveDate,
    pub quantity: i64,
    pub total_price_cents: i64,
    pub profit_cents: i64,
    pub status: SoldStatus,
}

impl Sold {
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }

    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents(self.profit_cents)
    }
}

/// A sale line that has not been written yet.
///
/// Built by the transaction session; `order_no` is restamped at commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSold {
    pub item_id: i64,
    pub order_no: String,
    pub customer_name: String,
    #[ts(as = "String")]
    pub date_ordered: NaiveDate,
    #[ts(as = "String")]
    pub date_delivered: NaiveDate,
    pub quantity: i64,
    pub total_price_cents: i64,
    pub profit_cents: i64,
    pub status: SoldStatus,
}

impl NewSold {
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }

    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents(self.profit_cents)
    }
}

/// A sale line joined with the name of its item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderLine {
    pub id: i64,
    pub item_id: i64,
    pub item_name: String,
    pub unit_of_measurement: String,
    pub quantity: i64,
    pub total_price_cents: i64,
    pub profit_cents: i64,
    pub status: SoldStatus,
}

// =============================================================================
// Supplier
// =============================================================================

/// A vendor stock is bought from. Deleting one only clears `active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Supplier {
    pub id: i64,
    pub full_name: String,
    pub address: Option<String>,
    pub contact_no: Option<String>,
    pub email: Option<String>,

    /// Opaque reference to a picture managed by the UI.
    pub image_path: Option<String>,

    pub active: bool,
}

/// Fields for registering a supplier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSupplier {
    pub full_name: String,
    pub address: Option<String>,
    pub contact_no: Option<String>,
    pub email: Option<String>,
    pub image_path: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
