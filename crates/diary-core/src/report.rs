//! # Report Aggregation
//!
//! Pure aggregations over records already loaded from the store. The engine
//! fetches the rows; everything here is arithmetic and grouping.
//!
//! ## Reports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Report            Input            Bucket / group       Figures        │
//! │  ───────────────   ──────────────   ──────────────────   ────────────── │
//! │  Profit            Sold             month of delivery    Σ profit,      │
//! │                                                          performance %  │
//! │  Disbursement      Stock + Item     month of purchase    Σ spent,       │
//! │                                                          handling %     │
//! │  Customers         Sold             month of delivery    distinct names │
//! │  Pending           Sold (ORDERED)   order_no             days left      │
//! │  Deliveries on     Sold (any)       order_no             days left      │
//! │  Overall record    Sold + Stock     order_no / receipt   Σ net, profit  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Month buckets are chronological. Groups keep the order in which their
//! first record appears in the (sorted) input, and shared fields such as the
//! customer come from that first record.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Item, Sold, SoldStatus, Stock, Supplier};
use crate::COST_OVERHEAD_FACTOR;

// =============================================================================
// Month Buckets
// =============================================================================

/// Calendar month used as a report bucket. Orders by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    /// "January 2024"
    pub fn label(&self) -> String {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown");
        format!("{} {}", name, self.year)
    }
}

/// One month of a money-valued series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyAmount {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub amount_cents: i64,
}

/// One month of a count-valued series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyCount {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub count: usize,
}

fn monthly_amounts<T>(
    records: &[T],
    date: impl Fn(&T) -> NaiveDate,
    amount: impl Fn(&T) -> Money,
) -> Vec<MonthlyAmount> {
    let mut buckets: BTreeMap<MonthKey, Money> = BTreeMap::new();
    for record in records {
        *buckets.entry(MonthKey::of(date(record))).or_default() += amount(record);
    }

    buckets
        .into_iter()
        .map(|(key, amount)| MonthlyAmount {
            year: key.year,
            month: key.month,
            label: key.label(),
            amount_cents: amount.cents(),
        })
        .collect()
}

/// Splits records into groups by key, in order of first appearance.
fn group_in_order<'a, T, K>(
    records: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&T) -> K,
) -> Vec<Vec<&'a T>>
where
    T: 'a,
    K: Eq + Hash,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<&'a T>> = Vec::new();

    for record in records {
        let slot = *index.entry(key(record)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(record);
    }

    groups
}

/// Rounds a percentage to two decimals after clamping it to `[0, 100]`.
fn bounded_percentage(value: f64) -> f64 {
    let clamped = value.clamp(0.0, 100.0);
    (clamped * 100.0).round() / 100.0
}

// =============================================================================
// Profit Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitReport {
    pub monthly: Vec<MonthlyAmount>,
    pub net_profit_cents: i64,
    pub total_sales_cents: i64,

    /// Distinct order numbers.
    pub transaction_count: usize,

    /// Bounded to `[0, 100]`, two decimals.
    pub sales_performance: f64,
}

/// Profit per month of delivery, plus totals over every line.
pub fn profit_report(solds: &[Sold]) -> ProfitReport {
    let mut sorted: Vec<&Sold> = solds.iter().collect();
    sorted.sort_by_key(|s| s.date_delivered);

    let monthly = monthly_amounts(&sorted, |s| s.date_delivered, |s| s.profit());
    let orders: HashSet<&str> = solds.iter().map(|s| s.order_no.as_str()).collect();

    ProfitReport {
        monthly,
        net_profit_cents: solds.iter().map(Sold::profit).sum::<Money>().cents(),
        total_sales_cents: solds.iter().map(Sold::total_price).sum::<Money>().cents(),
        transaction_count: orders.len(),
        sales_performance: sales_performance(solds),
    }
}

/// Sales relative to cost plus overhead, as a bounded percentage.
///
/// ```text
/// unit_price      = total / quantity
/// profit_per_unit = profit / quantity
/// base_cost       = Σ (unit_price - profit_per_unit) × 1.1
/// performance     = clamp(total_sales / base_cost × 100, 0, 100)
/// ```
///
/// Lines with zero quantity are left out of the cost base. A zero base cost
/// yields exactly `0.0`.
pub fn sales_performance(solds: &[Sold]) -> f64 {
    let total_sales: f64 = solds.iter().map(|s| s.total_price().as_major_f64()).sum();

    let base_cost: f64 = solds
        .iter()
        .filter(|s| s.quantity != 0)
        .map(|s| {
            let qty = s.quantity as f64;
            let unit_price = s.total_price().as_major_f64() / qty;
            let profit_per_unit = s.profit().as_major_f64() / qty;
            (unit_price - profit_per_unit) * COST_OVERHEAD_FACTOR
        })
        .sum();

    if base_cost == 0.0 {
        return 0.0;
    }

    bounded_percentage(total_sales / base_cost * 100.0)
}

// =============================================================================
// Disbursement Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DisbursementReport {
    pub monthly: Vec<MonthlyAmount>,
    pub total_disbursed_cents: i64,

    /// Units bought across all purchase records.
    pub total_purchased_quantity: i64,

    /// Units on hand across active items.
    pub total_active_quantity: i64,

    /// Active items under their reorder threshold.
    pub critical_item_count: usize,

    /// Bounded to `[0, 100]`, two decimals.
    pub item_handling: f64,
}

/// Purchase spending per month plus the stock health of active items.
pub fn disbursement_report(stocks: &[Stock], items: &[Item]) -> DisbursementReport {
    let mut sorted: Vec<&Stock> = stocks.iter().collect();
    sorted.sort_by_key(|s| s.date_ordered);

    let active: Vec<&Item> = items.iter().filter(|i| i.active).collect();

    DisbursementReport {
        monthly: monthly_amounts(&sorted, |s| s.date_ordered, |s| s.total_price()),
        total_disbursed_cents: stocks.iter().map(Stock::total_price).sum::<Money>().cents(),
        total_purchased_quantity: stocks.iter().map(|s| s.quantity).sum(),
        total_active_quantity: active.iter().map(|i| i.quantity).sum(),
        critical_item_count: active.iter().filter(|i| i.is_critical()).count(),
        item_handling: item_handling(items),
    }
}

/// How comfortably active stock covers twice the reorder thresholds.
///
/// `clamp(Σ quantity / (Σ critical × 2) × 100, 0, 100)` over active items.
/// With no thresholds at all the result is `100.0` when anything is on hand
/// and `0.0` otherwise.
pub fn item_handling(items: &[Item]) -> f64 {
    let (quantity, critical) = items
        .iter()
        .filter(|i| i.active)
        .fold((0i64, 0i64), |(q, c), i| (q + i.quantity, c + i.critical));

    if critical == 0 {
        return if quantity > 0 { 100.0 } else { 0.0 };
    }

    bounded_percentage(quantity as f64 / (critical as f64 * 2.0) * 100.0)
}

// =============================================================================
// Customer Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerReport {
    pub monthly: Vec<MonthlyCount>,
    pub total_customers: usize,
}

/// Distinct customers per month of delivery and overall.
pub fn customer_report(solds: &[Sold]) -> CustomerReport {
    let mut buckets: BTreeMap<MonthKey, BTreeSet<&str>> = BTreeMap::new();
    for sold in solds {
        buckets
            .entry(MonthKey::of(sold.date_delivered))
            .or_default()
            .insert(sold.customer_name.as_str());
    }

    let total: HashSet<&str> = solds.iter().map(|s| s.customer_name.as_str()).collect();

    CustomerReport {
        monthly: buckets
            .into_iter()
            .map(|(key, names)| MonthlyCount {
                year: key.year,
                month: key.month,
                label: key.label(),
                count: names.len(),
            })
            .collect(),
        total_customers: total.len(),
    }
}

// =============================================================================
// Pending Orders
// =============================================================================

/// Days until delivery, or a sentinel once the date is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
#[ts(export)]
pub enum RemainingDays {
    Days(i64),
    /// Pending list: the delivery is due.
    Now,
    /// Deliveries-on-date list: the delivery date has passed.
    Delivered,
}

impl std::fmt::Display for RemainingDays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemainingDays::Days(days) => write!(f, "{}", days),
            RemainingDays::Now => write!(f, "NOW"),
            RemainingDays::Delivered => write!(f, "DELIVERED"),
        }
    }
}

/// One order awaiting (or scheduled for) delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PendingOrder {
    pub order_no: String,
    pub customer_name: String,
    #[ts(as = "String")]
    pub date_ordered: NaiveDate,
    #[ts(as = "String")]
    pub date_delivered: NaiveDate,
    pub remaining_days: RemainingDays,
    pub net_amount_cents: i64,
}

fn pending_rows<'a>(
    solds: impl IntoIterator<Item = &'a Sold>,
    today: NaiveDate,
    due: RemainingDays,
) -> Vec<PendingOrder> {
    group_in_order(solds, |s| s.order_no.clone())
        .into_iter()
        .filter_map(|group| {
            let first = *group.first()?;
            let days = (first.date_delivered - today).num_days();
            Some(PendingOrder {
                order_no: first.order_no.clone(),
                customer_name: first.customer_name.clone(),
                date_ordered: first.date_ordered,
                date_delivered: first.date_delivered,
                remaining_days: if days <= 0 { due } else { RemainingDays::Days(days) },
                net_amount_cents: group.iter().map(|s| s.total_price()).sum::<Money>().cents(),
            })
        })
        .collect()
}

/// Orders that still have ORDERED lines, one row per order number.
pub fn pending_orders(solds: &[Sold], today: NaiveDate) -> Vec<PendingOrder> {
    pending_rows(
        solds.iter().filter(|s| s.status == SoldStatus::Ordered),
        today,
        RemainingDays::Now,
    )
}

/// Orders delivered (or to be delivered) on `date`, whatever their status.
pub fn deliveries_on(solds: &[Sold], date: NaiveDate, today: NaiveDate) -> Vec<PendingOrder> {
    pending_rows(
        solds.iter().filter(|s| s.date_delivered == date),
        today,
        RemainingDays::Delivered,
    )
}

// =============================================================================
// Overall Record
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderSummary {
    pub order_no: String,
    pub customer_name: String,
    #[ts(as = "String")]
    pub date_ordered: NaiveDate,
    #[ts(as = "String")]
    pub date_delivered: NaiveDate,
    pub profit_cents: i64,
    pub net_amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReceiptSummary {
    pub receipt_no: String,

    /// `None` when the supplier record is missing.
    pub supplier_name: Option<String>,

    #[ts(as = "String")]
    pub date_ordered: NaiveDate,
    pub net_amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OverallRecord {
    pub orders: Vec<OrderSummary>,
    pub order_count: usize,
    pub total_profit_cents: i64,
    pub total_sales_cents: i64,

    pub receipts: Vec<ReceiptSummary>,
    pub receipt_count: usize,
    pub total_disbursed_cents: i64,
}

/// Delivered orders and purchase receipts, optionally limited to those
/// ordered on one date.
///
/// ## Selection
/// - Orders: DELIVERED lines (ordered on `on` when given), sorted by
///   delivery date, grouped by order number
/// - Receipts: purchase records (ordered on `on` when given), sorted by
///   purchase date, grouped by receipt number, supplier name looked up in
///   `suppliers`
pub fn overall_record(
    solds: &[Sold],
    stocks: &[Stock],
    suppliers: &[Supplier],
    on: Option<NaiveDate>,
) -> OverallRecord {
    let matches_date = |date: NaiveDate| on.map_or(true, |on| on == date);

    let mut delivered: Vec<&Sold> = solds
        .iter()
        .filter(|s| s.status == SoldStatus::Delivered && matches_date(s.date_ordered))
        .collect();
    delivered.sort_by_key(|s| s.date_delivered);

    let orders: Vec<OrderSummary> = group_in_order(delivered, |s| s.order_no.clone())
        .into_iter()
        .filter_map(|group| {
            let first = *group.first()?;
            Some(OrderSummary {
                order_no: first.order_no.clone(),
                customer_name: first.customer_name.clone(),
                date_ordered: first.date_ordered,
                date_delivered: first.date_delivered,
                profit_cents: group.iter().map(|s| s.profit()).sum::<Money>().cents(),
                net_amount_cents: group.iter().map(|s| s.total_price()).sum::<Money>().cents(),
            })
        })
        .collect();

    let mut purchases: Vec<&Stock> = stocks
        .iter()
        .filter(|s| matches_date(s.date_ordered))
        .collect();
    purchases.sort_by_key(|s| s.date_ordered);

    let names: HashMap<i64, &str> = suppliers
        .iter()
        .map(|s| (s.id, s.full_name.as_str()))
        .collect();

    let receipts: Vec<ReceiptSummary> = group_in_order(purchases, |s| s.receipt_no.clone())
        .into_iter()
        .filter_map(|group| {
            let first = *group.first()?;
            Some(ReceiptSummary {
                receipt_no: first.receipt_no.clone(),
                supplier_name: names.get(&first.supplier_id).map(|n| n.to_string()),
                date_ordered: first.date_ordered,
                net_amount_cents: group.iter().map(|s| s.total_price()).sum::<Money>().cents(),
            })
        })
        .collect();

    OverallRecord {
        order_count: orders.len(),
        total_profit_cents: orders.iter().map(|o| o.profit_cents).sum(),
        total_sales_cents: orders.iter().map(|o| o.net_amount_cents).sum(),
        orders,
        receipt_count: receipts.len(),
        total_disbursed_cents: receipts.iter().map(|r| r.net_amount_cents).sum(),
        receipts,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
