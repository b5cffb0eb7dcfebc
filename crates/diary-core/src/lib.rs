//! # diary-core: Pure Business Logic for the Mobile Diary
//!
//! This crate holds the rules of the diary: how an order is numbered, how a
//! cart turns into sale lines, when a line counts as delivered and how the
//! monthly reports are aggregated. Nothing in here touches a database or the
//! system clock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mobile Diary Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         UI (external)                           │   │
//! │  │   Sales page ──► Order view ──► Reports ──► Suppliers           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 diary-engine (services)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ diary-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  types   │ │   cart   │ │ delivery │ │  report  │          │   │
//! │  │   │ Item     │ │ Session  │ │ status   │ │ monthly  │          │   │
//! │  │   │ Sold     │ │ CartLine │ │ sweep    │ │ pending  │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    diary-db (Database Layer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records (Item, Stock, Sold, Supplier) and their draft forms
//! - [`money`] - Integer cents
//! - [`error`] - Domain error types
//! - [`validation`] - Input parsing and field rules
//! - [`order_number`] - `ORD#n` sequence
//! - [`cart`] - The transaction session state machine
//! - [`delivery`] - ORDERED / DELIVERED rules
//! - [`report`] - Monthly aggregation and the bounded ratios
//!
//! ## Example Usage
//!
//! ```rust
//! use diary_core::order_number::next_order_number;
//!
//! assert_eq!(next_order_number(None), "ORD#1");
//! assert_eq!(next_order_number(Some("ORD#7")), "ORD#8");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod delivery;
pub mod error;
pub mod money;
pub mod order_number;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{
    CartLine, CommitReceipt, LineInput, OrderHeader, SessionSnapshot, SessionState,
    TransactionSession,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every order number (`ORD#12`).
pub const ORDER_PREFIX: &str = "ORD#";

/// Overhead applied to the cost base when computing sales performance.
///
/// ## Business Reason
/// The shop budgets 10% on top of the purchase price for handling, so a sale
/// only "performs" once it clears cost plus that margin.
pub const COST_OVERHEAD_FACTOR: f64 = 1.1;

/// Maximum number of distinct items in one order.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single item in one order.
pub const MAX_LINE_QUANTITY: i64 = 99_999;

/// Largest total or profit one line may carry, in cents.
///
/// A full cart of such lines still sums within `i64`.
pub const MAX_LINE_AMOUNT_CENTS: i64 = i64::MAX / MAX_CART_LINES as i64;
