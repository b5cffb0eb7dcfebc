//! # Engine Services
//!
//! Each module adds one group of operations to [`Engine`](crate::Engine).
//!
//! - [`transaction`] - Order numbers, cart lines, commit
//! - [`delivery`] - Delivery status sweep
//! - [`report`] - Monthly reports, pending orders, overall records
//! - [`order`] - Order lookup and deletion
//! - [`supplier`] - Supplier registry

pub mod delivery;
pub mod order;
pub mod report;
pub mod supplier;
pub mod transaction;
