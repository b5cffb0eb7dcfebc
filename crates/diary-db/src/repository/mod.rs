//! # Repository Module
//!
//! Database access for the diary, one module per table.
//!
//! ## Readers and Writers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  db.items()  ──► ItemRepository       reads on the pool                 │
//! │                  ├── get_all / get                                      │
//! │                  └── get_with_name_and_unit                             │
//! │                                                                         │
//! │  uow.items() ──► ItemWriter<'_>       writes on the open transaction    │
//! │                  ├── add / update_range                                 │
//! │                  └── deduct          (counts toward uow.affected())     │
//! │                                                                         │
//! │  Same split for stocks, solds and suppliers.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every write goes through a [`UnitOfWork`](crate::UnitOfWork), so a
//! failure part-way through leaves nothing behind.
//!
//! ## Available Repositories
//!
//! - [`ItemRepository`] - Catalog lookups
//! - [`StockRepository`] - Purchase records and unit costs
//! - [`SoldRepository`] - Sale lines, order numbers and delivery queries
//! - [`SupplierRepository`] - Supplier registry

pub mod item;
pub mod sold;
pub mod stock;
pub mod supplier;

pub use item::{ItemRepository, ItemWriter};
pub use sold::{SoldRepository, SoldWriter};
pub use stock::{StockRepository, StockWriter};
pub use supplier::{SupplierRepository, SupplierWriter};
