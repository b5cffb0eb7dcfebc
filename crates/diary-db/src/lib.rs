//! # diary-db: Database Layer for the Mobile Diary
//!
//! SQLite storage for items, suppliers, purchase records and sale lines,
//! accessed asynchronously through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mobile Diary Data Flow                           │
//! │                                                                         │
//! │  diary-engine (commit, sweep, reports)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     diary-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │  item, stock  │    │  (embedded)  │   │   │
//! │  │   │               │◄───│  sold,        │    │              │   │   │
//! │  │   │ SqlitePool    │    │  supplier     │    │ 001_initial  │   │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘   │   │
//! │  │           │                                                     │   │
//! │  │           └──► UnitOfWork (one transaction, affected count)     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (or :memory: in tests)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Per-table readers and writers
//! - [`unit_of_work`] - Transaction scope for writes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diary_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("diary.db")).await?;
//!
//! let units = db.items().get_with_name("Rice").await?;
//!
//! let mut uow = db.begin().await?;
//! uow.solds().add_range(&drafts).await?;
//! uow.complete().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod unit_of_work;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use unit_of_work::UnitOfWork;

pub use repository::{
    ItemRepository, ItemWriter, SoldRepository, SoldWriter, StockRepository, StockWriter,
    SupplierRepository, SupplierWriter,
};
