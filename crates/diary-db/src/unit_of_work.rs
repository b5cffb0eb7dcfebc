//! # Unit of Work
//!
//! Groups writes across repositories into one SQLite transaction.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   db.begin() ──► UnitOfWork { tx, affected: 0 }                         │
//! │                      │                                                  │
//! │                      ├── items().deduct(..)      affected += 1          │
//! │                      ├── solds().add_range(..)   affected += n          │
//! │                      │                                                  │
//! │           ┌──────────┴──────────┐                                       │
//! │           ▼                     ▼                                       │
//! │     complete()              dropped / rollback()                        │
//! │     COMMIT, returns         nothing is written                          │
//! │     affected rows                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `complete()` returning `0` means nothing was written; callers treat that
//! as a failed save.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::item::ItemWriter;
use crate::repository::sold::SoldWriter;
use crate::repository::stock::StockWriter;
use crate::repository::supplier::SupplierWriter;

/// An open transaction plus the number of rows written through it.
#[derive(Debug)]
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
    affected: u64,
}

impl UnitOfWork {
    pub(crate) async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let tx = pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        debug!("Unit of work started");
        Ok(UnitOfWork { tx, affected: 0 })
    }

    fn parts(&mut self) -> (&mut SqliteConnection, &mut u64) {
        (&mut *self.tx, &mut self.affected)
    }

    pub fn items(&mut self) -> ItemWriter<'_> {
        let (conn, affected) = self.parts();
        ItemWriter::new(conn, affected)
    }

    pub fn stocks(&mut self) -> StockWriter<'_> {
        let (conn, affected) = self.parts();
        StockWriter::new(conn, affected)
    }

    pub fn solds(&mut self) -> SoldWriter<'_> {
        let (conn, affected) = self.parts();
        SoldWriter::new(conn, affected)
    }

    pub fn suppliers(&mut self) -> SupplierWriter<'_> {
        let (conn, affected) = self.parts();
        SupplierWriter::new(conn, affected)
    }

    /// Rows written so far.
    pub fn affected(&self) -> u64 {
        self.affected
    }

    /// Commits and returns the number of rows written.
    pub async fn complete(self) -> DbResult<u64> {
        let affected = self.affected;
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        debug!(affected, "Unit of work completed");
        Ok(affected)
    }

    /// Discards every write. Dropping the unit of work does the same.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        debug!("Unit of work rolled back");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
