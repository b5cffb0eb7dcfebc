//! # Delivery Status Sweep
//!
//! Flips sale lines whose delivery date has arrived from ORDERED to
//! DELIVERED. Runs at the start of every report session.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::Engine;
use diary_core::delivery::{due_for_delivery, status_for_delivery};
use diary_core::SoldStatus;

impl Engine {
    /// Marks every due ORDERED line as DELIVERED in one transaction.
    ///
    /// ## Returns
    /// The number of lines flipped. Nothing due is `Ok(0)`.
    ///
    /// ## Errors
    /// `PersistenceFailure` when lines were due but the store wrote none.
    pub async fn run_delivery_status_sweep(&self, today: NaiveDate) -> EngineResult<usize> {
        let ordered = self.db.solds().get_with_status(SoldStatus::Ordered).await?;
        let mut due = due_for_delivery(ordered, today);

        if due.is_empty() {
            debug!(%today, "No deliveries due");
            return Ok(0);
        }

        for sold in &mut due {
            sold.status = status_for_delivery(sold.date_delivered, today);
        }

        let mut uow = self.db.begin().await?;
        let changed = uow.solds().update_range(&due).await?;
        if changed == 0 {
            uow.rollback().await?;
            return Err(EngineError::update_failed("delivery status"));
        }
        uow.complete().await?;

        info!(%today, flipped = due.len(), "Delivery status sweep complete");
        Ok(due.len())
    }
}
