//! # Report Service
//!
//! Loads records from the store and hands them to the report math in
//! `diary_core::report`.
//!
//! ## Report Session
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  generate_reports(today, cancel)                                        │
//! │    │                                                                    │
//! │    ├── spawn_reports? ── yes ──► tokio::spawn(run) ──┐                  │
//! │    │                     no ───► run inline ─────────┤                  │
//! │    │                                                 ▼                  │
//! │    │          select! { cancel.cancelled() ──► Cancelled                │
//! │    │                    build ──► sweep, profit, disbursement,          │
//! │    │                              customers ──► ReportBundle }          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A cancelled build is dropped mid-flight; an open sweep transaction rolls
//! back with it.

use chrono::NaiveDate;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::{EngineError, EngineResult};
use crate::Engine;
use diary_core::report::{
    self, CustomerReport, DisbursementReport, OverallRecord, PendingOrder, ProfitReport,
};

/// Everything the reports page shows on open.
#[derive(Debug, Clone, Serialize)]
pub struct ReportBundle {
    /// Lines flipped to DELIVERED by the opening sweep.
    pub swept: usize,
    pub profit: ProfitReport,
    pub disbursement: DisbursementReport,
    pub customers: CustomerReport,
}

impl Engine {
    pub async fn profit_report(&self) -> EngineResult<ProfitReport> {
        let solds = self.db.solds().get_all().await?;
        Ok(report::profit_report(&solds))
    }

    pub async fn disbursement_report(&self) -> EngineResult<DisbursementReport> {
        let stocks = self.db.stocks().get_all().await?;
        let items = self.db.items().get_all().await?;
        Ok(report::disbursement_report(&stocks, &items))
    }

    pub async fn customer_report(&self) -> EngineResult<CustomerReport> {
        let solds = self.db.solds().get_all().await?;
        Ok(report::customer_report(&solds))
    }

    /// ORDERED orders with the days left until delivery.
    pub async fn pending_orders(&self, today: NaiveDate) -> EngineResult<Vec<PendingOrder>> {
        let solds = self.db.solds().get_all().await?;
        Ok(report::pending_orders(&solds, today))
    }

    /// Orders scheduled for delivery on `date`.
    pub async fn deliveries_on(
        &self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> EngineResult<Vec<PendingOrder>> {
        let solds = self.db.solds().get_all().await?;
        Ok(report::deliveries_on(&solds, date, today))
    }

    /// Delivered orders and purchase receipts, for one order date or for
    /// all time when `on` is `None`.
    pub async fn overall_record(&self, on: Option<NaiveDate>) -> EngineResult<OverallRecord> {
        let solds = self.db.solds().get_all().await?;
        let stocks = self.db.stocks().get_all().await?;
        let suppliers = self.db.suppliers().get_all().await?;
        Ok(report::overall_record(&solds, &stocks, &suppliers, on))
    }

    /// Runs the opening sweep and the three monthly reports.
    ///
    /// With `reports.spawn_reports` set the work runs on its own task. A
    /// cancelled run returns `Cancelled` and produces no bundle.
    pub async fn generate_reports(
        &self,
        today: NaiveDate,
        cancel: CancellationToken,
    ) -> EngineResult<ReportBundle> {
        if !self.config.reports.spawn_reports {
            return self.run_reports(today, cancel).await;
        }

        let engine = self.clone();
        tokio::spawn(async move { engine.run_reports(today, cancel).await })
            .await
            .map_err(|e| {
                error!("Report task failed: {}", e);
                EngineError::persistence("Report generation failed")
            })?
    }

    async fn run_reports(
        &self,
        today: NaiveDate,
        cancel: CancellationToken,
    ) -> EngineResult<ReportBundle> {
        if cancel.is_cancelled() {
            return Err(EngineError::cancelled());
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Report generation cancelled");
                Err(EngineError::cancelled())
            }
            bundle = self.build_reports(today) => bundle,
        }
    }

    async fn build_reports(&self, today: NaiveDate) -> EngineResult<ReportBundle> {
        let swept = self.run_delivery_status_sweep(today).await?;
        let bundle = ReportBundle {
            swept,
            profit: self.profit_report().await?,
            disbursement: self.disbursement_report().await?,
            customers: self.customer_report().await?,
        };

        info!(
            %today,
            swept,
            transactions = bundle.profit.transaction_count,
            customers = bundle.customers.total_customers,
            "Reports generated"
        );
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{date, engine, stock_item};
    use crate::{Engine, EngineConfig, ErrorCode};
    use diary_core::report::RemainingDays;
    use diary_core::{NewSold, SoldStatus};
    use tokio_util::sync::CancellationToken;

    fn sold(item_id: i64, order_no: &str, customer: &str, ordered: (u32, u32), delivered: (u32, u32), status: SoldStatus) -> NewSold {
        NewSold {
            item_id,
            order_no: order_no.to_string(),
            customer_name: customer.to_string(),
            date_ordered: date(2024, ordered.0, ordered.1),
            date_delivered: date(2024, delivered.0, delivered.1),
            quantity: 2,
            total_price_cents: 1000,
            profit_cents: 200,
            status,
        }
    }

    async fn seeded() -> Engine {
        let engine = engine().await;
        let rice = stock_item(&engine, "Rice", "kg", 10, 400).await;

        let mut uow = engine.database().begin().await.unwrap();
        uow.solds()
            .add_range(&[
                sold(rice, "ORD#1", "Ana", (1, 10), (1, 12), SoldStatus::Delivered),
                sold(rice, "ORD#2", "Ben", (1, 20), (2, 2), SoldStatus::Delivered),
                sold(rice, "ORD#3", "Ana", (2, 5), (2, 8), SoldStatus::Ordered),
                sold(rice, "ORD#3", "Ana", (2, 5), (2, 8), SoldStatus::Ordered),
            ])
            .await
            .unwrap();
        uow.complete().await.unwrap();
        engine
    }

    #[tokio::test]
    async fn test_pending_orders_group_by_number() {
        let engine = seeded().await;
        let pending = engine.pending_orders(date(2024, 2, 6)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].order_no, "ORD#3");
        assert_eq!(pending[0].net_amount_cents, 2000);
        assert_eq!(pending[0].remaining_days, RemainingDays::Days(2));

        let due = engine.pending_orders(date(2024, 2, 8)).await.unwrap();
        assert_eq!(due[0].remaining_days, RemainingDays::Now);
    }

    #[tokio::test]
    async fn test_deliveries_on_date() {
        let engine = seeded().await;
        let on = engine.deliveries_on(date(2024, 2, 2), date(2024, 3, 1)).await.unwrap();
        assert_eq!(on.len(), 1);
        assert_eq!(on[0].order_no, "ORD#2");
        assert_eq!(on[0].remaining_days, RemainingDays::Delivered);
    }

    #[tokio::test]
    async fn test_overall_record_joins_supplier_names() {
        let engine = seeded().await;
        let record = engine.overall_record(None).await.unwrap();
        assert_eq!(record.order_count, 2);
        assert_eq!(record.total_profit_cents, 400);
        assert_eq!(record.receipt_count, 1);
        assert_eq!(record.receipts[0].supplier_name.as_deref(), Some("Rice Supplier"));

        let day = engine.overall_record(Some(date(2024, 1, 10))).await.unwrap();
        assert_eq!(day.order_count, 1);
        assert_eq!(day.orders[0].order_no, "ORD#1");
        assert_eq!(day.receipt_count, 0);
    }

    #[tokio::test]
    async fn test_generate_reports_sweeps_first() {
        let engine = seeded().await;
        let bundle = engine
            .generate_reports(date(2024, 3, 1), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(bundle.swept, 2);
        assert_eq!(bundle.profit.transaction_count, 3);
        assert_eq!(bundle.profit.net_profit_cents, 800);
        assert_eq!(bundle.customers.total_customers, 2);
        assert_eq!(bundle.disbursement.total_disbursed_cents, 4000);
    }

    #[tokio::test]
    async fn test_generate_reports_on_spawned_task() {
        let mut config = EngineConfig::in_memory();
        config.reports.spawn_reports = true;
        let engine = Engine::open(config).await.unwrap();

        let bundle = engine
            .generate_reports(date(2024, 3, 1), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(bundle.swept, 0);
        assert!(bundle.profit.monthly.is_empty());
    }

    #[tokio::test]
    async fn test_closed_store_is_a_persistence_failure() {
        let engine = seeded().await;
        engine.database().close().await;

        let err = engine.profit_report().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PersistenceFailure);
        assert_eq!(err.message, "Database connection failed");

        let err = engine
            .generate_reports(date(2024, 3, 1), CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PersistenceFailure);

        let mut config = EngineConfig::in_memory();
        config.reports.spawn_reports = true;
        let spawned = Engine::open(config).await.unwrap();
        spawned.database().close().await;
        let err = spawned
            .generate_reports(date(2024, 3, 1), CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PersistenceFailure);
    }

    #[tokio::test]
    async fn test_cancelled_reports_leave_orders_untouched() {
        let engine = seeded().await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = engine.generate_reports(date(2024, 3, 1), cancel).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Cancelled);

        let ordered = engine
            .database()
            .solds()
            .get_with_status(SoldStatus::Ordered)
            .await
            .unwrap();
        assert_eq!(ordered.len(), 2);
    }
}
