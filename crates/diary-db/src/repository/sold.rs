//! # Sold Repository
//!
//! Sale lines. An order is every row that shares an `order_no`.
//!
//! ## Order Numbers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   id │ order_no │ item       latest_order_no()                          │
//! │   ───┼──────────┼──────      = order_no of the highest id               │
//! │    7 │ ORD#3    │ Rice                                                  │
//! │    8 │ ORD#3    │ Sugar                                                 │
//! │    9 │ ORD#4    │ Rice   ◄── "ORD#4"                                    │
//! │                                                                         │
//! │   Called through SoldWriter it sees the open transaction, which is      │
//! │   how a commit derives its number and writes it atomically.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use diary_core::{NewSold, OrderLine, Sold, SoldStatus};

const SOLD_COLUMNS: &str = "id, item_id, order_no, customer_name, date_ordered, date_delivered, \
                            quantity, total_price_cents, profit_cents, status";

const LATEST_ORDER_NO: &str = "SELECT order_no FROM solds ORDER BY id DESC LIMIT 1";

/// Read access to sale lines.
#[derive(Debug, Clone)]
pub struct SoldRepository {
    pool: SqlitePool,
}

impl SoldRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SoldRepository { pool }
    }

    /// Every sale line in insertion order.
    pub async fn get_all(&self) -> DbResult<Vec<Sold>> {
        let sql = format!("SELECT {SOLD_COLUMNS} FROM solds ORDER BY id");
        let solds = sqlx::query_as::<_, Sold>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(solds)
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Sold>> {
        let sql = format!("SELECT {SOLD_COLUMNS} FROM solds WHERE id = ?1");
        let sold = sqlx::query_as::<_, Sold>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(sold)
    }

    /// Order number carried by the most recently inserted line.
    pub async fn latest_order_no(&self) -> DbResult<Option<String>> {
        let latest = sqlx::query_scalar::<_, String>(LATEST_ORDER_NO)
            .fetch_optional(&self.pool)
            .await?;
        Ok(latest)
    }

    pub async fn get_with_order_no(&self, order_no: &str) -> DbResult<Vec<Sold>> {
        let sql = format!("SELECT {SOLD_COLUMNS} FROM solds WHERE order_no = ?1 ORDER BY id");
        let solds = sqlx::query_as::<_, Sold>(&sql)
            .bind(order_no)
            .fetch_all(&self.pool)
            .await?;
        Ok(solds)
    }

    /// Lines of one order joined with their item name and unit.
    pub async fn order_lines(&self, order_no: &str) -> DbResult<Vec<OrderLine>> {
        debug!(order_no = %order_no, "Loading order lines");

        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT
                s.id,
                s.item_id,
                i.name AS item_name,
                i.unit_of_measurement,
                s.quantity,
                s.total_price_cents,
                s.profit_cents,
                s.status
            FROM solds s
            INNER JOIN items i ON i.id = s.item_id
            WHERE s.order_no = ?1
            ORDER BY s.id
            "#,
        )
        .bind(order_no)
        .fetch_all(&self.pool)
        .await?;
        Ok(lines)
    }

    /// Distinct order numbers, newest order first.
    pub async fn order_numbers(&self) -> DbResult<Vec<String>> {
        let numbers = sqlx::query_scalar::<_, String>(
            "SELECT order_no FROM solds GROUP BY order_no ORDER BY MAX(id) DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(numbers)
    }

    pub async fn get_with_status(&self, status: SoldStatus) -> DbResult<Vec<Sold>> {
        let sql = format!("SELECT {SOLD_COLUMNS} FROM solds WHERE status = ?1 ORDER BY id");
        let solds = sqlx::query_as::<_, Sold>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(solds)
    }
}

// =============================================================================
// Writer
// =============================================================================

/// Sale-line writes inside a [`UnitOfWork`](crate::UnitOfWork).
#[derive(Debug)]
pub struct SoldWriter<'u> {
    conn: &'u mut SqliteConnection,
    affected: &'u mut u64,
}

impl<'u> SoldWriter<'u> {
    pub(crate) fn new(conn: &'u mut SqliteConnection, affected: &'u mut u64) -> Self {
        SoldWriter { conn, affected }
    }

    /// Latest order number as seen by the open transaction.
    pub async fn latest_order_no(&mut self) -> DbResult<Option<String>> {
        let latest = sqlx::query_scalar::<_, String>(LATEST_ORDER_NO)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(latest)
    }

    /// Inserts the lines in order and returns their ids.
    pub async fn add_range(&mut self, solds: &[NewSold]) -> DbResult<Vec<i64>> {
        let mut ids = Vec::with_capacity(solds.len());
        for sold in solds {
            let result = sqlx::query(
                "INSERT INTO solds (item_id, order_no, customer_name, date_ordered, \
                 date_delivered, quantity, total_price_cents, profit_cents, status) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )
            .bind(sold.item_id)
            .bind(&sold.order_no)
            .bind(&sold.customer_name)
            .bind(sold.date_ordered)
            .bind(sold.date_delivered)
            .bind(sold.quantity)
            .bind(sold.total_price_cents)
            .bind(sold.profit_cents)
            .bind(sold.status)
            .execute(&mut *self.conn)
            .await?;

            *self.affected += result.rows_affected();
            ids.push(result.last_insert_rowid());
        }
        debug!(count = ids.len(), "Inserted sale lines");
        Ok(ids)
    }

    /// Writes every mutable column of each line back by id.
    pub async fn update_range(&mut self, solds: &[Sold]) -> DbResult<u64> {
        let mut changed = 0;
        for sold in solds {
            let result = sqlx::query(
                "UPDATE solds SET customer_name = ?2, date_ordered = ?3, date_delivered = ?4, \
                 quantity = ?5, total_price_cents = ?6, profit_cents = ?7, status = ?8 \
                 WHERE id = ?1",
            )
            .bind(sold.id)
            .bind(&sold.customer_name)
            .bind(sold.date_ordered)
            .bind(sold.date_delivered)
            .bind(sold.quantity)
            .bind(sold.total_price_cents)
            .bind(sold.profit_cents)
            .bind(sold.status)
            .execute(&mut *self.conn)
            .await?;
            changed += result.rows_affected();
        }
        *self.affected += changed;
        Ok(changed)
    }

    /// Deletes the given lines by id.
    pub async fn remove_range(&mut self, solds: &[Sold]) -> DbResult<u64> {
        let mut removed = 0;
        for sold in solds {
            let result = sqlx::query("DELETE FROM solds WHERE id = ?1")
                .bind(sold.id)
                .execute(&mut *self.conn)
                .await?;
            removed += result.rows_affected();
        }
        *self.affected += removed;
        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use chrono::NaiveDate;
    use diary_core::{NewItem, NewSold, SoldStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut uow = db.begin().await.unwrap();
        let item_id = uow
            .items()
            .add(&NewItem {
                name: "Eggs".to_string(),
                unit_of_measurement: "tray".to_string(),
                quantity: 50,
                critical: 5,
            })
            .await
            .unwrap();
        uow.complete().await.unwrap();
        (db, item_id)
    }

    fn line(item_id: i64, order_no: &str, delivered: NaiveDate, status: SoldStatus) -> NewSold {
        NewSold {
            item_id,
            order_no: order_no.to_string(),
            customer_name: "Ana".to_string(),
            date_ordered: date(2024, 5, 1),
            date_delivered: delivered,
            quantity: 2,
            total_price_cents: 1200,
            profit_cents: 200,
            status,
        }
    }

    async fn insert(db: &Database, lines: &[NewSold]) {
        let mut uow = db.begin().await.unwrap();
        uow.solds().add_range(lines).await.unwrap();
        uow.complete().await.unwrap();
    }

    #[tokio::test]
    async fn test_latest_order_no_follows_highest_id() {
        let (db, item) = setup().await;
        assert!(db.solds().latest_order_no().await.unwrap().is_none());

        insert(
            &db,
            &[
                line(item, "ORD#9", date(2024, 5, 2), SoldStatus::Ordered),
                line(item, "ORD#10", date(2024, 5, 2), SoldStatus::Ordered),
            ],
        )
        .await;

        assert_eq!(db.solds().latest_order_no().await.unwrap().as_deref(), Some("ORD#10"));
        assert_eq!(db.solds().order_numbers().await.unwrap(), vec!["ORD#10", "ORD#9"]);
    }

    #[tokio::test]
    async fn test_writer_sees_uncommitted_lines() {
        let (db, item) = setup().await;
        let mut uow = db.begin().await.unwrap();
        uow.solds()
            .add_range(&[line(item, "ORD#1", date(2024, 5, 2), SoldStatus::Ordered)])
            .await
            .unwrap();
        assert_eq!(uow.solds().latest_order_no().await.unwrap().as_deref(), Some("ORD#1"));
    }

    #[tokio::test]
    async fn test_order_lines_join_item_names() {
        let (db, item) = setup().await;
        insert(&db, &[line(item, "ORD#1", date(2024, 5, 2), SoldStatus::Delivered)]).await;

        let lines = db.solds().order_lines("ORD#1").await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].item_name, "Eggs");
        assert_eq!(lines[0].unit_of_measurement, "tray");
        assert_eq!(lines[0].status, SoldStatus::Delivered);
    }

    #[tokio::test]
    async fn test_update_status() {
        let (db, item) = setup().await;
        insert(
            &db,
            &[
                line(item, "ORD#1", date(2024, 5, 1), SoldStatus::Ordered),
                line(item, "ORD#1", date(2024, 5, 3), SoldStatus::Ordered),
                line(item, "ORD#2", date(2024, 4, 1), SoldStatus::Delivered),
            ],
        )
        .await;

        let mut due = db.solds().get_with_status(SoldStatus::Ordered).await.unwrap();
        assert_eq!(due.len(), 2);
        due.truncate(1);
        due[0].status = SoldStatus::Delivered;

        let mut uow = db.begin().await.unwrap();
        assert_eq!(uow.solds().update_range(&due).await.unwrap(), 1);
        uow.complete().await.unwrap();

        assert_eq!(db.solds().get_with_status(SoldStatus::Delivered).await.unwrap().len(), 2);
        assert_eq!(db.solds().get_with_status(SoldStatus::Ordered).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_order() {
        let (db, item) = setup().await;
        insert(
            &db,
            &[
                line(item, "ORD#1", date(2024, 5, 1), SoldStatus::Ordered),
                line(item, "ORD#1", date(2024, 5, 1), SoldStatus::Ordered),
                line(item, "ORD#2", date(2024, 5, 1), SoldStatus::Ordered),
            ],
        )
        .await;

        let order = db.solds().get_with_order_no("ORD#1").await.unwrap();
        let mut uow = db.begin().await.unwrap();
        assert_eq!(uow.solds().remove_range(&order).await.unwrap(), 2);
        uow.complete().await.unwrap();

        assert_eq!(db.solds().get_all().await.unwrap().len(), 1);
    }
}
