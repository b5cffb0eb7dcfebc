//! # Stock Repository
//!
//! Purchase records. Rows are written once and never edited; they feed the
//! disbursement report and supply the unit cost for new sale lines.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use diary_core::{Money, NewStock, Stock};

const STOCK_COLUMNS: &str = "id, item_id, supplier_id, receipt_no, quantity, \
                             price_per_unit_cents, total_price_cents, date_ordered";

/// Read access to purchase records.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Every purchase, oldest first.
    pub async fn get_all(&self) -> DbResult<Vec<Stock>> {
        let sql = format!("SELECT {STOCK_COLUMNS} FROM stocks ORDER BY date_ordered, id");
        let stocks = sqlx::query_as::<_, Stock>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(stocks)
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Stock>> {
        let sql = format!("SELECT {STOCK_COLUMNS} FROM stocks WHERE id = ?1");
        let stock = sqlx::query_as::<_, Stock>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(stock)
    }

    pub async fn get_for_item(&self, item_id: i64) -> DbResult<Vec<Stock>> {
        let sql = format!(
            "SELECT {STOCK_COLUMNS} FROM stocks WHERE item_id = ?1 ORDER BY date_ordered, id"
        );
        let stocks = sqlx::query_as::<_, Stock>(&sql)
            .bind(item_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(stocks)
    }

    /// Unit price of the most recent purchase of an item.
    ///
    /// Latest by purchase date, then by insertion for same-day purchases.
    /// `None` when the item was never bought.
    pub async fn latest_unit_cost(&self, item_id: i64) -> DbResult<Option<Money>> {
        let cents: Option<i64> = sqlx::query_scalar(
            "SELECT price_per_unit_cents FROM stocks \
             WHERE item_id = ?1 ORDER BY date_ordered DESC, id DESC LIMIT 1",
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        debug!(item_id, cost_cents = ?cents, "Latest unit cost");
        Ok(cents.map(Money::from_cents))
    }
}

// =============================================================================
// Writer
// =============================================================================

/// Purchase writes inside a [`UnitOfWork`](crate::UnitOfWork).
#[derive(Debug)]
pub struct StockWriter<'u> {
    conn: &'u mut SqliteConnection,
    affected: &'u mut u64,
}

impl<'u> StockWriter<'u> {
    pub(crate) fn new(conn: &'u mut SqliteConnection, affected: &'u mut u64) -> Self {
        StockWriter { conn, affected }
    }

    /// Records a purchase and returns its id. The total is computed here.
    pub async fn add(&mut self, stock: &NewStock) -> DbResult<i64> {
        let result = sqlx::query(
            "INSERT INTO stocks (item_id, supplier_id, receipt_no, quantity, \
             price_per_unit_cents, total_price_cents, date_ordered) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(stock.item_id)
        .bind(stock.supplier_id)
        .bind(&stock.receipt_no)
        .bind(stock.quantity)
        .bind(stock.price_per_unit_cents)
        .bind(stock.total_price().cents())
        .bind(stock.date_ordered)
        .execute(&mut *self.conn)
        .await?;

        *self.affected += result.rows_affected();
        Ok(result.last_insert_rowid())
    }

    pub async fn add_range(&mut self, stocks: &[NewStock]) -> DbResult<Vec<i64>> {
        let mut ids = Vec::with_capacity(stocks.len());
        for stock in stocks {
            ids.push(self.add(stock).await?);
        }
        Ok(ids)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use chrono::NaiveDate;
    use diary_core::{Money, NewItem, NewStock, NewSupplier};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup() -> (Database, i64, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut uow = db.begin().await.unwrap();
        let item_id = uow
            .items()
            .add(&NewItem {
                name: "Flour".to_string(),
                unit_of_measurement: "kg".to_string(),
                quantity: 0,
                critical: 1,
            })
            .await
            .unwrap();
        let supplier_id = uow
            .suppliers()
            .add(&NewSupplier {
                full_name: "Mill Co".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        uow.complete().await.unwrap();
        (db, item_id, supplier_id)
    }

    fn purchase(item_id: i64, supplier_id: i64, cents: i64, on: NaiveDate) -> NewStock {
        NewStock {
            item_id,
            supplier_id,
            receipt_no: format!("R-{cents}"),
            quantity: 4,
            price_per_unit_cents: cents,
            date_ordered: on,
        }
    }

    #[tokio::test]
    async fn test_total_is_derived() {
        let (db, item, supplier) = setup().await;
        let mut uow = db.begin().await.unwrap();
        let id = uow
            .stocks()
            .add(&purchase(item, supplier, 250, date(2024, 1, 5)))
            .await
            .unwrap();
        uow.complete().await.unwrap();

        let stock = db.stocks().get(id).await.unwrap().unwrap();
        assert_eq!(stock.total_price_cents, 1000);
        assert_eq!(stock.date_ordered, date(2024, 1, 5));
    }

    #[tokio::test]
    async fn test_latest_unit_cost_prefers_newest_date_then_id() {
        let (db, item, supplier) = setup().await;
        assert!(db.stocks().latest_unit_cost(item).await.unwrap().is_none());

        let mut uow = db.begin().await.unwrap();
        uow.stocks()
            .add_range(&[
                purchase(item, supplier, 300, date(2024, 3, 1)),
                purchase(item, supplier, 100, date(2024, 1, 1)),
                purchase(item, supplier, 350, date(2024, 3, 1)),
            ])
            .await
            .unwrap();
        uow.complete().await.unwrap();

        let cost = db.stocks().latest_unit_cost(item).await.unwrap();
        assert_eq!(cost, Some(Money::from_cents(350)));
        assert_eq!(db.stocks().get_for_item(item).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_supplier_is_rejected() {
        let (db, item, _) = setup().await;
        let mut uow = db.begin().await.unwrap();
        let err = uow
            .stocks()
            .add(&purchase(item, 404, 100, date(2024, 1, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
