//! # Item Repository
//!
//! Catalog lookups and stock-level writes.
//!
//! An item is identified to the user by its (name, unit) pair. The same name
//! can exist under several units ("Rice / kg", "Rice / sack"), so the cart
//! first asks for the units of a name and then resolves the pair.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use diary_core::{Item, NewItem};

const ITEM_COLUMNS: &str = "id, name, unit_of_measurement, quantity, critical, active";

/// Read access to items.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// All items, active or not, by name then unit.
    pub async fn get_all(&self) -> DbResult<Vec<Item>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY name COLLATE NOCASE, unit_of_measurement"
        );
        let items = sqlx::query_as::<_, Item>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1");
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    /// Active items sharing `name` (case-insensitive), one per unit.
    pub async fn get_with_name(&self, name: &str) -> DbResult<Vec<Item>> {
        debug!(name = %name, "Loading items by name");

        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM items \
             WHERE name = ?1 COLLATE NOCASE AND active = 1 \
             ORDER BY unit_of_measurement"
        );
        let items = sqlx::query_as::<_, Item>(&sql)
            .bind(name.trim())
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    /// Resolves a (name, unit) pair to its active item.
    pub async fn get_with_name_and_unit(&self, name: &str, unit: &str) -> DbResult<Option<Item>> {
        debug!(name = %name, unit = %unit, "Resolving item");

        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM items \
             WHERE name = ?1 COLLATE NOCASE \
               AND unit_of_measurement = ?2 COLLATE NOCASE \
               AND active = 1 \
             ORDER BY id LIMIT 1"
        );
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(name.trim())
            .bind(unit.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }
}

// =============================================================================
// Writer
// =============================================================================

/// Item writes inside a [`UnitOfWork`](crate::UnitOfWork).
#[derive(Debug)]
pub struct ItemWriter<'u> {
    conn: &'u mut SqliteConnection,
    affected: &'u mut u64,
}

impl<'u> ItemWriter<'u> {
    pub(crate) fn new(conn: &'u mut SqliteConnection, affected: &'u mut u64) -> Self {
        ItemWriter { conn, affected }
    }

    /// Reads an item through the transaction, seeing its own writes.
    pub async fn get(&mut self, id: i64) -> DbResult<Option<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1");
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(item)
    }

    /// Inserts an item and returns its id.
    pub async fn add(&mut self, item: &NewItem) -> DbResult<i64> {
        let result = sqlx::query(
            "INSERT INTO items (name, unit_of_measurement, quantity, critical, active) \
             VALUES (?1, ?2, ?3, ?4, 1)",
        )
        .bind(&item.name)
        .bind(&item.unit_of_measurement)
        .bind(item.quantity)
        .bind(item.critical)
        .execute(&mut *self.conn)
        .await?;

        *self.affected += result.rows_affected();
        Ok(result.last_insert_rowid())
    }

    /// Takes `quantity` off an item's stock level.
    ///
    /// Returns `false` without writing when the item is missing, inactive or
    /// holds less than `quantity`. The check and the write are one statement.
    pub async fn deduct(&mut self, id: i64, quantity: i64) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE items SET quantity = quantity - ?2 \
             WHERE id = ?1 AND active = 1 AND quantity >= ?2",
        )
        .bind(id)
        .bind(quantity)
        .execute(&mut *self.conn)
        .await?;

        let changed = result.rows_affected();
        *self.affected += changed;
        debug!(item_id = id, quantity, applied = changed > 0, "Deducted stock");
        Ok(changed > 0)
    }

    /// Adds purchased units to an item's stock level.
    pub async fn restock(&mut self, id: i64, quantity: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE items SET quantity = quantity + ?2 WHERE id = ?1")
            .bind(id)
            .bind(quantity)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }
        *self.affected += result.rows_affected();
        Ok(())
    }

    /// Writes every mutable column of each item back by id.
    pub async fn update_range(&mut self, items: &[Item]) -> DbResult<u64> {
        let mut changed = 0;
        for item in items {
            let result = sqlx::query(
                "UPDATE items SET name = ?2, unit_of_measurement = ?3, quantity = ?4, \
                 critical = ?5, active = ?6 WHERE id = ?1",
            )
            .bind(item.id)
            .bind(&item.name)
            .bind(&item.unit_of_measurement)
            .bind(item.quantity)
            .bind(item.critical)
            .bind(item.active)
            .execute(&mut *self.conn)
            .await?;
            changed += result.rows_affected();
        }
        *self.affected += changed;
        Ok(changed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use diary_core::NewItem;

    fn new_item(name: &str, unit: &str, quantity: i64) -> NewItem {
        NewItem {
            name: name.to_string(),
            unit_of_measurement: unit.to_string(),
            quantity,
            critical: 5,
        }
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut uow = db.begin().await.unwrap();
        uow.items().add(&new_item("Rice", "kg", 20)).await.unwrap();
        uow.items().add(&new_item("Rice", "sack", 3)).await.unwrap();
        uow.items().add(&new_item("Sugar", "kg", 4)).await.unwrap();
        uow.complete().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_units_for_name() {
        let db = seeded().await;
        let items = db.items().get_with_name("rice").await.unwrap();
        let units: Vec<_> = items.iter().map(|i| i.unit_of_measurement.as_str()).collect();
        assert_eq!(units, vec!["kg", "sack"]);
    }

    #[tokio::test]
    async fn test_resolve_name_and_unit() {
        let db = seeded().await;
        let item = db
            .items()
            .get_with_name_and_unit("Rice", "SACK")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(item.quantity, 3);

        let missing = db.items().get_with_name_and_unit("Rice", "box").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_inactive_items_are_not_resolved() {
        let db = seeded().await;
        let mut sugar = db.items().get_with_name_and_unit("Sugar", "kg").await.unwrap().unwrap();
        sugar.active = false;

        let mut uow = db.begin().await.unwrap();
        assert_eq!(uow.items().update_range(&[sugar.clone()]).await.unwrap(), 1);
        uow.complete().await.unwrap();

        assert!(db.items().get_with_name_and_unit("Sugar", "kg").await.unwrap().is_none());
        assert!(db.items().get(sugar.id).await.unwrap().is_some());
        assert!(db.items().get_with_name("sugar").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deduct_refuses_overdraft() {
        let db = seeded().await;
        let sugar = db.items().get_with_name_and_unit("Sugar", "kg").await.unwrap().unwrap();

        let mut uow = db.begin().await.unwrap();
        assert!(!uow.items().deduct(sugar.id, 5).await.unwrap());
        assert!(uow.items().deduct(sugar.id, 4).await.unwrap());
        assert_eq!(uow.items().get(sugar.id).await.unwrap().unwrap().quantity, 0);
        uow.complete().await.unwrap();

        assert!(db.items().get(sugar.id).await.unwrap().unwrap().is_critical());
    }

    #[tokio::test]
    async fn test_restock_missing_item() {
        let db = seeded().await;
        let mut uow = db.begin().await.unwrap();
        let err = uow.items().restock(999, 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
