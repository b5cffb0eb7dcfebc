//! # Supplier Repository
//!
//! Supplier registry. Suppliers are soft-deleted: `deactivate` clears the
//! `active` flag so old purchase records still resolve a name.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use diary_core::{NewSupplier, Supplier};

const SUPPLIER_COLUMNS: &str = "id, full_name, address, contact_no, email, image_path, active";

/// Escapes LIKE wildcards so a user filter matches literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Read access to suppliers.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Every supplier, including deactivated ones.
    pub async fn get_all(&self) -> DbResult<Vec<Supplier>> {
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY id");
        let suppliers = sqlx::query_as::<_, Supplier>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(suppliers)
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Supplier>> {
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = ?1");
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(supplier)
    }

    /// Active supplier with exactly this name, ignoring case.
    pub async fn find_active_by_name(&self, full_name: &str) -> DbResult<Option<Supplier>> {
        let sql = format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers \
             WHERE full_name = ?1 COLLATE NOCASE AND active = 1 LIMIT 1"
        );
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(full_name.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(supplier)
    }

    /// Active suppliers whose name starts with `prefix`, ignoring ASCII case.
    /// An empty prefix lists them all.
    pub async fn list_active(&self, prefix: &str) -> DbResult<Vec<Supplier>> {
        debug!(prefix = %prefix, "Listing suppliers");

        let sql = format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers \
             WHERE active = 1 AND full_name LIKE ?1 ESCAPE '\\' \
             ORDER BY full_name COLLATE NOCASE, id"
        );
        let suppliers = sqlx::query_as::<_, Supplier>(&sql)
            .bind(like_prefix(prefix))
            .fetch_all(&self.pool)
            .await?;
        Ok(suppliers)
    }
}

// =============================================================================
// Writer
// =============================================================================

/// Supplier writes inside a [`UnitOfWork`](crate::UnitOfWork).
#[derive(Debug)]
pub struct SupplierWriter<'u> {
    conn: &'u mut SqliteConnection,
    affected: &'u mut u64,
}

impl<'u> SupplierWriter<'u> {
    pub(crate) fn new(conn: &'u mut SqliteConnection, affected: &'u mut u64) -> Self {
        SupplierWriter { conn, affected }
    }

    /// Inserts an active supplier and returns its id.
    pub async fn add(&mut self, supplier: &NewSupplier) -> DbResult<i64> {
        let result = sqlx::query(
            "INSERT INTO suppliers (full_name, address, contact_no, email, image_path, active) \
             VALUES (?1, ?2, ?3, ?4, ?5, 1)",
        )
        .bind(&supplier.full_name)
        .bind(&supplier.address)
        .bind(&supplier.contact_no)
        .bind(&supplier.email)
        .bind(&supplier.image_path)
        .execute(&mut *self.conn)
        .await?;

        *self.affected += result.rows_affected();
        Ok(result.last_insert_rowid())
    }

    /// Clears the active flag.
    ///
    /// ## When This Fails
    /// - `NotFound` when no active supplier has this id
    pub async fn deactivate(&mut self, id: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE suppliers SET active = 0 WHERE id = ?1 AND active = 1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }
        *self.affected += result.rows_affected();
        debug!(supplier_id = id, "Supplier deactivated");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::like_prefix;
    use crate::{Database, DbConfig, DbError};
    use diary_core::NewSupplier;

    fn supplier(name: &str) -> NewSupplier {
        NewSupplier {
            full_name: name.to_string(),
            contact_no: Some("0917".to_string()),
            ..Default::default()
        }
    }

    async fn seeded() -> (Database, Vec<i64>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut uow = db.begin().await.unwrap();
        let mut ids = Vec::new();
        for name in ["Acme Foods", "acme_wholesale", "Bakers Guild", "50% Off Mart"] {
            ids.push(uow.suppliers().add(&supplier(name)).await.unwrap());
        }
        uow.complete().await.unwrap();
        (db, ids)
    }

    #[test]
    fn test_like_prefix_escapes_wildcards() {
        assert_eq!(like_prefix("50%"), "50\\%%");
        assert_eq!(like_prefix("a_b"), "a\\_b%");
        assert_eq!(like_prefix(""), "%");
    }

    #[tokio::test]
    async fn test_prefix_filter_ignores_case() {
        let (db, _) = seeded().await;
        let found = db.suppliers().list_active("ACME").await.unwrap();
        assert_eq!(found.len(), 2);

        let literal = db.suppliers().list_active("acme_").await.unwrap();
        assert_eq!(literal.len(), 1);
        assert_eq!(literal[0].full_name, "acme_wholesale");

        let percent = db.suppliers().list_active("50%").await.unwrap();
        assert_eq!(percent.len(), 1);

        assert_eq!(db.suppliers().list_active("").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_deactivate_hides_supplier() {
        let (db, ids) = seeded().await;
        let mut uow = db.begin().await.unwrap();
        uow.suppliers().deactivate(ids[0]).await.unwrap();
        uow.complete().await.unwrap();

        assert!(db.suppliers().find_active_by_name("acme foods").await.unwrap().is_none());
        let kept = db.suppliers().get(ids[0]).await.unwrap().unwrap();
        assert!(!kept.active);
        assert_eq!(db.suppliers().list_active("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_deactivate_twice_is_not_found() {
        let (db, ids) = seeded().await;
        let mut uow = db.begin().await.unwrap();
        uow.suppliers().deactivate(ids[1]).await.unwrap();
        let err = uow.suppliers().deactivate(ids[1]).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
