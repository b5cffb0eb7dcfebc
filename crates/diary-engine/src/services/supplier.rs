//! # Supplier Registry
//!
//! Adding, listing and deactivating suppliers.

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::Engine;
use diary_core::validation::{validate_name_filter, validate_supplier_name};
use diary_core::{CoreError, NewSupplier, Supplier};

impl Engine {
    /// Registers an active supplier.
    ///
    /// ## Errors
    /// - `ValidationFailure` for a missing full name
    /// - `ValidationFailure` when an active supplier already has the name
    pub async fn add_supplier(&self, new: NewSupplier) -> EngineResult<Supplier> {
        validate_supplier_name(&new.full_name)?;

        let new = NewSupplier {
            full_name: new.full_name.trim().to_string(),
            ..new
        };

        if self
            .db
            .suppliers()
            .find_active_by_name(&new.full_name)
            .await?
            .is_some()
        {
            return Err(CoreError::DuplicateSupplier(new.full_name).into());
        }

        let mut uow = self.db.begin().await?;
        let id = uow.suppliers().add(&new).await?;
        uow.complete().await?;

        info!(supplier_id = id, name = %new.full_name, "Supplier added");
        self.db
            .suppliers()
            .get(id)
            .await?
            .ok_or_else(|| EngineError::update_failed("supplier"))
    }

    /// Soft-deletes a supplier. Its purchase records keep resolving.
    pub async fn deactivate_supplier(&self, id: i64) -> EngineResult<()> {
        let mut uow = self.db.begin().await?;
        uow.suppliers().deactivate(id).await?;
        uow.complete().await?;

        info!(supplier_id = id, "Supplier deactivated");
        Ok(())
    }

    /// Active suppliers whose full name starts with `filter`.
    pub async fn list_suppliers(&self, filter: &str) -> EngineResult<Vec<Supplier>> {
        let filter = validate_name_filter(filter)?;
        Ok(self.db.suppliers().list_active(&filter).await?)
    }
}
