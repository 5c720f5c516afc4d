//! # Supplier Repository
//!
//! Database operations for suppliers.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::validation::{validate_new_supplier, validate_supplier};
use stockroom_core::{generate_id, NewSupplier, Supplier};

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists suppliers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, contact, email, phone FROM suppliers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, contact, email, phone FROM suppliers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Validates a payload, assigns an id, and inserts it.
    pub async fn create(&self, data: NewSupplier) -> DbResult<Supplier> {
        validate_new_supplier(&data)?;
        let supplier = Supplier::from_new(generate_id(), data);
        self.insert(&supplier).await
    }

    /// Inserts a fully-formed supplier.
    pub async fn insert(&self, supplier: &Supplier) -> DbResult<Supplier> {
        debug!(id = %supplier.id, name = %supplier.name, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (id, name, contact, email, phone, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(supplier.clone())
    }

    /// Updates the supplier's name and contact details.
    pub async fn update(&self, supplier: &Supplier) -> DbResult<()> {
        validate_supplier(supplier)?;
        debug!(id = %supplier.id, "Updating supplier");

        let result = sqlx::query(
            r#"
            UPDATE suppliers SET name = ?2, contact = ?3, email = ?4, phone = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", &supplier.id));
        }

        Ok(())
    }

    /// Deletes a supplier.
    ///
    /// ## Returns
    /// * `Ok(true)` - Supplier was deleted
    /// * `Ok(false)` - No supplier with this id
    /// * `Err(DbError::ForeignKeyViolation)` - Products still reference it
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{category, product, supplier, test_db};
    use stockroom_core::{CoreError, ValidationError};

    #[tokio::test]
    async fn test_create_with_contact() {
        let db = test_db().await;
        let created = db
            .suppliers()
            .create(NewSupplier {
                name: "TechSupply Co.".to_string(),
                contact: Some("John Smith".to_string()),
                email: Some("john@techsupply.com".to_string()),
                phone: Some("+1-555-0123".to_string()),
            })
            .await
            .unwrap();

        let loaded = db.suppliers().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_email() {
        let db = test_db().await;
        let result = db
            .suppliers()
            .create(NewSupplier {
                name: "BookWorld".to_string(),
                email: Some("not-an-email".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(DbError::Core(_))));
    }

    #[tokio::test]
    async fn test_list_update_delete() {
        let db = test_db().await;
        supplier(&db, "Fashion Forward").await;
        let mut book_world = supplier(&db, "BookWorld").await;

        let names: Vec<String> = db.suppliers().list().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["BookWorld", "Fashion Forward"]);

        book_world.contact = Some("Mike Wilson".to_string());
        db.suppliers().update(&book_world).await.unwrap();
        let loaded = db.suppliers().get_by_id(&book_world.id).await.unwrap().unwrap();
        assert_eq!(loaded.contact.as_deref(), Some("Mike Wilson"));

        assert!(db.suppliers().delete(&book_world.id).await.unwrap());
        assert!(!db.suppliers().delete(&book_world.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_rejects_invalid() {
        let db = test_db().await;
        let original = supplier(&db, "BookWorld").await;

        let mut edited = original.clone();
        edited.name = String::new();
        assert!(matches!(
            db.suppliers().update(&edited).await,
            Err(DbError::Core(CoreError::Validation(ValidationError::Required { .. })))
        ));

        let mut edited = original.clone();
        edited.email = Some("mike.at.bookworld".to_string());
        assert!(matches!(
            db.suppliers().update(&edited).await,
            Err(DbError::Core(CoreError::Validation(ValidationError::InvalidFormat { .. })))
        ));

        let stored = db.suppliers().get_by_id(&original.id).await.unwrap().unwrap();
        assert_eq!(stored, original);
    }

    #[tokio::test]
    async fn test_delete_referenced_supplier_fails() {
        let db = test_db().await;
        let cat = category(&db, "Electronics").await;
        let sup = supplier(&db, "TechSupply Co.").await;
        product(&db, "WH-001", &cat, &sup, 3).await;

        let err = db.suppliers().delete(&sup.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
