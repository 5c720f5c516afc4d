//! # Movement Repository
//!
//! Stock movement history and atomic stock changes.
//!
//! ## Recording a Movement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    record(NewStockMovement)                             │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    SELECT product            ← may be missing                           │
//! │    MovementType::apply       ← IN adds, OUT clamps at 0, ADJUST sets    │
//! │    UPDATE products           ← only if the product exists               │
//! │    INSERT stock_movements    ← always                                   │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! History rows are never updated or deleted.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use stockroom_core::validation::validate_new_movement;
use stockroom_core::{generate_id, NewStockMovement, Product, StockMovement};

const MOVEMENT_COLUMNS: &str = "id, product_id, movement_type, quantity, reason, created_at";

/// Repository for stock movement operations.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Lists all movements, newest first.
    pub async fn list(&self) -> DbResult<Vec<StockMovement>> {
        let sql = format!("SELECT {MOVEMENT_COLUMNS} FROM stock_movements ORDER BY created_at DESC, rowid DESC");
        let movements = sqlx::query_as::<_, StockMovement>(&sql).fetch_all(&self.pool).await?;

        Ok(movements)
    }

    /// Lists the movements of one product, newest first.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<StockMovement>> {
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements WHERE product_id = ?1 ORDER BY created_at DESC, rowid DESC"
        );
        let movements = sqlx::query_as::<_, StockMovement>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }

    /// Inserts a movement row without touching any product.
    pub async fn insert(&self, movement: &StockMovement) -> DbResult<StockMovement> {
        debug!(id = %movement.id, product_id = %movement.product_id, "Inserting movement");

        sqlx::query(
            r#"
            INSERT INTO stock_movements (id, product_id, movement_type, quantity, reason, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.product_id)
        .bind(movement.movement_type)
        .bind(movement.quantity)
        .bind(&movement.reason)
        .bind(movement.created_at)
        .execute(&self.pool)
        .await?;

        Ok(movement.clone())
    }

    /// Records a movement and applies it to its product in one transaction.
    ///
    /// ## Returns
    /// * `Ok((movement, Some(product)))` - Product found and updated
    /// * `Ok((movement, None))` - Unknown product; the movement is still kept
    /// * `Err(DbError::Core(..))` - Payload failed validation
    pub async fn record(&self, data: NewStockMovement) -> DbResult<(StockMovement, Option<Product>)> {
        validate_new_movement(&data)?;

        let now = Utc::now();
        let movement = StockMovement::from_new(generate_id(), data, now);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, description, category_id, supplier_id,
                   current_stock, min_stock, max_stock, unit_price,
                   barcode, location, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(&movement.product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let product = match product {
            Some(mut product) => {
                let before = product.current_stock;
                product.apply_movement(movement.movement_type, movement.quantity, now);

                sqlx::query("UPDATE products SET current_stock = ?2, updated_at = ?3 WHERE id = ?1")
                    .bind(&product.id)
                    .bind(product.current_stock)
                    .bind(product.updated_at)
                    .execute(&mut *tx)
                    .await?;

                debug!(
                    product_id = %product.id,
                    movement = movement.movement_type.as_str(),
                    quantity = movement.quantity,
                    before,
                    after = product.current_stock,
                    "Applied stock movement"
                );
                Some(product)
            }
            None => {
                debug!(product_id = %movement.product_id, "Movement recorded for unknown product");
                None
            }
        };

        sqlx::query(
            r#"
            INSERT INTO stock_movements (id, product_id, movement_type, quantity, reason, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.product_id)
        .bind(movement.movement_type)
        .bind(movement.quantity)
        .bind(&movement.reason)
        .bind(movement.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %movement.id, product_id = %movement.product_id, "Stock movement recorded");
        Ok((movement, product))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{category, product, supplier, test_db};
    use stockroom_core::{CoreError, MovementType};

    #[tokio::test]
    async fn test_record_in_out_adjust() {
        let db = test_db().await;
        let cat = category(&db, "Electronics").await;
        let sup = supplier(&db, "TechSupply Co.").await;
        let p = product(&db, "MBP-16-001", &cat, &sup, 15).await;

        let (_, after_in) = db
            .movements()
            .record(NewStockMovement::new(&p.id, MovementType::In, 5))
            .await
            .unwrap();
        assert_eq!(after_in.unwrap().current_stock, 20);

        let (_, after_out) = db
            .movements()
            .record(NewStockMovement::new(&p.id, MovementType::Out, 50))
            .await
            .unwrap();
        assert_eq!(after_out.unwrap().current_stock, 0);

        let (movement, after_adjust) = db
            .movements()
            .record(NewStockMovement::new(&p.id, MovementType::Adjust, 7).with_reason("stock count"))
            .await
            .unwrap();
        assert_eq!(after_adjust.unwrap().current_stock, 7);
        assert_eq!(movement.reason.as_deref(), Some("stock count"));

        let stored = db.products().get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(stored.current_stock, 7);

        let history = db.movements().list_for_product(&p.id).await.unwrap();
        let types: Vec<MovementType> = history.iter().map(|m| m.movement_type).collect();
        assert_eq!(types, vec![MovementType::Adjust, MovementType::Out, MovementType::In]);
    }

    #[tokio::test]
    async fn test_record_for_unknown_product() {
        let db = test_db().await;

        let (movement, product) = db
            .movements()
            .record(NewStockMovement::new("ghost", MovementType::In, 3))
            .await
            .unwrap();

        assert!(product.is_none());
        let all = db.movements().list().await.unwrap();
        assert_eq!(all, vec![movement]);
    }

    #[tokio::test]
    async fn test_record_rejects_zero_in() {
        let db = test_db().await;
        let err = db
            .movements()
            .record(NewStockMovement::new("p", MovementType::In, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
        assert!(db.movements().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_survives_product_delete() {
        let db = test_db().await;
        let cat = category(&db, "Books").await;
        let sup = supplier(&db, "BookWorld").await;
        let p = product(&db, "JS-GUIDE-001", &cat, &sup, 45).await;

        db.record_movement(NewStockMovement::new(&p.id, MovementType::Out, 5))
            .await
            .unwrap();
        db.products().delete(&p.id).await.unwrap();

        assert_eq!(db.movements().list_for_product(&p.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_leaves_stock_untouched() {
        let db = test_db().await;
        let cat = category(&db, "Books").await;
        let sup = supplier(&db, "BookWorld").await;
        let p = product(&db, "JS-GUIDE-001", &cat, &sup, 45).await;

        let movement = StockMovement::from_new(
            generate_id(),
            NewStockMovement::new(&p.id, MovementType::Out, 45),
            Utc::now(),
        );
        db.movements().insert(&movement).await.unwrap();

        let stored = db.products().get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(stored.current_stock, 45);
        assert_eq!(db.movements().list().await.unwrap(), vec![movement]);
    }
}
