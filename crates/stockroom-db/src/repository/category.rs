//! # Category Repository
//!
//! Database operations for product categories.
//!
//! A category that still has products cannot be deleted; callers get
//! [`DbError::CategoryInUse`] with the number of products to reassign.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use stockroom_core::validation::{validate_category, validate_new_category};
use stockroom_core::{generate_id, Category, NewCategory};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists categories, most recently created first.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, color
            FROM categories
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Lists categories alphabetically, for pickers.
    pub async fn list_by_name(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, color FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, color FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Validates a payload, assigns an id, and inserts it.
    pub async fn create(&self, data: NewCategory) -> DbResult<Category> {
        validate_new_category(&data)?;
        let category = Category::from_new(generate_id(), data);
        self.insert(&category).await
    }

    /// Inserts a fully-formed category.
    pub async fn insert(&self, category: &Category) -> DbResult<Category> {
        debug!(id = %category.id, name = %category.name, "Inserting category");

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, color, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.color)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(category.clone())
    }

    /// Updates name, description and color.
    ///
    /// ## Returns
    /// * `Err(DbError::Core(..))` - Fields failed validation
    /// * `Err(DbError::NotFound)` - Category doesn't exist
    pub async fn update(&self, category: &Category) -> DbResult<()> {
        validate_category(category)?;
        debug!(id = %category.id, "Updating category");

        let result = sqlx::query("UPDATE categories SET name = ?2, description = ?3, color = ?4 WHERE id = ?1")
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.description)
            .bind(&category.color)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", &category.id));
        }

        Ok(())
    }

    /// Deletes a category that no product references.
    ///
    /// ## Returns
    /// * `Ok(())` - Category deleted
    /// * `Err(DbError::CategoryInUse)` - Products are still assigned
    /// * `Err(DbError::NotFound)` - Category doesn't exist
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if products > 0 {
            debug!(id = %id, products = products, "Category still in use");
            return Err(DbError::CategoryInUse {
                id: id.to_string(),
                products,
            });
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %id, "Category deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
