//! # Catalog Repository
//!
//! Lookups and maintenance for `catalog_items`.
//!
//! ## Lookup Contract
//! ```text
//! get_by_id("RT101")
//!      │
//!      ├── active row      → Ok(Some(Product { id, name, price_cents }))
//!      ├── retired / none  → Ok(None)            (scan is ignored)
//!      └── store failure   → Err(DbError)        (scan is ignored, logged)
//! ```
//!
//! Only the three fields the basket needs are read; everything else in the
//! row is bookkeeping.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use basket_core::validation::{validate_price_cents, validate_product_name};
use basket_core::{Product, ValidationError};

use crate::error::{DbError, DbResult};

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Resolves a catalog identifier to its active product.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Active item found
    /// * `Ok(None)` - Unknown or retired identifier
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents
            FROM catalog_items
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        debug!(id = %id, found = product.is_some(), "Catalog lookup");
        Ok(product)
    }

    /// Inserts a catalog item or replaces its name and price.
    ///
    /// Upserting a retired item reactivates it.
    ///
    /// ## Errors
    /// * `DbError::Invalid` - Empty id, bad name or negative price
    pub async fn upsert(&self, product: &Product) -> DbResult<()> {
        if product.id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            }
            .into());
        }
        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;

        debug!(id = %product.id, price_cents = product.price_cents, "Upserting catalog item");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO catalog_items (id, name, price_cents, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, 1, ?4, ?4)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                price_cents = excluded.price_cents,
                is_active = 1,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Retires a catalog item. Later lookups for it return `None`.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No item with this id
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Retiring catalog item");

        let result = sqlx::query(
            r#"
            UPDATE catalog_items
            SET is_active = 0, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CatalogItem", id));
        }

        Ok(())
    }

    /// Lists active items sorted by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents
            FROM catalog_items
            WHERE is_active = 1
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts active items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM catalog_items WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
