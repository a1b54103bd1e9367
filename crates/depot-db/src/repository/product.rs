//! # Product Repository
//!
//! Database operations for catalog products.
//!
//! ## Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  Stock mutations are DELTA updates executed in SQL:                 │
//! │     UPDATE products SET stock = MAX(0, stock + delta)               │
//! │                                                                     │
//! │  - Sales pass a negative delta; the floor keeps stock at zero       │
//! │    when an order asks for more than is available                    │
//! │  - Reversals pass a positive delta and always add back in full      │
//! │                                                                     │
//! │  The order engine performs the same delta updates inside its own    │
//! │  transaction; this repository's adjust_stock covers direct          │
//! │  restocking and corrections.                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use depot_core::validation::{validate_description, validate_product_name};
use depot_core::{Product, TierPrices};

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub brand_id: String,
    pub prices: TierPrices,
    pub stock: i64,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

const SELECT_PRODUCT: &str = r#"
    SELECT id, name, brand_id,
           retail_cents, wholesale_cents, superwholesale_cents,
           stock, image_url, description, created_at, updated_at
    FROM products
"#;

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with generated id
    /// * `Err(DbError::ForeignKeyViolation)` - Brand does not exist
    pub async fn insert(&self, new: NewProduct) -> DbResult<Product> {
        validate_product_name(&new.name)?;
        if let Some(description) = &new.description {
            validate_description(description)?;
        }

        debug!(name = %new.name, "Inserting product");

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            brand_id: new.brand_id,
            prices: new.prices,
            stock: new.stock.max(0),
            image_url: new.image_url,
            description: new.description,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, brand_id,
                retail_cents, wholesale_cents, superwholesale_cents,
                stock, image_url, description, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.brand_id)
        .bind(product.prices.retail_cents)
        .bind(product.prices.wholesale_cents)
        .bind(product.prices.superwholesale_cents)
        .bind(product.stock)
        .bind(&product.image_url)
        .bind(&product.description)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let query = format!("{SELECT_PRODUCT} WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists all products, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let query = format!("{SELECT_PRODUCT} ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Lists products for one brand, ordered by name.
    pub async fn list_by_brand(&self, brand_id: &str) -> DbResult<Vec<Product>> {
        let query = format!("{SELECT_PRODUCT} WHERE brand_id = ?1 ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&query)
            .bind(brand_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Updates an existing product's catalog fields.
    ///
    /// Price edits here do not touch historical orders; order lines carry
    /// their own frozen unit prices.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        validate_product_name(&product.name)?;
        if let Some(description) = &product.description {
            validate_description(description)?;
        }

        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                brand_id = ?3,
                retail_cents = ?4,
                wholesale_cents = ?5,
                superwholesale_cents = ?6,
                stock = ?7,
                image_url = ?8,
                description = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.brand_id)
        .bind(product.prices.retail_cents)
        .bind(product.prices.wholesale_cents)
        .bind(product.prices.superwholesale_cents)
        .bind(product.stock.max(0))
        .bind(&product.image_url)
        .bind(&product.description)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Adjusts product stock by a delta, floored at zero.
    ///
    /// ## Arguments
    /// * `id` - Product ID
    /// * `delta` - Change in stock (negative on sale, positive on restocking)
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = MAX(0, stock + ?2), updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Fails with `ForeignKeyViolation` while order lines still reference
    /// it; historical orders keep their products.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
