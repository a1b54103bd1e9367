//! # Brand Repository
//!
//! Database operations for product brands. Brands carry no lifecycle
//! coupling to orders beyond being referenced by products.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use depot_core::validation::validate_brand_name;
use depot_core::Brand;

/// Input for creating a brand.
#[derive(Debug, Clone)]
pub struct NewBrand {
    pub name: String,
    pub logo_url: Option<String>,
}

/// Repository for brand database operations.
#[derive(Debug, Clone)]
pub struct BrandRepository {
    pool: SqlitePool,
}

impl BrandRepository {
    /// Creates a new BrandRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BrandRepository { pool }
    }

    /// Inserts a new brand.
    ///
    /// ## Returns
    /// * `Ok(Brand)` - Inserted brand with generated id
    /// * `Err(DbError::UniqueViolation)` - Brand name already exists
    pub async fn insert(&self, new: NewBrand) -> DbResult<Brand> {
        validate_brand_name(&new.name)?;

        debug!(name = %new.name, "Inserting brand");

        let now = Utc::now();
        let brand = Brand {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            logo_url: new.logo_url,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO brands (id, name, logo_url, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&brand.id)
        .bind(&brand.name)
        .bind(&brand.logo_url)
        .bind(brand.created_at)
        .bind(brand.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(brand)
    }

    /// Gets a brand by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>(
            "SELECT id, name, logo_url, created_at, updated_at FROM brands WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(brand)
    }

    /// Lists all brands, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Brand>> {
        let brands = sqlx::query_as::<_, Brand>(
            "SELECT id, name, logo_url, created_at, updated_at FROM brands ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(brands)
    }

    /// Deletes a brand.
    ///
    /// Fails with `ForeignKeyViolation` while products still reference it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting brand");

        let result = sqlx::query("DELETE FROM brands WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Brand", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
