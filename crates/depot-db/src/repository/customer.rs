//! # Customer Repository
//!
//! Database operations for customer accounts.
//!
//! The running debt balance lives on the customer row, but it is mutated
//! only by the order engine and the settlement repository inside their
//! transaction boundaries. This repository manages the account itself.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use depot_core::validation::{validate_customer_name, validate_phone, validate_username};
use depot_core::{Customer, Tier};

/// Input for creating a customer account.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub username: String,
    pub name: String,
    pub phone: Option<String>,
    pub tier: Tier,
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer account with a zero debt balance.
    ///
    /// ## Returns
    /// * `Ok(Customer)` - Inserted customer with generated id
    /// * `Err(DbError::UniqueViolation)` - Username already exists
    pub async fn insert(&self, new: NewCustomer) -> DbResult<Customer> {
        validate_username(&new.username)?;
        validate_customer_name(&new.name)?;
        if let Some(phone) = &new.phone {
            validate_phone(phone)?;
        }

        debug!(username = %new.username, "Inserting customer");

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            username: new.username,
            name: new.name,
            phone: new.phone,
            tier: new.tier,
            total_debt_cents: 0,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO customers (
                id, username, name, phone, tier,
                total_debt_cents, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.username)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(customer.tier)
        .bind(customer.total_debt_cents)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, username, name, phone, tier,
                   total_debt_cents, created_at, updated_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by username.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, username, name, phone, tier,
                   total_debt_cents, created_at, updated_at
            FROM customers
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists all customers, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, username, name, phone, tier,
                   total_debt_cents, created_at, updated_at
            FROM customers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Updates a customer's profile fields (username, name, phone, tier).
    ///
    /// The debt balance is deliberately NOT updatable here; it changes only
    /// through the order engine and the settlement repository.
    pub async fn update_profile(&self, customer: &Customer) -> DbResult<()> {
        validate_username(&customer.username)?;
        validate_customer_name(&customer.name)?;
        if let Some(phone) = &customer.phone {
            validate_phone(phone)?;
        }

        debug!(id = %customer.id, "Updating customer profile");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE customers SET
                username = ?2,
                name = ?3,
                phone = ?4,
                tier = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.username)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(customer.tier)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", &customer.id));
        }

        Ok(())
    }

    /// Deletes a customer account.
    ///
    /// Fails with `ForeignKeyViolation` while orders or settlements still
    /// reference the account; history is never silently orphaned.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Counts customer accounts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
