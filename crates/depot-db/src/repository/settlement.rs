//! # Settlement Repository
//!
//! Debt settlements: the recorded partial or full reduction of a
//! customer's running debt, independent of any specific order.
//!
//! A settlement is two writes that must agree: the customer's balance
//! drops, and an immutable audit row is appended with the amount and the
//! customer's name and username frozen at settlement time. Both happen in
//! one transaction so the audit trail always matches the balance.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use depot_core::ledger;
use depot_core::validation::validate_settlement_amount;
use depot_core::{Money, Settlement};

/// Repository for settlement database operations.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    pool: SqlitePool,
}

impl SettlementRepository {
    /// Creates a new SettlementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettlementRepository { pool }
    }

    /// Settles part of a customer's debt.
    ///
    /// ## What This Does
    /// 1. Rejects non-positive amounts and amounts exceeding the current
    ///    debt (a settlement cannot be overpaid)
    /// 2. In one transaction:
    ///    - drops the customer's debt, floored at zero
    ///    - appends the immutable settlement record
    ///
    /// ## Returns
    /// The customer's new debt balance.
    pub async fn settle(&self, customer_id: &str, amount_cents: i64) -> DbResult<Money> {
        validate_settlement_amount(amount_cents)?;

        debug!(customer_id = %customer_id, amount = %amount_cents, "Settling debt");

        let mut tx = self.pool.begin().await?;

        // Snapshot the account: balance plus the name fields frozen onto
        // the audit row.
        let row: Option<(String, String, i64)> = sqlx::query_as(
            "SELECT name, username, total_debt_cents FROM customers WHERE id = ?1",
        )
        .bind(customer_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (name, username, debt_cents) =
            row.ok_or_else(|| DbError::not_found("Customer", customer_id))?;

        let new_debt = ledger::debt_after_settlement(
            Money::from_cents(debt_cents),
            Money::from_cents(amount_cents),
        )?;

        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE customers
            SET total_debt_cents = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(customer_id)
        .bind(new_debt.cents())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO settlements (
                id, customer_id, name, username, amount_cents, settled_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(customer_id)
        .bind(&name)
        .bind(&username)
        .bind(amount_cents)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(customer_id = %customer_id, new_debt = %new_debt, "Debt settled");

        Ok(new_debt)
    }

    /// Lists a customer's settlements, newest first.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<Settlement>> {
        let settlements = sqlx::query_as::<_, Settlement>(
            r#"
            SELECT id, customer_id, name, username, amount_cents, settled_at
            FROM settlements
            WHERE customer_id = ?1
            ORDER BY settled_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(settlements)
    }

    /// Lists all settlements recorded on one calendar day (UTC), newest
    /// first.
    pub async fn list_for_day(&self, day: NaiveDate) -> DbResult<Vec<Settlement>> {
        let start: DateTime<Utc> = day.and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1);

        let settlements = sqlx::query_as::<_, Settlement>(
            r#"
            SELECT id, customer_id, name, username, amount_cents, settled_at
            FROM settlements
            WHERE settled_at >= ?1 AND settled_at < ?2
            ORDER BY settled_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(settlements)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
