//! # Order Repository
//!
//! The order engine: create, edit, delete and status transitions for
//! orders, together with the debt and stock bookkeeping they imply.
//!
//! ## Compound Mutations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 One Order Operation = One Transaction               │
//! │                                                                     │
//! │  create(order)                                                      │
//! │    ├── read   customer debt, product stocks      (validation)       │
//! │    ├── write  order row + order lines                               │
//! │    ├── write  product stocks (floored at zero)                      │
//! │    └── write  customer debt                                         │
//! │                                                                     │
//! │  edit(order)  =  reverse(old) ∘ apply(new)                          │
//! │    ├── write  stock restored for old lines (uncapped)               │
//! │    ├── write  debt reversed on the ORIGINAL customer                │
//! │    ├── write  order row + replaced lines                            │
//! │    ├── write  stock consumed for new lines (floored)                │
//! │    └── write  debt applied on the NEW customer                      │
//! │                                                                     │
//! │  delete(order)  =  reverse(old)                                     │
//! │                                                                     │
//! │  All of it commits or none of it does. A commit failure surfaces    │
//! │  as DbError::TransactionFailed and leaves no partial state.         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Debt and stock are only ever read and written inside these transaction
//! boundaries, so two concurrent operations on the same customer or
//! product cannot interleave a read-modify-write.
//!
//! The arithmetic itself lives in `depot_core::ledger`; this module owns
//! the unit-of-work and the SQL.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use depot_core::ledger;
use depot_core::validation::validate_order_lines;
use depot_core::{CoreError, Money, Order, OrderLine, OrderStatus};

/// Input for creating or editing an order.
///
/// Unit prices arrive resolved: the caller (admin entry or checkout flow)
/// has already picked the customer's tier price or an operator override.
/// The engine freezes them onto the lines and derives the total itself.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: String,
    pub lines: Vec<OrderLine>,
    /// Amount paid up front, in cents. Negative values are treated as zero.
    pub paid_cents: i64,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

/// Order row without its lines; lines are fetched and attached separately.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    customer_id: String,
    total_price_cents: i64,
    paid_cents: i64,
    status: OrderStatus,
    ordered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> Order {
        Order {
            id: self.id,
            customer_id: self.customer_id,
            lines,
            total_price_cents: self.total_price_cents,
            paid_cents: self.paid_cents,
            status: self.status,
            ordered_at: self.ordered_at,
            updated_at: self.updated_at,
        }
    }
}

const SELECT_ORDER: &str = r#"
    SELECT id, customer_id, total_price_cents, paid_cents,
           status, ordered_at, updated_at
    FROM orders
"#;

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Creates an order and applies its debt and stock effects.
    ///
    /// ## What This Does
    /// 1. Validates the line items (non-empty, quantities, unit prices)
    /// 2. In one transaction:
    ///    - confirms the customer and every referenced product exist
    ///    - derives the total from the lines, clamps the paid amount
    ///    - inserts the order (always `Pending`) and its lines
    ///    - decrements each product's stock, floored at zero
    ///    - adjusts the customer's debt: underpayment adds the remainder,
    ///      overpayment pays existing debt down to at most zero (excess
    ///      beyond the debt is discarded, not carried as credit)
    ///
    /// ## Errors
    /// * `DbError::Domain` - Validation failed; nothing was written
    /// * `DbError::NotFound` - Customer or a product id does not exist
    /// * `DbError::TransactionFailed` - Commit failed; nothing was written
    pub async fn create(&self, new: NewOrder) -> DbResult<Order> {
        validate_order_lines(&new.lines)?;

        debug!(customer_id = %new.customer_id, lines = new.lines.len(), "Creating order");

        let mut tx = self.pool.begin().await?;

        // Validation reads: all lookups happen before the first write.
        let debt = fetch_customer_debt(&mut tx, &new.customer_id).await?;
        let stocks = fetch_line_stocks(&mut tx, &new.lines).await?;

        let total = ledger::order_total(&new.lines);
        let paid = ledger::clamp_paid(new.paid_cents);
        let new_debt = ledger::debt_after_order(debt, total, paid);

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            customer_id: new.customer_id,
            lines: new.lines,
            total_price_cents: total.cents(),
            paid_cents: paid.cents(),
            status: OrderStatus::Pending,
            ordered_at: now,
            updated_at: now,
        };

        insert_order_row(&mut tx, &order).await?;
        insert_lines(&mut tx, &order.id, &order.lines).await?;
        consume_stock(&mut tx, &order.lines, stocks).await?;
        update_customer_debt(&mut tx, &order.customer_id, new_debt).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(order_id = %order.id, total = %total, paid = %paid, "Order created");

        Ok(order)
    }

    // =========================================================================
    // Edit
    // =========================================================================

    /// Replaces an order's customer, lines and paid amount, reconciling
    /// debt and stock so the net effect is as if only the edited order had
    /// ever existed.
    ///
    /// ## Reverse, Then Apply
    /// The original order's effects are undone first: stock restored
    /// uncapped, debt reversal applied to the customer the order was
    /// originally placed against. The new lines are then applied with the
    /// same arithmetic as create, against the (possibly different) new
    /// customer. Reassigning an order between customers therefore moves
    /// the debt with it instead of charging both accounts.
    pub async fn edit(&self, order_id: &str, new: NewOrder) -> DbResult<Order> {
        validate_order_lines(&new.lines)?;

        debug!(order_id = %order_id, customer_id = %new.customer_id, "Editing order");

        let mut tx = self.pool.begin().await?;

        // Validation reads.
        let old = fetch_order_row(&mut tx, order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))?;
        let old_lines = fetch_lines(&mut tx, order_id).await?;

        let orig_debt = fetch_customer_debt(&mut tx, &old.customer_id).await?;
        let same_customer = new.customer_id == old.customer_id;
        let new_customer_debt = if same_customer {
            None
        } else {
            Some(fetch_customer_debt(&mut tx, &new.customer_id).await?)
        };
        let mut stocks = fetch_line_stocks(&mut tx, &new.lines).await?;

        // Reverse phase: restore stock (uncapped) and undo the original
        // order's debt delta on its original customer.
        restore_stock(&mut tx, &old_lines).await?;
        for line in &old_lines {
            if let Some(stock) = stocks.get_mut(&line.product_id) {
                *stock = ledger::stock_after_restock(*stock, line.quantity);
            }
        }

        let reversed = ledger::debt_after_reversal(
            orig_debt,
            Money::from_cents(old.total_price_cents),
            Money::from_cents(old.paid_cents),
        );

        // Apply phase: same arithmetic as create, on top of the reversal.
        let total = ledger::order_total(&new.lines);
        let paid = ledger::clamp_paid(new.paid_cents);

        match new_customer_debt {
            // Same customer: the apply continues from the reversed balance.
            None => {
                let final_debt = ledger::debt_after_order(reversed, total, paid);
                update_customer_debt(&mut tx, &old.customer_id, final_debt).await?;
            }
            // Reassigned: the original account keeps the reversal, the new
            // account takes the order's debt delta.
            Some(debt) => {
                update_customer_debt(&mut tx, &old.customer_id, reversed).await?;
                let final_debt = ledger::debt_after_order(debt, total, paid);
                update_customer_debt(&mut tx, &new.customer_id, final_debt).await?;
            }
        }

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                customer_id = ?2,
                total_price_cents = ?3,
                paid_cents = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .bind(&new.customer_id)
        .bind(total.cents())
        .bind(paid.cents())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        sqlx::query("DELETE FROM order_lines WHERE order_id = ?1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        insert_lines(&mut tx, order_id, &new.lines).await?;

        consume_stock(&mut tx, &new.lines, stocks).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(order_id = %order_id, total = %total, paid = %paid, "Order edited");

        Ok(Order {
            id: old.id,
            customer_id: new.customer_id,
            lines: new.lines,
            total_price_cents: total.cents(),
            paid_cents: paid.cents(),
            status: old.status,
            ordered_at: old.ordered_at,
            updated_at: now,
        })
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Deletes an order, undoing its debt and stock effects.
    ///
    /// This is the reverse phase of edit with nothing reapplied: stock is
    /// restored uncapped, the customer's debt drops by the unpaid part of
    /// the order, and the order row goes away (lines cascade).
    pub async fn delete(&self, order_id: &str) -> DbResult<()> {
        debug!(order_id = %order_id, "Deleting order");

        let mut tx = self.pool.begin().await?;

        let old = fetch_order_row(&mut tx, order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))?;
        let old_lines = fetch_lines(&mut tx, order_id).await?;
        let debt = fetch_customer_debt(&mut tx, &old.customer_id).await?;

        restore_stock(&mut tx, &old_lines).await?;

        let reversed = ledger::debt_after_reversal(
            debt,
            Money::from_cents(old.total_price_cents),
            Money::from_cents(old.paid_cents),
        );
        update_customer_debt(&mut tx, &old.customer_id, reversed).await?;

        sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(order_id = %order_id, "Order deleted");

        Ok(())
    }

    // =========================================================================
    // Status Transition
    // =========================================================================

    /// Moves an order between statuses.
    ///
    /// The only modeled transition is `Pending -> Confirmed`; setting the
    /// current status again is an idempotent no-op, and a confirmed order
    /// never returns to pending. Status is a pure label change with no
    /// stock or debt effect.
    pub async fn set_status(&self, order_id: &str, status: OrderStatus) -> DbResult<Order> {
        let current = self
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))?;

        if current.status == status {
            return Ok(current);
        }

        if current.status == OrderStatus::Confirmed && status == OrderStatus::Pending {
            return Err(DbError::Domain(CoreError::InvalidStatusTransition {
                order_id: order_id.to_string(),
                from: current.status,
                to: status,
            }));
        }

        let now = Utc::now();

        // Guard on the old status so a concurrent confirm cannot be undone.
        let result = sqlx::query(
            r#"
            UPDATE orders SET status = ?2, updated_at = ?3
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(order_id)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order (pending)", order_id));
        }

        debug!(order_id = %order_id, status = %status, "Order status updated");

        Ok(Order {
            status,
            updated_at: now,
            ..current
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Gets an order by its ID, lines included.
    pub async fn get_by_id(&self, order_id: &str) -> DbResult<Option<Order>> {
        let query = format!("{SELECT_ORDER} WHERE id = ?1");
        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT product_id, quantity, unit_price_cents
            FROM order_lines
            WHERE order_id = ?1
            ORDER BY line_no
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(row.into_order(lines)))
    }

    /// Lists orders, newest first, optionally filtered to one customer.
    pub async fn list(&self, customer_id: Option<&str>) -> DbResult<Vec<Order>> {
        let rows: Vec<OrderRow> = match customer_id {
            Some(cid) => {
                let query = format!("{SELECT_ORDER} WHERE customer_id = ?1 ORDER BY ordered_at DESC");
                sqlx::query_as(&query).bind(cid).fetch_all(&self.pool).await?
            }
            None => {
                let query = format!("{SELECT_ORDER} ORDER BY ordered_at DESC");
                sqlx::query_as(&query).fetch_all(&self.pool).await?
            }
        };

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = sqlx::query_as::<_, OrderLine>(
                r#"
                SELECT product_id, quantity, unit_price_cents
                FROM order_lines
                WHERE order_id = ?1
                ORDER BY line_no
                "#,
            )
            .bind(&row.id)
            .fetch_all(&self.pool)
            .await?;
            orders.push(row.into_order(lines));
        }

        Ok(orders)
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================
// Every helper runs on the caller's connection so the whole compound
// operation shares one transaction.

/// Reads a customer's debt balance, or NotFound.
async fn fetch_customer_debt(conn: &mut SqliteConnection, customer_id: &str) -> DbResult<Money> {
    let debt: Option<i64> =
        sqlx::query_scalar("SELECT total_debt_cents FROM customers WHERE id = ?1")
            .bind(customer_id)
            .fetch_optional(&mut *conn)
            .await?;

    debt.map(Money::from_cents)
        .ok_or_else(|| DbError::not_found("Customer", customer_id))
}

/// Reads an order row without its lines.
async fn fetch_order_row(conn: &mut SqliteConnection, order_id: &str) -> DbResult<Option<OrderRow>> {
    let query = format!("{SELECT_ORDER} WHERE id = ?1");
    let row = sqlx::query_as::<_, OrderRow>(&query)
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row)
}

/// Reads an order's lines in line order.
async fn fetch_lines(conn: &mut SqliteConnection, order_id: &str) -> DbResult<Vec<OrderLine>> {
    let lines = sqlx::query_as::<_, OrderLine>(
        r#"
        SELECT product_id, quantity, unit_price_cents
        FROM order_lines
        WHERE order_id = ?1
        ORDER BY line_no
        "#,
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(lines)
}

/// Reads the current stock of every product referenced by the lines.
///
/// Doubles as the existence check: a missing product id fails here, naming
/// the offending id, before anything has been written.
async fn fetch_line_stocks(
    conn: &mut SqliteConnection,
    lines: &[OrderLine],
) -> DbResult<HashMap<String, i64>> {
    let mut stocks = HashMap::with_capacity(lines.len());

    for line in lines {
        if stocks.contains_key(&line.product_id) {
            continue;
        }

        let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(&line.product_id)
            .fetch_optional(&mut *conn)
            .await?;

        let stock = stock.ok_or_else(|| DbError::not_found("Product", &line.product_id))?;
        stocks.insert(line.product_id.clone(), stock);
    }

    Ok(stocks)
}

/// Inserts the order row.
async fn insert_order_row(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO orders (
            id, customer_id, total_price_cents, paid_cents,
            status, ordered_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&order.id)
    .bind(&order.customer_id)
    .bind(order.total_price_cents)
    .bind(order.paid_cents)
    .bind(order.status)
    .bind(order.ordered_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Inserts the order's lines, preserving their position.
async fn insert_lines(
    conn: &mut SqliteConnection,
    order_id: &str,
    lines: &[OrderLine],
) -> DbResult<()> {
    for (line_no, line) in lines.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO order_lines (
                id, order_id, line_no, product_id, quantity, unit_price_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(order_id)
        .bind(line_no as i64)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Decrements stock for each line, floored at zero.
///
/// `stocks` holds the levels read during validation (with any reversal
/// restores already folded in); it is only used to notice when an order
/// asks for more than is available. The sale still goes through; callers
/// watching the logs see the backorder signal.
async fn consume_stock(
    conn: &mut SqliteConnection,
    lines: &[OrderLine],
    mut stocks: HashMap<String, i64>,
) -> DbResult<()> {
    for line in lines {
        if let Some(available) = stocks.get_mut(&line.product_id) {
            if line.quantity > *available {
                warn!(
                    product_id = %line.product_id,
                    requested = line.quantity,
                    available = *available,
                    "Order quantity exceeds stock, flooring at zero"
                );
            }
            *available = ledger::stock_after_sale(*available, line.quantity);
        }

        sqlx::query(
            r#"
            UPDATE products
            SET stock = MAX(0, stock - ?2), updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Restores stock for each line. Restores are uncapped.
async fn restore_stock(conn: &mut SqliteConnection, lines: &[OrderLine]) -> DbResult<()> {
    for line in lines {
        sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Writes a customer's debt balance.
async fn update_customer_debt(
    conn: &mut SqliteConnection,
    customer_id: &str,
    debt: Money,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE customers
        SET total_debt_cents = ?2, updated_at = ?3
        WHERE id = ?1
        "#,
    )
    .bind(customer_id)
    .bind(debt.cents())
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Customer", customer_id));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::brand::NewBrand;
    use crate::repository::customer::NewCustomer;
    use crate::repository::product::NewProduct;
    use depot_core::{Tier, TierPrices};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_customer(db: &Database, username: &str) -> String {
        db.customers()
            .insert(NewCustomer {
                username: username.to_string(),
                name: format!("{username} store"),
                phone: None,
                tier: Tier::Wholesale,
            })
            .await
            .unwrap()
            .id
    }

    /// Creates a product with the given stock and a flat 25.00 price.
    async fn seed_product(db: &Database, name: &str, stock: i64) -> String {
        let brand_id = match db.brands().list().await.unwrap().first() {
            Some(brand) => brand.id.clone(),
            None => {
                db.brands()
                    .insert(NewBrand {
                        name: "Atlas Foods".to_string(),
                        logo_url: None,
                    })
                    .await
                    .unwrap()
                    .id
            }
        };

        db.products()
            .insert(NewProduct {
                name: name.to_string(),
                brand_id,
                prices: TierPrices {
                    retail_cents: 3000,
                    wholesale_cents: 2500,
                    superwholesale_cents: 2200,
                },
                stock,
                image_url: None,
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn debt_of(db: &Database, customer_id: &str) -> i64 {
        db.customers()
            .get_by_id(customer_id)
            .await
            .unwrap()
            .unwrap()
            .total_debt_cents
    }

    async fn stock_of(db: &Database, product_id: &str) -> i64 {
        db.products()
            .get_by_id(product_id)
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    fn line(product_id: &str, quantity: i64, unit_price_cents: i64) -> OrderLine {
        OrderLine {
            product_id: product_id.to_string(),
            quantity,
            unit_price_cents,
        }
    }

    #[tokio::test]
    async fn test_create_computes_total_and_applies_effects() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;
        let product_id = seed_product(&db, "Oil 5L", 10).await;

        // 2 units at 25.00, paying 30.00: total 50.00, debt 20.00, stock 8.
        let order = db
            .orders()
            .create(NewOrder {
                customer_id: customer_id.clone(),
                lines: vec![line(&product_id, 2, 2500)],
                paid_cents: 3000,
            })
            .await
            .unwrap();

        assert_eq!(order.total_price_cents, 5000);
        assert_eq!(order.paid_cents, 3000);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(debt_of(&db, &customer_id).await, 2000);
        assert_eq!(stock_of(&db, &product_id).await, 8);

        // The stored order matches what the engine returned.
        let stored = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.total_price_cents, 5000);
        assert_eq!(stored.lines, order.lines);
    }

    #[tokio::test]
    async fn test_create_total_is_derived_from_lines() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;
        let a = seed_product(&db, "Oil 5L", 50).await;
        let b = seed_product(&db, "Flour 25kg", 50).await;

        let order = db
            .orders()
            .create(NewOrder {
                customer_id,
                lines: vec![line(&a, 3, 1000), line(&b, 2, 2500)],
                paid_cents: 0,
            })
            .await
            .unwrap();

        assert_eq!(order.total_price_cents, 3 * 1000 + 2 * 2500);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_lines() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;

        let err = db
            .orders()
            .create(NewOrder {
                customer_id: customer_id.clone(),
                lines: vec![],
                paid_cents: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Domain(_)));
        assert_eq!(debt_of(&db, &customer_id).await, 0);
        assert!(db.orders().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_unknown_customer_writes_nothing() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Oil 5L", 10).await;

        let err = db
            .orders()
            .create(NewOrder {
                customer_id: "no-such-customer".to_string(),
                lines: vec![line(&product_id, 2, 2500)],
                paid_cents: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(stock_of(&db, &product_id).await, 10);
        assert!(db.orders().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_unknown_product_names_the_id_and_writes_nothing() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;
        let product_id = seed_product(&db, "Oil 5L", 10).await;

        let err = db
            .orders()
            .create(NewOrder {
                customer_id: customer_id.clone(),
                lines: vec![line(&product_id, 1, 2500), line("ghost-product", 1, 100)],
                paid_cents: 0,
            })
            .await
            .unwrap_err();

        match err {
            DbError::NotFound { entity, id } => {
                assert_eq!(entity, "Product");
                assert_eq!(id, "ghost-product");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }

        // The valid line was not partially applied.
        assert_eq!(stock_of(&db, &product_id).await, 10);
        assert_eq!(debt_of(&db, &customer_id).await, 0);
        assert!(db.orders().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_clamps_negative_paid() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;
        let product_id = seed_product(&db, "Oil 5L", 10).await;

        let order = db
            .orders()
            .create(NewOrder {
                customer_id: customer_id.clone(),
                lines: vec![line(&product_id, 1, 2500)],
                paid_cents: -500,
            })
            .await
            .unwrap();

        assert_eq!(order.paid_cents, 0);
        assert_eq!(debt_of(&db, &customer_id).await, 2500);
    }

    #[tokio::test]
    async fn test_overpayment_pays_down_debt_and_floors_at_zero() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;
        let product_id = seed_product(&db, "Oil 5L", 100).await;

        // Build up 30.00 of debt.
        db.orders()
            .create(NewOrder {
                customer_id: customer_id.clone(),
                lines: vec![line(&product_id, 2, 1500)],
                paid_cents: 0,
            })
            .await
            .unwrap();
        assert_eq!(debt_of(&db, &customer_id).await, 3000);

        // Pay 50.00 over the next order's total: the floor discards the
        // 20.00 of excess beyond the existing debt.
        db.orders()
            .create(NewOrder {
                customer_id: customer_id.clone(),
                lines: vec![line(&product_id, 1, 1000)],
                paid_cents: 6000,
            })
            .await
            .unwrap();

        assert_eq!(debt_of(&db, &customer_id).await, 0);
    }

    #[tokio::test]
    async fn test_overselling_floors_stock_at_zero() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;
        let product_id = seed_product(&db, "Oil 5L", 3).await;

        // The sale goes through even though only 3 are in stock.
        let order = db
            .orders()
            .create(NewOrder {
                customer_id,
                lines: vec![line(&product_id, 5, 2500)],
                paid_cents: 0,
            })
            .await
            .unwrap();

        assert_eq!(order.total_price_cents, 5 * 2500);
        assert_eq!(stock_of(&db, &product_id).await, 0);
    }

    #[tokio::test]
    async fn test_edit_same_customer_is_reverse_then_apply() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;
        let product_id = seed_product(&db, "Oil 5L", 10).await;

        // Create: 2 x 25.00 paying 30.00 -> debt 20.00, stock 8.
        let order = db
            .orders()
            .create(NewOrder {
                customer_id: customer_id.clone(),
                lines: vec![line(&product_id, 2, 2500)],
                paid_cents: 3000,
            })
            .await
            .unwrap();
        assert_eq!(debt_of(&db, &customer_id).await, 2000);
        assert_eq!(stock_of(&db, &product_id).await, 8);

        // Edit to 1 x 25.00 paying 25.00:
        // reverse -> stock 10, debt 0; apply -> debt 0, stock 9.
        let edited = db
            .orders()
            .edit(
                &order.id,
                NewOrder {
                    customer_id: customer_id.clone(),
                    lines: vec![line(&product_id, 1, 2500)],
                    paid_cents: 2500,
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.total_price_cents, 2500);
        assert_eq!(debt_of(&db, &customer_id).await, 0);
        assert_eq!(stock_of(&db, &product_id).await, 9);

        // Same end state as if only the edited order had ever been placed.
        let stored = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.lines, vec![line(&product_id, 1, 2500)]);
        assert_eq!(stored.paid_cents, 2500);
    }

    #[tokio::test]
    async fn test_edit_worked_example_returns_debt_to_zero() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;
        let product_id = seed_product(&db, "Oil 5L", 100).await;

        // Create total 100.00 paid 40.00 -> debt 60.00.
        let order = db
            .orders()
            .create(NewOrder {
                customer_id: customer_id.clone(),
                lines: vec![line(&product_id, 4, 2500)],
                paid_cents: 4000,
            })
            .await
            .unwrap();
        assert_eq!(debt_of(&db, &customer_id).await, 6000);

        // Edit to total 80.00 paid 80.00 -> debt back to 0.
        db.orders()
            .edit(
                &order.id,
                NewOrder {
                    customer_id: customer_id.clone(),
                    lines: vec![line(&product_id, 4, 2000)],
                    paid_cents: 8000,
                },
            )
            .await
            .unwrap();
        assert_eq!(debt_of(&db, &customer_id).await, 0);
    }

    #[tokio::test]
    async fn test_edit_reassignment_moves_debt_between_customers() {
        let db = test_db().await;
        let first = seed_customer(&db, "east").await;
        let second = seed_customer(&db, "west").await;
        let product_id = seed_product(&db, "Oil 5L", 100).await;

        // Order against the first customer: debt 60.00.
        let order = db
            .orders()
            .create(NewOrder {
                customer_id: first.clone(),
                lines: vec![line(&product_id, 4, 2500)],
                paid_cents: 4000,
            })
            .await
            .unwrap();
        assert_eq!(debt_of(&db, &first).await, 6000);

        // Reassign to the second customer with the same lines: the first
        // account is made whole, the second takes the debt.
        db.orders()
            .edit(
                &order.id,
                NewOrder {
                    customer_id: second.clone(),
                    lines: vec![line(&product_id, 4, 2500)],
                    paid_cents: 4000,
                },
            )
            .await
            .unwrap();

        assert_eq!(debt_of(&db, &first).await, 0);
        assert_eq!(debt_of(&db, &second).await, 6000);

        // Stock is net unchanged: restored 4, consumed 4.
        assert_eq!(stock_of(&db, &product_id).await, 96);
    }

    #[tokio::test]
    async fn test_edit_unknown_product_leaves_everything_untouched() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;
        let product_id = seed_product(&db, "Oil 5L", 10).await;

        let order = db
            .orders()
            .create(NewOrder {
                customer_id: customer_id.clone(),
                lines: vec![line(&product_id, 2, 2500)],
                paid_cents: 3000,
            })
            .await
            .unwrap();

        let err = db
            .orders()
            .edit(
                &order.id,
                NewOrder {
                    customer_id: customer_id.clone(),
                    lines: vec![line("ghost-product", 1, 100)],
                    paid_cents: 0,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // The failed edit neither restored stock nor touched debt.
        assert_eq!(stock_of(&db, &product_id).await, 8);
        assert_eq!(debt_of(&db, &customer_id).await, 2000);

        let stored = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.lines, vec![line(&product_id, 2, 2500)]);
    }

    #[tokio::test]
    async fn test_delete_restores_stock_and_debt() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;
        let product_id = seed_product(&db, "Oil 5L", 20).await;

        // Total 150.00 paid 50.00 -> debt 100.00, stock 14.
        let order = db
            .orders()
            .create(NewOrder {
                customer_id: customer_id.clone(),
                lines: vec![line(&product_id, 6, 2500)],
                paid_cents: 5000,
            })
            .await
            .unwrap();
        assert_eq!(debt_of(&db, &customer_id).await, 10000);
        assert_eq!(stock_of(&db, &product_id).await, 14);

        db.orders().delete(&order.id).await.unwrap();

        assert_eq!(debt_of(&db, &customer_id).await, 0);
        assert_eq!(stock_of(&db, &product_id).await, 20);
        assert!(db.orders().get_by_id(&order.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_order() {
        let db = test_db().await;
        let err = db.orders().delete("no-such-order").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;
        let product_id = seed_product(&db, "Oil 5L", 10).await;

        let order = db
            .orders()
            .create(NewOrder {
                customer_id: customer_id.clone(),
                lines: vec![line(&product_id, 1, 2500)],
                paid_cents: 2500,
            })
            .await
            .unwrap();

        // Confirming a pending order works and touches neither debt nor stock.
        let confirmed = db
            .orders()
            .set_status(&order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);
        assert_eq!(debt_of(&db, &customer_id).await, 0);
        assert_eq!(stock_of(&db, &product_id).await, 9);

        // Confirming again is an idempotent no-op.
        let again = db
            .orders()
            .set_status(&order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(again.status, OrderStatus::Confirmed);

        // A confirmed order never returns to pending.
        let err = db
            .orders()
            .set_status(&order.id, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidStatusTransition { .. })
        ));
        let stored = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_list_with_customer_filter() {
        let db = test_db().await;
        let first = seed_customer(&db, "east").await;
        let second = seed_customer(&db, "west").await;
        let product_id = seed_product(&db, "Oil 5L", 100).await;

        for customer_id in [&first, &first, &second] {
            db.orders()
                .create(NewOrder {
                    customer_id: customer_id.clone(),
                    lines: vec![line(&product_id, 1, 2500)],
                    paid_cents: 2500,
                })
                .await
                .unwrap();
        }

        assert_eq!(db.orders().list(None).await.unwrap().len(), 3);
        assert_eq!(db.orders().list(Some(first.as_str())).await.unwrap().len(), 2);
        assert_eq!(db.orders().list(Some(second.as_str())).await.unwrap().len(), 1);
        assert!(db.orders().list(Some("nobody")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stock_never_negative_across_lifecycle() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;
        let product_id = seed_product(&db, "Oil 5L", 4).await;

        let order = db
            .orders()
            .create(NewOrder {
                customer_id: customer_id.clone(),
                lines: vec![line(&product_id, 9, 1000)],
                paid_cents: 0,
            })
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &product_id).await, 0);

        // Deleting restores the full ordered quantity even though the
        // decrement had been floored.
        db.orders().delete(&order.id).await.unwrap();
        assert_eq!(stock_of(&db, &product_id).await, 13);
    }

    #[tokio::test]
    async fn test_multi_line_same_product() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "east").await;
        let product_id = seed_product(&db, "Oil 5L", 10).await;

        // Two lines for the same product, different unit prices.
        let order = db
            .orders()
            .create(NewOrder {
                customer_id,
                lines: vec![line(&product_id, 2, 2500), line(&product_id, 3, 2000)],
                paid_cents: 0,
            })
            .await
            .unwrap();

        assert_eq!(order.total_price_cents, 2 * 2500 + 3 * 2000);
        assert_eq!(stock_of(&db, &product_id).await, 5);

        let stored = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.lines.len(), 2);
        assert_eq!(stored.lines[0].unit_price_cents, 2500);
        assert_eq!(stored.lines[1].unit_price_cents, 2000);
    }
}
