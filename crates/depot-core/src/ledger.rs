//! # Ledger Module
//!
//! The debt and stock arithmetic shared by every order operation.
//!
//! ## One Set of Rules, Three Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Order Lifecycle Arithmetic                      │
//! │                                                                     │
//! │  CREATE                                                             │
//! │    total = Σ quantity × unit_price                                  │
//! │    debt  = debt_after_order(debt, total, paid)                      │
//! │    stock = stock_after_sale(stock, quantity)     (floor at 0)       │
//! │                                                                     │
//! │  EDIT  =  reverse(old) ∘ apply(new)                                 │
//! │    debt  = debt_after_reversal(debt, old_total, old_paid)           │
//! │    stock = stock_after_restock(stock, old_quantity)  (uncapped)     │
//! │    ... then the CREATE arithmetic with the new lines                │
//! │                                                                     │
//! │  DELETE  =  reverse(old), nothing reapplied                         │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure. The storage layer calls them inside its
//! transaction boundary and persists the results.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::OrderLine;

// =============================================================================
// Order Totals
// =============================================================================

/// Computes an order total from its line items.
///
/// The total is always derived from the lines; it is never accepted from a
/// caller. Unit prices are the frozen per-line prices, not current catalog
/// prices.
///
/// ## Example
/// ```rust
/// use depot_core::ledger::order_total;
/// use depot_core::types::OrderLine;
///
/// let lines = vec![
///     OrderLine { product_id: "a".into(), quantity: 2, unit_price_cents: 2500 },
///     OrderLine { product_id: "b".into(), quantity: 1, unit_price_cents: 1000 },
/// ];
/// assert_eq!(order_total(&lines).cents(), 6000);
/// ```
pub fn order_total(lines: &[OrderLine]) -> Money {
    lines
        .iter()
        .fold(Money::zero(), |acc, line| acc + line.line_total())
}

/// Clamps a caller-supplied paid amount to be non-negative.
///
/// Negative input is treated as zero rather than rejected.
#[inline]
pub fn clamp_paid(paid_cents: i64) -> Money {
    Money::from_cents(paid_cents).clamp_non_negative()
}

// =============================================================================
// Debt Arithmetic
// =============================================================================

/// Computes the customer's debt after an order is applied.
///
/// If the payment exceeds the order total, the excess pays down existing
/// debt, floored at zero. Excess beyond the existing debt is discarded,
/// not carried as credit. Otherwise the unpaid remainder is added to the
/// debt.
///
/// ## Example
/// ```rust
/// use depot_core::ledger::debt_after_order;
/// use depot_core::money::Money;
///
/// // Underpaid order: debt grows by the remainder
/// let debt = debt_after_order(
///     Money::zero(),
///     Money::from_cents(5000),
///     Money::from_cents(3000),
/// );
/// assert_eq!(debt.cents(), 2000);
///
/// // Overpayment pays down debt, floored at zero
/// let debt = debt_after_order(
///     Money::from_cents(3000),
///     Money::from_cents(1000),
///     Money::from_cents(6000),
/// );
/// assert_eq!(debt.cents(), 0);
/// ```
pub fn debt_after_order(debt: Money, total: Money, paid: Money) -> Money {
    let extra = paid - total;
    if extra.is_positive() {
        (debt - extra).clamp_non_negative()
    } else {
        debt + (total - paid)
    }
}

/// Computes the customer's debt after an order's effect is undone.
///
/// Used by both edit (before reapplying the new lines) and delete. The
/// result is intentionally NOT clamped: a reversal may pass through a
/// negative intermediate value that the subsequent apply step brings back
/// up. Only settlement clamps on the way down.
#[inline]
pub fn debt_after_reversal(debt: Money, total: Money, paid: Money) -> Money {
    debt - total + paid
}

/// Computes the customer's debt after a settlement.
///
/// Rejects non-positive amounts and amounts exceeding the current debt.
/// The result is floored at zero.
///
/// ## Example
/// ```rust
/// use depot_core::ledger::debt_after_settlement;
/// use depot_core::money::Money;
///
/// let debt = debt_after_settlement(Money::from_cents(5000), Money::from_cents(2000));
/// assert_eq!(debt.unwrap().cents(), 3000);
///
/// assert!(debt_after_settlement(Money::from_cents(1000), Money::from_cents(2000)).is_err());
/// ```
pub fn debt_after_settlement(debt: Money, amount: Money) -> CoreResult<Money> {
    if !amount.is_positive() {
        return Err(CoreError::Validation(
            crate::error::ValidationError::MustBePositive {
                field: "amount".to_string(),
            },
        ));
    }

    if amount > debt {
        return Err(CoreError::SettlementExceedsDebt {
            requested: amount,
            debt,
        });
    }

    Ok((debt - amount).clamp_non_negative())
}

// =============================================================================
// Stock Arithmetic
// =============================================================================

/// Computes a product's stock after selling a quantity.
///
/// Selling more than is available floors the stock at zero rather than
/// rejecting the sale. The caller can compare `quantity > stock` beforehand
/// to surface a backorder signal.
#[inline]
pub const fn stock_after_sale(stock: i64, quantity: i64) -> i64 {
    let remaining = stock - quantity;
    if remaining < 0 {
        0
    } else {
        remaining
    }
}

/// Computes a product's stock after a reversal restores a quantity.
///
/// Restores are uncapped: reversal always adds the full quantity back.
#[inline]
pub const fn stock_after_restock(stock: i64, quantity: i64) -> i64 {
    stock + quantity
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: &str, quantity: i64, unit_price_cents: i64) -> OrderLine {
        OrderLine {
            product_id: product_id.to_string(),
            quantity,
            unit_price_cents,
        }
    }

    #[test]
    fn test_order_total() {
        assert_eq!(order_total(&[]).cents(), 0);

        let lines = vec![line("a", 2, 2500), line("b", 3, 1000)];
        assert_eq!(order_total(&lines).cents(), 8000);
    }

    #[test]
    fn test_clamp_paid() {
        assert_eq!(clamp_paid(-500).cents(), 0);
        assert_eq!(clamp_paid(0).cents(), 0);
        assert_eq!(clamp_paid(500).cents(), 500);
    }

    #[test]
    fn test_debt_grows_by_unpaid_remainder() {
        let debt = debt_after_order(
            Money::zero(),
            Money::from_cents(10000),
            Money::from_cents(4000),
        );
        assert_eq!(debt.cents(), 6000);
    }

    #[test]
    fn test_exact_payment_leaves_debt_unchanged() {
        let debt = debt_after_order(
            Money::from_cents(2000),
            Money::from_cents(5000),
            Money::from_cents(5000),
        );
        assert_eq!(debt.cents(), 2000);
    }

    #[test]
    fn test_overpayment_reduces_debt() {
        let debt = debt_after_order(
            Money::from_cents(8000),
            Money::from_cents(5000),
            Money::from_cents(6000),
        );
        assert_eq!(debt.cents(), 7000);
    }

    #[test]
    fn test_overpayment_floor_discards_excess() {
        // Debt 30.00, payment exceeds total by 50.00: debt floors at zero,
        // the remaining 20.00 of excess is discarded.
        let debt = debt_after_order(
            Money::from_cents(3000),
            Money::from_cents(1000),
            Money::from_cents(6000),
        );
        assert_eq!(debt.cents(), 0);
    }

    #[test]
    fn test_reversal_is_unclamped() {
        // Reversal may go negative; a following apply brings it back up.
        let debt = debt_after_reversal(
            Money::from_cents(1000),
            Money::from_cents(5000),
            Money::from_cents(1000),
        );
        assert_eq!(debt.cents(), -3000);
    }

    #[test]
    fn test_edit_equals_reverse_then_apply() {
        // Create: total 100.00, paid 40.00 on a zero balance -> debt 60.00
        let debt = debt_after_order(
            Money::zero(),
            Money::from_cents(10000),
            Money::from_cents(4000),
        );
        assert_eq!(debt.cents(), 6000);

        // Edit to total 80.00, paid 80.00:
        // reverse: 60.00 - 100.00 + 40.00 = 0.00
        let reversed = debt_after_reversal(
            debt,
            Money::from_cents(10000),
            Money::from_cents(4000),
        );
        assert_eq!(reversed.cents(), 0);

        // apply: exact payment leaves the balance alone
        let applied = debt_after_order(
            reversed,
            Money::from_cents(8000),
            Money::from_cents(8000),
        );
        assert_eq!(applied.cents(), 0);

        // Same outcome as if only the edited order had ever existed.
        let direct = debt_after_order(
            Money::zero(),
            Money::from_cents(8000),
            Money::from_cents(8000),
        );
        assert_eq!(applied, direct);
    }

    #[test]
    fn test_delete_is_full_reversal() {
        // Create total 150.00 paid 50.00 -> debt += 100.00
        let before = Money::from_cents(2500);
        let after_create = debt_after_order(
            before,
            Money::from_cents(15000),
            Money::from_cents(5000),
        );
        assert_eq!(after_create.cents(), 12500);

        // Delete restores the pre-creation balance.
        let after_delete = debt_after_reversal(
            after_create,
            Money::from_cents(15000),
            Money::from_cents(5000),
        );
        assert_eq!(after_delete, before);
    }

    #[test]
    fn test_settlement() {
        let debt = debt_after_settlement(Money::from_cents(5000), Money::from_cents(2000));
        assert_eq!(debt.unwrap().cents(), 3000);

        // Settling the full balance lands exactly on zero.
        let debt = debt_after_settlement(Money::from_cents(5000), Money::from_cents(5000));
        assert_eq!(debt.unwrap().cents(), 0);
    }

    #[test]
    fn test_settlement_rejects_overpayment() {
        let err = debt_after_settlement(Money::from_cents(1000), Money::from_cents(2000));
        assert!(matches!(
            err,
            Err(CoreError::SettlementExceedsDebt { .. })
        ));
    }

    #[test]
    fn test_settlement_rejects_non_positive_amounts() {
        assert!(debt_after_settlement(Money::from_cents(1000), Money::zero()).is_err());
        assert!(
            debt_after_settlement(Money::from_cents(1000), Money::from_cents(-100)).is_err()
        );
    }

    #[test]
    fn test_stock_floors_at_zero_on_sale() {
        assert_eq!(stock_after_sale(10, 2), 8);
        assert_eq!(stock_after_sale(10, 10), 0);
        assert_eq!(stock_after_sale(3, 5), 0);
        assert_eq!(stock_after_sale(0, 1), 0);
    }

    #[test]
    fn test_stock_restock_is_uncapped() {
        assert_eq!(stock_after_restock(0, 5), 5);
        assert_eq!(stock_after_restock(8, 2), 10);
    }

    #[test]
    fn test_full_create_then_edit_scenario() {
        // Customer with no debt orders 2 units at 25.00 paying 30.00:
        // total 50.00, debt 20.00, stock 10 -> 8.
        let lines = vec![line("p", 2, 2500)];
        let total = order_total(&lines);
        assert_eq!(total.cents(), 5000);

        let debt = debt_after_order(Money::zero(), total, Money::from_cents(3000));
        assert_eq!(debt.cents(), 2000);
        assert_eq!(stock_after_sale(10, 2), 8);

        // Edit to 1 unit at 25.00 paying 25.00:
        // reverse -> stock 10, debt 0; apply -> debt stays 0, stock 9.
        let restored = stock_after_restock(8, 2);
        assert_eq!(restored, 10);

        let reversed = debt_after_reversal(debt, total, Money::from_cents(3000));
        assert_eq!(reversed.cents(), 0);

        let new_lines = vec![line("p", 1, 2500)];
        let new_total = order_total(&new_lines);
        let applied = debt_after_order(reversed, new_total, Money::from_cents(2500));
        assert_eq!(applied.cents(), 0);
        assert_eq!(stock_after_sale(restored, 1), 9);
    }
}
