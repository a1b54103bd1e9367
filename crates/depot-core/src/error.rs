//! # Error Types
//!
//! Domain-specific error types for depot-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  depot-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  depot-db errors (separate crate)                                   │
//! │  └── DbError          - Storage and transaction failures            │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → DbError → caller               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, amounts)
//! 3. Errors are enum variants, never String
//! 4. Every failure is either prevented by validation or surfaced; nothing
//!    is recovered locally and ignored

use thiserror::Error;

use crate::money::Money;
use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are raised before
/// any state is mutated, so a caller receiving one can assume nothing was
/// written.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Customer id does not resolve to an account.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Product id does not resolve to a catalog entry. Carries the failing
    /// id so a multi-line order reports which line was at fault.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order id does not resolve to an order.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// An order must carry at least one line item.
    #[error("Order has no line items")]
    EmptyOrder,

    /// The requested status change is not modeled.
    ///
    /// The only transition is pending to confirmed; a confirmed order
    /// never returns to pending.
    #[error("Order {order_id} is {from}, cannot move to {to}")]
    InvalidStatusTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// A settlement cannot exceed the customer's current debt.
    #[error("Settlement of {requested} exceeds current debt {debt}")]
    SettlementExceedsDebt { requested: Money, debt: Money },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., duplicate username).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::SettlementExceedsDebt {
            requested: Money::from_cents(5000),
            debt: Money::from_cents(3000),
        };
        assert_eq!(
            err.to_string(),
            "Settlement of 50.00 exceeds current debt 30.00"
        );

        let err = CoreError::InvalidStatusTransition {
            order_id: "o1".to_string(),
            from: OrderStatus::Confirmed,
            to: OrderStatus::Pending,
        };
        assert_eq!(err.to_string(), "Order o1 is confirmed, cannot move to pending");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "username".to_string(),
        };
        assert_eq!(err.to_string(), "username is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "username".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
