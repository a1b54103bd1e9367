//! # Validation Module
//!
//! Input validation utilities for the depot ordering system.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: API layer (external)                                      │
//! │  ├── Request shape, auth                                            │
//! │  └── Immediate caller feedback                                      │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - business rule validation                    │
//! │  └── Runs before any mutation; a failed check writes nothing        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL / UNIQUE constraints                                  │
//! │  ├── CHECK constraints (stock >= 0, quantity >= 1)                  │
//! │  └── Foreign key constraints                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::OrderLine;
use crate::{MAX_DESCRIPTION_LINES, MAX_LINE_QUANTITY, MAX_ORDER_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer username.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores and dots
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, hyphens, underscores and dots"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates a customer display name.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// Ten digits starting with 05, 06 or 07.
///
/// ## Example
/// ```rust
/// use depot_core::validation::validate_phone;
///
/// assert!(validate_phone("0612345678").is_ok());
/// assert!(validate_phone("0812345678").is_err());
/// assert!(validate_phone("06123").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let digits_ok = phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit());
    let prefix_ok = matches!(phone.get(0..2), Some("05") | Some("06") | Some("07"));

    if !digits_ok || !prefix_ok {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be 10 digits starting with 05, 06 or 07".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a brand name.
pub fn validate_brand_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a product description.
///
/// ## Rules
/// At most five lines. Empty descriptions are represented as None upstream.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.lines().count() > MAX_DESCRIPTION_LINES {
        return Err(ValidationError::OutOfRange {
            field: "description lines".to_string(),
            min: 0,
            max: MAX_DESCRIPTION_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order line quantity.
///
/// ## Rules
/// - Must be positive (>= 1)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (promotional items)
pub fn validate_unit_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a settlement amount in cents.
///
/// ## Rules
/// - Must be positive (> 0); the upper bound against the current debt is a
///   business rule checked by the ledger, not an input format rule
pub fn validate_settlement_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the line items of an order as a whole.
///
/// ## Rules
/// - At least one line
/// - At most MAX_ORDER_LINES lines
/// - Every line passes quantity and unit price checks
pub fn validate_order_lines(lines: &[OrderLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "lines".to_string(),
        });
    }

    if lines.len() > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "lines".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }

    for line in lines {
        if line.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product_id".to_string(),
            });
        }
        validate_quantity(line.quantity)?;
        validate_unit_price_cents(line.unit_price_cents)?;
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use depot_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
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
    fn test_validate_username() {
        assert!(validate_username("depot_admin").is_ok());
        assert!(validate_username("user.01").is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0512345678").is_ok());
        assert!(validate_phone("0612345678").is_ok());
        assert!(validate_phone("0712345678").is_ok());

        assert!(validate_phone("0812345678").is_err()); // bad prefix
        assert!(validate_phone("061234567").is_err()); // too short
        assert!(validate_phone("06123456789").is_err()); // too long
        assert!(validate_phone("061234567a").is_err()); // non-digit
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(500).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price_cents(0).is_ok());
        assert!(validate_unit_price_cents(2500).is_ok());
        assert!(validate_unit_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_order_lines() {
        assert!(validate_order_lines(&[line("p", 1, 2500)]).is_ok());

        // Empty order
        assert!(validate_order_lines(&[]).is_err());

        // Bad line inside an otherwise fine order
        assert!(validate_order_lines(&[line("p", 1, 2500), line("q", 0, 100)]).is_err());
        assert!(validate_order_lines(&[line("p", 1, -5)]).is_err());
        assert!(validate_order_lines(&[line("", 1, 100)]).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("one line").is_ok());
        assert!(validate_description("1\n2\n3\n4\n5").is_ok());
        assert!(validate_description("1\n2\n3\n4\n5\n6").is_err());
    }

    #[test]
    fn test_validate_settlement_amount() {
        assert!(validate_settlement_amount(1).is_ok());
        assert!(validate_settlement_amount(0).is_err());
        assert!(validate_settlement_amount(-100).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
