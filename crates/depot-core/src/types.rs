//! # Domain Types
//!
//! Core domain types for the depot ordering system.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐         │
//! │  │   Customer    │   │    Product    │   │     Order     │         │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────  │         │
//! │  │  id (UUID)    │   │  id (UUID)    │   │  id (UUID)    │         │
//! │  │  username     │   │  brand_id(FK) │   │  customer(FK) │         │
//! │  │  tier         │   │  TierPrices   │   │  lines        │         │
//! │  │  total_debt   │   │  stock        │   │  total, paid  │         │
//! │  └───────────────┘   └───────────────┘   └───────────────┘         │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐         │
//! │  │     Tier      │   │  OrderStatus  │   │  Settlement   │         │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────  │         │
//! │  │  Retail       │   │  Pending      │   │  append-only  │         │
//! │  │  Wholesale    │   │  Confirmed    │   │  debt audit   │         │
//! │  │  SuperWhole.. │   └───────────────┘   └───────────────┘         │
//! │  └───────────────┘                                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An order line freezes the unit price at order time. Later catalog price
//! edits never alter historical orders. Settlements likewise freeze the
//! customer's name and username.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Customer Tier
// =============================================================================

/// Customer pricing category.
///
/// Determines which of a product's three prices applies by default when an
/// order is entered for the customer. The resolved price still travels with
/// the order line as a frozen unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Single-unit pricing.
    Retail,
    /// Bulk pricing.
    Wholesale,
    /// Highest-volume pricing.
    SuperWholesale,
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Retail
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Retail => "retail",
            Tier::Wholesale => "wholesale",
            Tier::SuperWholesale => "superwholesale",
        };
        f.write_str(s)
    }
}

impl FromStr for Tier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "retail" => Ok(Tier::Retail),
            "wholesale" => Ok(Tier::Wholesale),
            "superwholesale" => Ok(Tier::SuperWholesale),
            _ => Err(ValidationError::NotAllowed {
                field: "tier".to_string(),
                allowed: vec![
                    "retail".to_string(),
                    "wholesale".to_string(),
                    "superwholesale".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Tier Prices
// =============================================================================

/// The three per-tier prices of a product, in cents.
///
/// All three are required and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TierPrices {
    /// Price for retail customers.
    pub retail_cents: i64,
    /// Price for wholesale customers.
    pub wholesale_cents: i64,
    /// Price for superwholesale customers.
    pub superwholesale_cents: i64,
}

impl TierPrices {
    /// Returns the price that applies to the given tier.
    ///
    /// ## Example
    /// ```rust
    /// use depot_core::types::{Tier, TierPrices};
    ///
    /// let prices = TierPrices {
    ///     retail_cents: 3000,
    ///     wholesale_cents: 2500,
    ///     superwholesale_cents: 2200,
    /// };
    /// assert_eq!(prices.price_for(Tier::Wholesale).cents(), 2500);
    /// ```
    #[inline]
    pub fn price_for(&self, tier: Tier) -> Money {
        let cents = match tier {
            Tier::Retail => self.retail_cents,
            Tier::Wholesale => self.wholesale_cents,
            Tier::SuperWholesale => self.superwholesale_cents,
        };
        Money::from_cents(cents)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer account with a running debt balance.
///
/// `total_debt_cents` is the amount the customer owes the depot. It is
/// increased by underpaid orders and decreased by settlements and
/// overpayments. It is never persisted negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Unique login/handle chosen at registration.
    pub username: String,

    /// Display name.
    pub name: String,

    /// Phone number (format-validated when present).
    pub phone: Option<String>,

    /// Pricing tier.
    pub tier: Tier,

    /// Running debt balance in cents.
    pub total_debt_cents: i64,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Returns the debt balance as a Money type.
    #[inline]
    pub fn total_debt(&self) -> Money {
        Money::from_cents(self.total_debt_cents)
    }
}

// =============================================================================
// Brand
// =============================================================================

/// A product brand. Referenced by products; no lifecycle coupling to orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Brand {
    pub id: String,
    /// Unique brand name.
    pub name: String,
    /// Logo image reference.
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Brand this product belongs to.
    pub brand_id: String,

    /// Per-tier price list.
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub prices: TierPrices,

    /// Current stock level. Never negative; sales floor it at zero.
    pub stock: i64,

    /// Product image reference.
    pub image_url: Option<String>,

    /// Free-text description, at most five lines.
    pub description: Option<String>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price that applies to the given tier.
    #[inline]
    pub fn price_for(&self, tier: Tier) -> Money {
        self.prices.price_for(tier)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// The only modeled transition is `Pending -> Confirmed`. A confirmed order
/// never returns to pending. Status carries no stock or debt effect; those
/// are accounted for when the order is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order has been placed and awaits confirmation.
    Pending,
    /// Order has been confirmed by an administrator.
    Confirmed,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
        };
        f.write_str(s)
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec!["pending".to_string(), "confirmed".to_string()],
            }),
        }
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// One product entry within an order.
///
/// The unit price is captured at order time, independent of the product's
/// current tier price. The caller (admin entry or checkout flow) resolves
/// tier pricing or a custom override before the line reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    /// Product being ordered.
    pub product_id: String,

    /// Quantity ordered (at least 1).
    pub quantity: i64,

    /// Unit price in cents at order time (frozen).
    pub unit_price_cents: i64,
}

impl OrderLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns quantity times unit price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order against a customer account.
///
/// `total_price_cents` is derived from the lines and stored; it is
/// recomputed on every save and never trusted from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub lines: Vec<OrderLine>,
    pub total_price_cents: i64,
    /// Amount paid at order time, clamped non-negative.
    pub paid_cents: i64,
    pub status: OrderStatus,
    pub ordered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the stored order total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }

    /// Returns the paid amount as Money.
    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_cents(self.paid_cents)
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// An immutable record of a debt-reduction event.
///
/// Settlements are appended when part of a customer's debt is paid off
/// outside any specific order. They are never mutated or reversed.
/// Name and username are frozen at settlement time so the audit trail
/// survives later account edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Settlement {
    pub id: String,
    pub customer_id: String,
    /// Customer display name at settlement time (frozen).
    pub name: String,
    /// Customer username at settlement time (frozen).
    pub username: String,
    /// Amount of debt settled, in cents. Always positive.
    pub amount_cents: i64,
    pub settled_at: DateTime<Utc>,
}

impl Settlement {
    /// Returns the settled amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
