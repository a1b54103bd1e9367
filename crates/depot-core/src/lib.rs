//! # depot-core: Pure Business Logic for the Depot Ordering System
//!
//! This crate is the **heart** of the depot ordering platform. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Depot Architecture                            │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                API / Presentation Layer                     │   │
//! │  │    (external collaborator, not part of this workspace)     │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │               ★ depot-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌────────────┐   │   │
//! │  │   │  types   │ │  money   │ │  ledger  │ │ validation │   │   │
//! │  │   │ Customer │ │  Money   │ │ debt +   │ │   rules    │   │   │
//! │  │   │  Order   │ │  cents   │ │ stock    │ │   checks   │   │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └────────────┘   │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                   depot-db (Database Layer)                 │   │
//! │  │        SQLite queries, migrations, order engine             │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Product, Order, Settlement, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - Debt and stock arithmetic shared by all order operations
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use depot_core::Money` instead of
// `use depot_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single order
///
/// ## Business Reason
/// Prevents runaway orders and ensures reasonable transaction sizes.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single product on one order line
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 10000 instead of 100)
/// while leaving room for genuine wholesale quantities.
pub const MAX_LINE_QUANTITY: i64 = 9_999;

/// Maximum number of lines in a product description
pub const MAX_DESCRIPTION_LINES: usize = 5;
