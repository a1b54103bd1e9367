//! # depot-db: Database Layer for the Depot Ordering System
//!
//! This crate provides database access for the depot ordering platform.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Depot Data Flow                              │
//! │                                                                     │
//! │  Caller (API layer, seed binary, tests)                             │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                     depot-db (THIS CRATE)                   │   │
//! │  │                                                             │   │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database   │   │ Repositories │   │  Migrations  │  │   │
//! │  │   │  (pool.rs)   │   │ (order.rs,   │   │  (embedded)  │  │   │
//! │  │   │              │   │  customer.rs │   │              │  │   │
//! │  │   │ SqlitePool   │◄──│  ...)        │   │ 001_init.sql │  │   │
//! │  │   └──────────────┘   └──────────────┘   └──────────────┘  │   │
//! │  │                                                             │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite Database (WAL mode, foreign keys ON)                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Order Engine
//!
//! [`repository::order::OrderRepository`] is the heart of this crate. Each
//! of its compound operations (create, edit, delete) touches three places:
//! the order itself, the customer's running debt, and the stock of every
//! product on the order. All of it commits as ONE transaction; a failure at
//! any step rolls back everything, so partial application is never
//! observable.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (order, customer, ...)

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::brand::{BrandRepository, NewBrand};
pub use repository::customer::{CustomerRepository, NewCustomer};
pub use repository::order::{NewOrder, OrderRepository};
pub use repository::product::{NewProduct, ProductRepository};
pub use repository::settlement::SettlementRepository;
