//! # Repository Module
//!
//! Database repository implementations for the depot ordering system.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                               │
//! │                                                                     │
//! │  Caller                                                             │
//! │       │                                                             │
//! │       │  db.orders().create(new_order)                              │
//! │       ▼                                                             │
//! │  OrderRepository                                                    │
//! │  ├── create(&self, NewOrder)     one transaction:                   │
//! │  ├── edit(&self, id, NewOrder)     order + lines                    │
//! │  ├── delete(&self, id)             + customer debt                  │
//! │  └── set_status(&self, id, s)      + product stocks                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite Database                                                    │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`order::OrderRepository`] - The order engine (compound transactional ops)
//! - [`customer::CustomerRepository`] - Customer accounts and debt balances
//! - [`product::ProductRepository`] - Catalog products and stock
//! - [`brand::BrandRepository`] - Product brands
//! - [`settlement::SettlementRepository`] - Debt settlements (append-only)

pub mod brand;
pub mod customer;
pub mod order;
pub mod product;
pub mod settlement;
