//! # pronto-db: Database Layer for Pronto
//!
//! This crate provides database access for Pronto. It uses SQLite for
//! local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pronto Data Flow                                 │
//! │                                                                         │
//! │  Handler (pronto-shop: browse, add_to_cart, place_order, ...)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     pronto-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Workflows   │  │   │
//! │  │   │   (pool.rs)   │    │ ProductRepo   │    │  Checkout    │  │   │
//! │  │   │               │    │ OrderRepo     │    │  SalesReport │  │   │
//! │  │   │ SqlitePool    │◄───│ AccountRepo   │◄───│              │  │   │
//! │  │   │ + Migrations  │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (./pronto.db, WAL mode, foreign keys on)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repositories (product, order, account)
//! - [`checkout`] - The order-placement transaction
//! - [`report`] - Sales aggregation over order history
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pronto_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./pronto.db")).await?;
//!
//! let catalog = db.products().list_available().await?;
//! let receipt = db.checkout().attempt(&mut cart, "ALFKI", "1 Elm St", 500).await?;
//! let report = db.reports().generate(start, end).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod report;
pub mod repository;

#[cfg(test)]
pub(crate) mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CheckoutError, CheckoutReceipt, CheckoutWorkflow};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use report::{ReportError, SalesReporter};

// Repository re-exports for convenience
pub use repository::account::AccountRepository;
pub use repository::order::OrderRepository;
pub use repository::product::{NewProduct, ProductRepository};
