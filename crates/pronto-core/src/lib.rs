//! # pronto-core: Pure Business Logic for Pronto
//!
//! This crate is the **heart** of Pronto. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pronto Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  pronto-shop (handler layer)                    │   │
//! │  │    browse ──► add_to_cart ──► place_order ──► sales_report     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pronto-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │    cart    │  │availabil- │  │   │
//! │  │   │  Product  │  │   Money   │  │    Cart    │  │   ity     │  │   │
//! │  │   │   Order   │  │           │  │  CartLine  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    pronto-db (Database Layer)                   │   │
//! │  │        SQLite repositories, checkout transaction, reports       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, Principal, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`availability`] - Stock-aware product availability rules
//! - [`cart`] - Session-scoped shopping cart
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use pronto_core::money::Money;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(999); // $9.99
//!
//! // Exact line totals: $9.99 x 2 = $19.98
//! assert_eq!((price * 2i64).cents(), 1998);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pronto_core::Money` instead of
// `use pronto_core::money::Money`

pub use availability::Availability;
pub use cart::{Cart, CartLine, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level at or below which a product is reported as "Low Stock".
///
/// ## Business Reason
/// Gives staff an early restock signal while the product is still
/// purchasable. The availability rules in [`availability`] apply it
/// after the discontinued and out-of-stock checks.
pub const LOW_STOCK_THRESHOLD: i64 = 5;
