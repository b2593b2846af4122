//! # Availability Engine
//!
//! Pure classification of a product's purchasability state.
//!
//! ## Priority Ladder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Availability Classification                          │
//! │                                                                         │
//! │  discontinued?  ──yes──►  Discontinued   (stock is irrelevant)          │
//! │       │no                                                               │
//! │       ▼                                                                 │
//! │  stock == 0?    ──yes──►  OutOfStock                                    │
//! │       │no                                                               │
//! │       ▼                                                                 │
//! │  stock <= 5?    ──yes──►  LowStock       (still purchasable!)           │
//! │       │no                                                               │
//! │       ▼                                                                 │
//! │                           InStock                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A discontinued product with 100 units on the shelf is `Discontinued`,
//! never `InStock`. Low stock is a warning state, not a block: those
//! products still sell.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Product;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Availability
// =============================================================================

/// Derived availability status of a product. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Withdrawn from sale regardless of remaining stock.
    Discontinued,
    /// Active but nothing on the shelf.
    OutOfStock,
    /// Purchasable, but stock is at or below the restock threshold.
    LowStock,
    /// Purchasable with comfortable stock.
    InStock,
}

impl Availability {
    /// Classifies a product. Pure and total: every product maps to
    /// exactly one status.
    pub fn classify(product: &Product) -> Self {
        if product.discontinued {
            Availability::Discontinued
        } else if product.units_in_stock <= 0 {
            Availability::OutOfStock
        } else if product.units_in_stock <= LOW_STOCK_THRESHOLD {
            Availability::LowStock
        } else {
            Availability::InStock
        }
    }

    /// Whether a product in this state can be added to a cart.
    #[inline]
    pub fn is_purchasable(&self) -> bool {
        matches!(self, Availability::LowStock | Availability::InStock)
    }
}

/// Catalog display strings.
impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Availability::Discontinued => "Discontinued",
            Availability::OutOfStock => "Out of Stock",
            Availability::LowStock => "Low Stock",
            Availability::InStock => "In Stock",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
