//! # Shopping Cart
//!
//! Session-scoped cart: an ordered list of snapshot lines, at most one
//! line per product.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Lifecycle                                  │
//! │                                                                         │
//! │  Session created ──► empty Cart                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  add_line(product, 2) ──► [Margherita x2]                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  add_line(product, 3) ──► [Margherita x5]      (merge, not duplicate)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  update_quantity(id, 0) ──► []                 (zero removes)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  checkout / logout / expiry ──► cart discarded                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What the cart does NOT do
//! - No stock enforcement: a cart may optimistically hold more units than
//!   the shelf has. Checkout re-validates against live stock.
//! - No persistence: the cart lives and dies with its session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Cart Line
// =============================================================================

/// One product in the cart.
///
/// Name and price are snapshots taken when the line was created, so the
/// cart display stays stable even if the catalog changes underneath it.
/// Checkout charges the live price, not the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    /// Product name at time of add (frozen for display).
    pub product_name: String,
    /// Unit price in cents at time of add (frozen for display).
    pub unit_price_cents: i64,
    /// Units requested (always positive).
    pub quantity: i64,
    /// When the line was first added.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Line subtotal: snapshot unit price times quantity.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.unit_price_cents * self.quantity)
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Summary figures for cart responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Number of distinct products.
    pub line_count: usize,
    /// Sum of all line quantities.
    pub total_quantity: i64,
    /// Sum of line subtotals in cents.
    pub total_cents: i64,
}

// =============================================================================
// Cart
// =============================================================================

/// A session-scoped shopping cart.
///
/// Lines keep insertion order; merging into an existing line does not
/// move it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// When the cart was created.
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The lines in insertion order.
    #[inline]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Adds a quantity of a product.
    ///
    /// If a line for this product already exists the quantities merge;
    /// otherwise a new snapshot line is appended. Stock is NOT checked
    /// here; the checkout transaction owns that.
    ///
    /// ## Errors
    /// - [`CoreError::InvalidQuantity`] if `quantity <= 0`
    pub fn add_line(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity { quantity });
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.product_id)
        {
            line.quantity += quantity;
        } else {
            self.lines.push(CartLine {
                product_id: product.product_id,
                product_name: product.product_name.clone(),
                unit_price_cents: product.unit_price_cents,
                quantity,
                added_at: Utc::now(),
            });
        }
        Ok(())
    }

    /// Sets the quantity of an existing line.
    ///
    /// A quantity of zero (or less) removes the line; requesting zero of
    /// something and not having it in the cart mean the same thing.
    ///
    /// ## Errors
    /// - [`CoreError::LineNotFound`] if no line exists for `product_id`
    ///   and the quantity is positive
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove_line(product_id);
            return Ok(());
        }

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::LineNotFound { product_id }),
        }
    }

    /// Removes the line for a product. Removing an absent line is a
    /// no-op, not an error.
    pub fn remove_line(&mut self, product_id: i64) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Empties the cart (checkout success, logout).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Whether the cart holds no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Cart total in exact cents. Empty cart totals zero.
    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.subtotal())
    }

    /// Summary figures for responses.
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            line_count: self.line_count(),
            total_quantity: self.total_quantity(),
            total_cents: self.total().cents(),
        }
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
