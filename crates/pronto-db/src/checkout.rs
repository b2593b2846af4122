//! # Checkout Workflow
//!
//! Converts a cart into a durable order, atomically.
//!
//! ## The Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Transaction                               │
//! │                                                                         │
//! │  attempt(cart, customer, address, freight)                              │
//! │       │                                                                 │
//! │       ├── cart empty? ──► EmptyCart (no store access at all)            │
//! │       │                                                                 │
//! │       ▼ BEGIN                                                           │
//! │  for each cart line:                                                    │
//! │       ├── re-fetch product ──► missing/withdrawn? ProductUnavailable    │
//! │       ├── qty > stock? ──────► InsufficientStock                        │
//! │       ├── INSERT order_detail at the LIVE price                         │
//! │       └── UPDATE stock WHERE units_in_stock >= qty (guarded)            │
//! │            └── 0 rows? ──────► InsufficientStock                        │
//! │       │                                                                 │
//! │       ▼ COMMIT                                                          │
//! │  clear cart, return receipt                                             │
//! │                                                                         │
//! │  Any error before COMMIT drops the transaction, which rolls back        │
//! │  every insert and decrement. A failed checkout changes nothing:         │
//! │  not stock, not orders, not the cart.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Live Price, Not Snapshot
//! The cart shows the price captured when the line was added; the order
//! detail records the catalog price at checkout time. If they drifted
//! apart, checkout charges the live one.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use pronto_core::Cart;

// =============================================================================
// Errors
// =============================================================================

/// Checkout failures. Each variant is terminal for the attempt; nothing
/// is retried internally.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Cart had no lines. Raised before any store access.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// A cart line's product no longer exists or was withdrawn from sale.
    #[error("Product {0} is no longer available")]
    ProductUnavailable(i64),

    /// A cart line asks for more units than the shelf holds.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Storage failure; surfaced to the caller, never retried here.
    #[error("Checkout failed: {0}")]
    Persistence(#[from] DbError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        CheckoutError::Persistence(DbError::from(err))
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// What a successful checkout hands back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    /// The assigned order id.
    pub order_id: i64,
    /// Detail subtotals plus freight, in cents.
    pub total_cents: i64,
    /// Number of detail lines written.
    pub line_count: usize,
}

// =============================================================================
// Workflow
// =============================================================================

/// Row shape for the in-transaction product re-validation.
#[derive(Debug, sqlx::FromRow)]
struct LiveProduct {
    unit_price_cents: i64,
    units_in_stock: i64,
    discontinued: bool,
}

/// Owns the order-placement transaction.
#[derive(Debug, Clone)]
pub struct CheckoutWorkflow {
    pool: SqlitePool,
}

impl CheckoutWorkflow {
    /// Creates a new CheckoutWorkflow.
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutWorkflow { pool }
    }

    /// Attempts to convert the cart into an order.
    ///
    /// On success the cart is cleared and a receipt returned. On any
    /// failure the store is untouched and the cart keeps its lines so
    /// the customer can adjust and retry.
    pub async fn attempt(
        &self,
        cart: &mut Cart,
        customer_id: &str,
        ship_address: &str,
        freight_cents: i64,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        debug!(
            customer_id = %customer_id,
            lines = cart.line_count(),
            "Starting checkout"
        );

        let mut tx = self.pool.begin().await?;

        let order_date = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO orders (customer_id, order_date, freight_cents, ship_address)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(customer_id)
        .bind(order_date)
        .bind(freight_cents)
        .bind(ship_address)
        .execute(&mut *tx)
        .await?;
        let order_id = result.last_insert_rowid();

        let mut total_cents = freight_cents;

        for line in cart.lines() {
            // Re-validate against live catalog state inside the transaction
            let live = sqlx::query_as::<_, LiveProduct>(
                "SELECT unit_price_cents, units_in_stock, discontinued \
                 FROM products WHERE product_id = ?",
            )
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await?;

            let live = match live {
                Some(live) if !live.discontinued && live.units_in_stock > 0 => live,
                _ => {
                    warn!(product_id = line.product_id, "Checkout hit unavailable product");
                    return Err(CheckoutError::ProductUnavailable(line.product_id));
                }
            };

            if line.quantity > live.units_in_stock {
                warn!(
                    product_id = line.product_id,
                    requested = line.quantity,
                    available = live.units_in_stock,
                    "Checkout hit insufficient stock"
                );
                return Err(CheckoutError::InsufficientStock {
                    product_id: line.product_id,
                    available: live.units_in_stock,
                    requested: line.quantity,
                });
            }

            // Detail at the live price (snapshot is for display only)
            sqlx::query(
                r#"
                INSERT INTO order_details (order_id, product_id, unit_price_cents, quantity)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(live.unit_price_cents)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            // Guarded decrement: if a concurrent write drained the shelf
            // between the check above and here, zero rows match and the
            // whole checkout rolls back
            let decremented = sqlx::query(
                r#"
                UPDATE products
                SET units_in_stock = units_in_stock - ?
                WHERE product_id = ? AND units_in_stock >= ?
                "#,
            )
            .bind(line.quantity)
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                return Err(CheckoutError::InsufficientStock {
                    product_id: line.product_id,
                    available: live.units_in_stock,
                    requested: line.quantity,
                });
            }

            total_cents += live.unit_price_cents * line.quantity;
        }

        let line_count = cart.line_count();
        tx.commit().await?;

        // The order is durable; only now does the cart let go of its lines
        cart.clear();

        info!(order_id, total_cents, line_count, "Checkout complete");

        Ok(CheckoutReceipt {
            order_id,
            total_cents,
            line_count,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::test_support::seed_lookups;
    use pronto_core::Product;

    async fn test_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_lookups(db.pool()).await;
        db
    }

    async fn insert_product(db: &Database, name: &str, price_cents: i64, stock: i64) -> Product {
        sqlx::query(
            "INSERT INTO products (product_name, supplier_id, category_id, \
             unit_price_cents, units_in_stock) VALUES (?, 1, 1, ?, ?)",
        )
        .bind(name)
        .bind(price_cents)
        .bind(stock)
        .execute(db.pool())
        .await
        .unwrap();

        db.products()
            .search_by_name(name)
            .await
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    async fn stock_of(db: &Database, product_id: i64) -> i64 {
        sqlx::query_scalar("SELECT units_in_stock FROM products WHERE product_id = ?")
            .bind(product_id)
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    async fn order_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let db = test_db().await;
        let mut cart = Cart::new();

        let err = db
            .checkout()
            .attempt(&mut cart, "ALFKI", "1 Elm St", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(order_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_successful_checkout() {
        let db = test_db().await;
        let margherita = insert_product(&db, "Margherita", 999, 20).await;
        let bread = insert_product(&db, "Garlic Bread", 500, 10).await;

        let mut cart = Cart::new();
        cart.add_line(&margherita, 2).unwrap();
        cart.add_line(&bread, 1).unwrap();

        let receipt = db
            .checkout()
            .attempt(&mut cart, "ALFKI", "1 Elm St", 500)
            .await
            .unwrap();

        // 9.99*2 + 5.00 + 5.00 freight
        assert_eq!(receipt.total_cents, 2998);
        assert_eq!(receipt.line_count, 2);
        assert!(cart.is_empty());

        // Stock decremented
        assert_eq!(stock_of(&db, margherita.product_id).await, 18);
        assert_eq!(stock_of(&db, bread.product_id).await, 9);

        // One order, details at the live price
        let order = db
            .orders()
            .get_by_id(receipt.order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.details.len(), 2);
        assert_eq!(order.total_amount().cents(), 2998);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_everything() {
        let db = test_db().await;
        let margherita = insert_product(&db, "Margherita", 999, 20).await;
        let bread = insert_product(&db, "Garlic Bread", 500, 2).await;

        let mut cart = Cart::new();
        cart.add_line(&margherita, 2).unwrap();
        cart.add_line(&bread, 5).unwrap(); // only 2 on the shelf

        let err = db
            .checkout()
            .attempt(&mut cart, "ALFKI", "1 Elm St", 500)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::InsufficientStock {
                requested: 5,
                available: 2,
                ..
            }
        ));

        // Nothing changed: not stock (even for the line that fit),
        // not orders, not the cart
        assert_eq!(stock_of(&db, margherita.product_id).await, 20);
        assert_eq!(stock_of(&db, bread.product_id).await, 2);
        assert_eq!(order_count(&db).await, 0);
        assert_eq!(cart.line_count(), 2);
    }

    #[tokio::test]
    async fn test_discontinued_product_aborts() {
        let db = test_db().await;
        let margherita = insert_product(&db, "Margherita", 999, 20).await;

        let mut cart = Cart::new();
        cart.add_line(&margherita, 1).unwrap();

        // Product withdrawn after it went into the cart
        sqlx::query("UPDATE products SET discontinued = 1 WHERE product_id = ?")
            .bind(margherita.product_id)
            .execute(db.pool())
            .await
            .unwrap();

        let err = db
            .checkout()
            .attempt(&mut cart, "ALFKI", "1 Elm St", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::ProductUnavailable(id) if id == margherita.product_id));
        assert_eq!(order_count(&db).await, 0);
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn test_deleted_product_aborts() {
        let db = test_db().await;
        let margherita = insert_product(&db, "Margherita", 999, 20).await;

        let mut cart = Cart::new();
        cart.add_line(&margherita, 1).unwrap();

        sqlx::query("DELETE FROM products WHERE product_id = ?")
            .bind(margherita.product_id)
            .execute(db.pool())
            .await
            .unwrap();

        let err = db
            .checkout()
            .attempt(&mut cart, "ALFKI", "1 Elm St", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::ProductUnavailable(_)));
    }

    #[tokio::test]
    async fn test_checkout_charges_live_price() {
        let db = test_db().await;
        let margherita = insert_product(&db, "Margherita", 999, 20).await;

        let mut cart = Cart::new();
        cart.add_line(&margherita, 2).unwrap();

        // Price raised after the add; cart still shows the snapshot
        sqlx::query("UPDATE products SET unit_price_cents = 1199 WHERE product_id = ?")
            .bind(margherita.product_id)
            .execute(db.pool())
            .await
            .unwrap();
        assert_eq!(cart.total().cents(), 1998);

        let receipt = db
            .checkout()
            .attempt(&mut cart, "ALFKI", "1 Elm St", 0)
            .await
            .unwrap();

        // The order recorded the live price
        assert_eq!(receipt.total_cents, 2398);
        let order = db
            .orders()
            .get_by_id(receipt.order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.details[0].unit_price_cents, 1199);
    }

    #[tokio::test]
    async fn test_exact_stock_checkout_empties_shelf() {
        let db = test_db().await;
        let bread = insert_product(&db, "Garlic Bread", 500, 3).await;

        let mut cart = Cart::new();
        cart.add_line(&bread, 3).unwrap();

        db.checkout()
            .attempt(&mut cart, "ALFKI", "1 Elm St", 0)
            .await
            .unwrap();

        assert_eq!(stock_of(&db, bread.product_id).await, 0);
    }
}
