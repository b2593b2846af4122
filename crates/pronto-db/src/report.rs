//! # Sales Reporting
//!
//! Aggregates order history into per-product sales figures.
//!
//! ## One Query, Frozen Prices
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sales Report                                     │
//! │                                                                         │
//! │  orders (date filter) ──┐                                               │
//! │                         ├── JOIN ──► GROUP BY product_id                │
//! │  order_details ─────────┘            SUM(quantity)                      │
//! │                                      SUM(unit_price * quantity)         │
//! │                                                                         │
//! │  Revenue uses the detail rows' FROZEN prices. Repricing the catalog     │
//! │  never changes a past report. Freight is excluded: it is a shipping     │
//! │  charge, not product revenue.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

use crate::error::DbError;
use pronto_core::{SalesReport, SalesReportEntry};

// =============================================================================
// Errors
// =============================================================================

/// Sales report failures.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Start bound is after the end bound. Raised before any store access.
    #[error("Invalid report range: start is after end")]
    InvalidRange,

    /// Storage failure.
    #[error("Report failed: {0}")]
    Persistence(#[from] DbError),
}

impl From<sqlx::Error> for ReportError {
    fn from(err: sqlx::Error) -> Self {
        ReportError::Persistence(DbError::from(err))
    }
}

// =============================================================================
// Reporter
// =============================================================================

/// Generates sales reports from order history.
#[derive(Debug, Clone)]
pub struct SalesReporter {
    pool: SqlitePool,
}

impl SalesReporter {
    /// Creates a new SalesReporter.
    pub fn new(pool: SqlitePool) -> Self {
        SalesReporter { pool }
    }

    /// Aggregates sales over an inclusive date range.
    ///
    /// Entries are grouped by product, ordered by product id ascending.
    /// A range with no orders yields an empty report with a zero grand
    /// total, which is a valid answer, not an error.
    ///
    /// ## Errors
    /// * `ReportError::InvalidRange` if `start > end` (no query is run)
    pub async fn generate(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SalesReport, ReportError> {
        if start > end {
            return Err(ReportError::InvalidRange);
        }

        debug!(%start, %end, "Generating sales report");

        let entries = sqlx::query_as::<_, SalesReportEntry>(
            r#"
            SELECT
                d.product_id,
                p.product_name,
                SUM(d.quantity) AS quantity_sold,
                SUM(d.unit_price_cents * d.quantity) AS revenue_cents
            FROM order_details d
            JOIN orders o ON o.order_id = d.order_id
            JOIN products p ON p.product_id = d.product_id
            WHERE o.order_date BETWEEN ? AND ?
            GROUP BY d.product_id
            ORDER BY d.product_id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        debug!(entries = entries.len(), "Sales report generated");
        Ok(SalesReport::from_entries(entries))
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
    use chrono::TimeZone;
    use pronto_core::{Cart, Product};

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

    async fn set_order_date(db: &Database, order_id: i64, date: DateTime<Utc>) {
        sqlx::query("UPDATE orders SET order_date = ? WHERE order_id = ?")
            .bind(date)
            .bind(order_id)
            .execute(db.pool())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() {
        let db = test_db().await;
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();

        let err = db.reports().generate(late, early).await.unwrap_err();
        assert!(matches!(err, ReportError::InvalidRange));
    }

    #[tokio::test]
    async fn test_empty_range_yields_empty_report() {
        let db = test_db().await;
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();

        let report = db.reports().generate(start, end).await.unwrap();
        assert!(report.entries.is_empty());
        assert_eq!(report.grand_total_cents, 0);
    }

    #[tokio::test]
    async fn test_report_groups_and_totals() {
        let db = test_db().await;
        let margherita = insert_product(&db, "Margherita", 999, 50).await;
        let bread = insert_product(&db, "Garlic Bread", 500, 50).await;

        // Two orders through the real checkout path
        let mut cart = Cart::new();
        cart.add_line(&margherita, 2).unwrap();
        cart.add_line(&bread, 1).unwrap();
        let first = db
            .checkout()
            .attempt(&mut cart, "ALFKI", "1 Elm St", 300)
            .await
            .unwrap();

        cart.add_line(&margherita, 1).unwrap();
        let second = db
            .checkout()
            .attempt(&mut cart, "BONAP", "12 Rue des Bouchers", 300)
            .await
            .unwrap();

        let feb_1 = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let feb_2 = Utc.with_ymd_and_hms(2024, 2, 2, 12, 0, 0).unwrap();
        set_order_date(&db, first.order_id, feb_1).await;
        set_order_date(&db, second.order_id, feb_2).await;

        let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 28, 23, 59, 59).unwrap();
        let report = db.reports().generate(start, end).await.unwrap();

        // Grouped across both orders, product id ascending
        assert_eq!(report.entries.len(), 2);
        let m = &report.entries[0];
        assert_eq!(m.product_id, margherita.product_id);
        assert_eq!(m.quantity_sold, 3);
        assert_eq!(m.revenue_cents, 999 * 3);

        let b = &report.entries[1];
        assert_eq!(b.product_id, bread.product_id);
        assert_eq!(b.quantity_sold, 1);
        assert_eq!(b.revenue_cents, 500);

        // Grand total excludes the freight both orders carried
        assert_eq!(report.grand_total_cents, 999 * 3 + 500);
    }

    #[tokio::test]
    async fn test_report_uses_frozen_prices() {
        let db = test_db().await;
        let margherita = insert_product(&db, "Margherita", 999, 50).await;

        let mut cart = Cart::new();
        cart.add_line(&margherita, 2).unwrap();
        let receipt = db
            .checkout()
            .attempt(&mut cart, "ALFKI", "1 Elm St", 0)
            .await
            .unwrap();

        let feb = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        set_order_date(&db, receipt.order_id, feb).await;

        // Reprice after the sale; history must not move
        sqlx::query("UPDATE products SET unit_price_cents = 1999 WHERE product_id = ?")
            .bind(margherita.product_id)
            .execute(db.pool())
            .await
            .unwrap();

        let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap();
        let report = db.reports().generate(start, end).await.unwrap();

        assert_eq!(report.entries[0].revenue_cents, 999 * 2);
    }

    #[tokio::test]
    async fn test_range_filter_excludes_outside_orders() {
        let db = test_db().await;
        let margherita = insert_product(&db, "Margherita", 999, 50).await;

        let mut cart = Cart::new();
        cart.add_line(&margherita, 1).unwrap();
        let inside = db
            .checkout()
            .attempt(&mut cart, "ALFKI", "1 Elm St", 0)
            .await
            .unwrap();

        cart.add_line(&margherita, 1).unwrap();
        let outside = db
            .checkout()
            .attempt(&mut cart, "ALFKI", "1 Elm St", 0)
            .await
            .unwrap();

        set_order_date(
            &db,
            inside.order_id,
            Utc.with_ymd_and_hms(2024, 2, 15, 12, 0, 0).unwrap(),
        )
        .await;
        set_order_date(
            &db,
            outside.order_id,
            Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap(),
        )
        .await;

        let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap();
        let report = db.reports().generate(start, end).await.unwrap();

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].quantity_sold, 1);
    }
}
