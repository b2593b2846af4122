//! # Order Repository
//!
//! Read access to order history plus the admin-only delete.
//!
//! ## What Lives Here vs. Checkout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Order CREATION is the checkout workflow's job: it validates stock,    │
//! │  writes the order, its details and the stock decrements in one         │
//! │  transaction. This repository never inserts orders.                    │
//! │                                                                         │
//! │  This repository reads history:                                        │
//! │    get_by_id        ← one order with its detail lines                  │
//! │    list_by_customer ← a customer's own order history                   │
//! │    orders_in_range  ← audit/report support                             │
//! │                                                                         │
//! │  and owns the lifecycle writes:                                        │
//! │    update_dates     ← scheduling/shipping drives the status ladder     │
//! │    delete           ← details then order, one transaction              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use pronto_core::{Order, OrderDetail};

/// Shared SELECT with the customer display-name join.
const ORDER_SELECT: &str = r#"
    SELECT
        o.order_id,
        o.customer_id,
        c.contact_name AS customer_name,
        o.order_date,
        o.required_date,
        o.shipped_date,
        o.freight_cents,
        o.ship_address
    FROM orders o
    LEFT JOIN customers c ON c.customer_id = o.customer_id
"#;

/// Detail SELECT with the product display-name join.
const DETAIL_SELECT: &str = r#"
    SELECT
        d.order_id,
        d.product_id,
        p.product_name AS product_name,
        d.unit_price_cents,
        d.quantity
    FROM order_details d
    LEFT JOIN products p ON p.product_id = d.product_id
"#;

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order with its detail lines.
    ///
    /// ## Returns
    /// * `Ok(Some(Order))` - Order found, details loaded
    /// * `Ok(None)` - Order not found
    pub async fn get_by_id(&self, order_id: i64) -> DbResult<Option<Order>> {
        let sql = format!("{ORDER_SELECT} WHERE o.order_id = ?");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        match order {
            Some(mut order) => {
                order.details = self.get_details(order_id).await?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// Lists a customer's orders, newest first, details loaded.
    pub async fn list_by_customer(&self, customer_id: &str) -> DbResult<Vec<Order>> {
        debug!(customer_id = %customer_id, "Listing customer orders");

        let sql = format!(
            "{ORDER_SELECT} WHERE o.customer_id = ? ORDER BY o.order_date DESC, o.order_id DESC"
        );
        let mut orders = sqlx::query_as::<_, Order>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        for order in &mut orders {
            order.details = self.get_details(order.order_id).await?;
        }

        Ok(orders)
    }

    /// Orders placed within an inclusive date range, oldest first.
    ///
    /// Supports audit views; the sales report aggregates in SQL instead
    /// of going through here.
    pub async fn orders_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Order>> {
        debug!(%start, %end, "Listing orders in range");

        let sql = format!(
            "{ORDER_SELECT} WHERE o.order_date BETWEEN ? AND ? \
             ORDER BY o.order_date, o.order_id"
        );
        let mut orders = sqlx::query_as::<_, Order>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        for order in &mut orders {
            order.details = self.get_details(order.order_id).await?;
        }

        Ok(orders)
    }

    /// Gets the detail lines for an order, by product id.
    pub async fn get_details(&self, order_id: i64) -> DbResult<Vec<OrderDetail>> {
        let sql = format!("{DETAIL_SELECT} WHERE d.order_id = ? ORDER BY d.product_id");
        let details = sqlx::query_as::<_, OrderDetail>(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(details)
    }

    /// Sets an order's scheduling dates.
    ///
    /// The status ladder is derived from these columns: no dates is
    /// Pending, a required date is Processing, a shipped date is Shipped.
    /// Passing `None` clears a column, so a mis-scheduled order can be
    /// walked back.
    ///
    /// ## Errors
    /// * `DbError::NotFound` if no order has this id
    pub async fn update_dates(
        &self,
        order_id: i64,
        required_date: Option<DateTime<Utc>>,
        shipped_date: Option<DateTime<Utc>>,
    ) -> DbResult<()> {
        debug!(order_id, "Updating order dates");

        let result = sqlx::query(
            "UPDATE orders SET required_date = ?, shipped_date = ? WHERE order_id = ?",
        )
        .bind(required_date)
        .bind(shipped_date)
        .bind(order_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        info!(order_id, "Order dates updated");
        Ok(())
    }

    /// Deletes an order and its details in one transaction.
    ///
    /// Details go first (foreign keys), then the order row. If the order
    /// row doesn't exist the whole transaction rolls back, so a failed
    /// delete never leaves orphaned or half-removed data.
    ///
    /// ## Errors
    /// * `DbError::NotFound` if no order has this id
    pub async fn delete(&self, order_id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM order_details WHERE order_id = ?")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM orders WHERE order_id = ?")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping tx rolls back the detail delete
            return Err(DbError::not_found("Order", order_id));
        }

        tx.commit().await?;
        info!(order_id, "Order deleted");
        Ok(())
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
    use pronto_core::OrderStatus;

    async fn test_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_lookups(db.pool()).await;
        db
    }

    async fn insert_product(db: &Database, name: &str, price_cents: i64) -> i64 {
        let result = sqlx::query(
            "INSERT INTO products (product_name, supplier_id, category_id, \
             unit_price_cents, units_in_stock) VALUES (?, 1, 1, ?, 50)",
        )
        .bind(name)
        .bind(price_cents)
        .execute(db.pool())
        .await
        .unwrap();
        result.last_insert_rowid()
    }

    async fn insert_order(
        db: &Database,
        customer_id: &str,
        order_date: DateTime<Utc>,
        lines: &[(i64, i64, i64)], // (product_id, unit_price_cents, quantity)
    ) -> i64 {
        let result = sqlx::query(
            "INSERT INTO orders (customer_id, order_date, freight_cents, ship_address) \
             VALUES (?, ?, 500, '1 Elm St')",
        )
        .bind(customer_id)
        .bind(order_date)
        .execute(db.pool())
        .await
        .unwrap();
        let order_id = result.last_insert_rowid();

        for (product_id, price, qty) in lines {
            sqlx::query(
                "INSERT INTO order_details (order_id, product_id, unit_price_cents, quantity) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(product_id)
            .bind(price)
            .bind(qty)
            .execute(db.pool())
            .await
            .unwrap();
        }

        order_id
    }

    #[tokio::test]
    async fn test_get_by_id_loads_details() {
        let db = test_db().await;
        let margherita = insert_product(&db, "Margherita", 999).await;
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let order_id = insert_order(&db, "ALFKI", date, &[(margherita, 999, 2)]).await;

        let order = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(order.customer_id, "ALFKI");
        assert_eq!(order.customer_name.as_deref(), Some("Maria Anders"));
        assert_eq!(order.details.len(), 1);
        assert_eq!(order.details[0].product_name.as_deref(), Some("Margherita"));
        // 999*2 + 500 freight
        assert_eq!(order.total_amount().cents(), 2498);
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = test_db().await;
        assert!(db.orders().get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_customer_newest_first() {
        let db = test_db().await;
        let p = insert_product(&db, "Margherita", 999).await;
        let jan = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let mar = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

        let first = insert_order(&db, "ALFKI", jan, &[(p, 999, 1)]).await;
        let second = insert_order(&db, "ALFKI", mar, &[(p, 999, 1)]).await;
        insert_order(&db, "BONAP", mar, &[(p, 999, 1)]).await;

        let orders = db.orders().list_by_customer("ALFKI").await.unwrap();
        let ids: Vec<i64> = orders.iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn test_orders_in_range_inclusive() {
        let db = test_db().await;
        let p = insert_product(&db, "Margherita", 999).await;
        let jan = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap();
        let mar = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

        insert_order(&db, "ALFKI", jan, &[(p, 999, 1)]).await;
        let middle = insert_order(&db, "ALFKI", feb, &[(p, 999, 1)]).await;
        insert_order(&db, "ALFKI", mar, &[(p, 999, 1)]).await;

        // Inclusive bounds: an order exactly at the boundary is in
        let orders = db.orders().orders_in_range(feb, mar).await.unwrap();
        let ids: Vec<i64> = orders.iter().map(|o| o.order_id).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], middle);
    }

    #[tokio::test]
    async fn test_update_dates_walks_the_status_ladder() {
        let db = test_db().await;
        let p = insert_product(&db, "Margherita", 999).await;
        let placed = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let order_id = insert_order(&db, "ALFKI", placed, &[(p, 999, 2)]).await;

        let required = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        db.orders()
            .update_dates(order_id, Some(required), None)
            .await
            .unwrap();
        let order = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(order.status(), OrderStatus::Processing);
        assert_eq!(order.required_date, Some(required));

        let shipped = Utc.with_ymd_and_hms(2024, 3, 3, 16, 30, 0).unwrap();
        db.orders()
            .update_dates(order_id, Some(required), Some(shipped))
            .await
            .unwrap();
        let order = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(order.status(), OrderStatus::Shipped);
        assert_eq!(order.shipped_date, Some(shipped));

        // Clearing both walks back to Pending
        db.orders().update_dates(order_id, None, None).await.unwrap();
        let order = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_dates_missing_is_not_found() {
        let db = test_db().await;
        let err = db
            .orders()
            .update_dates(9999, None, Some(Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_order_and_details() {
        let db = test_db().await;
        let p = insert_product(&db, "Margherita", 999).await;
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let order_id = insert_order(&db, "ALFKI", date, &[(p, 999, 2)]).await;

        db.orders().delete(order_id).await.unwrap();

        assert!(db.orders().get_by_id(order_id).await.unwrap().is_none());
        let detail_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_details WHERE order_id = ?")
                .bind(order_id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(detail_count, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = test_db().await;
        let err = db.orders().delete(9999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
