//! Shared fixtures for handler tests.
//!
//! Each test gets an isolated in-memory database seeded with the lookup
//! rows and demo accounts the handlers expect.

use pronto_core::Product;
use pronto_db::{Database, DbConfig};

/// Fresh in-memory database with categories, suppliers, customers and
/// accounts (admin/admin123, clerk/clerk123, maria/maria123 → ALFKI).
pub async fn shop_db() -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    sqlx::query(
        "INSERT INTO categories (category_name, description) VALUES \
         ('Pizzas', 'Stone-baked pizzas'), \
         ('Sides', 'Breads and salads')",
    )
    .execute(db.pool())
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO suppliers (company_name, contact_name, phone) VALUES \
         ('Dough Bros', 'Gino Rossi', '555-0101')",
    )
    .execute(db.pool())
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO customers (customer_id, contact_name, address) VALUES \
         ('ALFKI', 'Maria Anders', '1 Elm St')",
    )
    .execute(db.pool())
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO accounts (username, password, full_name, role_code, customer_id) VALUES \
         ('admin', 'admin123', 'Site Admin', 'AD', NULL), \
         ('clerk', 'clerk123', 'Counter Clerk', 'ST', NULL), \
         ('maria', 'maria123', 'Maria Anders', 'US', 'ALFKI')",
    )
    .execute(db.pool())
    .await
    .unwrap();

    db
}

/// Inserts a product and returns it as read back through the repository.
pub async fn insert_product(
    db: &Database,
    name: &str,
    price_cents: i64,
    stock: i64,
    discontinued: bool,
) -> Product {
    sqlx::query(
        "INSERT INTO products (product_name, supplier_id, category_id, \
         unit_price_cents, units_in_stock, discontinued) VALUES (?, 1, 1, ?, ?, ?)",
    )
    .bind(name)
    .bind(price_cents)
    .bind(stock)
    .bind(discontinued)
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
