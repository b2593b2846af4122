//! Shared fixtures for repository and workflow tests.
//!
//! Inserts the lookup rows (categories, suppliers, customers, accounts)
//! that product and order fixtures reference. Tests run against
//! `DbConfig::in_memory()` so each gets a fresh, isolated schema.

use sqlx::SqlitePool;

/// Seeds the reference tables every fixture depends on.
pub async fn seed_lookups(pool: &SqlitePool) {
    sqlx::query(
        "INSERT INTO categories (category_name, description) VALUES \
         ('Pizzas', 'Stone-baked pizzas'), \
         ('Sides', 'Breads and salads')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO suppliers (company_name, contact_name, phone) VALUES \
         ('Dough Bros', 'Gino Rossi', '555-0101'), \
         ('Fresh Farms', 'Ana Silva', '555-0102')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO customers (customer_id, contact_name, address) VALUES \
         ('ALFKI', 'Maria Anders', '1 Elm St'), \
         ('BONAP', 'Laurence Lebihan', '12 Rue des Bouchers')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO accounts (username, password, full_name, role_code, customer_id) VALUES \
         ('admin', 'admin123', 'Site Admin', 'AD', NULL), \
         ('clerk', 'clerk123', 'Counter Clerk', 'ST', NULL), \
         ('maria', 'maria123', 'Maria Anders', 'US', 'ALFKI')",
    )
    .execute(pool)
    .await
    .unwrap();
}
