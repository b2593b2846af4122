//! # Seed Data Generator
//!
//! Populates a database with a demo catalog for manual testing.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file
//! cargo run -p pronto-db --bin seed
//!
//! # Specify database path
//! cargo run -p pronto-db --bin seed -- --db ./data/pronto.db
//! ```
//!
//! ## Generated Data
//! - Categories: Pizzas, Sides, Drinks, Desserts
//! - Suppliers: local demo suppliers
//! - Customers + accounts: one admin, one staff, two customers
//! - Products: a pizza-shop menu with varied stock levels so every
//!   availability state (in stock, low, out, discontinued) shows up
//!
//! Seeding is skipped when products already exist, so it is safe to run
//! against a database that is already in use.

use std::env;

use pronto_db::{Database, DbConfig, NewProduct};
use tracing::{info, warn};

/// (name, category, supplier, quantity_per_unit, price_cents, stock, discontinued)
const MENU: &[(&str, i64, i64, &str, i64, i64, bool)] = &[
    ("Margherita", 1, 1, "12 inch, serves 2", 999, 40, false),
    ("Pepperoni", 1, 1, "12 inch, serves 2", 1199, 35, false),
    ("Quattro Formaggi", 1, 1, "12 inch, serves 2", 1349, 18, false),
    ("Diavola", 1, 1, "12 inch, serves 2", 1299, 4, false),
    ("Hawaiian", 1, 1, "12 inch, serves 2", 1149, 0, false),
    ("Anchovy Special", 1, 1, "12 inch, serves 2", 1249, 12, true),
    ("Garlic Bread", 2, 2, "6 pieces", 500, 60, false),
    ("Caesar Salad", 2, 2, "single bowl", 749, 5, false),
    ("Mozzarella Sticks", 2, 2, "8 pieces", 649, 0, false),
    ("Cola", 3, 2, "330 ml can", 199, 120, false),
    ("Sparkling Water", 3, 2, "500 ml bottle", 149, 80, false),
    ("Tiramisu", 4, 2, "single slice", 599, 9, false),
    ("Gelato", 4, 2, "two scoops", 449, 3, false),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db_path = parse_db_path().unwrap_or_else(|| "./pronto.db".to_string());
    info!(path = %db_path, "Seeding database");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    if db.products().count().await? > 0 {
        warn!("Products already exist, skipping seed");
        return Ok(());
    }

    seed_lookups(&db).await?;
    seed_accounts(&db).await?;
    seed_menu(&db).await?;

    info!(products = MENU.len(), "Seed complete");
    Ok(())
}

/// Reads `--db <path>` from the command line, if present.
fn parse_db_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .cloned()
}

async fn seed_lookups(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    sqlx::query(
        "INSERT INTO categories (category_name, description) VALUES \
         ('Pizzas', 'Stone-baked pizzas'), \
         ('Sides', 'Breads and salads'), \
         ('Drinks', 'Cold drinks'), \
         ('Desserts', 'Sweet finishes')",
    )
    .execute(db.pool())
    .await?;

    sqlx::query(
        "INSERT INTO suppliers (company_name, contact_name, phone) VALUES \
         ('Dough Bros', 'Gino Rossi', '555-0101'), \
         ('Fresh Farms', 'Ana Silva', '555-0102')",
    )
    .execute(db.pool())
    .await?;

    sqlx::query(
        "INSERT INTO customers (customer_id, contact_name, address) VALUES \
         ('ALFKI', 'Maria Anders', '1 Elm St'), \
         ('BONAP', 'Laurence Lebihan', '12 Rue des Bouchers')",
    )
    .execute(db.pool())
    .await?;

    info!("Lookup tables seeded");
    Ok(())
}

async fn seed_accounts(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    sqlx::query(
        "INSERT INTO accounts (username, password, full_name, role_code, customer_id) VALUES \
         ('admin', 'admin123', 'Site Admin', 'AD', NULL), \
         ('clerk', 'clerk123', 'Counter Clerk', 'ST', NULL), \
         ('maria', 'maria123', 'Maria Anders', 'US', 'ALFKI'), \
         ('laurence', 'laurence123', 'Laurence Lebihan', 'US', 'BONAP')",
    )
    .execute(db.pool())
    .await?;

    info!("Demo accounts seeded");
    Ok(())
}

async fn seed_menu(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let products = db.products();

    for (name, category_id, supplier_id, per_unit, price_cents, stock, discontinued) in MENU {
        products
            .insert(&NewProduct {
                product_name: name.to_string(),
                supplier_id: *supplier_id,
                category_id: *category_id,
                quantity_per_unit: Some(per_unit.to_string()),
                unit_price_cents: *price_cents,
                units_in_stock: *stock,
                discontinued: *discontinued,
                product_image: None,
            })
            .await?;
    }

    info!("Menu seeded");
    Ok(())
}
