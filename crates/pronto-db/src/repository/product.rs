//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Catalog listings (all vs. available-only)
//! - Name and price-window search
//! - CRUD with a delete guard for products on existing orders
//! - Stock updates
//!
//! ## Two Catalog Views
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  list_all()        ← staff/admin: every product, any state             │
//! │  list_available()  ← customers: discontinued = 0 AND stock > 0         │
//! │                                                                         │
//! │  The same split applies to search: customer searches are filtered      │
//! │  to purchasable products at the handler layer.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use pronto_core::{Category, Product, Supplier};

/// Shared SELECT with the display-name joins every product read uses.
const PRODUCT_SELECT: &str = r#"
    SELECT
        p.product_id,
        p.product_name,
        p.supplier_id,
        p.category_id,
        p.quantity_per_unit,
        p.unit_price_cents,
        p.units_in_stock,
        p.discontinued,
        p.product_image,
        c.category_name AS category_name,
        s.company_name AS supplier_name
    FROM products p
    LEFT JOIN categories c ON c.category_id = p.category_id
    LEFT JOIN suppliers s ON s.supplier_id = p.supplier_id
"#;

// =============================================================================
// New Product
// =============================================================================

/// Field set for inserting or updating a product. The id is assigned by
/// the store on insert.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub product_name: String,
    pub supplier_id: i64,
    pub category_id: i64,
    pub quantity_per_unit: Option<String>,
    pub unit_price_cents: i64,
    pub units_in_stock: i64,
    pub discontinued: bool,
    pub product_image: Option<String>,
}

// =============================================================================
// Product Repository
// =============================================================================

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let pizzas = repo.search_by_name("pizza").await?;
/// let product = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, product_id: i64) -> DbResult<Option<Product>> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.product_id = ?");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists every product regardless of state (staff view).
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let sql = format!("{PRODUCT_SELECT} ORDER BY p.product_id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed all products");
        Ok(products)
    }

    /// Lists purchasable products only (customer view).
    ///
    /// Discontinued and out-of-stock products are excluded at the query
    /// level so customers never see them.
    pub async fn list_available(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "{PRODUCT_SELECT} WHERE p.discontinued = 0 AND p.units_in_stock > 0 \
             ORDER BY p.product_id"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed available products");
        Ok(products)
    }

    /// Case-insensitive substring search on product name.
    ///
    /// An empty query matches everything; callers decide whether that
    /// means "list all" or "list available".
    pub async fn search_by_name(&self, query: &str) -> DbResult<Vec<Product>> {
        let query = query.trim();
        debug!(query = %query, "Searching products by name");

        let sql = format!(
            "{PRODUCT_SELECT} WHERE p.product_name LIKE ? COLLATE NOCASE \
             ORDER BY p.product_name"
        );
        let pattern = format!("%{query}%");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Name search returned products");
        Ok(products)
    }

    /// Products priced within an inclusive window, cheapest first.
    pub async fn search_by_price_range(
        &self,
        min_cents: i64,
        max_cents: i64,
    ) -> DbResult<Vec<Product>> {
        debug!(min_cents, max_cents, "Searching products by price range");

        let sql = format!(
            "{PRODUCT_SELECT} WHERE p.unit_price_cents BETWEEN ? AND ? \
             ORDER BY p.unit_price_cents, p.product_id"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(min_cents)
            .bind(max_cents)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Products belonging to a category.
    pub async fn list_by_category(&self, category_id: i64) -> DbResult<Vec<Product>> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.category_id = ? ORDER BY p.product_name");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Inserts a product and returns the assigned id.
    pub async fn insert(&self, new: &NewProduct) -> DbResult<i64> {
        debug!(name = %new.product_name, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                product_name, supplier_id, category_id, quantity_per_unit,
                unit_price_cents, units_in_stock, discontinued, product_image
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.product_name)
        .bind(new.supplier_id)
        .bind(new.category_id)
        .bind(&new.quantity_per_unit)
        .bind(new.unit_price_cents)
        .bind(new.units_in_stock)
        .bind(new.discontinued)
        .bind(&new.product_image)
        .execute(&self.pool)
        .await?;

        let product_id = result.last_insert_rowid();
        info!(product_id, name = %new.product_name, "Product created");
        Ok(product_id)
    }

    /// Updates every mutable field of an existing product.
    ///
    /// ## Errors
    /// * `DbError::NotFound` if no row has this id
    pub async fn update(&self, product_id: i64, new: &NewProduct) -> DbResult<()> {
        debug!(product_id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                product_name = ?,
                supplier_id = ?,
                category_id = ?,
                quantity_per_unit = ?,
                unit_price_cents = ?,
                units_in_stock = ?,
                discontinued = ?,
                product_image = ?
            WHERE product_id = ?
            "#,
        )
        .bind(&new.product_name)
        .bind(new.supplier_id)
        .bind(new.category_id)
        .bind(&new.quantity_per_unit)
        .bind(new.unit_price_cents)
        .bind(new.units_in_stock)
        .bind(new.discontinued)
        .bind(&new.product_image)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product_id));
        }

        info!(product_id, "Product updated");
        Ok(())
    }

    /// Sets a product's stock level to an absolute value.
    ///
    /// Negative levels are rejected before the store is touched; a zero
    /// level is a valid out-of-stock state.
    ///
    /// ## Errors
    /// * `DbError::InvalidInput` if `new_stock < 0`
    /// * `DbError::NotFound` if no row has this id
    pub async fn update_stock(&self, product_id: i64, new_stock: i64) -> DbResult<()> {
        if new_stock < 0 {
            return Err(DbError::InvalidInput(format!(
                "stock level {new_stock} is negative"
            )));
        }

        let result = sqlx::query("UPDATE products SET units_in_stock = ? WHERE product_id = ?")
            .bind(new_stock)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product_id));
        }

        info!(product_id, new_stock, "Stock level set");
        Ok(())
    }

    /// Deletes a product, refusing while any order detail references it.
    ///
    /// Order history is immutable; a product that has been sold stays in
    /// the catalog (discontinue it instead).
    ///
    /// ## Errors
    /// * `DbError::StillReferenced` if the product appears on any order
    /// * `DbError::NotFound` if no row has this id
    pub async fn delete(&self, product_id: i64) -> DbResult<()> {
        let references: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_details WHERE product_id = ?")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;

        if references > 0 {
            return Err(DbError::still_referenced("Product", product_id));
        }

        let result = sqlx::query("DELETE FROM products WHERE product_id = ?")
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product_id));
        }

        info!(product_id, "Product deleted");
        Ok(())
    }

    /// Total number of products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Lists categories for admin forms.
    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT category_id, category_name, description FROM categories \
             ORDER BY category_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Lists suppliers for admin forms.
    pub async fn list_suppliers(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT supplier_id, company_name, contact_name, phone FROM suppliers \
             ORDER BY company_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
