//! # Admin Handlers
//!
//! Catalog maintenance and sales reporting for staff accounts.
//!
//! ## Gates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  staff (clerk or admin)          admin only                             │
//! │  ──────────────────────          ──────────                             │
//! │  list_products                   create_product                         │
//! │  list_categories                 update_product                         │
//! │  list_suppliers                  delete_product                         │
//! │  set_stock                                                              │
//! │  update_order_dates                                                     │
//! │  sales_report                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pronto_core::validation::{validate_price_cents, validate_product_name, validate_stock};
use pronto_core::{Category, OrderStatus, SalesReport, Supplier};
use pronto_db::{Database, NewProduct};

use crate::error::ApiError;
use crate::handlers::catalog::ProductDto;
use crate::handlers::{require_admin, require_principal, require_staff};
use crate::session::{SessionId, SessionManager};

// =============================================================================
// DTOs
// =============================================================================

/// Product create/update form. The same shape serves both operations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub product_name: String,
    pub supplier_id: i64,
    pub category_id: i64,
    pub quantity_per_unit: Option<String>,
    pub unit_price_cents: i64,
    pub units_in_stock: i64,
    #[serde(default)]
    pub discontinued: bool,
    pub product_image: Option<String>,
}

impl ProductForm {
    /// Validates the form and turns it into an insertable record.
    fn into_new_product(self) -> Result<NewProduct, ApiError> {
        validate_product_name(&self.product_name)
            .map_err(|e| ApiError::validation(format!("productName: {e}")))?;
        validate_price_cents(self.unit_price_cents)
            .map_err(|e| ApiError::validation(format!("unitPriceCents: {e}")))?;
        validate_stock(self.units_in_stock)
            .map_err(|e| ApiError::validation(format!("unitsInStock: {e}")))?;

        Ok(NewProduct {
            product_name: self.product_name.trim().to_string(),
            supplier_id: self.supplier_id,
            category_id: self.category_id,
            quantity_per_unit: self.quantity_per_unit,
            unit_price_cents: self.unit_price_cents,
            units_in_stock: self.units_in_stock,
            discontinued: self.discontinued,
            product_image: self.product_image,
        })
    }
}

/// Sales report request: inclusive calendar dates, `YYYY-MM-DD`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportRequest {
    pub start_date: String,
    pub end_date: String,
}

/// The report plus the range it covers, echoed back for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportDto {
    pub start_date: String,
    pub end_date: String,
    #[serde(flatten)]
    pub report: SalesReport,
}

// =============================================================================
// Product Maintenance
// =============================================================================

/// Creates a product. Admin only.
pub async fn create_product(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
    form: ProductForm,
) -> Result<ProductDto, ApiError> {
    let principal = require_principal(sessions, session_id).await?;
    require_admin(&principal)?;

    let new = form.into_new_product()?;
    let product_id = db.products().insert(&new).await?;
    info!(product_id, admin = %principal.username, "Product created");

    let product = db
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::internal("Inserted product could not be read back"))?;
    Ok(ProductDto::from(&product))
}

/// Replaces every editable field of a product. Admin only.
pub async fn update_product(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
    product_id: i64,
    form: ProductForm,
) -> Result<ProductDto, ApiError> {
    let principal = require_principal(sessions, session_id).await?;
    require_admin(&principal)?;

    let new = form.into_new_product()?;
    db.products().update(product_id, &new).await?;
    info!(product_id, admin = %principal.username, "Product updated");

    let product = db
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;
    Ok(ProductDto::from(&product))
}

/// Deletes a product. Admin only. Products already on an order are
/// refused so order history keeps its rows.
pub async fn delete_product(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
    product_id: i64,
) -> Result<(), ApiError> {
    let principal = require_principal(sessions, session_id).await?;
    require_admin(&principal)?;

    db.products().delete(product_id).await?;
    info!(product_id, admin = %principal.username, "Product deleted");
    Ok(())
}

/// Sets a product's shelf stock. Staff.
pub async fn set_stock(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
    product_id: i64,
    new_stock: i64,
) -> Result<ProductDto, ApiError> {
    let principal = require_principal(sessions, session_id).await?;
    require_staff(&principal)?;

    db.products().update_stock(product_id, new_stock).await?;
    debug!(product_id, new_stock, staff = %principal.username, "Stock set");

    let product = db
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;
    Ok(ProductDto::from(&product))
}

/// Sets an order's scheduling dates, moving it along the
/// Pending → Processing → Shipped ladder. Staff.
pub async fn update_order_dates(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
    order_id: i64,
    required_date: Option<DateTime<Utc>>,
    shipped_date: Option<DateTime<Utc>>,
) -> Result<OrderStatus, ApiError> {
    let principal = require_principal(sessions, session_id).await?;
    require_staff(&principal)?;

    db.orders()
        .update_dates(order_id, required_date, shipped_date)
        .await?;
    info!(order_id, staff = %principal.username, "Order dates updated");

    let order = db
        .orders()
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", order_id))?;
    Ok(order.status())
}

// =============================================================================
// Listings and Lookups
// =============================================================================

/// The full catalog regardless of availability. Staff.
pub async fn list_products(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
) -> Result<Vec<ProductDto>, ApiError> {
    let principal = require_principal(sessions, session_id).await?;
    require_staff(&principal)?;

    let products = db.products().list_all().await?;
    Ok(products.iter().map(ProductDto::from).collect())
}

/// Category lookup rows for the product form. Staff.
pub async fn list_categories(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
) -> Result<Vec<Category>, ApiError> {
    let principal = require_principal(sessions, session_id).await?;
    require_staff(&principal)?;
    Ok(db.products().list_categories().await?)
}

/// Supplier lookup rows for the product form. Staff.
pub async fn list_suppliers(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
) -> Result<Vec<Supplier>, ApiError> {
    let principal = require_principal(sessions, session_id).await?;
    require_staff(&principal)?;
    Ok(db.products().list_suppliers().await?)
}

// =============================================================================
// Sales Report
// =============================================================================

fn parse_report_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("{field}: expected YYYY-MM-DD, got '{value}'")))
}

/// Aggregated sales per product over an inclusive date range. Staff.
///
/// Calendar dates expand to whole days: the start at midnight, the end
/// at the last second of that day, both UTC.
pub async fn sales_report(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
    request: SalesReportRequest,
) -> Result<SalesReportDto, ApiError> {
    let principal = require_principal(sessions, session_id).await?;
    require_staff(&principal)?;

    let start_day = parse_report_date("startDate", &request.start_date)?;
    let end_day = parse_report_date("endDate", &request.end_date)?;

    let start = start_day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ApiError::internal("Invalid start-of-day timestamp"))?
        .and_utc();
    let end = end_day
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| ApiError::internal("Invalid end-of-day timestamp"))?
        .and_utc();

    debug!(staff = %principal.username, %start, %end, "sales_report handler");

    let report = db.reports().generate(start, end).await?;
    Ok(SalesReportDto {
        start_date: request.start_date,
        end_date: request.end_date,
        report,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
