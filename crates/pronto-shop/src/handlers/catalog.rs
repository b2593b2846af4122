//! # Catalog Handlers
//!
//! Browsing and searching the product catalog.
//!
//! ## Role-Dependent Views
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  browse(session)                                                       │
//! │       │                                                                 │
//! │       ├── staff/admin principal ──► every product, every state          │
//! │       └── customer or anonymous ──► purchasable products only           │
//! │                                                                         │
//! │  The same split applies to search results: customers never see          │
//! │  discontinued or out-of-stock products in a listing.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use pronto_core::validation::{validate_price_range, validate_search_query};
use pronto_core::{Availability, Product};
use pronto_db::Database;

use crate::error::ApiError;
use crate::handlers::current_session;
use crate::session::{SessionId, SessionManager};

// =============================================================================
// DTOs
// =============================================================================

/// Catalog product as callers see it: raw fields plus the derived
/// availability classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub product_id: i64,
    pub product_name: String,
    pub quantity_per_unit: Option<String>,
    pub unit_price_cents: i64,
    pub units_in_stock: i64,
    pub discontinued: bool,
    /// Display label: "In Stock", "Low Stock", "Out of Stock",
    /// "Discontinued".
    pub availability: String,
    pub purchasable: bool,
    pub category_name: Option<String>,
    pub supplier_name: Option<String>,
    pub product_image: Option<String>,
}

impl From<&Product> for ProductDto {
    fn from(p: &Product) -> Self {
        ProductDto {
            product_id: p.product_id,
            product_name: p.product_name.clone(),
            quantity_per_unit: p.quantity_per_unit.clone(),
            unit_price_cents: p.unit_price_cents,
            units_in_stock: p.units_in_stock,
            discontinued: p.discontinued,
            availability: Availability::classify(p).to_string(),
            purchasable: p.is_purchasable(),
            category_name: p.category_name.clone(),
            supplier_name: p.supplier_name.clone(),
            product_image: p.product_image.clone(),
        }
    }
}

/// Search parameters. Name and price window compose; both absent means
/// "everything I'm allowed to see".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: Option<String>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Whether this session gets the staff catalog view.
async fn staff_view(sessions: &SessionManager, session_id: SessionId) -> Result<bool, ApiError> {
    let handle = current_session(sessions, session_id).await?;
    let session = handle.lock().await;
    Ok(session
        .principal
        .as_ref()
        .map(|p| p.is_staff())
        .unwrap_or(false))
}

/// Lists the catalog for this session's role.
pub async fn browse(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
) -> Result<Vec<ProductDto>, ApiError> {
    let staff = staff_view(sessions, session_id).await?;
    debug!(session_id = %session_id, staff, "browse handler");

    let products = if staff {
        db.products().list_all().await?
    } else {
        db.products().list_available().await?
    };

    Ok(products.iter().map(ProductDto::from).collect())
}

/// Searches by name and/or price window.
///
/// Filters compose: a query plus a window returns products matching
/// both. Customers are additionally filtered to purchasable products.
pub async fn search(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
    request: SearchRequest,
) -> Result<Vec<ProductDto>, ApiError> {
    let staff = staff_view(sessions, session_id).await?;

    let query = validate_search_query(request.query.as_deref().unwrap_or(""))
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let window = match (request.min_price_cents, request.max_price_cents) {
        (None, None) => None,
        (min, max) => {
            let min = min.unwrap_or(0);
            let max = max.unwrap_or(i64::MAX);
            validate_price_range(min, max).map_err(|e| ApiError::validation(e.to_string()))?;
            Some((min, max))
        }
    };

    debug!(session_id = %session_id, query = %query, ?window, "search handler");

    let mut products = match (query.is_empty(), window) {
        (false, _) => db.products().search_by_name(&query).await?,
        (true, Some((min, max))) => db.products().search_by_price_range(min, max).await?,
        (true, None) => db.products().list_all().await?,
    };

    if let Some((min, max)) = window {
        products.retain(|p| p.unit_price_cents >= min && p.unit_price_cents <= max);
    }
    if !staff {
        products.retain(|p| p.is_purchasable());
    }

    Ok(products.iter().map(ProductDto::from).collect())
}

/// Full details for one product, availability included.
pub async fn product_details(db: &Database, product_id: i64) -> Result<ProductDto, ApiError> {
    let product = db
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    Ok(ProductDto::from(&product))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::handlers::auth::login;
    use crate::test_util::{insert_product, shop_db};

    #[tokio::test]
    async fn test_anonymous_browse_sees_available_only() {
        let db = shop_db().await;
        insert_product(&db, "Margherita", 999, 20, false).await;
        insert_product(&db, "Sold Out", 899, 0, false).await;
        insert_product(&db, "Old Special", 799, 10, true).await;

        let sessions = SessionManager::new();
        let sid = sessions.bind().await;

        let listing = browse(&db, &sessions, sid).await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].product_name, "Margherita");
        assert!(listing[0].purchasable);
    }

    #[tokio::test]
    async fn test_staff_browse_sees_everything() {
        let db = shop_db().await;
        insert_product(&db, "Margherita", 999, 20, false).await;
        insert_product(&db, "Sold Out", 899, 0, false).await;
        insert_product(&db, "Old Special", 799, 10, true).await;

        let sessions = SessionManager::new();
        let sid = sessions.bind().await;
        login(&db, &sessions, sid, "clerk", "clerk123")
            .await
            .unwrap();

        let listing = browse(&db, &sessions, sid).await.unwrap();
        assert_eq!(listing.len(), 3);

        let retired = listing
            .iter()
            .find(|p| p.product_name == "Old Special")
            .unwrap();
        assert_eq!(retired.availability, "Discontinued");
        assert!(!retired.purchasable);
    }

    #[tokio::test]
    async fn test_search_combines_name_and_price() {
        let db = shop_db().await;
        insert_product(&db, "Margherita", 999, 20, false).await;
        insert_product(&db, "Margherita Grande", 1399, 20, false).await;
        insert_product(&db, "Pepperoni", 1199, 20, false).await;

        let sessions = SessionManager::new();
        let sid = sessions.bind().await;

        let hits = search(
            &db,
            &sessions,
            sid,
            SearchRequest {
                query: Some("margherita".to_string()),
                min_price_cents: Some(0),
                max_price_cents: Some(1000),
            },
        )
        .await
        .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].product_name, "Margherita");
    }

    #[tokio::test]
    async fn test_customer_search_hides_unpurchasable() {
        let db = shop_db().await;
        insert_product(&db, "Margherita", 999, 20, false).await;
        insert_product(&db, "Margherita Retired", 999, 20, true).await;

        let sessions = SessionManager::new();
        let sid = sessions.bind().await;

        let hits = search(
            &db,
            &sessions,
            sid,
            SearchRequest {
                query: Some("margherita".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(hits.len(), 1);

        // Staff see the retired product in the same search
        login(&db, &sessions, sid, "clerk", "clerk123")
            .await
            .unwrap();
        let staff_hits = search(
            &db,
            &sessions,
            sid,
            SearchRequest {
                query: Some("margherita".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(staff_hits.len(), 2);
    }

    #[tokio::test]
    async fn test_inverted_price_window_is_rejected() {
        let db = shop_db().await;
        let sessions = SessionManager::new();
        let sid = sessions.bind().await;

        let err = search(
            &db,
            &sessions,
            sid,
            SearchRequest {
                query: None,
                min_price_cents: Some(1000),
                max_price_cents: Some(500),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_product_details() {
        let db = shop_db().await;
        let p = insert_product(&db, "Diavola", 1299, 4, false).await;

        let dto = product_details(&db, p.product_id).await.unwrap();
        assert_eq!(dto.availability, "Low Stock");
        assert!(dto.purchasable);
        assert_eq!(dto.category_name.as_deref(), Some("Pizzas"));

        let err = product_details(&db, 9999).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
