//! # Cart Handlers
//!
//! Session cart manipulation.
//!
//! ## Add Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  add_to_cart(session, product_id, qty)                                 │
//! │       │                                                                 │
//! │       ├── re-fetch live product ──► missing? NOT_FOUND                  │
//! │       ├── withdrawn/out of stock? ► PRODUCT_UNAVAILABLE                 │
//! │       ├── existing qty + new qty > shelf? ► INSUFFICIENT_STOCK          │
//! │       └── merge into the session cart, return the whole cart            │
//! │                                                                         │
//! │  The stock check here is a courtesy for the common case; the           │
//! │  checkout transaction is the authoritative enforcement.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pronto_core::{Cart, CartLine, CartTotals, CoreError};
use pronto_db::Database;

use crate::error::ApiError;
use crate::handlers::current_session;
use crate::session::{SessionId, SessionManager};

// =============================================================================
// DTOs
// =============================================================================

/// One cart line in a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDto {
    pub product_id: i64,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub subtotal_cents: i64,
}

impl From<&CartLine> for CartLineDto {
    fn from(line: &CartLine) -> Self {
        CartLineDto {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            unit_price_cents: line.unit_price_cents,
            quantity: line.quantity,
            subtotal_cents: line.subtotal().cents(),
        }
    }
}

/// Cart response including lines and totals. Every cart handler returns
/// this so the caller always has the full picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLineDto>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            lines: cart.lines().iter().map(CartLineDto::from).collect(),
            totals: cart.totals(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Returns the session's cart.
pub async fn view_cart(
    sessions: &SessionManager,
    session_id: SessionId,
) -> Result<CartResponse, ApiError> {
    let handle = current_session(sessions, session_id).await?;
    let session = handle.lock().await;
    Ok(CartResponse::from(&session.cart))
}

/// Adds a quantity of a product to the session's cart.
///
/// Re-fetches the live product so the snapshot line carries current
/// name and price, and rejects adds the shelf clearly cannot cover.
pub async fn add_to_cart(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
    product_id: i64,
    quantity: Option<i64>,
) -> Result<CartResponse, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(session_id = %session_id, product_id, quantity, "add_to_cart handler");

    let handle = current_session(sessions, session_id).await?;

    let product = db
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or(CoreError::ProductNotFound(product_id))?;

    if !product.is_purchasable() {
        return Err(CoreError::ProductUnavailable {
            product_id,
            name: product.product_name,
        }
        .into());
    }

    let mut session = handle.lock().await;

    // Count what the cart already holds toward the shelf total
    let already_in_cart = session
        .cart
        .lines()
        .iter()
        .find(|l| l.product_id == product_id)
        .map(|l| l.quantity)
        .unwrap_or(0);

    if quantity > 0 && already_in_cart + quantity > product.units_in_stock {
        return Err(CoreError::InsufficientStock {
            product_id,
            available: product.units_in_stock,
            requested: already_in_cart + quantity,
        }
        .into());
    }

    session.cart.add_line(&product, quantity)?;
    Ok(CartResponse::from(&session.cart))
}

/// Sets the quantity of a cart line.
///
/// Zero removes the line. A missing line is logged and treated as a
/// no-op: the caller's view was stale and the end state is what they
/// asked for anyway.
pub async fn update_cart_item(
    sessions: &SessionManager,
    session_id: SessionId,
    product_id: i64,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(session_id = %session_id, product_id, quantity, "update_cart_item handler");

    let handle = current_session(sessions, session_id).await?;
    let mut session = handle.lock().await;

    match session.cart.update_quantity(product_id, quantity) {
        Ok(()) => {}
        Err(CoreError::LineNotFound { product_id }) => {
            warn!(product_id, "update for a line that is not in the cart, ignoring");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(CartResponse::from(&session.cart))
}

/// Removes a cart line. Removing an absent line is a no-op.
pub async fn remove_cart_item(
    sessions: &SessionManager,
    session_id: SessionId,
    product_id: i64,
) -> Result<CartResponse, ApiError> {
    debug!(session_id = %session_id, product_id, "remove_cart_item handler");

    let handle = current_session(sessions, session_id).await?;
    let mut session = handle.lock().await;
    session.cart.remove_line(product_id);
    Ok(CartResponse::from(&session.cart))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_util::{insert_product, shop_db};

    #[tokio::test]
    async fn test_add_and_view() {
        let db = shop_db().await;
        let margherita = insert_product(&db, "Margherita", 999, 20, false).await;
        let bread = insert_product(&db, "Garlic Bread", 500, 10, false).await;

        let sessions = SessionManager::new();
        let sid = sessions.bind().await;

        add_to_cart(&db, &sessions, sid, margherita.product_id, Some(2))
            .await
            .unwrap();
        let response = add_to_cart(&db, &sessions, sid, bread.product_id, None)
            .await
            .unwrap();

        assert_eq!(response.lines.len(), 2);
        assert_eq!(response.totals.total_quantity, 3);
        // 9.99*2 + 5.00 = 24.98 exactly
        assert_eq!(response.totals.total_cents, 2498);

        let again = view_cart(&sessions, sid).await.unwrap();
        assert_eq!(again.totals.total_cents, 2498);
    }

    #[tokio::test]
    async fn test_add_merges_lines() {
        let db = shop_db().await;
        let margherita = insert_product(&db, "Margherita", 999, 20, false).await;

        let sessions = SessionManager::new();
        let sid = sessions.bind().await;

        add_to_cart(&db, &sessions, sid, margherita.product_id, Some(2))
            .await
            .unwrap();
        let response = add_to_cart(&db, &sessions, sid, margherita.product_id, Some(3))
            .await
            .unwrap();

        assert_eq!(response.lines.len(), 1);
        assert_eq!(response.lines[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_add_unavailable_is_rejected() {
        let db = shop_db().await;
        let sold_out = insert_product(&db, "Sold Out", 999, 0, false).await;
        let retired = insert_product(&db, "Retired", 999, 10, true).await;

        let sessions = SessionManager::new();
        let sid = sessions.bind().await;

        let err = add_to_cart(&db, &sessions, sid, sold_out.product_id, Some(1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductUnavailable);

        let err = add_to_cart(&db, &sessions, sid, retired.product_id, Some(1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductUnavailable);

        let err = add_to_cart(&db, &sessions, sid, 9999, Some(1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_is_rejected() {
        let db = shop_db().await;
        let bread = insert_product(&db, "Garlic Bread", 500, 3, false).await;

        let sessions = SessionManager::new();
        let sid = sessions.bind().await;

        add_to_cart(&db, &sessions, sid, bread.product_id, Some(2))
            .await
            .unwrap();

        // 2 already in cart + 2 more > 3 on the shelf
        let err = add_to_cart(&db, &sessions, sid, bread.product_id, Some(2))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        // The failed add changed nothing
        let cart = view_cart(&sessions, sid).await.unwrap();
        assert_eq!(cart.lines[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_update_to_zero_removes() {
        let db = shop_db().await;
        let margherita = insert_product(&db, "Margherita", 999, 20, false).await;

        let sessions = SessionManager::new();
        let sid = sessions.bind().await;

        add_to_cart(&db, &sessions, sid, margherita.product_id, Some(2))
            .await
            .unwrap();
        let response = update_cart_item(&sessions, sid, margherita.product_id, 0)
            .await
            .unwrap();

        assert!(response.lines.is_empty());
        assert_eq!(response.totals.total_cents, 0);
    }

    #[tokio::test]
    async fn test_update_missing_line_is_noop() {
        let db = shop_db().await;
        let margherita = insert_product(&db, "Margherita", 999, 20, false).await;

        let sessions = SessionManager::new();
        let sid = sessions.bind().await;
        add_to_cart(&db, &sessions, sid, margherita.product_id, Some(1))
            .await
            .unwrap();

        // Stale update for something never added: cart unchanged, no error
        let response = update_cart_item(&sessions, sid, 4242, 5).await.unwrap();
        assert_eq!(response.lines.len(), 1);
        assert_eq!(response.lines[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let sessions = SessionManager::new();
        let sid = sessions.bind().await;

        let response = remove_cart_item(&sessions, sid, 4242).await.unwrap();
        assert!(response.lines.is_empty());
    }
}
