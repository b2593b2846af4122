//! # Checkout Handler
//!
//! Turns the session cart into a persisted order.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  place_order(session, ship_address, freight)                            │
//! │       │                                                                 │
//! │       ├── no principal, or principal without a                          │
//! │       │   customer record ─────────────► UNAUTHORIZED                   │
//! │       ├── address/freight invalid ─────► VALIDATION_ERROR               │
//! │       └── hand the cart to the checkout transaction                     │
//! │               │                                                         │
//! │               ├── success: cart emptied, receipt returned               │
//! │               └── failure: store untouched, cart keeps its lines        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pronto_core::validation::{validate_freight_cents, validate_ship_address};
use pronto_db::{CheckoutReceipt, Database};

use crate::error::ApiError;
use crate::handlers::current_session;
use crate::session::{SessionId, SessionManager};

/// Checkout parameters as submitted by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub ship_address: String,
    /// Defaults to zero when omitted.
    #[serde(default)]
    pub freight_cents: i64,
}

/// The receipt plus the customer it was booked against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedDto {
    pub customer_id: String,
    #[serde(flatten)]
    pub receipt: CheckoutReceipt,
}

/// Places an order for the session's cart.
///
/// Only a logged-in principal backed by a customer record may check
/// out; staff accounts without one are refused like anonymous callers.
pub async fn place_order(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
    request: PlaceOrderRequest,
) -> Result<OrderPlacedDto, ApiError> {
    let handle = current_session(sessions, session_id).await?;
    let mut session = handle.lock().await;

    let customer_id = session
        .principal
        .as_ref()
        .and_then(|p| p.customer_id.clone())
        .ok_or_else(|| ApiError::unauthorized("A customer account is required to check out"))?;

    let ship_address = validate_ship_address(&request.ship_address)
        .map_err(|e| ApiError::validation(format!("shipAddress: {e}")))?;
    validate_freight_cents(request.freight_cents)
        .map_err(|e| ApiError::validation(format!("freightCents: {e}")))?;

    debug!(
        session_id = %session_id,
        customer_id = %customer_id,
        lines = session.cart.line_count(),
        "place_order handler"
    );

    let receipt = db
        .checkout()
        .attempt(
            &mut session.cart,
            &customer_id,
            &ship_address,
            request.freight_cents,
        )
        .await?;

    info!(
        order_id = receipt.order_id,
        customer_id = %customer_id,
        total_cents = receipt.total_cents,
        "Order placed"
    );

    Ok(OrderPlacedDto {
        customer_id,
        receipt,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
