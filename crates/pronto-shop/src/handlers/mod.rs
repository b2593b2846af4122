//! # Typed Handlers
//!
//! One module per surface area, mirroring the pages of a shop front:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Handler Map                                     │
//! │                                                                         │
//! │  auth      login / logout / current_principal                           │
//! │  catalog   browse / search / product_details                            │
//! │  cart      view / add / update / remove                                 │
//! │  checkout  place_order                                                  │
//! │  admin     product CRUD / stock / lookups / sales_report                │
//! │                                                                         │
//! │  Every handler takes typed parameters plus the session id and           │
//! │  returns Result<Dto, ApiError>. No transport types anywhere.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Authorization ladder
//! - anonymous: browse, search, details, cart
//! - customer principal: everything above + place_order (own orders)
//! - staff: full catalog view, sales report, stock updates
//! - admin: product create/update/delete

use pronto_core::Principal;

use crate::error::ApiError;
use crate::session::{SessionHandle, SessionId, SessionManager};

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;

/// Resolves a session id to its handle or fails with SESSION_NOT_FOUND.
pub(crate) async fn current_session(
    sessions: &SessionManager,
    session_id: SessionId,
) -> Result<SessionHandle, ApiError> {
    sessions
        .get(session_id)
        .await
        .ok_or_else(ApiError::session_not_found)
}

/// Clones the session's principal or fails with UNAUTHORIZED.
pub(crate) async fn require_principal(
    sessions: &SessionManager,
    session_id: SessionId,
) -> Result<Principal, ApiError> {
    let handle = current_session(sessions, session_id).await?;
    let session = handle.lock().await;
    session
        .principal
        .clone()
        .ok_or_else(|| ApiError::unauthorized("Login required"))
}

/// Staff gate: staff and admins pass.
pub(crate) fn require_staff(principal: &Principal) -> Result<(), ApiError> {
    if principal.is_staff() {
        Ok(())
    } else {
        Err(ApiError::unauthorized("Staff access required"))
    }
}

/// Admin gate.
pub(crate) fn require_admin(principal: &Principal) -> Result<(), ApiError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(ApiError::unauthorized("Admin access required"))
    }
}
