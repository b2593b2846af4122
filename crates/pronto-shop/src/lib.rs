//! # pronto-shop: Session and Handler Layer for Pronto
//!
//! The glue between callers and the data layer: per-session state
//! (identity plus cart) and typed handler functions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pronto Shop Front                                │
//! │                                                                         │
//! │  Caller (CLI, future HTTP server, tests)                                │
//! │       │ session id + typed params                                       │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    pronto-shop (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐        ┌─────────────────────────────┐    │   │
//! │  │   │ SessionManager │        │  handlers                   │    │   │
//! │  │   │                │        │  auth / catalog / cart /    │    │   │
//! │  │   │ id → Session   │◄───────│  checkout / admin           │    │   │
//! │  │   │ { principal,   │        │                             │    │   │
//! │  │   │   cart }       │        │  Result<Dto, ApiError>      │    │   │
//! │  │   └────────────────┘        └─────────────────────────────┘    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pronto-db (repositories, checkout transaction, sales reporter)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`session`] - Session ids, session state, the session registry
//! - [`handlers`] - One module per surface area
//! - [`error`] - The one error shape callers ever see
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pronto_shop::prelude::*;
//!
//! let sessions = SessionManager::new();
//! let sid = sessions.bind().await;
//!
//! handlers::auth::login(&db, &sessions, sid, "maria", "maria123").await?;
//! handlers::cart::add_to_cart(&db, &sessions, sid, 7, Some(2)).await?;
//! let placed = handlers::checkout::place_order(&db, &sessions, sid, request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod handlers;
pub mod session;

#[cfg(test)]
pub(crate) mod test_util;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ApiError, ErrorCode};
pub use session::{Session, SessionHandle, SessionId, SessionManager};

/// Everything a caller embedding the handlers needs.
pub mod prelude {
    pub use crate::error::{ApiError, ErrorCode};
    pub use crate::handlers;
    pub use crate::session::{SessionId, SessionManager};
}
