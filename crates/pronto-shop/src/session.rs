//! # Session Management
//!
//! Maps opaque session ids to per-session state: an optional
//! authenticated principal and exactly one cart.
//!
//! ## Session Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       SessionManager                                    │
//! │                                                                         │
//! │   SessionId (uuid v4) ──► Mutex<Session>                                │
//! │                              │                                          │
//! │                              ├── principal: Option<Principal>           │
//! │                              └── cart: Cart                             │
//! │                                                                         │
//! │   • bind() creates an anonymous session with an empty cart              │
//! │   • login() attaches a principal (cart survives login)                  │
//! │   • logout() clears principal AND cart                                  │
//! │   • Carts are never shared or merged across sessions                    │
//! │                                                                         │
//! │   The per-session mutex serializes cart mutations within a session;    │
//! │   different sessions proceed in parallel.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use pronto_core::{Cart, Principal};

// =============================================================================
// Session Id
// =============================================================================

/// Opaque session identifier handed to the caller at bind time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    fn generate() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// Session
// =============================================================================

/// Per-session state.
#[derive(Debug)]
pub struct Session {
    /// The authenticated identity, if any. Anonymous sessions can browse
    /// and fill a cart but not check out.
    pub principal: Option<Principal>,

    /// The session's cart. Owned by exactly this session for its entire
    /// lifetime.
    pub cart: Cart,
}

impl Session {
    fn new() -> Self {
        Session {
            principal: None,
            cart: Cart::new(),
        }
    }
}

// =============================================================================
// Session Manager
// =============================================================================

/// Shared handle type handlers lock to touch session state.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Owns every live session.
///
/// Cheaply cloneable; clones share the same session table.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, SessionHandle>>>,
}

impl SessionManager {
    /// Creates an empty session manager.
    pub fn new() -> Self {
        SessionManager::default()
    }

    /// Creates a new anonymous session and returns its id.
    pub async fn bind(&self) -> SessionId {
        let id = SessionId::generate();
        let mut sessions = self.sessions.lock().await;
        sessions.insert(id, Arc::new(Mutex::new(Session::new())));
        debug!(session_id = %id, "Session bound");
        id
    }

    /// Looks up a session handle.
    ///
    /// ## Returns
    /// * `Some(handle)` - session exists; lock it to read or mutate
    /// * `None` - unknown or expired id
    pub async fn get(&self, id: SessionId) -> Option<SessionHandle> {
        let sessions = self.sessions.lock().await;
        sessions.get(&id).cloned()
    }

    /// Attaches a principal to a session.
    ///
    /// The cart survives login: items picked while browsing anonymously
    /// stay in the cart.
    pub async fn login(&self, id: SessionId, principal: Principal) -> bool {
        match self.get(id).await {
            Some(handle) => {
                let mut session = handle.lock().await;
                info!(session_id = %id, username = %principal.username, "Principal attached");
                session.principal = Some(principal);
                true
            }
            None => false,
        }
    }

    /// Clears the principal AND the cart.
    ///
    /// The cart belongs to the authenticated interaction that is ending;
    /// whoever uses this session next starts fresh.
    pub async fn logout(&self, id: SessionId) -> bool {
        match self.get(id).await {
            Some(handle) => {
                let mut session = handle.lock().await;
                session.principal = None;
                session.cart.clear();
                info!(session_id = %id, "Session logged out");
                true
            }
            None => false,
        }
    }

    /// Drops a session entirely (expiry, explicit unbind).
    pub async fn remove(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(&id).is_some()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether no sessions are live.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
