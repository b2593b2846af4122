//! # Auth Handlers
//!
//! Login, logout, and principal introspection.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  login(session, username, password)                                    │
//! │       │                                                                 │
//! │       ├── session unknown ────────► SESSION_NOT_FOUND                   │
//! │       ├── credentials rejected ───► UNAUTHORIZED (one message for       │
//! │       │                             bad user and bad password)          │
//! │       └── verified ───────────────► principal attached, cart kept       │
//! │                                                                         │
//! │  logout(session) ──► principal cleared AND cart cleared                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use pronto_core::{Principal, Role};
use pronto_db::Database;

use crate::error::ApiError;
use crate::handlers::current_session;
use crate::session::{SessionId, SessionManager};

/// The identity facts a caller may see. Never carries the credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalDto {
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub customer_id: Option<String>,
    pub staff: bool,
    pub admin: bool,
}

impl From<&Principal> for PrincipalDto {
    fn from(p: &Principal) -> Self {
        PrincipalDto {
            username: p.username.clone(),
            full_name: p.full_name.clone(),
            role: p.role,
            customer_id: p.customer_id.clone(),
            staff: p.is_staff(),
            admin: p.is_admin(),
        }
    }
}

/// Verifies credentials and attaches the principal to the session.
///
/// The cart survives login: items picked while anonymous stay put.
pub async fn login(
    db: &Database,
    sessions: &SessionManager,
    session_id: SessionId,
    username: &str,
    password: &str,
) -> Result<PrincipalDto, ApiError> {
    debug!(session_id = %session_id, username = %username, "login handler");

    // Fail on a dead session before touching credentials
    current_session(sessions, session_id).await?;

    let principal = db
        .accounts()
        .verify_login(username, password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    let dto = PrincipalDto::from(&principal);
    sessions.login(session_id, principal).await;
    Ok(dto)
}

/// Clears the principal and the cart.
pub async fn logout(sessions: &SessionManager, session_id: SessionId) -> Result<(), ApiError> {
    debug!(session_id = %session_id, "logout handler");

    if sessions.logout(session_id).await {
        Ok(())
    } else {
        Err(ApiError::session_not_found())
    }
}

/// Returns the session's principal, or None for anonymous sessions.
pub async fn current_principal(
    sessions: &SessionManager,
    session_id: SessionId,
) -> Result<Option<PrincipalDto>, ApiError> {
    let handle = current_session(sessions, session_id).await?;
    let session = handle.lock().await;
    Ok(session.principal.as_ref().map(PrincipalDto::from))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::shop_db;

    #[tokio::test]
    async fn test_login_success_attaches_principal() {
        let db = shop_db().await;
        let sessions = SessionManager::new();
        let sid = sessions.bind().await;

        let dto = login(&db, &sessions, sid, "maria", "maria123")
            .await
            .unwrap();
        assert_eq!(dto.username, "maria");
        assert_eq!(dto.customer_id.as_deref(), Some("ALFKI"));
        assert!(!dto.staff);

        let current = current_principal(&sessions, sid).await.unwrap().unwrap();
        assert_eq!(current.username, "maria");
    }

    #[tokio::test]
    async fn test_bad_credentials_are_unauthorized() {
        let db = shop_db().await;
        let sessions = SessionManager::new();
        let sid = sessions.bind().await;

        let bad_password = login(&db, &sessions, sid, "maria", "nope")
            .await
            .unwrap_err();
        let bad_user = login(&db, &sessions, sid, "nobody", "maria123")
            .await
            .unwrap_err();

        // Same code AND same message for both failure modes
        assert_eq!(bad_password.code, crate::error::ErrorCode::Unauthorized);
        assert_eq!(bad_password.message, bad_user.message);

        assert!(current_principal(&sessions, sid).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_on_dead_session_fails() {
        let db = shop_db().await;
        let sessions = SessionManager::new();
        let sid = sessions.bind().await;
        sessions.remove(sid).await;

        let err = login(&db, &sessions, sid, "maria", "maria123")
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::SessionNotFound);
    }

    #[tokio::test]
    async fn test_logout_clears_state() {
        let db = shop_db().await;
        let sessions = SessionManager::new();
        let sid = sessions.bind().await;

        login(&db, &sessions, sid, "maria", "maria123")
            .await
            .unwrap();
        logout(&sessions, sid).await.unwrap();

        assert!(current_principal(&sessions, sid).await.unwrap().is_none());
    }
}
