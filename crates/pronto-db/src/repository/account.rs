//! # Account Repository
//!
//! Login verification and principal lookup.
//!
//! ## Credential Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  verify_login(username, password)                                      │
//! │       │                                                                 │
//! │       ├── no such username ──────────────► None                         │
//! │       ├── password mismatch ─────────────► None                         │
//! │       └── match ─────────────────────────► Some(Principal)              │
//! │                                                                         │
//! │  The two failure cases are indistinguishable to the caller, so a       │
//! │  login response never reveals whether a username exists.               │
//! │                                                                         │
//! │  Credentials are a plain equality check against the stored value;      │
//! │  the store is the only component that ever sees the password.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use pronto_core::{Account, Principal};

const ACCOUNT_SELECT: &str = r#"
    SELECT account_id, username, password, full_name, role_code, customer_id
    FROM accounts
"#;

/// Repository for account database operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Finds an account by username.
    ///
    /// Internal building block; handlers should use [`verify_login`] so
    /// the raw credential never leaves this layer.
    ///
    /// [`verify_login`]: AccountRepository::verify_login
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<Account>> {
        let sql = format!("{ACCOUNT_SELECT} WHERE username = ?");
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// Verifies a username/password pair.
    ///
    /// ## Returns
    /// * `Some(Principal)` - credentials match
    /// * `None` - unknown username OR wrong password (indistinguishable)
    pub async fn verify_login(&self, username: &str, password: &str) -> DbResult<Option<Principal>> {
        debug!(username = %username, "Verifying login");

        let account = self.find_by_username(username).await?;
        match account {
            Some(account) if account.password == password => {
                info!(username = %username, "Login verified");
                Ok(Some(account.to_principal()))
            }
            _ => {
                debug!(username = %username, "Login rejected");
                Ok(None)
            }
        }
    }

    /// Gets the principal for an account id.
    pub async fn get_principal(&self, account_id: i64) -> DbResult<Option<Principal>> {
        let sql = format!("{ACCOUNT_SELECT} WHERE account_id = ?");
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account.map(|a| a.to_principal()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
