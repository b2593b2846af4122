//! # API Error Type
//!
//! Unified error type for handler responses.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Pronto                                 │
//! │                                                                         │
//! │  Caller                       Handler Layer                             │
//! │  ──────                       ─────────────                             │
//! │                                                                         │
//! │  add_to_cart(...)                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler Function                                                │  │
//! │  │  Result<Dto, ApiError>                                           │  │
//! │  │         │                                                        │  │
//! │  │  DbError ────────┐                                               │  │
//! │  │  CoreError ──────┼──► ApiError { code, message } ───────────────►│  │
//! │  │  CheckoutError ──┤                                               │  │
//! │  │  ReportError ────┘                                               │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Machine-readable `code` for branching, human `message` for display.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use pronto_core::CoreError;
use pronto_db::{CheckoutError, DbError, ReportError};

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for product 7: available 3, requested 5"
/// }
/// ```
#[derive(Debug, Clone, Error, Serialize)]
#[error("[{code:?}] {message}")]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Caller lacks the role this operation requires, or has no
    /// principal at all
    Unauthorized,

    /// Session id is unknown or expired
    SessionNotFound,

    /// Database operation failed
    DatabaseError,

    /// Business rule violation (e.g. deleting a product on an order)
    BusinessLogic,

    /// Cart operation failed
    CartError,

    /// A cart line exceeds live stock
    InsufficientStock,

    /// Product withdrawn or gone between browse and action
    ProductUnavailable,

    /// Checkout attempted on an empty cart
    EmptyCart,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    /// Creates a session-not-found error.
    pub fn session_not_found() -> Self {
        ApiError::new(ErrorCode::SessionNotFound, "Session is unknown or expired")
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{field} '{value}' already exists"),
            ),
            DbError::StillReferenced { entity, id } => ApiError::new(
                ErrorCode::BusinessLogic,
                format!("{entity} {id} is referenced by existing orders"),
            ),
            DbError::InvalidInput(message) => ApiError::validation(message),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::ProductUnavailable { product_id, name } => ApiError::new(
                ErrorCode::ProductUnavailable,
                format!("Product {product_id} ({name}) is not available for purchase"),
            ),
            CoreError::InvalidQuantity { quantity } => ApiError::new(
                ErrorCode::ValidationError,
                format!("Invalid quantity: {quantity}"),
            ),
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for product {product_id}: \
                     available {available}, requested {requested}"
                ),
            ),
            CoreError::LineNotFound { product_id } => ApiError::new(
                ErrorCode::CartError,
                format!("Cart has no line for product {product_id}"),
            ),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts checkout errors to API errors.
impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => {
                ApiError::new(ErrorCode::EmptyCart, "Cannot check out an empty cart")
            }
            CheckoutError::ProductUnavailable(id) => ApiError::new(
                ErrorCode::ProductUnavailable,
                format!("Product {id} is no longer available"),
            ),
            CheckoutError::InsufficientStock {
                product_id,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for product {product_id}: \
                     available {available}, requested {requested}"
                ),
            ),
            CheckoutError::Persistence(e) => ApiError::from(e),
        }
    }
}

/// Converts report errors to API errors.
impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidRange => {
                ApiError::validation("Report range start is after end")
            }
            ReportError::Persistence(e) => ApiError::from(e),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
