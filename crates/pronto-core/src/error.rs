//! # Error Types
//!
//! Domain-specific error types for pronto-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pronto-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pronto-db errors (separate crate)                                     │
//! │  ├── DbError          - Database operation failures                    │
//! │  ├── CheckoutError    - Checkout workflow failures                     │
//! │  └── ReportError      - Sales report failures                          │
//! │                                                                         │
//! │  pronto-shop errors (handler layer)                                    │
//! │  └── ApiError         - What callers see (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Caller       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product ID, quantity, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Product ID doesn't exist in the catalog
    /// - Product was deleted between browse and action
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Product exists but cannot currently be purchased.
    ///
    /// ## When This Occurs
    /// - Product is discontinued
    /// - Product has zero units in stock
    #[error("Product {product_id} ({name}) is not available for purchase")]
    ProductUnavailable { product_id: i64, name: String },

    /// Quantity is zero or negative where a positive count is required.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 0)
    ///      │
    ///      ▼
    /// InvalidQuantity { quantity: 0 }
    ///      │
    ///      ▼
    /// UI shows: "Quantity must be at least 1"
    /// ```
    #[error("Invalid quantity: {quantity} (must be positive)")]
    InvalidQuantity { quantity: i64 },

    /// Insufficient stock to cover a requested quantity.
    ///
    /// ## When This Occurs
    /// - Adding more of a product than the shelf holds
    /// - Checkout re-validation after stock moved underneath the cart
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Cart line for the given product does not exist.
    ///
    /// Callers updating a cart line that is already gone typically log
    /// this and treat it as a no-op rather than failing the request.
    #[error("Cart has no line for product {product_id}")]
    LineNotFound { product_id: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be non-negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid date, malformed price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A range was given with its bounds inverted.
    #[error("{field}: lower bound exceeds upper bound")]
    InvertedRange { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 7: available 3, requested 5"
        );

        let err = CoreError::InvalidQuantity { quantity: -2 };
        assert_eq!(err.to_string(), "Invalid quantity: -2 (must be positive)");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "productName".to_string(),
        };
        assert_eq!(err.to_string(), "productName is required");

        let err = ValidationError::InvertedRange {
            field: "priceRange".to_string(),
        };
        assert_eq!(err.to_string(), "priceRange: lower bound exceeds upper bound");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
