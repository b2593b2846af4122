//! # Validation Module
//!
//! Input validation utilities for Pronto.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Handler (pronto-shop)                                        │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Workflows (cart, checkout)                                   │
//! │  └── Domain invariants (stock, purchasability)                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK constraints (price >= 0, stock >= 0)                        │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pronto_core::validation::{validate_product_name, validate_quantity};
//!
//! validate_product_name("Margherita 12\"").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use chrono::{DateTime, Utc};

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use pronto_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Quattro Formaggi").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "productName".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "productName".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a shipping address.
///
/// ## Rules
/// - Must not be empty (orders need somewhere to go)
/// - Maximum 300 characters
pub fn validate_ship_address(address: &str) -> ValidationResult<String> {
    let address = address.trim();

    if address.is_empty() {
        return Err(ValidationError::Required {
            field: "shipAddress".to_string(),
        });
    }

    if address.len() > 300 {
        return Err(ValidationError::TooLong {
            field: "shipAddress".to_string(),
            max: 300,
        });
    }

    Ok(address.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a requested quantity.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// No upper cap here: the cart may optimistically request more than the
/// shelf holds, and the checkout transaction enforces live stock.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (promotional items)
///
/// ## Example
/// ```rust
/// use pronto_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());  // $10.99
/// assert!(validate_price_cents(0).is_ok());     // Free item
/// assert!(validate_price_cents(-100).is_err()); // Invalid
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "unitPrice".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero means out of stock, not invalid
pub fn validate_stock(units: i64) -> ValidationResult<()> {
    if units < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "unitsInStock".to_string(),
        });
    }

    Ok(())
}

/// Validates a freight charge in cents.
pub fn validate_freight_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "freight".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Range Validators
// =============================================================================

/// Validates a price search window (inclusive bounds in cents).
///
/// ## Rules
/// - Both bounds non-negative
/// - Lower bound must not exceed upper bound
pub fn validate_price_range(min_cents: i64, max_cents: i64) -> ValidationResult<()> {
    if min_cents < 0 || max_cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "priceRange".to_string(),
        });
    }

    if min_cents > max_cents {
        return Err(ValidationError::InvertedRange {
            field: "priceRange".to_string(),
        });
    }

    Ok(())
}

/// Validates a report date range (inclusive bounds).
///
/// ## Rules
/// - Start must not be after end
///
/// Equal bounds are fine: a one-instant range is empty or tiny, not
/// invalid.
pub fn validate_date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> ValidationResult<()> {
    if start > end {
        return Err(ValidationError::InvertedRange {
            field: "dateRange".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Quattro Formaggi").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  pizza  ").unwrap(), "pizza");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_ship_address() {
        assert_eq!(
            validate_ship_address(" 1 Elm St ").unwrap(),
            "1 Elm St"
        );
        assert!(validate_ship_address("").is_err());
        assert!(validate_ship_address(&"x".repeat(400)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        // No upper cap; stock is enforced at checkout
        assert!(validate_quantity(10_000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(50).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_price_range() {
        assert!(validate_price_range(0, 1000).is_ok());
        assert!(validate_price_range(500, 500).is_ok());
        assert!(validate_price_range(1000, 500).is_err());
        assert!(validate_price_range(-1, 500).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();

        assert!(validate_date_range(early, late).is_ok());
        assert!(validate_date_range(early, early).is_ok());
        assert!(validate_date_range(late, early).is_err());
    }
}
