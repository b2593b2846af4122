//! # Domain Types
//!
//! Core domain types used throughout Pronto.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │   OrderDetail   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_id     │   │  order_id       │   │  order_id (FK)  │       │
//! │  │  product_name   │   │  customer_id    │   │  product_id     │       │
//! │  │  unit_price     │   │  order_date     │   │  unit_price     │       │
//! │  │  units_in_stock │   │  freight_cents  │   │  quantity       │       │
//! │  │  discontinued   │   │  ship_address   │   │  (price frozen) │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │    Principal    │   │ SalesReportEntry│       │
//! │  │    Supplier     │   │  role: admin /  │   │  quantity_sold  │       │
//! │  │    Customer     │   │  staff/customer │   │  revenue_cents  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Order details freeze the unit price at purchase time. Later catalog price
//! changes never rewrite history, and sales reports read the frozen prices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// `category_name` and `supplier_name` are filled in by the catalog store's
/// LEFT JOINs for display; they are `None` when the product is constructed
/// outside a joined query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Catalog identifier (assigned by the store on insert).
    pub product_id: i64,

    /// Display name shown in catalog listings.
    pub product_name: String,

    /// Supplier reference.
    pub supplier_id: i64,

    /// Category reference.
    pub category_id: i64,

    /// Packaging description, e.g. "12 inch, serves 2".
    pub quantity_per_unit: Option<String>,

    /// Unit price in cents (never negative).
    pub unit_price_cents: i64,

    /// Units currently on the shelf (never negative).
    pub units_in_stock: i64,

    /// Whether the product has been withdrawn from sale.
    pub discontinued: bool,

    /// Optional image path for catalog display.
    pub product_image: Option<String>,

    /// Category display name (joined).
    pub category_name: Option<String>,

    /// Supplier display name (joined).
    pub supplier_name: Option<String>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Checks whether the product can be purchased right now.
    ///
    /// Purchasable means not discontinued and at least one unit on the
    /// shelf. Availability classification is richer; see
    /// [`crate::availability::Availability`].
    #[inline]
    pub fn is_purchasable(&self) -> bool {
        !self.discontinued && self.units_in_stock > 0
    }
}

// =============================================================================
// Category & Supplier
// =============================================================================

/// A product category (lookup table, managed alongside the catalog).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    pub description: Option<String>,
}

/// A product supplier (lookup table).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub supplier_id: i64,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer who can own orders.
///
/// Customer ids are short text codes rather than numbers, matching the
/// catalog's historical data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub customer_id: String,
    pub contact_name: String,
    pub address: Option<String>,
}

// =============================================================================
// Order Status
// =============================================================================

/// Derived order status. Never stored; computed from the date fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, not yet scheduled.
    Pending,
    /// Required date set, being prepared.
    Processing,
    /// Shipped date set, out the door.
    Shipped,
}

// =============================================================================
// Order
// =============================================================================

/// A placed order with its detail lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    /// Order identifier (assigned by the store on insert).
    pub order_id: i64,

    /// Owning customer.
    pub customer_id: String,

    /// Customer display name (joined).
    pub customer_name: Option<String>,

    /// When the order was placed.
    pub order_date: DateTime<Utc>,

    /// Requested delivery date, if scheduled.
    pub required_date: Option<DateTime<Utc>>,

    /// When the order shipped, if it has.
    pub shipped_date: Option<DateTime<Utc>>,

    /// Shipping cost in cents.
    pub freight_cents: i64,

    /// Delivery address.
    pub ship_address: String,

    /// Detail lines (loaded separately from the order row).
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub details: Vec<OrderDetail>,
}

impl Order {
    /// Total amount: sum of detail subtotals plus freight.
    pub fn total_amount(&self) -> Money {
        let details: Money = self
            .details
            .iter()
            .fold(Money::zero(), |acc, d| acc + d.subtotal());
        details + Money::from_cents(self.freight_cents)
    }

    /// Derived status from the date fields.
    ///
    /// Shipped wins over processing wins over pending.
    pub fn status(&self) -> OrderStatus {
        if self.shipped_date.is_some() {
            OrderStatus::Shipped
        } else if self.required_date.is_some() {
            OrderStatus::Processing
        } else {
            OrderStatus::Pending
        }
    }
}

// =============================================================================
// Order Detail
// =============================================================================

/// A line on an order. Immutable after creation.
///
/// Uses the snapshot pattern: `unit_price_cents` is the catalog price at
/// the moment the order was placed, not the current one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderDetail {
    pub order_id: i64,
    pub product_id: i64,
    /// Product display name (joined, for receipts).
    pub product_name: Option<String>,
    /// Unit price in cents at time of purchase (frozen).
    pub unit_price_cents: i64,
    /// Units purchased.
    pub quantity: i64,
}

impl OrderDetail {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line subtotal: frozen unit price times quantity.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.unit_price_cents * self.quantity)
    }
}

// =============================================================================
// Accounts & Roles
// =============================================================================

/// Role attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

impl Role {
    /// Two-letter code used in account storage ("AD", "ST", "US").
    pub fn code(&self) -> &'static str {
        match self {
            Role::Admin => "AD",
            Role::Staff => "ST",
            Role::Customer => "US",
        }
    }

    /// Parses a stored role code. Unknown codes map to the least
    /// privileged role.
    pub fn from_code(code: &str) -> Self {
        match code {
            "AD" => Role::Admin,
            "ST" => Role::Staff,
            _ => Role::Customer,
        }
    }
}

/// A stored account row, including the credential.
///
/// Never serialize this outward; convert to [`Principal`] first.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Account {
    pub account_id: i64,
    pub username: String,
    pub password: String,
    pub full_name: String,
    /// Stored role code ("AD", "ST", "US").
    pub role_code: String,
    /// Linked customer record, for customer accounts.
    pub customer_id: Option<String>,
}

impl Account {
    /// Strips the credential, leaving the identity facts handlers need.
    pub fn to_principal(&self) -> Principal {
        Principal {
            account_id: self.account_id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            role: Role::from_code(&self.role_code),
            customer_id: self.customer_id.clone(),
        }
    }
}

/// An authenticated identity attached to a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub account_id: i64,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub customer_id: Option<String>,
}

impl Principal {
    /// Staff-level access: staff and admins both qualify.
    #[inline]
    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Staff)
    }

    /// Admin-only access.
    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

// =============================================================================
// Sales Report
// =============================================================================

/// One product's aggregated sales over a report period. Derived only,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesReportEntry {
    pub product_id: i64,
    pub product_name: String,
    /// Total units sold over the period.
    pub quantity_sold: i64,
    /// Total revenue in cents (frozen prices, freight excluded).
    pub revenue_cents: i64,
}

impl SalesReportEntry {
    /// Returns the revenue as Money.
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }
}

/// A complete sales report over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    /// Per-product entries, ordered by product id ascending.
    pub entries: Vec<SalesReportEntry>,
    /// Sum of all entry revenues, freight excluded.
    pub grand_total_cents: i64,
}

impl SalesReport {
    /// Builds a report from entries, computing the grand total.
    pub fn from_entries(entries: Vec<SalesReportEntry>) -> Self {
        let grand_total_cents = entries.iter().map(|e| e.revenue_cents).sum();
        SalesReport {
            entries,
            grand_total_cents,
        }
    }

    /// Returns the grand total as Money.
    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_cents(self.grand_total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
