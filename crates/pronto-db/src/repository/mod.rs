//! # Repository Layer
//!
//! One repository per aggregate, each a thin struct around the shared
//! pool.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Repository Layout                                 │
//! │                                                                         │
//! │  ProductRepository  ← catalog CRUD, search, stock, lookups             │
//! │  OrderRepository    ← order history reads, admin delete                │
//! │  AccountRepository  ← login verification, principal lookup             │
//! │                                                                         │
//! │  Writes that span aggregates (order + details + stock) live in         │
//! │  the checkout workflow, not here.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod account;
pub mod order;
pub mod product;
