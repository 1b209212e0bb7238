//! # shopledger-core: Pure Business Logic for Shopledger
//!
//! This crate is the **heart** of Shopledger. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Shopledger Architecture                         │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │              Presentation layer (external)                    │ │
//! │  │   Sales screen ──► Dashboard ──► Supplier ledger screens      │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │          shopledger-engine (workflows, I/O orchestration)     │ │
//! │  │   SaleRecorder, StockAdjuster, BalanceAdjuster, Dashboard     │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │            ★ shopledger-core (THIS CRATE) ★                   │ │
//! │  │                                                               │ │
//! │  │   ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌────────────┐      │ │
//! │  │   │  types  │ │  money  │ │ dashboard │ │ validation │      │ │
//! │  │   │ Product │ │  Money  │ │ aggregate │ │   rules    │      │ │
//! │  │   │  Sale   │ │ (cents) │ │  (fold)   │ │   checks   │      │ │
//! │  │   └─────────┘ └─────────┘ └───────────┘ └────────────┘      │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Supplier, Sale, SaleLine, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`dashboard`] - Pure aggregation of sale lines into dashboard metrics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dashboard;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single product on one sale line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Configurable per-shop in future versions.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Stock level below which a product counts as "low stock" on the dashboard.
pub const LOW_STOCK_THRESHOLD: i64 = 5;
