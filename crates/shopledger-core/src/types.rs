//! # Domain Types
//!
//! Core domain types used throughout Shopledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌─────────────────────┐   │
//! │  │   Product     │   │     Sale      │   │  SupplierTransaction│   │
//! │  │  ───────────  │   │  ───────────  │   │  ─────────────────  │   │
//! │  │  id (UUID)    │   │  id (UUID)    │   │  id (UUID)          │   │
//! │  │  code         │   │  total_cents  │   │  supplier_id (FK)   │   │
//! │  │  stock        │   │  payment      │   │  amount_paid_cents  │   │
//! │  │  unit_price   │   │  ┌──────────┐ │   │  goods_arrived      │   │
//! │  └───────┬───────┘   │  │ SaleLine │ │   └──────────┬──────────┘   │
//! │          │ weak ref  │  │ (owned)  │ │              │              │
//! │          └───────────┼──┤ per item │ │   ┌──────────┴──────────┐   │
//! │                      │  └──────────┘ │   │      Supplier       │   │
//! │                      └───────────────┘   │  balance_cents      │   │
//! │                                          └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! A `Sale` exclusively owns its `SaleLine`s (created together, the lines
//! depend on the sale's generated id). `Product` and `Supplier` are shared,
//! long-lived entities referenced by many lines/transactions; a line's
//! `product_id` identifies the product at time of sale and says nothing
//! about the product's current state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was settled.
///
/// Credit sales are deferred: instead of money changing hands, the
/// referenced supplier's owed balance grows by the sale total.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Settled immediately in cash (or cash-equivalent).
    Cash,
    /// Deferred payment against a supplier's running balance.
    Credit,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Credit => write!(f, "credit"),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on screens and receipts.
    pub name: String,

    /// Business code (shelf code, barcode digits, etc.).
    pub code: String,

    /// Category/type for grouping ("beverage", "grain", ...).
    pub category: String,

    /// Current stock level. Never negative; sales clamp at zero.
    pub stock: i64,

    /// Unit price in minor units (pesewas).
    pub unit_price_cents: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Whether this product counts as low stock on the dashboard.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock < crate::LOW_STOCK_THRESHOLD
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier the shop buys from.
///
/// `balance_cents` is the running amount the shop owes this supplier.
/// It increases on credit purchases and decreases on payments. Only the
/// Balance Adjuster and ledger-entry workflows mutate it.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Supplier name.
    pub name: String,

    /// Free-form contact info (phone, address).
    pub contact_info: Option<String>,

    /// Amount owed to this supplier, signed, in minor units.
    pub balance_cents: i64,

    /// When the supplier was created.
    pub created_at: DateTime<Utc>,
}

impl Supplier {
    /// Returns the owed balance as Money.
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale header: one checkout event, owning one or more lines.
///
/// Immutable once created; corrections are out of scope.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    /// Declared total for the whole sale, in minor units.
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A line item in a sale.
/// The unit price is frozen at time of sale, so the line stays correct
/// even if the product's price changes later.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    /// Weak reference: identifies the product sold, not its current state.
    pub product_id: String,
    /// Quantity sold. Always positive.
    pub quantity: i64,
    /// Unit price in minor units at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Line total (quantity × unit price).
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleLine {
    /// Returns the line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Supplier Transaction
// =============================================================================

/// The direction of a supplier ledger entry.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Goods bought from the supplier; raises the owed balance.
    Purchase,
    /// Money paid to the supplier; lowers the owed balance.
    Payment,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Purchase => write!(f, "purchase"),
            TransactionKind::Payment => write!(f, "payment"),
        }
    }
}

/// A supplier ledger entry.
///
/// Covers both simple ledger entries (amount + kind) and factory
/// consignments, which additionally track `total_amount_cents`,
/// `amount_paid_cents`, arrival status and an expected arrival date.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierTransaction {
    pub id: String,
    pub supplier_id: String,
    pub kind: TransactionKind,
    pub description: String,
    /// The entry amount, in minor units.
    pub amount_cents: i64,
    /// Consignment total; equals `amount_cents` for simple entries.
    pub total_amount_cents: i64,
    /// Paid so far against `total_amount_cents`.
    pub amount_paid_cents: i64,
    /// Whether the goods have physically arrived.
    pub goods_arrived: bool,
    /// Expected arrival date for in-transit consignments.
    pub expected_arrival: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SupplierTransaction {
    /// A transaction is settled once the amount paid covers the total.
    ///
    /// Paid may exceed the total (overpayment); that still counts as
    /// settled. It never *needs* to exceed the total.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.amount_paid_cents >= self.total_amount_cents
    }

    /// Remaining amount owed on this transaction, floored at zero.
    #[inline]
    pub fn outstanding(&self) -> Money {
        Money::from_cents((self.total_amount_cents - self.amount_paid_cents).max(0))
    }
}

// =============================================================================
// Sale Request (input to the Sale Recorder)
// =============================================================================

/// One requested line on a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLineInput {
    pub product_id: String,
    pub quantity: i64,
    /// Unit price at time of sale, in minor units.
    pub unit_price_cents: i64,
}

impl SaleLineInput {
    /// The line total this input implies.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

/// A request to record a sale.
///
/// Zero-quantity lines are the caller's responsibility to exclude; the
/// recorder rejects them rather than silently filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRequest {
    pub items: Vec<SaleLineInput>,
    /// Declared total for the sale, in minor units.
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    /// Required when `payment_method` is credit.
    pub supplier_id: Option<String>,
}

impl SaleRequest {
    /// Sum of the line totals implied by the items.
    pub fn computed_total(&self) -> Money {
        self.items.iter().map(|i| i.line_total()).sum()
    }
}

// =============================================================================
// Dashboard feed row
// =============================================================================

/// A raw sale-line row as fetched for the dashboard.
///
/// `created_at` stays a raw string on purpose: rows written by other
/// clients may carry dates this code cannot parse, and such rows must
/// still count toward per-product totals (see [`crate::dashboard`]).
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLineRow {
    pub id: String,
    /// Product name at fetch time; "Unknown" if the product is gone.
    pub product_name: String,
    pub quantity: i64,
    pub total_cents: i64,
    /// Creation timestamp as stored, typically RFC 3339.
    pub created_at: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
