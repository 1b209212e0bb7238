//! # Stock and Balance Adjusters
//!
//! Read-modify-write updates for product stock and supplier balances.
//!
//! ## The Read-Modify-Write Window
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  deduct(product, qty)                                               │
//! │                                                                     │
//! │  1. read   stock = get_product(id).stock        ─┐                  │
//! │  2. modify new = max(stock - qty, 0)             │ nothing locks    │
//! │  3. write  set_product_stock(id, new)           ─┘ this window      │
//! │                                                                     │
//! │  Two concurrent deductions can both read the same starting stock    │
//! │  and the later write wins. A single-operator shop makes this        │
//! │  acceptable; the adjuster does not pretend otherwise, and the       │
//! │  tests below demonstrate the lost update.                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Oversell is clamped, not rejected: selling 10 units with 3 on the
//! shelf leaves stock at 0. The physical goods left the shop either
//! way; refusing the write would only make the records more wrong.

use std::sync::Arc;

use tracing::{debug, warn};

use shopledger_store::{ProductStore, SupplierStore};

use crate::error::{EngineError, EngineResult};

// =============================================================================
// Stock Adjuster
// =============================================================================

/// Outcome of one stock deduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDeduction {
    pub product_id: String,
    /// Stock level the adjuster read before writing.
    pub previous: i64,
    /// Quantity the caller asked to remove.
    pub requested: i64,
    /// Stock level after the write.
    pub remaining: i64,
}

impl StockDeduction {
    /// True when the request exceeded available stock and was clamped.
    pub fn clamped(&self) -> bool {
        self.requested > self.previous
    }
}

/// Adjusts product stock levels.
pub struct StockAdjuster<S> {
    store: Arc<S>,
}

impl<S: ProductStore> StockAdjuster<S> {
    pub fn new(store: Arc<S>) -> Self {
        StockAdjuster { store }
    }

    /// Removes `quantity` units from a product's stock, clamping at zero.
    ///
    /// Fails only when the product doesn't exist or the store errors;
    /// insufficient stock is a warning condition, not a failure.
    pub async fn deduct(&self, product_id: &str, quantity: i64) -> EngineResult<StockDeduction> {
        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| EngineError::ProductNotFound(product_id.to_string()))?;

        let remaining = (product.stock - quantity).max(0);

        if quantity > product.stock {
            warn!(
                product_id = %product_id,
                requested = quantity,
                available = product.stock,
                "Deduction exceeds stock; clamping at zero"
            );
        }

        self.store.set_product_stock(product_id, remaining).await?;

        debug!(
            product_id = %product_id,
            previous = product.stock,
            remaining = remaining,
            "Stock deducted"
        );

        Ok(StockDeduction {
            product_id: product_id.to_string(),
            previous: product.stock,
            requested: quantity,
            remaining,
        })
    }

    /// Adds `quantity` units to a product's stock.
    pub async fn restock(&self, product_id: &str, quantity: i64) -> EngineResult<i64> {
        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| EngineError::ProductNotFound(product_id.to_string()))?;

        let new_stock = product.stock + quantity;
        self.store.set_product_stock(product_id, new_stock).await?;

        debug!(product_id = %product_id, new_stock = new_stock, "Stock replenished");
        Ok(new_stock)
    }
}

// =============================================================================
// Balance Adjuster
// =============================================================================

/// Adjusts supplier balances.
///
/// Balances are signed: positive means the shop owes the supplier.
/// Same read-modify-write contract as [`StockAdjuster`], except deltas
/// are applied without clamping - debt can go arbitrarily far in either
/// direction.
pub struct BalanceAdjuster<S> {
    store: Arc<S>,
}

impl<S: SupplierStore> BalanceAdjuster<S> {
    pub fn new(store: Arc<S>) -> Self {
        BalanceAdjuster { store }
    }

    /// Applies a signed delta to a supplier's balance and returns the
    /// new balance.
    pub async fn apply(&self, supplier_id: &str, delta_cents: i64) -> EngineResult<i64> {
        let supplier = self
            .store
            .get_supplier(supplier_id)
            .await?
            .ok_or_else(|| EngineError::SupplierNotFound(supplier_id.to_string()))?;

        let new_balance = supplier.balance_cents + delta_cents;
        self.store
            .set_supplier_balance(supplier_id, new_balance)
            .await?;

        debug!(
            supplier_id = %supplier_id,
            delta_cents = delta_cents,
            new_balance = new_balance,
            "Supplier balance adjusted"
        );
        Ok(new_balance)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
