//! # Store Traits
//!
//! The persistence contract the engine workflows are written against.
//!
//! ## Why Per-Table Traits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Trait Granularity                               │
//! │                                                                     │
//! │  ProductStore      ← Stock Adjuster needs only this                 │
//! │  SupplierStore     ← Balance Adjuster needs only this               │
//! │  SaleStore                                                          │
//! │  TransactionStore                                                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  LedgerStore = all four (what SaleRecorder takes)                   │
//! │                                                                     │
//! │  A workflow declares the narrowest bound it needs, and a test       │
//! │  double implements only the tables it fakes.                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity Contract
//! Every method is one statement: it fully happens or fully fails with a
//! [`StoreError`]. Nothing here spans statements; sequencing and partial
//! failure policy belong to the caller.

use async_trait::async_trait;

use shopledger_core::types::{
    Product, Sale, SaleLine, SaleLineRow, Supplier, SupplierTransaction,
};

use crate::error::StoreResult;

// =============================================================================
// Product Store
// =============================================================================

/// Persistence operations for products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Inserts a new product.
    async fn insert_product(&self, product: &Product) -> StoreResult<()>;

    /// Fetches a product by id. `Ok(None)` when it doesn't exist.
    async fn get_product(&self, id: &str) -> StoreResult<Option<Product>>;

    /// Lists all products, ordered by name.
    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    /// Overwrites a product's editable fields (name, code, category, price).
    async fn update_product(&self, product: &Product) -> StoreResult<()>;

    /// Writes an absolute stock level.
    ///
    /// This is a blind write: whoever computed `stock` owns the
    /// read-modify-write window. Fails with NotFound when no row matches.
    async fn set_product_stock(&self, id: &str, stock: i64) -> StoreResult<()>;

    /// Deletes a product. Sale lines referencing it are left in place.
    async fn delete_product(&self, id: &str) -> StoreResult<()>;
}

// =============================================================================
// Supplier Store
// =============================================================================

/// Persistence operations for suppliers.
#[async_trait]
pub trait SupplierStore: Send + Sync {
    /// Inserts a new supplier.
    async fn insert_supplier(&self, supplier: &Supplier) -> StoreResult<()>;

    /// Fetches a supplier by id. `Ok(None)` when it doesn't exist.
    async fn get_supplier(&self, id: &str) -> StoreResult<Option<Supplier>>;

    /// Lists all suppliers, ordered by name.
    async fn list_suppliers(&self) -> StoreResult<Vec<Supplier>>;

    /// Writes an absolute balance. Same blind-write contract as
    /// [`ProductStore::set_product_stock`].
    async fn set_supplier_balance(&self, id: &str, balance_cents: i64) -> StoreResult<()>;
}

// =============================================================================
// Sale Store
// =============================================================================

/// Persistence operations for sale headers and line items.
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Inserts a sale header.
    async fn insert_sale(&self, sale: &Sale) -> StoreResult<()>;

    /// Fetches a sale header by id.
    async fn get_sale(&self, id: &str) -> StoreResult<Option<Sale>>;

    /// Inserts one line item. Callers inserting several lines call this
    /// once per line; each insert stands alone.
    async fn insert_sale_line(&self, line: &SaleLine) -> StoreResult<()>;

    /// Lists the line items of one sale.
    async fn list_sale_lines(&self, sale_id: &str) -> StoreResult<Vec<SaleLine>>;

    /// Lists recent line items across all sales, newest first, joined
    /// with the product name ('Unknown' when the product is gone).
    async fn list_recent_sale_lines(&self, limit: i64) -> StoreResult<Vec<SaleLineRow>>;
}

// =============================================================================
// Transaction Store
// =============================================================================

/// Persistence operations for supplier ledger entries.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Inserts a ledger entry.
    async fn insert_transaction(&self, txn: &SupplierTransaction) -> StoreResult<()>;

    /// Fetches a ledger entry by id.
    async fn get_transaction(&self, id: &str) -> StoreResult<Option<SupplierTransaction>>;

    /// Lists a supplier's ledger entries, newest first.
    async fn list_transactions(&self, supplier_id: &str)
        -> StoreResult<Vec<SupplierTransaction>>;

    /// Writes an absolute paid-so-far amount on a consignment entry.
    async fn set_transaction_paid(&self, id: &str, amount_paid_cents: i64) -> StoreResult<()>;

    /// Marks whether a consignment's goods have arrived.
    async fn set_transaction_arrival(&self, id: &str, goods_arrived: bool) -> StoreResult<()>;
}

// =============================================================================
// Ledger Store
// =============================================================================

/// The full store surface: everything the sale workflow touches.
pub trait LedgerStore: ProductStore + SupplierStore + SaleStore + TransactionStore {}

impl<T> LedgerStore for T where T: ProductStore + SupplierStore + SaleStore + TransactionStore {}
