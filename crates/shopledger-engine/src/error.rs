//! # Engine Error Types
//!
//! Workflow-level errors. An `EngineError` is what a caller sees when a
//! workflow could not complete; partial completion is NOT an error here -
//! the sale recorder reports it through [`crate::SaleReceipt`] warnings
//! instead.

use thiserror::Error;

use shopledger_core::error::ValidationError;
use shopledger_store::StoreError;

/// Workflow failures.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The store refused or failed a required operation.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The request failed precondition checks before any write.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Product id didn't resolve.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Supplier id didn't resolve.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// Supplier transaction id didn't resolve.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
}

/// Result type for engine workflows.
pub type EngineResult<T> = Result<T, EngineError>;
