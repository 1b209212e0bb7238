//! # shopledger-engine
//!
//! The workflows that tie the core rules to the store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Engine Layer                                 │
//! │                                                                     │
//! │  recorder.rs   SaleRecorder      ← the checkout workflow            │
//! │  adjust.rs     StockAdjuster     ← read-modify-write stock          │
//! │                BalanceAdjuster   ← read-modify-write balances       │
//! │  ledger.rs     SupplierLedger    ← purchases, payments,             │
//! │                                    consignments                     │
//! │  dashboard.rs  DashboardService  ← fetch + pure aggregation         │
//! │                                                                     │
//! │  Every service is generic over the narrowest store trait it         │
//! │  needs, so tests can fake exactly one table.                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod adjust;
pub mod dashboard;
pub mod error;
pub mod ledger;
pub mod recorder;

pub use adjust::{BalanceAdjuster, StockAdjuster, StockDeduction};
pub use dashboard::{DashboardService, DashboardSnapshot};
pub use error::{EngineError, EngineResult};
pub use ledger::SupplierLedger;
pub use recorder::{SaleReceipt, SaleRecorder, SaleWarning};
