//! # shopledger-store
//!
//! SQLite persistence for shopledger.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Store Layer                                  │
//! │                                                                     │
//! │  shopledger-engine (workflows)                                      │
//! │       │  generic over the store traits                              │
//! │       ▼                                                             │
//! │  store.rs      ProductStore / SupplierStore / SaleStore /           │
//! │                TransactionStore  +  LedgerStore (all four)          │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  sqlite.rs     SqliteStore — the production implementation          │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  pool.rs       StoreConfig → SqlitePool (WAL, foreign keys)         │
//! │  migrations.rs embedded schema migrations                           │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! Each trait method is a single statement against the store: it either
//! fully happens or fully fails. There is no multi-statement transaction
//! across calls; callers sequence writes and decide what a partial
//! failure means for them.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod sqlite;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use pool::StoreConfig;
pub use sqlite::SqliteStore;
pub use store::{LedgerStore, ProductStore, SaleStore, SupplierStore, TransactionStore};
