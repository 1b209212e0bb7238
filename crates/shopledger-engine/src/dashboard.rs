//! # Dashboard Service
//!
//! Fetches the raw rows and hands them to the pure aggregation in
//! `shopledger_core::dashboard`. All the interesting logic lives there;
//! this module only does I/O.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use shopledger_core::dashboard::{aggregate, stock_summary, SalesSummary, StockSummary};
use shopledger_store::{ProductStore, SaleStore};

use crate::error::EngineResult;

/// How many recent lines the dashboard fold considers. Generous for a
/// single shop's month of trading.
const LINE_WINDOW: i64 = 2000;

/// Everything the dashboard renders in one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub sales: SalesSummary,
    pub stock: StockSummary,
}

/// Loads dashboard snapshots from the store.
pub struct DashboardService<S> {
    store: Arc<S>,
}

impl<S: SaleStore + ProductStore> DashboardService<S> {
    pub fn new(store: Arc<S>) -> Self {
        DashboardService { store }
    }

    /// Builds a snapshot. `today` is passed in so callers decide the
    /// timezone question once, at the edge.
    pub async fn load(&self, today: NaiveDate) -> EngineResult<DashboardSnapshot> {
        let lines = self.store.list_recent_sale_lines(LINE_WINDOW).await?;
        let products = self.store.list_products().await?;

        debug!(
            lines = lines.len(),
            products = products.len(),
            "Loaded dashboard inputs"
        );

        Ok(DashboardSnapshot {
            sales: aggregate(&lines, today),
            stock: stock_summary(&products),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
