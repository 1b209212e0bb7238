//! # Sale Recorder
//!
//! The checkout workflow: one sale header, then best-effort follow-up
//! writes.
//!
//! ## Write Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  record(request)                                                    │
//! │                                                                     │
//! │  0. validate request            ── fail → error, nothing written    │
//! │  1. resolve supplier (credit)   ── fail → error, nothing written    │
//! │  2. INSERT sale header          ── fail → error (FATAL)             │
//! │  ───────────── point of no return ─────────────                     │
//! │  3. INSERT each line item       ── fail → warning, keep going       │
//! │  4. deduct stock per line       ── fail → warning, keep going       │
//! │  5. bump supplier balance       ── fail → warning                   │
//! │                                                                     │
//! │  Result: SaleReceipt { sale_id, warnings }                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Once the header exists the sale happened; money changed hands at the
//! counter. Follow-up bookkeeping that fails is reported on the receipt
//! so the operator can fix the records, but it never unwinds the sale.
//! There is no compensation step.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use shopledger_core::types::{PaymentMethod, Sale, SaleLine, SaleRequest};
use shopledger_core::validation::validate_sale_request;

use crate::adjust::{BalanceAdjuster, StockAdjuster};
use crate::error::{EngineError, EngineResult};
use shopledger_store::LedgerStore;

// =============================================================================
// Receipt Types
// =============================================================================

/// A bookkeeping step that failed after the sale header was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleWarning {
    /// A line item row could not be written.
    LineNotRecorded { product_id: String, detail: String },
    /// Stock could not be deducted for a line.
    StockNotAdjusted { product_id: String, detail: String },
    /// A line asked for more units than were on hand; stock went to zero.
    StockClamped {
        product_id: String,
        requested: i64,
        available: i64,
    },
    /// The supplier balance update for a credit sale failed.
    BalanceNotUpdated { supplier_id: String, detail: String },
    /// The declared total didn't match the sum of the lines.
    TotalMismatch {
        declared_cents: i64,
        computed_cents: i64,
    },
}

/// What the caller gets back from a recorded sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleReceipt {
    pub sale_id: String,
    pub total_cents: i64,
    /// Line items successfully written.
    pub line_count: usize,
    /// Bookkeeping steps that failed or were degraded after the header
    /// was committed. Empty on a fully clean sale.
    pub warnings: Vec<SaleWarning>,
}

impl SaleReceipt {
    /// True when every follow-up write succeeded.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

// =============================================================================
// Sale Recorder
// =============================================================================

/// Records sales against the store.
pub struct SaleRecorder<S> {
    store: Arc<S>,
    stock: StockAdjuster<S>,
    balance: BalanceAdjuster<S>,
}

impl<S: LedgerStore> SaleRecorder<S> {
    pub fn new(store: Arc<S>) -> Self {
        SaleRecorder {
            stock: StockAdjuster::new(store.clone()),
            balance: BalanceAdjuster::new(store.clone()),
            store,
        }
    }

    /// Records a sale.
    ///
    /// Fails without writing anything when validation fails, when a
    /// credit sale's supplier doesn't resolve, or when the header insert
    /// itself fails. After the header is in, every further problem
    /// becomes a [`SaleWarning`] on the receipt.
    pub async fn record(&self, request: &SaleRequest) -> EngineResult<SaleReceipt> {
        validate_sale_request(request)?;

        // Resolve the supplier before any write so a bad id aborts the
        // whole sale instead of becoming a dangling balance warning.
        let supplier_id = match request.payment_method {
            PaymentMethod::Credit => {
                let id = request.supplier_id.clone().unwrap_or_default();
                self.store
                    .get_supplier(&id)
                    .await?
                    .ok_or_else(|| EngineError::SupplierNotFound(id.clone()))?;
                Some(id)
            }
            PaymentMethod::Cash => None,
        };

        let mut warnings = Vec::new();

        let computed_cents = request.computed_total().cents();
        if computed_cents != request.total_cents {
            warn!(
                declared = request.total_cents,
                computed = computed_cents,
                "Declared sale total disagrees with line items"
            );
            warnings.push(SaleWarning::TotalMismatch {
                declared_cents: request.total_cents,
                computed_cents,
            });
        }

        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            total_cents: request.total_cents,
            payment_method: request.payment_method,
            created_at: now,
        };

        // The one fatal write. ? propagates: no header, no sale.
        self.store.insert_sale(&sale).await?;

        info!(
            sale_id = %sale.id,
            total_cents = sale.total_cents,
            method = %sale.payment_method,
            items = request.items.len(),
            "Sale header committed"
        );

        let mut line_count = 0;
        for item in &request.items {
            let line = SaleLine {
                id: Uuid::new_v4().to_string(),
                sale_id: sale.id.clone(),
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price_cents: item.unit_price_cents,
                total_cents: item.line_total().cents(),
                created_at: now,
            };

            match self.store.insert_sale_line(&line).await {
                Ok(()) => line_count += 1,
                Err(e) => {
                    warn!(
                        sale_id = %sale.id,
                        product_id = %item.product_id,
                        error = %e,
                        "Line item not recorded"
                    );
                    warnings.push(SaleWarning::LineNotRecorded {
                        product_id: item.product_id.clone(),
                        detail: e.to_string(),
                    });
                }
            }
        }

        for item in &request.items {
            match self.stock.deduct(&item.product_id, item.quantity).await {
                Ok(deduction) if deduction.clamped() => {
                    warnings.push(SaleWarning::StockClamped {
                        product_id: item.product_id.clone(),
                        requested: deduction.requested,
                        available: deduction.previous,
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        sale_id = %sale.id,
                        product_id = %item.product_id,
                        error = %e,
                        "Stock not adjusted"
                    );
                    warnings.push(SaleWarning::StockNotAdjusted {
                        product_id: item.product_id.clone(),
                        detail: e.to_string(),
                    });
                }
            }
        }

        if let Some(supplier_id) = supplier_id {
            // Credit sale: the shop now owes the supplier the sale total
            if let Err(e) = self.balance.apply(&supplier_id, sale.total_cents).await {
                warn!(
                    sale_id = %sale.id,
                    supplier_id = %supplier_id,
                    error = %e,
                    "Supplier balance not updated"
                );
                warnings.push(SaleWarning::BalanceNotUpdated {
                    supplier_id,
                    detail: e.to_string(),
                });
            }
        }

        if !warnings.is_empty() {
            warn!(
                sale_id = %sale.id,
                warning_count = warnings.len(),
                "Sale recorded with degraded bookkeeping"
            );
        }

        Ok(SaleReceipt {
            sale_id: sale.id,
            total_cents: sale.total_cents,
            line_count,
            warnings,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shopledger_core::types::{
        Product, SaleLineInput, SaleLineRow, Supplier, SupplierTransaction,
    };
    use shopledger_store::{
        ProductStore, SaleStore, SqliteStore, StoreError, StoreResult, SupplierStore,
        TransactionStore,
    };

    async fn store_with_products() -> Arc<SqliteStore> {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let now = Utc::now();
        for (id, name, stock) in [("p-milo", "Milo", 10), ("p-gari", "Gari", 3)] {
            store
                .insert_product(&Product {
                    id: id.to_string(),
                    name: name.to_string(),
                    code: format!("CODE-{id}"),
                    category: "grocery".to_string(),
                    stock,
                    unit_price_cents: 500,
                    created_at: now,
                    updated_at: now,
                })
                .await
                .unwrap();
        }
        store
    }

    fn item(product_id: &str, qty: i64) -> SaleLineInput {
        SaleLineInput {
            product_id: product_id.to_string(),
            quantity: qty,
            unit_price_cents: 500,
        }
    }

    #[tokio::test]
    async fn test_cash_sale_happy_path() {
        let store = store_with_products().await;
        let recorder = SaleRecorder::new(store.clone());

        let request = SaleRequest {
            items: vec![item("p-milo", 2), item("p-gari", 1)],
            total_cents: 1500,
            payment_method: PaymentMethod::Cash,
            supplier_id: None,
        };

        let receipt = recorder.record(&request).await.unwrap();
        assert!(receipt.is_clean());
        assert_eq!(receipt.line_count, 2);
        assert_eq!(receipt.total_cents, 1500);

        let sale = store.get_sale(&receipt.sale_id).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 1500);
        assert_eq!(store.list_sale_lines(&receipt.sale_id).await.unwrap().len(), 2);

        assert_eq!(store.get_product("p-milo").await.unwrap().unwrap().stock, 8);
        assert_eq!(store.get_product("p-gari").await.unwrap().unwrap().stock, 2);
    }

    #[tokio::test]
    async fn test_credit_sale_raises_supplier_balance() {
        let store = store_with_products().await;
        store
            .insert_supplier(&Supplier {
                id: "s-1".to_string(),
                name: "Accra Wholesale".to_string(),
                contact_info: None,
                balance_cents: 200,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let recorder = SaleRecorder::new(store.clone());
        let request = SaleRequest {
            items: vec![item("p-milo", 1)],
            total_cents: 500,
            payment_method: PaymentMethod::Credit,
            supplier_id: Some("s-1".to_string()),
        };

        let receipt = recorder.record(&request).await.unwrap();
        assert!(receipt.is_clean());

        let supplier = store.get_supplier("s-1").await.unwrap().unwrap();
        assert_eq!(supplier.balance_cents, 700);
    }

    #[tokio::test]
    async fn test_invalid_request_writes_nothing() {
        let store = store_with_products().await;
        let recorder = SaleRecorder::new(store.clone());

        let request = SaleRequest {
            items: vec![],
            total_cents: 0,
            payment_method: PaymentMethod::Cash,
            supplier_id: None,
        };

        assert!(matches!(
            recorder.record(&request).await,
            Err(EngineError::Validation(_))
        ));

        // Nothing reached the store
        assert!(store.list_recent_sale_lines(10).await.unwrap().is_empty());
        assert_eq!(store.get_product("p-milo").await.unwrap().unwrap().stock, 10);
    }

    #[tokio::test]
    async fn test_credit_sale_with_unknown_supplier_writes_nothing() {
        let store = store_with_products().await;
        let recorder = SaleRecorder::new(store.clone());

        let request = SaleRequest {
            items: vec![item("p-milo", 1)],
            total_cents: 500,
            payment_method: PaymentMethod::Credit,
            supplier_id: Some("ghost".to_string()),
        };

        assert!(matches!(
            recorder.record(&request).await,
            Err(EngineError::SupplierNotFound(_))
        ));
        assert!(store.list_recent_sale_lines(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversell_clamps_and_warns_on_receipt() {
        let store = store_with_products().await;
        let recorder = SaleRecorder::new(store.clone());

        // 10 units of Gari requested, only 3 on hand
        let request = SaleRequest {
            items: vec![item("p-gari", 10)],
            total_cents: 5000,
            payment_method: PaymentMethod::Cash,
            supplier_id: None,
        };

        let receipt = recorder.record(&request).await.unwrap();
        assert_eq!(receipt.line_count, 1);
        assert!(matches!(
            receipt.warnings.as_slice(),
            [SaleWarning::StockClamped {
                requested: 10,
                available: 3,
                ..
            }]
        ));
        assert_eq!(store.get_product("p-gari").await.unwrap().unwrap().stock, 0);
    }

    #[tokio::test]
    async fn test_missing_product_degrades_but_sale_survives() {
        let store = store_with_products().await;
        let recorder = SaleRecorder::new(store.clone());

        let request = SaleRequest {
            items: vec![item("p-milo", 1), item("ghost", 2)],
            total_cents: 1500,
            payment_method: PaymentMethod::Cash,
            supplier_id: None,
        };

        let receipt = recorder.record(&request).await.unwrap();

        // Header and both lines exist; only the deduction degraded
        assert_eq!(receipt.line_count, 2);
        assert!(receipt
            .warnings
            .iter()
            .any(|w| matches!(w, SaleWarning::StockNotAdjusted { product_id, .. } if product_id == "ghost")));
        assert!(store.get_sale(&receipt.sale_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_total_mismatch_is_warned_not_rejected() {
        let store = store_with_products().await;
        let recorder = SaleRecorder::new(store.clone());

        let request = SaleRequest {
            items: vec![item("p-milo", 2)], // lines sum to 1000
            total_cents: 999,
            payment_method: PaymentMethod::Cash,
            supplier_id: None,
        };

        let receipt = recorder.record(&request).await.unwrap();
        assert!(receipt.warnings.contains(&SaleWarning::TotalMismatch {
            declared_cents: 999,
            computed_cents: 1000,
        }));
        // The declared total is what the header keeps
        let sale = store.get_sale(&receipt.sale_id).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 999);
    }

    // =========================================================================
    // Degraded follow-up writes
    // =========================================================================

    /// Delegates to the SQLite store but fails selected write paths, so
    /// the best-effort steps after the header insert can be exercised.
    struct FlakyStore {
        inner: SqliteStore,
        fail_line_inserts: bool,
        fail_balance_writes: bool,
    }

    impl FlakyStore {
        // Shares the pool, so assertions through the original handle see
        // every write made through the wrapper.
        fn over(inner: &SqliteStore) -> Self {
            FlakyStore {
                inner: inner.clone(),
                fail_line_inserts: false,
                fail_balance_writes: false,
            }
        }
    }

    #[async_trait]
    impl ProductStore for FlakyStore {
        async fn insert_product(&self, p: &Product) -> StoreResult<()> {
            self.inner.insert_product(p).await
        }
        async fn get_product(&self, id: &str) -> StoreResult<Option<Product>> {
            self.inner.get_product(id).await
        }
        async fn list_products(&self) -> StoreResult<Vec<Product>> {
            self.inner.list_products().await
        }
        async fn update_product(&self, p: &Product) -> StoreResult<()> {
            self.inner.update_product(p).await
        }
        async fn set_product_stock(&self, id: &str, stock: i64) -> StoreResult<()> {
            self.inner.set_product_stock(id, stock).await
        }
        async fn delete_product(&self, id: &str) -> StoreResult<()> {
            self.inner.delete_product(id).await
        }
    }

    #[async_trait]
    impl SupplierStore for FlakyStore {
        async fn insert_supplier(&self, s: &Supplier) -> StoreResult<()> {
            self.inner.insert_supplier(s).await
        }
        async fn get_supplier(&self, id: &str) -> StoreResult<Option<Supplier>> {
            self.inner.get_supplier(id).await
        }
        async fn list_suppliers(&self) -> StoreResult<Vec<Supplier>> {
            self.inner.list_suppliers().await
        }
        async fn set_supplier_balance(&self, id: &str, balance_cents: i64) -> StoreResult<()> {
            if self.fail_balance_writes {
                return Err(StoreError::QueryFailed("disk I/O error".to_string()));
            }
            self.inner.set_supplier_balance(id, balance_cents).await
        }
    }

    #[async_trait]
    impl SaleStore for FlakyStore {
        async fn insert_sale(&self, sale: &Sale) -> StoreResult<()> {
            self.inner.insert_sale(sale).await
        }
        async fn get_sale(&self, id: &str) -> StoreResult<Option<Sale>> {
            self.inner.get_sale(id).await
        }
        async fn insert_sale_line(&self, line: &SaleLine) -> StoreResult<()> {
            if self.fail_line_inserts {
                return Err(StoreError::QueryFailed("disk I/O error".to_string()));
            }
            self.inner.insert_sale_line(line).await
        }
        async fn list_sale_lines(&self, sale_id: &str) -> StoreResult<Vec<SaleLine>> {
            self.inner.list_sale_lines(sale_id).await
        }
        async fn list_recent_sale_lines(&self, limit: i64) -> StoreResult<Vec<SaleLineRow>> {
            self.inner.list_recent_sale_lines(limit).await
        }
    }

    #[async_trait]
    impl TransactionStore for FlakyStore {
        async fn insert_transaction(&self, t: &SupplierTransaction) -> StoreResult<()> {
            self.inner.insert_transaction(t).await
        }
        async fn get_transaction(&self, id: &str) -> StoreResult<Option<SupplierTransaction>> {
            self.inner.get_transaction(id).await
        }
        async fn list_transactions(
            &self,
            supplier_id: &str,
        ) -> StoreResult<Vec<SupplierTransaction>> {
            self.inner.list_transactions(supplier_id).await
        }
        async fn set_transaction_paid(&self, id: &str, amount_paid_cents: i64) -> StoreResult<()> {
            self.inner.set_transaction_paid(id, amount_paid_cents).await
        }
        async fn set_transaction_arrival(&self, id: &str, goods_arrived: bool) -> StoreResult<()> {
            self.inner.set_transaction_arrival(id, goods_arrived).await
        }
    }

    #[tokio::test]
    async fn test_line_insert_failure_leaves_orphaned_header() {
        let sqlite = store_with_products().await;
        let mut flaky = FlakyStore::over(&sqlite);
        flaky.fail_line_inserts = true;
        let recorder = SaleRecorder::new(Arc::new(flaky));

        let request = SaleRequest {
            items: vec![item("p-milo", 2)],
            total_cents: 1000,
            payment_method: PaymentMethod::Cash,
            supplier_id: None,
        };

        let receipt = recorder.record(&request).await.unwrap();

        // The sale is still a success: the header stands, orphaned
        assert_eq!(receipt.line_count, 0);
        assert!(receipt
            .warnings
            .iter()
            .any(|w| matches!(w, SaleWarning::LineNotRecorded { product_id, .. } if product_id == "p-milo")));
        assert!(sqlite.get_sale(&receipt.sale_id).await.unwrap().is_some());
        assert!(sqlite.list_sale_lines(&receipt.sale_id).await.unwrap().is_empty());

        // Later steps still ran: stock was deducted
        assert_eq!(sqlite.get_product("p-milo").await.unwrap().unwrap().stock, 8);
    }

    #[tokio::test]
    async fn test_balance_write_failure_degrades_credit_sale() {
        let sqlite = store_with_products().await;
        sqlite
            .insert_supplier(&Supplier {
                id: "s-1".to_string(),
                name: "Accra Wholesale".to_string(),
                contact_info: None,
                balance_cents: 200,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let mut flaky = FlakyStore::over(&sqlite);
        flaky.fail_balance_writes = true;
        let recorder = SaleRecorder::new(Arc::new(flaky));

        let request = SaleRequest {
            items: vec![item("p-milo", 1)],
            total_cents: 500,
            payment_method: PaymentMethod::Credit,
            supplier_id: Some("s-1".to_string()),
        };

        let receipt = recorder.record(&request).await.unwrap();

        // Header and line survive; only the balance step degraded
        assert_eq!(receipt.line_count, 1);
        assert!(receipt
            .warnings
            .iter()
            .any(|w| matches!(w, SaleWarning::BalanceNotUpdated { supplier_id, .. } if supplier_id == "s-1")));
        assert!(sqlite.get_sale(&receipt.sale_id).await.unwrap().is_some());
        assert_eq!(
            sqlite.get_supplier("s-1").await.unwrap().unwrap().balance_cents,
            200
        );
    }
}
