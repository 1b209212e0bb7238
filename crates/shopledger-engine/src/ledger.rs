//! # Supplier Ledger
//!
//! Purchases, payments and consignments against a supplier account.
//!
//! ## Two Payment Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │  Path A: ledger entry (record_entry with kind = payment)            │
//! │    INSERT supplier_transactions row                                 │
//! │    balance -= amount            ← settles overall account debt      │
//! │                                                                     │
//! │  Path B: consignment installment (add_payment)                      │
//! │    UPDATE one row's amount_paid ← tracks progress on ONE order      │
//! │    balance untouched                                                │
//! │                                                                     │
//! │  The two paths are intentionally separate books. Path B answers     │
//! │  "how much of this order is paid off"; Path A answers "what does    │
//! │  the shop owe this supplier overall". Reconciling them is the       │
//! │  operator's job, not the engine's.                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Balance sign convention: positive means the shop owes the supplier.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use shopledger_core::types::{SupplierTransaction, TransactionKind};
use shopledger_core::validation::validate_amount_cents;

use crate::adjust::BalanceAdjuster;
use crate::error::{EngineError, EngineResult};
use shopledger_store::{SupplierStore, TransactionStore};

/// Supplier ledger workflows.
pub struct SupplierLedger<S> {
    store: Arc<S>,
    balance: BalanceAdjuster<S>,
}

impl<S: SupplierStore + TransactionStore> SupplierLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        SupplierLedger {
            balance: BalanceAdjuster::new(store.clone()),
            store,
        }
    }

    /// Records a plain ledger entry and moves the account balance.
    ///
    /// A purchase raises what the shop owes; a payment lowers it. The
    /// entry insert is the fatal write; a failed balance update after it
    /// is logged and surfaced as a store error, leaving the entry in
    /// place for manual reconciliation.
    pub async fn record_entry(
        &self,
        supplier_id: &str,
        kind: TransactionKind,
        description: &str,
        amount_cents: i64,
    ) -> EngineResult<SupplierTransaction> {
        validate_amount_cents(amount_cents, "amount_cents").map_err(EngineError::Validation)?;

        self.store
            .get_supplier(supplier_id)
            .await?
            .ok_or_else(|| EngineError::SupplierNotFound(supplier_id.to_string()))?;

        let txn = SupplierTransaction {
            id: Uuid::new_v4().to_string(),
            supplier_id: supplier_id.to_string(),
            kind,
            description: description.to_string(),
            amount_cents,
            total_amount_cents: 0,
            amount_paid_cents: 0,
            goods_arrived: true,
            expected_arrival: None,
            created_at: Utc::now(),
        };
        self.store.insert_transaction(&txn).await?;

        let delta = match kind {
            TransactionKind::Purchase => amount_cents,
            TransactionKind::Payment => -amount_cents,
        };
        if let Err(e) = self.balance.apply(supplier_id, delta).await {
            warn!(
                transaction_id = %txn.id,
                supplier_id = %supplier_id,
                error = %e,
                "Ledger entry written but balance not moved"
            );
            return Err(e);
        }

        info!(
            transaction_id = %txn.id,
            supplier_id = %supplier_id,
            kind = %kind,
            amount_cents = amount_cents,
            "Ledger entry recorded"
        );
        Ok(txn)
    }

    /// Records a consignment order: goods on the way, nothing paid yet.
    ///
    /// The full order value lands on the account balance immediately;
    /// installments against it go through [`Self::add_payment`].
    pub async fn record_consignment(
        &self,
        supplier_id: &str,
        description: &str,
        total_amount_cents: i64,
        expected_arrival: Option<DateTime<Utc>>,
    ) -> EngineResult<SupplierTransaction> {
        validate_amount_cents(total_amount_cents, "total_amount_cents")
            .map_err(EngineError::Validation)?;

        self.store
            .get_supplier(supplier_id)
            .await?
            .ok_or_else(|| EngineError::SupplierNotFound(supplier_id.to_string()))?;

        let txn = SupplierTransaction {
            id: Uuid::new_v4().to_string(),
            supplier_id: supplier_id.to_string(),
            kind: TransactionKind::Purchase,
            description: description.to_string(),
            amount_cents: total_amount_cents,
            total_amount_cents,
            amount_paid_cents: 0,
            goods_arrived: false,
            expected_arrival,
            created_at: Utc::now(),
        };
        self.store.insert_transaction(&txn).await?;
        self.balance.apply(supplier_id, total_amount_cents).await?;

        info!(
            transaction_id = %txn.id,
            supplier_id = %supplier_id,
            total_amount_cents = total_amount_cents,
            "Consignment recorded"
        );
        Ok(txn)
    }

    /// Pays an installment against one consignment.
    ///
    /// Bumps that entry's paid-so-far amount only; the account balance
    /// is not touched on this path. Overpaying is allowed but logged.
    pub async fn add_payment(
        &self,
        transaction_id: &str,
        amount_cents: i64,
    ) -> EngineResult<SupplierTransaction> {
        validate_amount_cents(amount_cents, "amount_cents").map_err(EngineError::Validation)?;

        let mut txn = self
            .store
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| EngineError::TransactionNotFound(transaction_id.to_string()))?;

        let new_paid = txn.amount_paid_cents + amount_cents;
        if new_paid > txn.total_amount_cents {
            warn!(
                transaction_id = %transaction_id,
                paid = new_paid,
                total = txn.total_amount_cents,
                "Installments exceed the order total"
            );
        }

        self.store
            .set_transaction_paid(transaction_id, new_paid)
            .await?;
        txn.amount_paid_cents = new_paid;

        info!(
            transaction_id = %transaction_id,
            amount_cents = amount_cents,
            settled = txn.is_settled(),
            "Installment applied"
        );
        Ok(txn)
    }

    /// Marks a consignment's goods as arrived.
    pub async fn mark_arrived(&self, transaction_id: &str) -> EngineResult<()> {
        self.store
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| EngineError::TransactionNotFound(transaction_id.to_string()))?;

        self.store
            .set_transaction_arrival(transaction_id, true)
            .await?;
        Ok(())
    }

    /// A supplier's ledger entries, newest first.
    pub async fn entries(&self, supplier_id: &str) -> EngineResult<Vec<SupplierTransaction>> {
        Ok(self.store.list_transactions(supplier_id).await?)
    }

    /// Sum of outstanding amounts across a supplier's consignments.
    pub async fn outstanding_total(&self, supplier_id: &str) -> EngineResult<i64> {
        let entries = self.store.list_transactions(supplier_id).await?;
        Ok(entries.iter().map(|t| t.outstanding().cents()).sum())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
