//! # SQLite Store
//!
//! The production implementation of the store traits, backed by a
//! `SqlitePool`.
//!
//! ## Query Style
//! All queries are runtime-bound (`sqlx::query` / `sqlx::query_as` with
//! `?N` placeholders); row mapping goes through the `FromRow` derives on
//! the core types. Timestamps are written as RFC 3339 TEXT so that
//! `ORDER BY created_at` is chronological.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use async_trait::async_trait;
use shopledger_core::types::{
    Product, Sale, SaleLine, SaleLineRow, Supplier, SupplierTransaction,
};

use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::pool::{open_pool, StoreConfig};
use crate::store::{ProductStore, SaleStore, SupplierStore, TransactionStore};

// =============================================================================
// SqliteStore
// =============================================================================

/// SQLite-backed store implementing all store traits.
///
/// ## Usage
/// ```rust,ignore
/// let store = SqliteStore::connect(StoreConfig::new("./shopledger.db")).await?;
/// let product = store.get_product("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the pool and runs migrations (when enabled in `config`).
    pub async fn connect(config: StoreConfig) -> StoreResult<Self> {
        let run_migrations = config.run_migrations;
        let pool = open_pool(&config).await?;

        if run_migrations {
            migrations::run_migrations(&pool).await?;
        }

        Ok(SqliteStore { pool })
    }

    /// An isolated in-memory store with the schema applied. For tests.
    pub async fn in_memory() -> StoreResult<Self> {
        Self::connect(StoreConfig::in_memory()).await
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by the traits. Prefer the trait
    /// methods when one exists.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the connection pool. All operations fail afterwards.
    pub async fn close(&self) {
        info!("Closing store connection pool");
        self.pool.close().await;
    }

    /// Checks whether the store can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// ProductStore
// =============================================================================

#[async_trait]
impl ProductStore for SqliteStore {
    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, code, category, stock, unit_price_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.code)
        .bind(&product.category)
        .bind(product.stock)
        .bind(product.unit_price_cents)
        .bind(product.created_at.to_rfc3339())
        .bind(product.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_product(&self, id: &str) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, code, category, stock, unit_price_cents, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, code, category, stock, unit_price_cents, created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn update_product(&self, product: &Product) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2, code = ?3, category = ?4, unit_price_cents = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.code)
        .bind(&product.category)
        .bind(product.unit_price_cents)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", &product.id));
        }
        Ok(())
    }

    async fn set_product_stock(&self, id: &str, stock: i64) -> StoreResult<()> {
        debug!(id = %id, stock = stock, "Setting product stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(stock)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", id));
        }
        Ok(())
    }

    async fn delete_product(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", id));
        }
        Ok(())
    }
}

// =============================================================================
// SupplierStore
// =============================================================================

#[async_trait]
impl SupplierStore for SqliteStore {
    async fn insert_supplier(&self, supplier: &Supplier) -> StoreResult<()> {
        debug!(id = %supplier.id, name = %supplier.name, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (id, name, contact_info, balance_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact_info)
        .bind(supplier.balance_cents)
        .bind(supplier.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_supplier(&self, id: &str) -> StoreResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact_info, balance_cents, created_at
            FROM suppliers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    async fn list_suppliers(&self) -> StoreResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact_info, balance_cents, created_at
            FROM suppliers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    async fn set_supplier_balance(&self, id: &str, balance_cents: i64) -> StoreResult<()> {
        debug!(id = %id, balance_cents = balance_cents, "Setting supplier balance");

        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET balance_cents = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(balance_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Supplier", id));
        }
        Ok(())
    }
}

// =============================================================================
// SaleStore
// =============================================================================

#[async_trait]
impl SaleStore for SqliteStore {
    async fn insert_sale(&self, sale: &Sale) -> StoreResult<()> {
        debug!(id = %sale.id, total_cents = sale.total_cents, "Inserting sale header");

        sqlx::query(
            r#"
            INSERT INTO sales (id, total_cents, payment_method, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.total_cents)
        .bind(sale.payment_method)
        .bind(sale.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_sale(&self, id: &str) -> StoreResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_cents, payment_method, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    async fn insert_sale_line(&self, line: &SaleLine) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sale_items
                (id, sale_id, product_id, quantity, unit_price_cents, total_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&line.id)
        .bind(&line.sale_id)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .bind(line.total_cents)
        .bind(line.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_sale_lines(&self, sale_id: &str) -> StoreResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents, total_cents, created_at
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    async fn list_recent_sale_lines(&self, limit: i64) -> StoreResult<Vec<SaleLineRow>> {
        let rows = sqlx::query_as::<_, SaleLineRow>(
            r#"
            SELECT
                si.id,
                COALESCE(p.name, 'Unknown') AS product_name,
                si.quantity,
                si.total_cents,
                si.created_at
            FROM sale_items si
            LEFT JOIN products p ON p.id = si.product_id
            ORDER BY si.created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Fetched recent sale lines");
        Ok(rows)
    }
}

// =============================================================================
// TransactionStore
// =============================================================================

#[async_trait]
impl TransactionStore for SqliteStore {
    async fn insert_transaction(&self, txn: &SupplierTransaction) -> StoreResult<()> {
        debug!(
            id = %txn.id,
            supplier_id = %txn.supplier_id,
            kind = %txn.kind,
            "Inserting supplier transaction"
        );

        sqlx::query(
            r#"
            INSERT INTO supplier_transactions
                (id, supplier_id, kind, description, amount_cents, total_amount_cents,
                 amount_paid_cents, goods_arrived, expected_arrival, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&txn.id)
        .bind(&txn.supplier_id)
        .bind(txn.kind)
        .bind(&txn.description)
        .bind(txn.amount_cents)
        .bind(txn.total_amount_cents)
        .bind(txn.amount_paid_cents)
        .bind(txn.goods_arrived)
        .bind(txn.expected_arrival.map(|d| d.to_rfc3339()))
        .bind(txn.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_transaction(&self, id: &str) -> StoreResult<Option<SupplierTransaction>> {
        let txn = sqlx::query_as::<_, SupplierTransaction>(
            r#"
            SELECT id, supplier_id, kind, description, amount_cents, total_amount_cents,
                   amount_paid_cents, goods_arrived, expected_arrival, created_at
            FROM supplier_transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(txn)
    }

    async fn list_transactions(
        &self,
        supplier_id: &str,
    ) -> StoreResult<Vec<SupplierTransaction>> {
        let txns = sqlx::query_as::<_, SupplierTransaction>(
            r#"
            SELECT id, supplier_id, kind, description, amount_cents, total_amount_cents,
                   amount_paid_cents, goods_arrived, expected_arrival, created_at
            FROM supplier_transactions
            WHERE supplier_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(txns)
    }

    async fn set_transaction_paid(&self, id: &str, amount_paid_cents: i64) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE supplier_transactions
            SET amount_paid_cents = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(amount_paid_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Transaction", id));
        }
        Ok(())
    }

    async fn set_transaction_arrival(&self, id: &str, goods_arrived: bool) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE supplier_transactions
            SET goods_arrived = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(goods_arrived)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Transaction", id));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shopledger_core::types::{PaymentMethod, TransactionKind};
    use uuid::Uuid;

    fn product(name: &str, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            code: format!("{}-{}", name.to_uppercase(), Uuid::new_v4()),
            category: "grocery".to_string(),
            stock,
            unit_price_cents: 500,
            created_at: now,
            updated_at: now,
        }
    }

    fn supplier(name: &str) -> Supplier {
        Supplier {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            contact_info: Some("024-000-0000".to_string()),
            balance_cents: 0,
            created_at: Utc::now(),
        }
    }

    fn sale(total: i64) -> Sale {
        Sale {
            id: Uuid::new_v4().to_string(),
            total_cents: total,
            payment_method: PaymentMethod::Cash,
            created_at: Utc::now(),
        }
    }

    fn line(sale_id: &str, product_id: &str, qty: i64) -> SaleLine {
        SaleLine {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.to_string(),
            product_id: product_id.to_string(),
            quantity: qty,
            unit_price_cents: 500,
            total_cents: 500 * qty,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_product_roundtrip() {
        let store = SqliteStore::in_memory().await.unwrap();
        let p = product("Milo", 10);

        store.insert_product(&p).await.unwrap();
        let fetched = store.get_product(&p.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Milo");
        assert_eq!(fetched.stock, 10);

        assert!(store.get_product("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_product_stock() {
        let store = SqliteStore::in_memory().await.unwrap();
        let p = product("Gari", 10);
        store.insert_product(&p).await.unwrap();

        store.set_product_stock(&p.id, 7).await.unwrap();
        let fetched = store.get_product(&p.id).await.unwrap().unwrap();
        assert_eq!(fetched.stock, 7);

        let err = store.set_product_stock("missing", 3).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut a = product("Milo", 5);
        let mut b = product("Milo Sachet", 5);
        a.code = "MILO-400".to_string();
        b.code = "MILO-400".to_string();

        store.insert_product(&a).await.unwrap();
        let err = store.insert_product(&b).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_supplier_balance_write() {
        let store = SqliteStore::in_memory().await.unwrap();
        let s = supplier("Accra Wholesale");
        store.insert_supplier(&s).await.unwrap();

        store.set_supplier_balance(&s.id, -2500).await.unwrap();
        let fetched = store.get_supplier(&s.id).await.unwrap().unwrap();
        assert_eq!(fetched.balance_cents, -2500);
    }

    #[tokio::test]
    async fn test_sale_with_lines() {
        let store = SqliteStore::in_memory().await.unwrap();
        let p = product("Rice", 20);
        store.insert_product(&p).await.unwrap();

        let s = sale(1500);
        store.insert_sale(&s).await.unwrap();
        store.insert_sale_line(&line(&s.id, &p.id, 3)).await.unwrap();

        let fetched = store.get_sale(&s.id).await.unwrap().unwrap();
        assert_eq!(fetched.total_cents, 1500);
        assert_eq!(fetched.payment_method, PaymentMethod::Cash);

        let lines = store.list_sale_lines(&s.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_sale_line_requires_sale_header() {
        let store = SqliteStore::in_memory().await.unwrap();
        let err = store
            .insert_sale_line(&line("no-such-sale", "p-1", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_recent_lines_newest_first_with_unknown_product() {
        let store = SqliteStore::in_memory().await.unwrap();
        let p = product("Sugar", 20);
        store.insert_product(&p).await.unwrap();

        let s = sale(2000);
        store.insert_sale(&s).await.unwrap();

        let mut older = line(&s.id, &p.id, 1);
        older.created_at = Utc::now() - Duration::hours(2);
        let newer = line(&s.id, "deleted-product", 2);

        store.insert_sale_line(&older).await.unwrap();
        store.insert_sale_line(&newer).await.unwrap();

        let rows = store.list_recent_sale_lines(10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, newer.id);
        // Line whose product id resolves nowhere still shows up
        assert_eq!(rows[0].product_name, "Unknown");
        assert_eq!(rows[1].product_name, "Sugar");
    }

    #[tokio::test]
    async fn test_transaction_lifecycle() {
        let store = SqliteStore::in_memory().await.unwrap();
        let s = supplier("Tema Traders");
        store.insert_supplier(&s).await.unwrap();

        let txn = SupplierTransaction {
            id: Uuid::new_v4().to_string(),
            supplier_id: s.id.clone(),
            kind: TransactionKind::Purchase,
            description: "40 bags of rice".to_string(),
            amount_cents: 80_000,
            total_amount_cents: 80_000,
            amount_paid_cents: 0,
            goods_arrived: false,
            expected_arrival: Some(Utc::now() + Duration::days(7)),
            created_at: Utc::now(),
        };
        store.insert_transaction(&txn).await.unwrap();

        store.set_transaction_paid(&txn.id, 30_000).await.unwrap();
        store.set_transaction_arrival(&txn.id, true).await.unwrap();

        let fetched = store.get_transaction(&txn.id).await.unwrap().unwrap();
        assert_eq!(fetched.amount_paid_cents, 30_000);
        assert!(fetched.goods_arrived);
        assert!(!fetched.is_settled());

        let all = store.list_transactions(&s.id).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_transaction_requires_supplier() {
        let store = SqliteStore::in_memory().await.unwrap();
        let txn = SupplierTransaction {
            id: Uuid::new_v4().to_string(),
            supplier_id: "no-such-supplier".to_string(),
            kind: TransactionKind::Payment,
            description: String::new(),
            amount_cents: 100,
            total_amount_cents: 0,
            amount_paid_cents: 0,
            goods_arrived: false,
            expected_arrival: None,
            created_at: Utc::now(),
        };
        let err = store.insert_transaction(&txn).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { .. }));
    }
}
