//! # Dashboard Aggregation
//!
//! Pure fold of raw sale-line rows into the metrics the dashboard renders.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Dashboard Aggregation                           │
//! │                                                                     │
//! │  sale_items rows (any order)                                        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  aggregate(lines, today)  ← THIS MODULE (no I/O, deterministic)     │
//! │       │                                                             │
//! │       ├──► recent           top 3 after an explicit newest-first    │
//! │       │                     sort (input order is never trusted)     │
//! │       ├──► by_product       name → {qty, revenue}, qty descending   │
//! │       ├──► weekly_revenue   4 buckets: (day_of_month - 1) / 7,      │
//! │       │                     clamped so the 29th-31st land in 3      │
//! │       └──► today_revenue    exact calendar-date match only          │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Unparsable dates
//! A row whose `created_at` string cannot be parsed is excluded from the
//! week buckets and today's total, but still counts toward the per-product
//! totals. This is a deliberate policy: product rankings are about what
//! sold, not when, so a mangled timestamp shouldn't hide a sale from them.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Product, SaleLineRow};
use crate::LOW_STOCK_THRESHOLD;

/// Number of week buckets in the monthly revenue chart.
pub const WEEK_BUCKETS: usize = 4;

/// How many lines the recent-sales preview shows.
pub const RECENT_SALES: usize = 3;

// =============================================================================
// Output Types
// =============================================================================

/// One entry in the recent-sales preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSale {
    pub line_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub total_cents: i64,
}

/// Per-product sales totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSales {
    pub name: String,
    pub quantity: i64,
    pub revenue_cents: i64,
}

/// The aggregated sales metrics for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SalesSummary {
    /// Top 3 most recent lines, newest first.
    pub recent: Vec<RecentSale>,
    /// All products that sold, ordered by quantity descending
    /// (name ascending as a deterministic tie-break).
    pub by_product: Vec<ProductSales>,
    /// Revenue per week-of-month bucket.
    pub weekly_revenue_cents: [i64; WEEK_BUCKETS],
    /// Revenue from lines created on `today` exactly.
    pub today_revenue_cents: i64,
}

/// Stock-level metrics shown alongside the sales summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StockSummary {
    /// Sum of stock across all products.
    pub total_units: i64,
    /// Products with stock below [`LOW_STOCK_THRESHOLD`].
    pub low_stock_count: usize,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Folds raw sale lines into a [`SalesSummary`].
///
/// Deterministic: the same multiset of lines produces the same summary
/// regardless of input order. `today` is passed in rather than read from
/// the clock so callers (and tests) control what "today" means.
pub fn aggregate(lines: &[SaleLineRow], today: NaiveDate) -> SalesSummary {
    let mut weekly = [0i64; WEEK_BUCKETS];
    let mut today_revenue = 0i64;
    let mut per_product: HashMap<&str, (i64, i64)> = HashMap::new();

    for line in lines {
        let parsed = parse_created_at(&line.created_at);

        if let Some(ts) = parsed {
            let date = ts.date_naive();
            let bucket = week_bucket(date.day());
            weekly[bucket] += line.total_cents;

            if date == today {
                today_revenue += line.total_cents;
            }
        }

        // Per-product totals count every line, parsed date or not.
        let entry = per_product.entry(line.product_name.as_str()).or_default();
        entry.0 += line.quantity;
        entry.1 += line.total_cents;
    }

    let mut by_product: Vec<ProductSales> = per_product
        .into_iter()
        .map(|(name, (quantity, revenue_cents))| ProductSales {
            name: name.to_string(),
            quantity,
            revenue_cents,
        })
        .collect();
    // Quantity descending; tie-break on name so HashMap order can't leak.
    by_product.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.name.cmp(&b.name)));

    SalesSummary {
        recent: most_recent(lines),
        by_product,
        weekly_revenue_cents: weekly,
        today_revenue_cents: today_revenue,
    }
}

/// Summarizes product stock levels for the dashboard metric cards.
pub fn stock_summary(products: &[Product]) -> StockSummary {
    StockSummary {
        total_units: products.iter().map(|p| p.stock).sum(),
        low_stock_count: products
            .iter()
            .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
            .count(),
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Week-of-month bucket for a day-of-month, clamped to the last bucket
/// so the 29th-31st never index out of range.
fn week_bucket(day_of_month: u32) -> usize {
    (((day_of_month.saturating_sub(1)) / 7) as usize).min(WEEK_BUCKETS - 1)
}

/// Sorts newest-first and takes the preview slice.
///
/// The sort is explicit; callers may hand lines in any order. Rows with
/// unparsable dates sort to the end (they can't claim to be recent).
fn most_recent(lines: &[SaleLineRow]) -> Vec<RecentSale> {
    let mut dated: Vec<(Option<DateTime<Utc>>, &SaleLineRow)> = lines
        .iter()
        .map(|line| (parse_created_at(&line.created_at), line))
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    dated
        .into_iter()
        .take(RECENT_SALES)
        .map(|(_, line)| RecentSale {
            line_id: line.id.clone(),
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            total_cents: line.total_cents,
        })
        .collect()
}

/// Parses a stored creation timestamp.
///
/// RFC 3339 is what this system writes; the fallbacks cover rows written
/// by SQLite's `datetime()` and date-only strings from older clients.
/// Returns `None` for anything else instead of guessing.
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    None
}

// =============================================================================
// Unit Tests
// =============================================================================
