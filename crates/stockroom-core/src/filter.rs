//! # Product Filtering
//!
//! Stock level classification, the filtered product view and category search.
//!
//! ## Stock Level Buckets
//! ```text
//! current_stock
//!     0 ───────────► Out
//!     1 ..= min ───► Low
//!   min+1 ..= 2×min ► Medium
//!   > 2×min ───────► High
//! ```
//!
//! A product with `min_stock == 0` and stock on hand is always `High`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Category, Product};

// =============================================================================
// Stock Level
// =============================================================================

/// Classification of current stock against the reorder threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Out,
    Low,
    Medium,
    High,
}

impl StockLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            StockLevel::Out => "out",
            StockLevel::Low => "low",
            StockLevel::Medium => "medium",
            StockLevel::High => "high",
        }
    }
}

/// Classifies a product into exactly one [`StockLevel`].
///
/// Pure function of `current_stock` and `min_stock`.
///
/// ```rust
/// use stockroom_core::{stock_level, Product, NewProduct, StockLevel};
///
/// let p = Product::from_new(
///     "1".into(),
///     NewProduct { current_stock: 15, min_stock: 5, ..Default::default() },
///     chrono::Utc::now(),
/// );
/// assert_eq!(stock_level(&p), StockLevel::High);
/// ```
pub fn stock_level(product: &Product) -> StockLevel {
    let current = u64::from(product.current_stock);
    let min = u64::from(product.min_stock);

    if current == 0 {
        StockLevel::Out
    } else if current <= min {
        StockLevel::Low
    } else if current <= min * 2 {
        StockLevel::Medium
    } else {
        StockLevel::High
    }
}

// =============================================================================
// Stock Filter
// =============================================================================

/// Transient view parameters for the product list.
///
/// Absent predicates (`None` or empty string) match everything; present
/// predicates are combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockFilter {
    /// Case-insensitive substring over name, SKU and description.
    pub search_term: Option<String>,
    /// Exact category id.
    pub category: Option<String>,
    /// Exact supplier id.
    pub supplier: Option<String>,
    /// Exact stock level bucket.
    pub stock_level: Option<StockLevel>,
}

impl StockFilter {
    /// Returns true when no predicate is active.
    pub fn is_empty(&self) -> bool {
        present(&self.search_term).is_none()
            && present(&self.category).is_none()
            && present(&self.supplier).is_none()
            && self.stock_level.is_none()
    }

    /// Returns true when `product` satisfies every active predicate.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = present(&self.search_term) {
            let needle = term.to_lowercase();
            let hit = product.name.to_lowercase().contains(&needle)
                || product.sku.to_lowercase().contains(&needle)
                || product
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(category) = present(&self.category) {
            if product.category_id != category {
                return false;
            }
        }

        if let Some(supplier) = present(&self.supplier) {
            if product.supplier_id != supplier {
                return false;
            }
        }

        if let Some(level) = self.stock_level {
            if stock_level(product) != level {
                return false;
            }
        }

        true
    }
}

/// Treats empty strings as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Returns the products matching `filter`, preserving input order.
pub fn filter_products<'a>(products: &'a [Product], filter: &StockFilter) -> Vec<&'a Product> {
    products.iter().filter(|p| filter.matches(p)).collect()
}

/// Case-insensitive search over category name and description.
///
/// A blank term returns every category. Input order is preserved.
pub fn filter_categories<'a>(categories: &'a [Category], term: &str) -> Vec<&'a Category> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return categories.iter().collect();
    }

    categories
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle)
                || c.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
