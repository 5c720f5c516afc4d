//! # Reports
//!
//! Aggregations behind the reports page. Chart rendering is out of scope;
//! these functions only produce the numbers.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::filter::StockLevel;
use crate::types::{Category, MovementType, Product, StockMovement};

/// Trailing window a report aggregates over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ReportRange {
    #[default]
    #[serde(rename = "7days")]
    SevenDays,
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "90days")]
    NinetyDays,
    #[serde(rename = "1year")]
    OneYear,
}

impl ReportRange {
    pub fn duration(self) -> Duration {
        match self {
            ReportRange::SevenDays => Duration::days(7),
            ReportRange::ThirtyDays => Duration::days(30),
            ReportRange::NinetyDays => Duration::days(90),
            ReportRange::OneYear => Duration::days(365),
        }
    }

    /// Earliest instant included when the report is taken at `now`.
    pub fn since(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }
}

/// Units and value held in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInventory {
    pub category_id: String,
    pub name: String,
    pub color: String,
    pub units: u64,
    pub value: f64,
    pub product_count: usize,
}

/// Stock flow within a report range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MovementSummary {
    pub stock_in: u64,
    pub stock_out: u64,
    pub adjustments: usize,
    pub movements: usize,
}

/// KPI cards on the reports page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_products: usize,
    pub total_value: f64,
    /// Products with `current_stock <= min_stock`, zero stock included.
    pub at_or_below_minimum: usize,
}

/// Per-category inventory, in category order.
///
/// Products are matched on `category_id`; products whose category is not
/// in `categories` are not reported.
pub fn inventory_by_category(products: &[Product], categories: &[Category]) -> Vec<CategoryInventory> {
    categories
        .iter()
        .map(|category| {
            let mut row = CategoryInventory {
                category_id: category.id.clone(),
                name: category.name.clone(),
                color: category.color.clone(),
                units: 0,
                value: 0.0,
                product_count: 0,
            };
            for product in products.iter().filter(|p| p.category_id == category.id) {
                row.units += u64::from(product.current_stock);
                row.value += product.stock_value();
                row.product_count += 1;
            }
            row
        })
        .collect()
}

/// Number of products per category id.
pub fn product_counts_by_category(products: &[Product]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for product in products {
        *counts.entry(product.category_id.clone()).or_insert(0) += 1;
    }
    counts
}

/// Totals of movements created within `range` of `now`.
pub fn movement_summary(movements: &[StockMovement], range: ReportRange, now: DateTime<Utc>) -> MovementSummary {
    let since = range.since(now);
    let mut summary = MovementSummary::default();

    for movement in movements.iter().filter(|m| m.created_at >= since && m.created_at <= now) {
        summary.movements += 1;
        match movement.movement_type {
            MovementType::In => summary.stock_in += u64::from(movement.quantity),
            MovementType::Out => summary.stock_out += u64::from(movement.quantity),
            MovementType::Adjust => summary.adjustments += 1,
        }
    }

    summary
}

pub fn inventory_summary(products: &[Product]) -> InventorySummary {
    InventorySummary {
        total_products: products.len(),
        total_value: products.iter().fold(0.0, |sum, p| sum + p.stock_value()),
        at_or_below_minimum: products.iter().filter(|p| p.current_stock <= p.min_stock).count(),
    }
}

/// Products that need reordering (`Out` or `Low`), lowest stock first.
pub fn low_stock_products(products: &[Product]) -> Vec<&Product> {
    let mut list: Vec<&Product> = products
        .iter()
        .filter(|p| matches!(p.stock_level(), StockLevel::Out | StockLevel::Low))
        .collect();
    list.sort_by_key(|p| p.current_stock);
    list
}

// =============================================================================
// Unit Tests
// =============================================================================
