//! # Stock Statistics
//!
//! Derived dashboard figures. Always a projection of the product and
//! movement collections, never stored on its own.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Product, StockMovement};
use crate::RECENT_MOVEMENT_WINDOW_DAYS;

/// Dashboard statistics snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockStats {
    pub total_products: usize,
    /// Sum of `current_stock × unit_price`, plain f64 accumulation.
    pub total_value: f64,
    /// Products with `0 < current_stock <= min_stock`.
    pub low_stock_items: usize,
    /// Products with `current_stock == 0`.
    pub out_of_stock_items: usize,
    /// Movements created at or after `now - 7 days`.
    pub recent_movements: usize,
}

/// Computes [`StockStats`] for the given collections as of `now`.
///
/// Products are folded in collection order so the floating-point sum is
/// deterministic for a given ordering.
pub fn calculate_stats(products: &[Product], movements: &[StockMovement], now: DateTime<Utc>) -> StockStats {
    let total_value = products.iter().fold(0.0_f64, |sum, p| sum + p.stock_value());

    let low_stock_items = products
        .iter()
        .filter(|p| p.current_stock > 0 && p.current_stock <= p.min_stock)
        .count();

    let out_of_stock_items = products.iter().filter(|p| p.current_stock == 0).count();

    let since = now - Duration::days(RECENT_MOVEMENT_WINDOW_DAYS);
    let recent_movements = movements.iter().filter(|m| m.created_at >= since).count();

    StockStats {
        total_products: products.len(),
        total_value,
        low_stock_items,
        out_of_stock_items,
        recent_movements,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
