//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! This crate holds the inventory domain: the in-memory stock store, the
//! statistics derived from it, product filtering, validation rules, the
//! budget approval workflow and report aggregations. It has zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Dashboard (external frontend)                  │   │
//! │  │    Products ──► Movements ──► Budget Requests ──► Reports       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ TS bindings (ts-rs)                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐           │   │
//! │  │   │  store  │  │  stats  │  │ budget  │  │ report  │           │   │
//! │  │   │ filter  │  │  types  │  │ approve │  │ summary │           │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  stockroom-db (Record Store)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, StockMovement, Category, Supplier)
//! - [`store`] - The explicit, owned stock state store
//! - [`stats`] - Derived statistics projection
//! - [`filter`] - Stock level buckets and product filtering
//! - [`budget`] - Budget requests and approvals
//! - [`report`] - Aggregations for the reports page
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::{MovementType, NewProduct, NewStockMovement, StockStore};
//!
//! let mut store = StockStore::new();
//! let id = store
//!     .add_product(NewProduct {
//!         sku: "PEN-001".into(),
//!         name: "Pen".into(),
//!         current_stock: 5,
//!         min_stock: 2,
//!         unit_price: 1.5,
//!         ..Default::default()
//!     })
//!     .id
//!     .clone();
//!
//! store.add_stock_movement(NewStockMovement::new(&id, MovementType::Out, 7));
//!
//! assert_eq!(store.products()[0].current_stock, 0);
//! assert_eq!(store.stats().out_of_stock_items, 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod budget;
pub mod error;
pub mod filter;
pub mod report;
pub mod stats;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use budget::{Approval, ApprovalDecision, BudgetRequest, BudgetStatus, MaterialItem, NewBudgetRequest};
pub use report::ReportRange;
pub use error::{CoreError, CoreResult, ValidationError};
pub use filter::{filter_categories, filter_products, stock_level, StockFilter, StockLevel};
pub use stats::{calculate_stats, StockStats};
pub use store::StockStore;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Trailing window, in days, counted by [`StockStats::recent_movements`].
pub const RECENT_MOVEMENT_WINDOW_DAYS: i64 = 7;

/// Maximum SKU length accepted by validation.
pub const MAX_SKU_LEN: usize = 50;

/// Maximum product, category and supplier name length.
pub const MAX_NAME_LEN: usize = 200;
