//! # Repository Module
//!
//! Database repositories for the Stockroom record collections.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Repository per Collection                        │
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │                                                                 │
//! │       │  db.products().list()                                           │
//! │       │  db.movements().record(NewStockMovement { .. })                 │
//! │       ▼                                                                 │
//! │  ProductRepository / MovementRepository / ...                           │
//! │  ├── create(&self, payload)  ← validates, assigns id + timestamps       │
//! │  ├── insert(&self, &record)  ← writes a fully-formed record             │
//! │  ├── get_by_id / list / update / delete                                 │
//! │       │                                                                 │
//! │       │  SQL (sqlx runtime queries)                                     │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product catalog and stock levels
//! - [`CategoryRepository`] - Categories, delete guarded by usage
//! - [`SupplierRepository`] - Supplier contacts
//! - [`MovementRepository`] - Movement history and atomic stock changes
//! - [`BudgetRepository`] - Budget requests and their approvals

pub mod budget;
pub mod category;
pub mod movement;
pub mod product;
pub mod supplier;

pub use budget::BudgetRepository;
pub use category::CategoryRepository;
pub use movement::MovementRepository;
pub use product::ProductRepository;
pub use supplier::SupplierRepository;
