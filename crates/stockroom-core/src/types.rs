//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  StockMovement  │   │    Category     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  product_id     │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  movement_type  │   │  name           │       │
//! │  │  current_stock  │   │  quantity       │   │  color          │       │
//! │  │  unit_price     │   │  created_at     │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │  MovementType   │   │    Supplier     │                              │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  IN             │   │  id (UUID)      │                              │
//! │  │  OUT            │   │  name           │                              │
//! │  │  ADJUST         │   │  contact fields │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Payload vs Record
//! Each entity has a `New*` payload without identity or timestamps. The
//! store (or record store) assigns those when the payload is accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::filter::{stock_level, StockLevel};

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit. Not unique: duplicates are accepted.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Optional long description, included in text search.
    pub description: Option<String>,

    /// Category reference. Not checked against the category collection.
    pub category_id: String,

    /// Supplier reference. Not checked against the supplier collection.
    pub supplier_id: String,

    /// Units currently on hand.
    pub current_stock: u32,

    /// Reorder threshold.
    pub min_stock: u32,

    /// Shelf capacity. Informational only.
    pub max_stock: u32,

    /// Price per unit.
    pub unit_price: f64,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Warehouse location code, e.g. `A1-B2`.
    pub location: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a product from a payload with the given identity and time.
    pub fn from_new(id: String, data: NewProduct, now: DateTime<Utc>) -> Self {
        Product {
            id,
            sku: data.sku,
            name: data.name,
            description: data.description,
            category_id: data.category_id,
            supplier_id: data.supplier_id,
            current_stock: data.current_stock,
            min_stock: data.min_stock,
            max_stock: data.max_stock,
            unit_price: data.unit_price,
            barcode: data.barcode,
            location: data.location,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the stock level bucket for this product.
    #[inline]
    pub fn stock_level(&self) -> StockLevel {
        stock_level(self)
    }

    /// Value of the units on hand (`current_stock × unit_price`).
    #[inline]
    pub fn stock_value(&self) -> f64 {
        f64::from(self.current_stock) * self.unit_price
    }

    /// Applies a movement to `current_stock` and stamps `updated_at`.
    pub fn apply_movement(&mut self, movement_type: MovementType, quantity: u32, now: DateTime<Utc>) {
        self.current_stock = movement_type.apply(self.current_stock, quantity);
        self.updated_at = now;
    }
}

/// Payload for creating a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: String,
    pub supplier_id: String,
    pub current_stock: u32,
    pub min_stock: u32,
    pub max_stock: u32,
    pub unit_price: f64,
    pub barcode: Option<String>,
    pub location: Option<String>,
}

// =============================================================================
// Movement Type
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    /// Goods received: stock increases by the quantity.
    In,
    /// Goods issued: stock decreases, never below zero.
    Out,
    /// Stock count: stock is set to the quantity.
    Adjust,
}

impl MovementType {
    /// Returns the stock level after applying `quantity` to `current`.
    ///
    /// ```rust
    /// use stockroom_core::MovementType;
    ///
    /// assert_eq!(MovementType::In.apply(10, 5), 15);
    /// assert_eq!(MovementType::Out.apply(3, 5), 0);
    /// assert_eq!(MovementType::Adjust.apply(10, 4), 4);
    /// ```
    #[inline]
    pub fn apply(self, current: u32, quantity: u32) -> u32 {
        match self {
            MovementType::In => current.saturating_add(quantity),
            MovementType::Out => current.saturating_sub(quantity),
            MovementType::Adjust => quantity,
        }
    }

    /// Wire representation (`IN`, `OUT`, `ADJUST`).
    pub fn as_str(self) -> &'static str {
        match self {
            MovementType::In => "IN",
            MovementType::Out => "OUT",
            MovementType::Adjust => "ADJUST",
        }
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// A recorded stock change. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: String,
    /// May reference a product that no longer exists.
    pub product_id: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: u32,
    /// Free-text note (delivery number, count sheet, ...).
    pub reason: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    pub fn from_new(id: String, data: NewStockMovement, now: DateTime<Utc>) -> Self {
        StockMovement {
            id,
            product_id: data.product_id,
            movement_type: data.movement_type,
            quantity: data.quantity,
            reason: data.reason,
            created_at: now,
        }
    }
}

/// Payload for recording a stock movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewStockMovement {
    pub product_id: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: u32,
    pub reason: Option<String>,
}

impl NewStockMovement {
    pub fn new(product_id: impl Into<String>, movement_type: MovementType, quantity: u32) -> Self {
        NewStockMovement {
            product_id: product_id.into(),
            movement_type,
            quantity,
            reason: None,
        }
    }

    /// Attaches a free-text reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category with a display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// `#RRGGBB`
    pub color: String,
}

/// Payload for creating a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
}

impl Category {
    pub fn from_new(id: String, data: NewCategory) -> Self {
        Category {
            id,
            name: data.name,
            description: data.description,
            color: data.color,
        }
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier and its contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    /// Contact person.
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Payload for creating a supplier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    pub name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Supplier {
    pub fn from_new(id: String, data: NewSupplier) -> Self {
        Supplier {
            id,
            name: data.name,
            contact: data.contact,
            email: data.email,
            phone: data.phone,
        }
    }
}

/// Generates a new entity ID (UUID v4).
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
