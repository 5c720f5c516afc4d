//! # Stock State Store
//!
//! The authoritative in-memory snapshot of products, movements, categories
//! and suppliers, plus the active product filter.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       StockStore Lifecycle                              │
//! │                                                                         │
//! │  StockStore::new() / from_parts(..)        create                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  add_product / update_product / ...        mutate (&mut self)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  filtered_products / stats / products      read (&self)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  drop                                      discard                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operations only exist as methods on an owned store, so there is no way
//! to reach them without a live store. Every operation is total: unknown
//! ids are no-ops, never errors.
//!
//! ## Statistics
//! [`StockStore::stats`] is a pure projection computed on demand.
//! [`StockStore::version`] changes whenever products or movements change,
//! so callers that want to cache stats can key the cache on it.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::filter::{filter_products, stock_level, StockFilter, StockLevel};
use crate::stats::{calculate_stats, StockStats};
use crate::types::{
    generate_id, Category, NewCategory, NewProduct, NewStockMovement, NewSupplier, Product, StockMovement, Supplier,
};

/// In-memory stock state.
#[derive(Debug, Clone, Default)]
pub struct StockStore {
    products: Vec<Product>,
    /// Newest first.
    movements: Vec<StockMovement>,
    categories: Vec<Category>,
    suppliers: Vec<Supplier>,
    filter: StockFilter,
    version: u64,
}

impl StockStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        StockStore::default()
    }

    /// Creates a store from previously persisted collections.
    ///
    /// Movements are re-ordered newest-first; the sort is stable so rows
    /// sharing a timestamp keep their relative order.
    pub fn from_parts(
        products: Vec<Product>,
        mut movements: Vec<StockMovement>,
        categories: Vec<Category>,
        suppliers: Vec<Supplier>,
    ) -> Self {
        movements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        StockStore {
            products,
            movements,
            categories,
            suppliers,
            filter: StockFilter::default(),
            version: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Movement history, newest first.
    pub fn movements(&self) -> &[StockMovement] {
        &self.movements
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    /// The active filter.
    pub fn filter(&self) -> &StockFilter {
        &self.filter
    }

    /// Looks up a product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Mutation counter for products and movements.
    pub fn version(&self) -> u64 {
        self.version
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Appends a new product with a generated id and fresh timestamps.
    ///
    /// SKUs are not checked for uniqueness.
    pub fn add_product(&mut self, data: NewProduct) -> &Product {
        let product = Product::from_new(generate_id(), data, Utc::now());
        debug!(id = %product.id, sku = %product.sku, "Adding product");

        self.products.push(product);
        self.touch();
        &self.products[self.products.len() - 1]
    }

    /// Replaces the product with the same id, stamping `updated_at`.
    ///
    /// Returns `false` and changes nothing when no product matches.
    pub fn update_product(&mut self, mut product: Product) -> bool {
        let Some(slot) = self.products.iter_mut().find(|p| p.id == product.id) else {
            debug!(id = %product.id, "Update ignored, product not found");
            return false;
        };

        product.updated_at = Utc::now();
        debug!(id = %product.id, "Updating product");
        *slot = product;
        self.touch();
        true
    }

    /// Removes the product with the given id.
    ///
    /// Movements referencing it are kept.
    pub fn delete_product(&mut self, id: &str) -> Option<Product> {
        let index = self.products.iter().position(|p| p.id == id)?;
        debug!(id = %id, "Deleting product");

        let removed = self.products.remove(index);
        self.touch();
        Some(removed)
    }

    // =========================================================================
    // Movements
    // =========================================================================

    /// Records a movement and applies it to the referenced product.
    ///
    /// The movement is prepended to the history. `IN` adds, `OUT` subtracts
    /// clamping at zero, `ADJUST` sets the absolute quantity. A movement for
    /// an unknown product is still recorded.
    pub fn add_stock_movement(&mut self, data: NewStockMovement) -> &StockMovement {
        let now = Utc::now();
        self.apply_movement_at(data, now)
    }

    fn apply_movement_at(&mut self, data: NewStockMovement, now: DateTime<Utc>) -> &StockMovement {
        let movement = StockMovement::from_new(generate_id(), data, now);

        match self.products.iter_mut().find(|p| p.id == movement.product_id) {
            Some(product) => {
                let before = product.current_stock;
                product.apply_movement(movement.movement_type, movement.quantity, now);
                debug!(
                    product_id = %product.id,
                    movement = movement.movement_type.as_str(),
                    quantity = movement.quantity,
                    before,
                    after = product.current_stock,
                    "Applied stock movement"
                );
            }
            None => {
                debug!(product_id = %movement.product_id, "Movement recorded for unknown product");
            }
        }

        self.movements.insert(0, movement);
        self.touch();
        &self.movements[0]
    }

    // =========================================================================
    // Categories & Suppliers
    // =========================================================================

    pub fn add_category(&mut self, data: NewCategory) -> &Category {
        let category = Category::from_new(generate_id(), data);
        debug!(id = %category.id, name = %category.name, "Adding category");

        self.categories.push(category);
        &self.categories[self.categories.len() - 1]
    }

    pub fn add_supplier(&mut self, data: NewSupplier) -> &Supplier {
        let supplier = Supplier::from_new(generate_id(), data);
        debug!(id = %supplier.id, name = %supplier.name, "Adding supplier");

        self.suppliers.push(supplier);
        &self.suppliers[self.suppliers.len() - 1]
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Replaces the active filter. No merge with the previous one.
    pub fn set_filter(&mut self, filter: StockFilter) {
        self.filter = filter;
    }

    /// Products matching every active filter predicate, in collection order.
    pub fn filtered_products(&self) -> Vec<&Product> {
        filter_products(&self.products, &self.filter)
    }

    /// Stock level bucket of `product`.
    pub fn stock_level(&self, product: &Product) -> StockLevel {
        stock_level(product)
    }

    /// Statistics as of now.
    pub fn stats(&self) -> StockStats {
        self.stats_at(Utc::now())
    }

    /// Statistics as of `now`.
    pub fn stats_at(&self, now: DateTime<Utc>) -> StockStats {
        calculate_stats(&self.products, &self.movements, now)
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovementType;
    use chrono::Duration;

    fn new_product(sku: &str, name: &str, category: &str, stock: u32, min: u32, price: f64) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: name.to_string(),
            category_id: category.to_string(),
            supplier_id: "1".to_string(),
            current_stock: stock,
            min_stock: min,
            max_stock: min * 10,
            unit_price: price,
            ..Default::default()
        }
    }

    fn store_with_product(stock: u32) -> (StockStore, String) {
        let mut store = StockStore::new();
        let id = store
            .add_product(new_product("MBP-16-001", "MacBook Pro 16\"", "1", stock, 5, 2499.99))
            .id
            .clone();
        (store, id)
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = StockStore::new();
        assert!(store.products().is_empty());
        assert!(store.movements().is_empty());
        assert_eq!(store.stats(), StockStats::default());
        assert!(store.filter().is_empty());
    }

    #[test]
    fn test_add_product_assigns_identity_and_timestamps() {
        let mut store = StockStore::new();
        let product = store.add_product(new_product("PEN-1", "Pen", "1", 5, 2, 1.0)).clone();

        assert!(!product.id.is_empty());
        assert_eq!(product.created_at, product.updated_at);
        assert_eq!(store.products().len(), 1);
        assert_eq!(store.product(&product.id), Some(&product));
    }

    #[test]
    fn test_duplicate_skus_permitted() {
        let mut store = StockStore::new();
        let a = store.add_product(new_product("DUP", "A", "1", 1, 1, 1.0)).id.clone();
        let b = store.add_product(new_product("DUP", "B", "1", 1, 1, 1.0)).id.clone();
        assert_ne!(a, b);
        assert_eq!(store.products().len(), 2);
    }

    #[test]
    fn test_update_product_replaces_and_stamps() {
        let (mut store, id) = store_with_product(15);
        let mut edited = store.product(&id).unwrap().clone();
        let original_updated = edited.updated_at;
        edited.name = "Renamed".to_string();
        edited.updated_at = original_updated - Duration::days(1);

        assert!(store.update_product(edited));
        let stored = store.product(&id).unwrap();
        assert_eq!(stored.name, "Renamed");
        assert!(stored.updated_at >= original_updated);
    }

    #[test]
    fn test_update_unknown_product_is_noop() {
        let (mut store, id) = store_with_product(15);
        let version = store.version();
        let mut ghost = store.product(&id).unwrap().clone();
        ghost.id = "missing".to_string();

        assert!(!store.update_product(ghost));
        assert_eq!(store.version(), version);
        assert_eq!(store.products().len(), 1);
    }

    #[test]
    fn test_delete_product_keeps_movements() {
        let (mut store, id) = store_with_product(15);
        store.add_stock_movement(NewStockMovement::new(&id, MovementType::Out, 2));

        let removed = store.delete_product(&id);
        assert_eq!(removed.map(|p| p.id), Some(id.clone()));
        assert!(store.products().is_empty());
        assert_eq!(store.movements().len(), 1);
        assert_eq!(store.movements()[0].product_id, id);

        assert!(store.delete_product(&id).is_none());
    }

    #[test]
    fn test_movement_in_out_adjust() {
        let (mut store, id) = store_with_product(15);

        store.add_stock_movement(NewStockMovement::new(&id, MovementType::In, 5));
        assert_eq!(store.product(&id).unwrap().current_stock, 20);

        store.add_stock_movement(NewStockMovement::new(&id, MovementType::Out, 8));
        assert_eq!(store.product(&id).unwrap().current_stock, 12);

        store.add_stock_movement(NewStockMovement::new(&id, MovementType::Out, 100));
        assert_eq!(store.product(&id).unwrap().current_stock, 0);

        store.add_stock_movement(NewStockMovement::new(&id, MovementType::Adjust, 42));
        assert_eq!(store.product(&id).unwrap().current_stock, 42);
    }

    #[test]
    fn test_adjust_may_exceed_max_stock() {
        let (mut store, id) = store_with_product(15);
        let max = store.product(&id).unwrap().max_stock;

        store.add_stock_movement(NewStockMovement::new(&id, MovementType::Adjust, max + 1));
        assert_eq!(store.product(&id).unwrap().current_stock, max + 1);
    }

    #[test]
    fn test_movement_for_unknown_product_is_recorded() {
        let (mut store, id) = store_with_product(15);
        store.add_stock_movement(NewStockMovement::new("missing", MovementType::In, 5));

        assert_eq!(store.movements().len(), 1);
        assert_eq!(store.product(&id).unwrap().current_stock, 15);
    }

    #[test]
    fn test_movements_newest_first_and_unchanged() {
        let (mut store, id) = store_with_product(15);
        let first = store.add_stock_movement(NewStockMovement::new(&id, MovementType::In, 1)).clone();
        let second = store.add_stock_movement(NewStockMovement::new(&id, MovementType::Out, 2)).clone();
        let third = store
            .add_stock_movement(NewStockMovement::new(&id, MovementType::Adjust, 3))
            .clone();

        let ids: Vec<&str> = store.movements().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec![third.id.as_str(), second.id.as_str(), first.id.as_str()]);
        assert_eq!(store.movements()[2], first);
        assert_eq!(store.movements()[1], second);
    }

    #[test]
    fn test_movement_stamps_product_updated_at() {
        let (mut store, id) = store_with_product(15);
        let before = store.product(&id).unwrap().updated_at;
        let at = before + Duration::minutes(5);

        store.apply_movement_at(NewStockMovement::new(&id, MovementType::In, 1), at);
        assert_eq!(store.product(&id).unwrap().updated_at, at);
        assert_eq!(store.movements()[0].created_at, at);
    }

    #[test]
    fn test_categories_and_suppliers_append() {
        let mut store = StockStore::new();
        let category = store
            .add_category(NewCategory {
                name: "Books".to_string(),
                description: None,
                color: "#F59E0B".to_string(),
            })
            .clone();
        store.add_supplier(NewSupplier {
            name: "BookWorld".to_string(),
            ..Default::default()
        });

        assert_eq!(store.categories(), &[category]);
        assert_eq!(store.suppliers()[0].name, "BookWorld");
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_set_filter_replaces_wholesale() {
        let mut store = StockStore::new();
        store.add_product(new_product("PEN", "Pen", "1", 5, 1, 1.0));
        store.add_product(new_product("PAD", "Pad", "2", 0, 1, 1.0));

        store.set_filter(StockFilter {
            category: Some("1".to_string()),
            search_term: Some("pad".to_string()),
            ..Default::default()
        });
        assert!(store.filtered_products().is_empty());

        store.set_filter(StockFilter {
            category: Some("1".to_string()),
            ..Default::default()
        });
        let names: Vec<&str> = store.filtered_products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Pen"]);

        store.set_filter(StockFilter {
            stock_level: Some(StockLevel::Out),
            ..Default::default()
        });
        assert!(store.filter().category.is_none());
        let names: Vec<&str> = store.filtered_products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Pad"]);
    }

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let mut store = StockStore::new();
        for sku in ["A", "B", "C"] {
            store.add_product(new_product(sku, sku, "1", 1, 1, 1.0));
        }
        let skus: Vec<&str> = store.filtered_products().iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_stats_follow_mutations() {
        let mut store = StockStore::new();
        let laptop = store
            .add_product(new_product("MBP", "MacBook", "1", 15, 5, 2499.99))
            .id
            .clone();
        store.add_product(new_product("WH", "Headphones", "1", 3, 10, 299.99));

        let stats = store.stats();
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.total_value, 15.0 * 2499.99 + 3.0 * 299.99);
        assert_eq!(stats.low_stock_items, 1);
        assert_eq!(stats.out_of_stock_items, 0);
        assert_eq!(stats.recent_movements, 0);

        let version = store.version();
        store.add_stock_movement(NewStockMovement::new(&laptop, MovementType::Out, 15));
        assert!(store.version() > version);

        let stats = store.stats();
        assert_eq!(stats.out_of_stock_items, 1);
        assert_eq!(stats.recent_movements, 1);
        assert_eq!(stats.total_value, 3.0 * 299.99);
    }

    #[test]
    fn test_from_parts_orders_movements_newest_first() {
        let now = Utc::now();
        let old = StockMovement::from_new("old".into(), NewStockMovement::new("p", MovementType::In, 1), now - Duration::days(2));
        let new = StockMovement::from_new("new".into(), NewStockMovement::new("p", MovementType::In, 1), now);

        let store = StockStore::from_parts(Vec::new(), vec![old, new], Vec::new(), Vec::new());
        assert_eq!(store.movements()[0].id, "new");
        assert_eq!(store.movements()[1].id, "old");
        assert_eq!(store.stats_at(now).recent_movements, 2);
        assert_eq!(store.stats_at(now + Duration::days(6)).recent_movements, 1);
    }
}
