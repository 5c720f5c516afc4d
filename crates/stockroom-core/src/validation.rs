//! # Validation Module
//!
//! Input validation applied before records reach the record store.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard forms                                               │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rule validation on New* payloads                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The in-memory [`StockStore`](crate::store::StockStore) does not call
//! these: its operations accept any well-typed input.
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_sku, validate_color};
//!
//! validate_sku("MBP-16-001").unwrap();
//! validate_color("#3B82F6").unwrap();
//! ```

use crate::budget::NewBudgetRequest;
use crate::error::ValidationError;
use crate::types::{
    Category, MovementType, NewCategory, NewProduct, NewStockMovement, NewSupplier, Product, Supplier,
};
use crate::{MAX_NAME_LEN, MAX_SKU_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a SKU.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, hyphens and underscores only
///
/// ```rust
/// use stockroom_core::validation::validate_sku;
///
/// assert!(validate_sku("JS-GUIDE-001").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    required("sku", sku, MAX_SKU_LEN)?;

    if !sku
        .trim()
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required("name", name, MAX_NAME_LEN)
}

pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    required("category name", name, MAX_NAME_LEN)
}

pub fn validate_supplier_name(name: &str) -> ValidationResult<()> {
    required("supplier name", name, MAX_NAME_LEN)
}

/// Validates a search query and returns it trimmed.
///
/// Empty is allowed (matches everything).
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a `#RRGGBB` display color.
pub fn validate_color(color: &str) -> ValidationResult<()> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "color".to_string(),
            reason: "must be a hex color like #3B82F6".to_string(),
        });
    }

    Ok(())
}

/// Validates an optional email address: one `@` with text on both sides.
pub fn validate_email(email: Option<&str>) -> ValidationResult<()> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(());
    };

    let mut parts = email.split('@');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
    );

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(())
}

/// Validates a budget request number.
pub fn validate_request_no(request_no: &str) -> ValidationResult<()> {
    required("request_no", request_no, 30)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Unit price must be a finite, non-negative number. Zero is allowed.
pub fn validate_unit_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// `min_stock` may not exceed `max_stock` when a maximum is set.
///
/// A `max_stock` of zero means "no maximum".
pub fn validate_stock_bounds(min_stock: u32, max_stock: u32) -> ValidationResult<()> {
    if max_stock > 0 && min_stock > max_stock {
        return Err(ValidationError::OutOfRange {
            field: "min_stock".to_string(),
            min: 0,
            max: i64::from(max_stock),
        });
    }

    Ok(())
}

/// `IN` and `OUT` must move at least one unit; `ADJUST` may set zero.
pub fn validate_movement_quantity(movement_type: MovementType, quantity: u32) -> ValidationResult<()> {
    if quantity == 0 && movement_type != MovementType::Adjust {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Budget amounts must be finite and greater than zero.
pub fn validate_budget_amount(amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a UUID string.
///
/// ```rust
/// use stockroom_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    product_fields(
        &product.sku,
        &product.name,
        &product.category_id,
        &product.supplier_id,
        product.unit_price,
        product.min_stock,
        product.max_stock,
    )
}

pub fn validate_new_movement(movement: &NewStockMovement) -> ValidationResult<()> {
    required("product", &movement.product_id, 64)?;
    validate_movement_quantity(movement.movement_type, movement.quantity)
}

pub fn validate_new_category(category: &NewCategory) -> ValidationResult<()> {
    validate_category_name(&category.name)?;
    validate_color(&category.color)
}

pub fn validate_new_supplier(supplier: &NewSupplier) -> ValidationResult<()> {
    validate_supplier_name(&supplier.name)?;
    validate_email(supplier.email.as_deref())
}

pub fn validate_new_budget_request(request: &NewBudgetRequest) -> ValidationResult<()> {
    validate_request_no(&request.request_no)?;
    required("requester", &request.requester, MAX_NAME_LEN)?;
    required("account_code", &request.account_code, 30)?;
    validate_budget_amount(request.amount)?;

    for item in &request.material_list {
        required("material item", &item.item, MAX_NAME_LEN)?;
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================
//
// Full records, checked before an UPDATE.

pub fn validate_product(product: &Product) -> ValidationResult<()> {
    product_fields(
        &product.sku,
        &product.name,
        &product.category_id,
        &product.supplier_id,
        product.unit_price,
        product.min_stock,
        product.max_stock,
    )
}

pub fn validate_category(category: &Category) -> ValidationResult<()> {
    validate_category_name(&category.name)?;
    validate_color(&category.color)
}

pub fn validate_supplier(supplier: &Supplier) -> ValidationResult<()> {
    validate_supplier_name(&supplier.name)?;
    validate_email(supplier.email.as_deref())
}

fn product_fields(
    sku: &str,
    name: &str,
    category_id: &str,
    supplier_id: &str,
    unit_price: f64,
    min_stock: u32,
    max_stock: u32,
) -> ValidationResult<()> {
    validate_sku(sku)?;
    validate_product_name(name)?;
    required("category", category_id, 64)?;
    required("supplier", supplier_id, 64)?;
    validate_unit_price(unit_price)?;
    validate_stock_bounds(min_stock, max_stock)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::MaterialItem;
    use chrono::NaiveDate;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("MBP-16-001").is_ok());
        assert!(validate_sku("WH_001").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(51)).is_err());
        assert!(validate_sku(&"A".repeat(50)).is_ok());
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_product_name("Designer T-Shirt").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
        assert!(validate_category_name("Home & Garden").is_ok());
        assert!(validate_supplier_name(" ").is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  pen ").unwrap(), "pen");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#3B82F6").is_ok());
        assert!(validate_color("#10b981").is_ok());
        assert!(validate_color("3B82F6").is_err());
        assert!(validate_color("#3B82F").is_err());
        assert!(validate_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email(None).is_ok());
        assert!(validate_email(Some("")).is_ok());
        assert!(validate_email(Some("john@techsupply.com")).is_ok());
        assert!(validate_email(Some("john")).is_err());
        assert!(validate_email(Some("@techsupply.com")).is_err());
        assert!(validate_email(Some("a@b@c")).is_err());
    }

    #[test]
    fn test_validate_numbers() {
        assert!(validate_unit_price(0.0).is_ok());
        assert!(validate_unit_price(2499.99).is_ok());
        assert!(validate_unit_price(-0.01).is_err());
        assert!(validate_unit_price(f64::NAN).is_err());

        assert!(validate_stock_bounds(5, 50).is_ok());
        assert!(validate_stock_bounds(5, 0).is_ok());
        assert!(validate_stock_bounds(60, 50).is_err());

        assert!(validate_budget_amount(1.0).is_ok());
        assert!(validate_budget_amount(0.0).is_err());
        assert!(validate_budget_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_movement_quantity() {
        assert!(validate_movement_quantity(MovementType::In, 1).is_ok());
        assert!(validate_movement_quantity(MovementType::In, 0).is_err());
        assert!(validate_movement_quantity(MovementType::Out, 0).is_err());
        assert!(validate_movement_quantity(MovementType::Adjust, 0).is_ok());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("123").is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let mut product = NewProduct {
            sku: "TS-001".to_string(),
            name: "Designer T-Shirt".to_string(),
            category_id: "2".to_string(),
            supplier_id: "2".to_string(),
            min_stock: 20,
            max_stock: 200,
            unit_price: 49.99,
            ..Default::default()
        };
        assert!(validate_new_product(&product).is_ok());

        product.category_id.clear();
        assert!(matches!(
            validate_new_product(&product),
            Err(ValidationError::Required { field }) if field == "category"
        ));
    }

    #[test]
    fn test_validate_records() {
        let mut product = Product::from_new(
            "p1".to_string(),
            NewProduct {
                sku: "WH-001".to_string(),
                name: "Wireless Headphones".to_string(),
                category_id: "1".to_string(),
                supplier_id: "1".to_string(),
                min_stock: 10,
                max_stock: 100,
                ..Default::default()
            },
            chrono::Utc::now(),
        );
        assert!(validate_product(&product).is_ok());

        product.min_stock = 500;
        product.max_stock = 10;
        assert!(matches!(validate_product(&product), Err(ValidationError::OutOfRange { .. })));

        let mut category = Category {
            id: "c1".to_string(),
            name: "Books".to_string(),
            description: None,
            color: "#F59E0B".to_string(),
        };
        assert!(validate_category(&category).is_ok());
        category.color = "green".to_string();
        assert!(validate_category(&category).is_err());

        let supplier = Supplier {
            id: "s1".to_string(),
            name: "   ".to_string(),
            contact: None,
            email: None,
            phone: None,
        };
        assert!(matches!(validate_supplier(&supplier), Err(ValidationError::Required { .. })));
    }

    #[test]
    fn test_validate_new_budget_request() {
        let mut request = NewBudgetRequest {
            request_no: "BR-001".to_string(),
            requester: "Somchai".to_string(),
            request_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            account_code: "5101".to_string(),
            account_name: None,
            amount: 500.0,
            material_list: vec![MaterialItem {
                item: "Pens".to_string(),
                quantity: 10,
            }],
            note: None,
        };
        assert!(validate_new_budget_request(&request).is_ok());

        request.material_list[0].item = " ".to_string();
        assert!(validate_new_budget_request(&request).is_err());

        request.material_list.clear();
        request.amount = -5.0;
        assert!(validate_new_budget_request(&request).is_err());
    }
}
