//! # Seed Data
//!
//! Populates a fresh database with the default catalog.
//!
//! ## Usage
//! ```bash
//! # Seed the database named by STOCKROOM_DB_PATH (default ./stockroom.db)
//! cargo run -p stockroom-db --bin seed
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db
//!
//! # More detail
//! RUST_LOG=debug cargo run -p stockroom-db --bin seed
//! ```
//!
//! ## Seeded Records
//! - 4 categories: Electronics, Clothing, Books, Home & Garden
//! - 3 suppliers with contact details
//! - 4 sample products, one low on stock and one sold out

use std::env;

use stockroom_core::{Category, NewCategory, NewProduct, NewSupplier, Supplier};
use stockroom_db::{Database, DbConfig, DbError};
use tracing_subscriber::EnvFilter;

/// (name, description, color)
const CATEGORIES: &[(&str, &str, &str)] = &[
    ("Electronics", "Electronic devices and accessories", "#3B82F6"),
    ("Clothing", "Apparel and fashion items", "#10B981"),
    ("Books", "Books and publications", "#F59E0B"),
    ("Home & Garden", "Home improvement and garden supplies", "#8B5CF6"),
];

/// (name, contact, email, phone)
const SUPPLIERS: &[(&str, &str, &str, &str)] = &[
    ("TechSupply Co.", "John Smith", "john@techsupply.com", "+1-555-0123"),
    ("Fashion Forward", "Sarah Johnson", "sarah@fashionforward.com", "+1-555-0124"),
    ("BookWorld", "Mike Wilson", "mike@bookworld.com", "+1-555-0125"),
];

struct SeedProduct {
    sku: &'static str,
    name: &'static str,
    description: &'static str,
    category: usize,
    supplier: usize,
    current_stock: u32,
    min_stock: u32,
    max_stock: u32,
    unit_price: f64,
    barcode: &'static str,
    location: &'static str,
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        sku: "MBP-16-001",
        name: "MacBook Pro 16\"",
        description: "Apple MacBook Pro 16-inch with M3 chip",
        category: 0,
        supplier: 0,
        current_stock: 15,
        min_stock: 5,
        max_stock: 50,
        unit_price: 2499.99,
        barcode: "123456789012",
        location: "A1-B2",
    },
    SeedProduct {
        sku: "WH-001",
        name: "Wireless Headphones",
        description: "Premium noise-canceling wireless headphones",
        category: 0,
        supplier: 0,
        current_stock: 3,
        min_stock: 10,
        max_stock: 100,
        unit_price: 299.99,
        barcode: "123456789013",
        location: "A2-C1",
    },
    SeedProduct {
        sku: "TS-001",
        name: "Designer T-Shirt",
        description: "Premium cotton designer t-shirt",
        category: 1,
        supplier: 1,
        current_stock: 0,
        min_stock: 20,
        max_stock: 200,
        unit_price: 49.99,
        barcode: "123456789014",
        location: "B1-A3",
    },
    SeedProduct {
        sku: "JS-GUIDE-001",
        name: "JavaScript Guide",
        description: "Complete guide to modern JavaScript development",
        category: 2,
        supplier: 2,
        current_stock: 45,
        min_stock: 10,
        max_stock: 100,
        unit_price: 39.99,
        barcode: "123456789015",
        location: "C1-A1",
    },
];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut config = DbConfig::from_env();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $STOCKROOM_DB_PATH or ./stockroom.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {other}");
            }
        }
        i += 1;
    }

    println!("Stockroom Seed Data");
    println!("===================");
    println!("Database: {}", config.database_path.display());
    println!();

    let db = Database::new(config).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {existing} products");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let categories = seed_categories(&db).await?;
    println!("✓ Seeded {} categories", categories.len());

    let suppliers = seed_suppliers(&db).await?;
    println!("✓ Seeded {} suppliers", suppliers.len());

    let mut seeded = 0;
    for p in PRODUCTS {
        let data = NewProduct {
            sku: p.sku.to_string(),
            name: p.name.to_string(),
            description: Some(p.description.to_string()),
            category_id: categories[p.category].id.clone(),
            supplier_id: suppliers[p.supplier].id.clone(),
            current_stock: p.current_stock,
            min_stock: p.min_stock,
            max_stock: p.max_stock,
            unit_price: p.unit_price,
            barcode: Some(p.barcode.to_string()),
            location: Some(p.location.to_string()),
        };

        match db.products().create(data).await {
            Ok(_) => seeded += 1,
            Err(e) => eprintln!("Failed to insert {}: {}", p.sku, e),
        }
    }
    println!("✓ Seeded {seeded} products");

    let store = db.load_store().await?;
    let stats = store.stats();
    println!();
    println!("Inventory value: {:.2}", stats.total_value);
    println!("Low stock:       {}", stats.low_stock_items);
    println!("Out of stock:    {}", stats.out_of_stock_items);

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

async fn seed_categories(db: &Database) -> Result<Vec<Category>, DbError> {
    let mut seeded = Vec::with_capacity(CATEGORIES.len());
    for (name, description, color) in CATEGORIES {
        let category = db
            .categories()
            .create(NewCategory {
                name: name.to_string(),
                description: Some(description.to_string()),
                color: color.to_string(),
            })
            .await?;
        seeded.push(category);
    }
    Ok(seeded)
}

async fn seed_suppliers(db: &Database) -> Result<Vec<Supplier>, DbError> {
    let mut seeded = Vec::with_capacity(SUPPLIERS.len());
    for (name, contact, email, phone) in SUPPLIERS {
        let supplier = db
            .suppliers()
            .create(NewSupplier {
                name: name.to_string(),
                contact: Some(contact.to_string()),
                email: Some(email.to_string()),
                phone: Some(phone.to_string()),
            })
            .await?;
        seeded.push(supplier);
    }
    Ok(seeded)
}
