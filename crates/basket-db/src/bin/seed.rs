//! # Demo Catalog Seeder
//!
//! Populates the catalog store with a small grocery catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./basket_dev.db
//! cargo run -p basket-db --bin seed
//!
//! # Specify database path
//! cargo run -p basket-db --bin seed -- --db ./data/catalog.db
//!
//! # Overwrite names/prices of items that already exist
//! cargo run -p basket-db --bin seed -- --force
//! ```

use std::env;

use basket_core::Product;
use basket_db::{Database, DbConfig};

/// (catalog identifier, name, price in cents)
const DEMO_CATALOG: &[(&str, &str, i64)] = &[
    ("RT101", "Apple", 250),
    ("RT102", "Banana", 85),
    ("RT103", "Bread", 120),
    ("RT104", "Milk", 95),
    ("RT105", "Eggs (dozen)", 189),
    ("RT106", "Rice 1kg", 215),
    ("RT107", "Instant Noodles", 35),
    ("RT108", "Canned Tuna", 145),
    ("RT109", "Coffee 3-in-1", 60),
    ("RT110", "Bottled Water", 40),
    ("RT111", "Soy Sauce", 110),
    ("RT112", "Laundry Soap", 275),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./basket_dev.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Smart Basket Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./basket_dev.db)");
                println!("  -f, --force        Overwrite items that already exist");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Smart Basket Catalog Seeder");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let catalog = db.catalog();
    let existing = catalog.count().await?;
    if existing > 0 && !force {
        println!("⚠ Catalog already has {} items", existing);
        println!("  Skipping seed; pass --force to overwrite.");
        return Ok(());
    }

    for (id, name, price_cents) in DEMO_CATALOG {
        catalog.upsert(&Product::new(*id, *name, *price_cents)).await?;
    }

    println!("✓ Seeded {} catalog items", DEMO_CATALOG.len());
    println!("  Active items: {}", catalog.count().await?);

    db.close().await;
    Ok(())
}
