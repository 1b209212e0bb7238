//! # Seed Data Generator
//!
//! Populates the store with sample products and suppliers for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p shopledger-store --bin shopledger-seed
//!
//! # Generate custom amount
//! cargo run -p shopledger-store --bin shopledger-seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p shopledger-store --bin shopledger-seed -- --db ./data/shopledger.db
//! ```

use chrono::Utc;
use std::env;
use uuid::Uuid;

use shopledger_core::types::{Product, Supplier};
use shopledger_store::{migrations, ProductStore, SqliteStore, StoreConfig, SupplierStore};

/// Product categories for realistic test data.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "BEV",
        &[
            "Milo 400g",
            "Milo Sachet",
            "Coca-Cola 500ml",
            "Fanta 500ml",
            "Sprite 500ml",
            "Voltic Water 750ml",
            "Kalyppo",
            "Don Simon Juice",
            "Nescafe Classic",
            "Lipton Tea",
        ],
    ),
    (
        "GRO",
        &[
            "Gari",
            "Rice 5kg",
            "Sugar 1kg",
            "Salt 500g",
            "Tin Tomatoes",
            "Sardines",
            "Corned Beef",
            "Spaghetti",
            "Cooking Oil 1L",
            "Shito Jar",
        ],
    ),
    (
        "HOM",
        &[
            "Key Soap",
            "Omo 1kg",
            "Dettol",
            "Matches",
            "Candles",
            "Mosquito Coil",
            "Toilet Roll",
            "Sponge",
            "Bleach 1L",
            "Air Freshener",
        ],
    ),
];

/// Sample suppliers.
const SUPPLIERS: &[(&str, &str)] = &[
    ("Accra Wholesale Ltd", "024-123-4567"),
    ("Tema Traders", "020-765-4321"),
    ("Kumasi Distribution Co", "054-111-2233"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./shopledger_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shopledger Seed Data Generator");
                println!();
                println!("Usage: shopledger-seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./shopledger_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Shopledger Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let store = SqliteStore::connect(StoreConfig::new(&db_path)).await?;

    println!("✓ Connected to store");
    let (total, applied) = migrations::migration_status(store.pool()).await?;
    println!("✓ Migrations applied ({applied}/{total})");

    // Skip if data already exists
    let existing = store.list_products().await?;
    if !existing.is_empty() {
        println!("⚠ Store already has {} products", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating suppliers...");
    for (name, phone) in SUPPLIERS {
        let supplier = Supplier {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            contact_info: Some(phone.to_string()),
            balance_cents: 0,
            created_at: Utc::now(),
        };
        store.insert_supplier(&supplier).await?;
    }
    println!("✓ Generated {} suppliers", SUPPLIERS.len());

    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: loop {
        for (category_code, names) in CATEGORIES {
            for (product_idx, name) in names.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let product = generate_product(category_code, name, generated, product_idx);

                if let Err(e) = store.insert_product(&product).await {
                    eprintln!("Failed to insert {}: {}", product.code, e);
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with realistic data.
fn generate_product(category: &str, name: &str, seed: usize, name_idx: usize) -> Product {
    let now = Utc::now();

    let compact = name.replace(' ', "");
    let prefix = &compact[..3.min(compact.len())];
    let code = format!("{}-{}-{:04}", category, prefix.to_uppercase(), seed);

    // Price: GHS 1.50 - GHS 41.50
    let unit_price_cents = 150 + ((seed * 37 + name_idx * 113) % 4000) as i64;

    // Stock 0-49: some products start below the low-stock threshold
    let stock = ((seed * 13) % 50) as i64;

    Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        code,
        category: category.to_string(),
        stock,
        unit_price_cents,
        created_at: now,
        updated_at: now,
    }
}
