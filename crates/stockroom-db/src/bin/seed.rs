//! # Seed Data Generator
//!
//! Populates the database with demo items for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 items (default)
//! cargo run -p stockroom-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p stockroom-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/inventory.db
//! ```
//!
//! Each item gets a category from the table below, a stock level between
//! 0 and 40 (so some land under the low-stock threshold), a cost price of
//! 60-80% of its selling price, and an EAN-13 shaped barcode.

use std::env;

use stockroom_core::{Money, NewItem, LOW_STOCK_THRESHOLD};
use stockroom_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Item categories for realistic demo data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Sports",
        &[
            "Football",
            "Basketball",
            "Tennis Ball",
            "Badminton Racket",
            "Cricket Bat",
            "Yoga Mat",
            "Skipping Rope",
            "Water Bottle",
        ],
    ),
    (
        "Stationery",
        &[
            "Notebook A5",
            "Notebook A4",
            "Ballpoint Pen",
            "Gel Pen",
            "Pencil HB",
            "Eraser",
            "Stapler",
            "Sticky Notes",
        ],
    ),
    (
        "Electronics",
        &[
            "USB Cable",
            "Phone Charger",
            "Earphones",
            "Power Bank",
            "AA Batteries",
            "Mouse",
            "Keyboard",
            "HDMI Cable",
        ],
    ),
    (
        "Grocery",
        &[
            "Rice 1kg",
            "Sugar 1kg",
            "Tea 250g",
            "Cooking Oil 1L",
            "Salt",
            "Lentils 1kg",
            "Biscuits",
            "Instant Noodles",
        ],
    ),
    (
        "Clothing",
        &[
            "T-Shirt",
            "Socks",
            "Cap",
            "Hoodie",
            "Scarf",
            "Gloves",
            "Shorts",
            "Track Pants",
        ],
    ),
];

/// Barcode symbologies the scanner reports
const FORMATS: &[&str] = &["EAN_13", "UPC_A", "CODE_128"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./inventory.db");

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
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of items to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./inventory.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(db = %db_path, count, "Seeding database");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.items().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has items, skipping seed");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut low = 0;

    'outer: for round in 0.. {
        for (category, names) in CATEGORIES {
            for name in names.iter() {
                if generated >= count {
                    break 'outer;
                }

                let item = generate_item(category, name, round, generated);
                if item.stock <= LOW_STOCK_THRESHOLD {
                    low += 1;
                }

                db.items().insert(&item).await?;
                generated += 1;
            }
        }
    }

    info!(
        generated,
        low_stock = low,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

/// Generates a single item with deterministic pseudo-random data.
fn generate_item(category: &str, name: &str, round: usize, seed: usize) -> NewItem {
    let name = if round == 0 {
        name.to_string()
    } else {
        format!("{} #{}", name, round + 1)
    };

    // Selling price: 1.99 - 49.99
    let selling_cents = 199 + ((seed * 37) % 4800) as i64;

    // Cost is 60-80% of price
    let cost_pct = 60 + (seed % 21) as i64;
    let cost_cents = selling_cents * cost_pct / 100;

    NewItem {
        name,
        category: category.to_string(),
        stock: ((seed * 7) % 41) as i64,
        costprice: Money::from_minor_units(cost_cents),
        sellingprice: Money::from_minor_units(selling_cents),
        barcode: format!("890{:010}", seed),
        format: Some(FORMATS[seed % FORMATS.len()].to_string()),
    }
}
