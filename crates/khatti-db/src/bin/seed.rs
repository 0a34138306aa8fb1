//! # Seed Data Generator
//!
//! Creates demo accounts, each with one sample order, for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./khatti_dev.db
//! cargo run -p khatti-db --bin seed
//!
//! # Specify database path
//! cargo run -p khatti-db --bin seed -- --db ./data/khatti.db
//! ```
//!
//! ## Generated Data
//! - Accounts from [`DEMO_ACCOUNTS`], all with password `khatti123`
//! - One order per account built from the bundled catalog, priced with the
//!   default rules (18% GST, free shipping from ₹999)

use std::env;

use khatti_core::orders::build_order;
use khatti_core::{AuthProvider, Catalog, OrderBackend, PricingRules, Store};
use khatti_db::{Database, DbConfig};

const DEMO_PASSWORD: &str = "khatti123";

/// (email, full name, product ids in the sample order)
const DEMO_ACCOUNTS: &[(&str, &str, &[&str])] = &[
    ("asha@example.com", "Asha Rao", &["1", "4"]),
    ("ravi@example.com", "Ravi Menon", &["7"]),
    ("zoya@example.com", "Zoya Khan", &["2", "10", "12"]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = "./khatti_dev.db".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Khatti Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./khatti_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Khatti Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.users().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} accounts", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let catalog = Catalog::builtin()?;
    let rules = PricingRules::default();

    println!();
    println!("Creating demo accounts...");

    for (email, full_name, product_ids) in DEMO_ACCOUNTS {
        let account = match db.sign_up(email, DEMO_PASSWORD, full_name).await {
            Ok(account) => account,
            Err(e) => {
                eprintln!("Failed to create {}: {}", email, e);
                continue;
            }
        };

        let mut store = Store::new();
        for id in product_ids.iter() {
            let Some(product) = catalog.find(id) else {
                eprintln!("  Unknown product {} in demo order", id);
                continue;
            };
            let size = product.default_size().unwrap_or_default();
            let color = product.default_color().unwrap_or_default();
            store.add_to_cart(product, size, color);
        }

        let summary = rules.summarize(store.cart_total(), None);
        let (order, items) = build_order(&account.id, store.cart(), &summary)?;
        let order = db.create_order(order).await?;
        db.attach_items(&order.id, items).await?;

        println!(
            "  {} ({}) → order {} for {}",
            full_name,
            email,
            order.short_ref(),
            order.total_amount
        );
    }

    println!();
    println!("✓ Seed complete! Password for every account: {}", DEMO_PASSWORD);

    db.close().await;
    Ok(())
}
