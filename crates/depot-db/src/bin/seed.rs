//! # Seed Data Generator
//!
//! Populates the database with development data: brands, tier-priced
//! products, customer accounts and a handful of orders placed through the
//! order engine (so debt and stock come out consistent).
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p depot-db --bin seed
//!
//! # Custom product count and database path
//! cargo run -p depot-db --bin seed -- --products 200 --db ./data/depot.db
//! ```

use std::env;

use depot_core::{OrderLine, Tier, TierPrices};
use depot_db::{Database, DbConfig, NewBrand, NewCustomer, NewOrder, NewProduct};

/// Brand names with product lines for realistic wholesale data
const BRANDS: &[(&str, &[&str])] = &[
    (
        "Atlas Foods",
        &[
            "Sunflower Oil 5L",
            "Olive Oil 1L",
            "Tomato Paste 800g",
            "Couscous 5kg",
            "White Flour 25kg",
            "Semolina 10kg",
            "Chickpeas 5kg",
            "Lentils 5kg",
        ],
    ),
    (
        "Oasis Beverages",
        &[
            "Sparkling Water 6x1L",
            "Still Water 12x500ml",
            "Orange Soda 24x330ml",
            "Apple Juice 6x1L",
            "Mint Tea 500g",
            "Ground Coffee 1kg",
        ],
    ),
    (
        "Cedar Dairy",
        &[
            "UHT Milk 12x1L",
            "Butter 40x125g",
            "Cheese Spread 24x140g",
            "Yogurt 48x110g",
            "Milk Powder 2.5kg",
        ],
    ),
    (
        "Sahara Home",
        &[
            "Dish Soap 12x750ml",
            "Laundry Powder 10kg",
            "Bleach 12x1L",
            "Paper Towels 24 rolls",
            "Trash Bags 50L x100",
        ],
    ),
];

/// Customer accounts: (username, name, phone, tier)
const CUSTOMERS: &[(&str, &str, &str, Tier)] = &[
    ("east_grocery", "East Side Grocery", "0612345001", Tier::Wholesale),
    ("west_market", "West Gate Market", "0712345002", Tier::SuperWholesale),
    ("corner_shop", "Corner Shop Said", "0512345003", Tier::Retail),
    ("al_baraka", "Al Baraka Superette", "0612345004", Tier::Wholesale),
    ("city_center", "City Center Minimarket", "0712345005", Tier::Retail),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut max_products: usize = usize::MAX;
    let mut db_path = String::from("./depot_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--products" | "-p" => {
                if i + 1 < args.len() {
                    max_products = args[i + 1].parse().unwrap_or(usize::MAX);
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
                println!("Depot Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --products <N>  Cap on generated products (default: all)");
                println!("  -d, --db <PATH>     Database file path (default: ./depot_dev.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Depot Seed Data Generator");
    println!("=========================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing data
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Brands and products
    println!();
    println!("Generating catalog...");

    let mut product_ids = Vec::new();
    let mut generated = 0;

    'outer: for (brand_idx, (brand_name, product_names)) in BRANDS.iter().enumerate() {
        let brand = db
            .brands()
            .insert(NewBrand {
                name: brand_name.to_string(),
                logo_url: None,
            })
            .await?;

        for (product_idx, product_name) in product_names.iter().enumerate() {
            if generated >= max_products {
                break 'outer;
            }

            let seed = brand_idx * 100 + product_idx;
            let product = db
                .products()
                .insert(generate_product(&brand.id, product_name, seed))
                .await?;

            product_ids.push(product.id);
            generated += 1;
        }
    }

    println!("✓ Generated {} brands, {} products", BRANDS.len(), generated);

    // Customers
    let mut customer_ids = Vec::new();
    for (username, name, phone, tier) in CUSTOMERS {
        let customer = db
            .customers()
            .insert(NewCustomer {
                username: username.to_string(),
                name: name.to_string(),
                phone: Some(phone.to_string()),
                tier: *tier,
            })
            .await?;
        customer_ids.push((customer.id, *tier));
    }

    println!("✓ Generated {} customers", customer_ids.len());

    // A few orders through the order engine so balances stay consistent
    println!();
    println!("Placing sample orders...");

    let mut orders = 0;
    for (order_idx, (customer_id, tier)) in customer_ids.iter().enumerate() {
        if product_ids.is_empty() {
            break;
        }

        let mut lines = Vec::new();
        for line_no in 0..(1 + order_idx % 3) {
            let product_id = &product_ids[(order_idx * 7 + line_no * 3) % product_ids.len()];
            let product = db
                .products()
                .get_by_id(product_id)
                .await?
                .expect("seeded product");

            lines.push(OrderLine {
                product_id: product_id.clone(),
                quantity: 2 + (order_idx as i64 % 4),
                unit_price_cents: product.price_for(*tier).cents(),
            });
        }

        // Pay roughly half up front; the rest accrues as debt.
        let total: i64 = lines
            .iter()
            .map(|l| l.quantity * l.unit_price_cents)
            .sum();
        let order = db
            .orders()
            .create(NewOrder {
                customer_id: customer_id.clone(),
                lines,
                paid_cents: total / 2,
            })
            .await?;

        orders += 1;
        println!(
            "  Order {} for customer {}: total {}, paid {}",
            order.id, customer_id, order.total_price_cents, order.paid_cents
        );
    }

    println!();
    println!("✓ Placed {} orders", orders);
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic pseudo-random data.
fn generate_product(brand_id: &str, name: &str, seed: usize) -> NewProduct {
    // Base wholesale price 8.00 to 88.00 derived from the seed
    let wholesale = 800 + ((seed * 37) % 8000) as i64;
    let prices = TierPrices {
        retail_cents: wholesale + wholesale / 5,
        wholesale_cents: wholesale,
        superwholesale_cents: wholesale - wholesale / 10,
    };

    NewProduct {
        name: name.to_string(),
        brand_id: brand_id.to_string(),
        prices,
        stock: ((seed * 13) % 120) as i64,
        image_url: None,
        description: None,
    }
}
