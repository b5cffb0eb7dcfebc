//! # Seed Data Generator
//!
//! Populates a diary database with sample data for development.
//!
//! ## Usage
//! ```bash
//! # Six months of history (default)
//! cargo run -p diary-db --bin seed
//!
//! # Longer history
//! cargo run -p diary-db --bin seed -- --months 12
//!
//! # Specify database path
//! cargo run -p diary-db --bin seed -- --db ./data/diary.db
//! ```
//!
//! ## Generated Data
//! - A small catalog of items, some sharing a name under different units
//! - A handful of suppliers
//! - Monthly purchase records for each item
//! - Monthly orders, older ones DELIVERED and recent ones still ORDERED

use chrono::{Duration, Local, Months, NaiveDate};
use diary_core::{
    delivery::status_for_delivery, order_number::format_order_number, Money, NewItem, NewSold,
    NewStock, NewSupplier, COST_OVERHEAD_FACTOR,
};
use diary_db::{Database, DbConfig};
use std::env;

/// (name, unit, unit cost in cents, critical level)
const CATALOG: &[(&str, &str, i64, i64)] = &[
    ("Rice", "kg", 5_200, 20),
    ("Rice", "sack", 240_000, 2),
    ("Sugar", "kg", 7_800, 10),
    ("Flour", "kg", 4_500, 10),
    ("Eggs", "tray", 21_000, 5),
    ("Cooking Oil", "liter", 11_500, 8),
    ("Salt", "pack", 1_800, 5),
    ("Coffee", "jar", 16_000, 4),
];

const SUPPLIERS: &[(&str, &str)] = &[
    ("Golden Harvest Trading", "12 Market St."),
    ("Northside Wholesale", "88 Harbor Rd."),
    ("Valley Farms", "Km 4 Provincial Hwy."),
];

const CUSTOMERS: &[&str] = &["Ana Reyes", "Ben Cruz", "Carla Santos", "Dan Lim", "Ella Tan"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut months: u32 = 6;
    let mut db_path = String::from("./diary_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--months" | "-m" => {
                if i + 1 < args.len() {
                    months = args[i + 1].parse().unwrap_or(6);
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
                println!("Mobile Diary Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -m, --months <N>   Months of history to generate (default: 6)");
                println!("  -d, --db <PATH>    Database file path (default: ./diary_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Mobile Diary Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!("Months:   {}", months);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.items().get_all().await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let today = Local::now().date_naive();
    let start = today - Months::new(months);
    let mut uow = db.begin().await?;

    let mut supplier_ids = Vec::new();
    for (name, address) in SUPPLIERS {
        let id = uow
            .suppliers()
            .add(&NewSupplier {
                full_name: name.to_string(),
                address: Some(address.to_string()),
                ..Default::default()
            })
            .await?;
        supplier_ids.push(id);
    }

    let mut item_ids = Vec::new();
    for (name, unit, _, critical) in CATALOG {
        let id = uow
            .items()
            .add(&NewItem {
                name: name.to_string(),
                unit_of_measurement: unit.to_string(),
                quantity: 0,
                critical: *critical,
            })
            .await?;
        item_ids.push(id);
    }

    // One purchase per item per month, 40 units each.
    let mut receipt = 1;
    for month in 0..=months {
        let on = start + Months::new(month);
        for (idx, (_, _, cost, _)) in CATALOG.iter().enumerate() {
            let stock = NewStock {
                item_id: item_ids[idx],
                supplier_id: supplier_ids[idx % supplier_ids.len()],
                receipt_no: format!("RCPT-{:05}", receipt),
                quantity: 40,
                price_per_unit_cents: cost + (month as i64 * 50),
                date_ordered: on,
            };
            uow.stocks().add(&stock).await?;
            uow.items().restock(item_ids[idx], stock.quantity).await?;
            receipt += 1;
        }
    }
    println!("✓ Recorded {} purchases", receipt - 1);

    // Four orders a month; the last month's deliveries land in the future.
    let mut sequence = 1;
    for month in 0..=months {
        for n in 0..4u32 {
            let ordered = start + Months::new(month) + Duration::days(i64::from(n) * 6);
            if ordered > today {
                break;
            }
            let lines = order_lines(sequence, ordered, today, &item_ids);
            for line in &lines {
                uow.items().deduct(line.item_id, line.quantity).await?;
            }
            uow.solds().add_range(&lines).await?;
            sequence += 1;
        }
    }
    println!("✓ Recorded {} orders", sequence - 1);

    let affected = uow.complete().await?;
    println!();
    println!("✓ Seed complete! ({} rows written)", affected);

    Ok(())
}

/// Two lines per order, picked round-robin from the catalog.
fn order_lines(sequence: u64, ordered: NaiveDate, today: NaiveDate, item_ids: &[i64]) -> Vec<NewSold> {
    let order_no = format_order_number(sequence);
    let customer = CUSTOMERS[sequence as usize % CUSTOMERS.len()];
    let delivered = ordered + Duration::days(3);

    (0..2)
        .map(|offset| {
            let idx = (sequence as usize * 3 + offset) % CATALOG.len();
            let (_, _, cost, _) = CATALOG[idx];
            let quantity = 1 + (sequence as i64 + offset as i64) % 3;

            let unit_cost = Money::from_cents(cost);
            let price = Money::from_cents((cost as f64 * COST_OVERHEAD_FACTOR * 1.15).round() as i64);
            let total = price * quantity;
            let profit = (price - unit_cost) * quantity;

            NewSold {
                item_id: item_ids[idx],
                order_no: order_no.clone(),
                customer_name: customer.to_string(),
                date_ordered: ordered,
                date_delivered: delivered,
                quantity,
                total_price_cents: total.cents(),
                profit_cents: profit.cents(),
                status: status_for_delivery(delivered, today),
            }
        })
        .collect()
}
