//! stats-runner: headless runner for the customer statistics report.
//!
//! Usage:
//!   stats-runner                               seed an in-memory demo shop
//!   stats-runner --customer 2                  report another demo customer
//!   stats-runner --db shop.db --customer 17    report against an existing db

use anyhow::Result;
use chrono::{Duration, Utc};
use customer_stats_core::{
    normalize::STORED_DATETIME_FORMAT, statistics::CustomerStatistics, store::StatsStore,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let customer_id = parse_arg(&args, "--customer", 1i64);
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str());
    let base_url = args
        .windows(2)
        .find(|w| w[0] == "--base-url")
        .map(|w| w[1].as_str())
        .unwrap_or("https://admin.example.test");

    let store = match db {
        Some(path) => StatsStore::open(path)?,
        None => {
            let store = StatsStore::in_memory()?;
            store.migrate()?;
            seed_demo(&store)?;
            log::info!("seeded in-memory demo dataset");
            store
        }
    };

    let stats = CustomerStatistics::new(&store, customer_id, base_url);
    print_report(&stats);
    Ok(())
}

fn print_report(stats: &CustomerStatistics) {
    println!("=== CUSTOMER STATISTICS ===");
    println!("  customer: {}", stats.customer_name());
    println!("  edit:     {}", stats.customer_link());
    println!("  website:  {} [{}]", stats.website_name(), stats.website_currency());
    println!();

    let [name_header, value_header] = stats.table_headers();
    println!("  {name_header:<28}| {value_header}");
    println!("  {:-<28}+{:-<24}", "", "");
    for row in stats.table_rows() {
        println!("  {:<28}| {}", row.label, row.value);
    }
}

/// A small two-store shop with one active customer worth reporting on.
fn seed_demo(store: &StatsStore) -> Result<()> {
    let days_ago = |days: i64| (Utc::now() - Duration::days(days))
        .format(STORED_DATETIME_FORMAT)
        .to_string();

    store.insert_website(1, "Main Website", "USD")?;
    store.insert_store(1, 1, "Default Store")?;
    store.insert_store(2, 1, "Outlet Store")?;
    store.set_config("websites", 1, "general/locale/timezone", "America/New_York")?;

    store.insert_customer(1, 1, 1, "Jane", "Doe", Some("jane@example.test"), &days_ago(400))?;
    store.insert_customer(2, 1, 2, "John", "Roe", Some("john@example.test"), &days_ago(90))?;

    store.insert_customer_log(1, Some(&days_ago(2)), Some(&days_ago(1)))?;
    store.insert_visitor(1, &days_ago(1))?;

    let order = store.insert_order(
        1,
        1,
        129.99,
        Some("flatrate_flatrate"),
        Some("Flat Rate - Fixed"),
        &days_ago(30),
    )?;
    store.insert_payment(
        order,
        "checkmo",
        &serde_json::json!({ "method_title": "Check / Money order" }),
    )?;
    let order = store.insert_order(
        1,
        2,
        54.50,
        Some("flatrate_flatrate"),
        Some("Flat Rate - Fixed"),
        &days_ago(12),
    )?;
    store.insert_payment(
        order,
        "checkmo",
        &serde_json::json!({ "method_title": "Check / Money order" }),
    )?;
    let order = store.insert_order(
        1,
        1,
        310.00,
        Some("tablerate_bestway"),
        Some("Best Way - Table Rate"),
        &days_ago(5),
    )?;
    store.insert_payment(
        order,
        "paypal",
        &serde_json::json!({ "method_title": "PayPal Express Checkout" }),
    )?;

    store.insert_quote(1, 1, true, 3, &days_ago(3), &days_ago(2))?;

    let wishlist = store.insert_wishlist(1)?;
    store.insert_wishlist_item(wishlist, 101, &days_ago(20))?;
    store.insert_wishlist_item(wishlist, 205, &days_ago(8))?;

    store.insert_review(1, 1, "Solid product", &days_ago(25))?;
    store.insert_review(1, 1, "Would buy again", &days_ago(10))?;

    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
