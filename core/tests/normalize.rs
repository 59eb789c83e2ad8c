//! Value normalizer tests: rounding, labels, timezone conversion, tolerant
//! payment-metadata decoding, and display order.

use customer_stats_core::{
    catalog::CATALOG,
    normalize::{column_label, parse_timezone, round2, DisplayRow},
    statistics::CustomerStatistics,
    store::StatsStore,
};

fn shop() -> StatsStore {
    let store = StatsStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.insert_website(1, "Main Website", "USD").unwrap();
    store.insert_store(1, 1, "Default Store").unwrap();
    store
        .insert_customer(1, 1, 1, "Jane", "Doe", Some("jane@example.test"), "2024-01-01 00:00:00")
        .unwrap();
    store
}

fn value_of<'a>(rows: &'a [DisplayRow], label: &str) -> &'a str {
    &rows
        .iter()
        .find(|row| row.label == label)
        .unwrap_or_else(|| panic!("no row labelled '{label}'"))
        .value
}

#[test]
fn rounds_to_two_decimal_places() {
    assert_eq!(round2(150.005), 150.01);
    assert_eq!(round2(75.0025), 75.0);
    assert_eq!(round2(129.999), 130.0);
    assert_eq!(round2(10.0), 10.0);
}

#[test]
fn labels_are_title_cased_words() {
    assert_eq!(column_label("last_login_at"), "Last Login At");
    assert_eq!(column_label("total_orders"), "Total Orders");
    assert_eq!(
        column_label("active_shopping_cart_flag"),
        "Active Shopping Cart Flag"
    );
}

#[test]
fn parses_timezones_with_utc_fallback() {
    assert_eq!(parse_timezone("America/New_York"), chrono_tz::America::New_York);
    assert_eq!(parse_timezone("not/a-zone"), chrono_tz::Tz::UTC);
}

#[test]
fn money_rows_render_rounded_and_counts_render_plain() {
    let store = shop();
    store
        .insert_order(1, 1, 100.00, None, None, "2024-03-01 10:00:00")
        .unwrap();
    store
        .insert_order(1, 1, 50.005, None, None, "2024-03-05 10:00:00")
        .unwrap();

    let stats = CustomerStatistics::new(&store, 1, "https://admin.example.test");
    let rows = stats.table_rows();

    assert_eq!(value_of(&rows, "Total Orders"), "2");
    assert_eq!(value_of(&rows, "Total Orders Amount"), "150.01");
    assert_eq!(value_of(&rows, "Average Orders Amount"), "75");
    assert_eq!(value_of(&rows, "Last Order Amount"), "50.01");
}

#[test]
fn timestamps_convert_to_the_configured_website_timezone() {
    let store = shop();
    store
        .set_config("websites", 1, "general/locale/timezone", "America/New_York")
        .unwrap();
    // 20:04:05 UTC on Jan 5 is 3:04:05 PM Eastern (UTC-5 in winter).
    store
        .insert_customer_log(1, Some("2024-01-05 20:04:05"), None)
        .unwrap();

    let stats = CustomerStatistics::new(&store, 1, "https://admin.example.test");
    let rows = stats.table_rows();
    assert_eq!(value_of(&rows, "Last Login At"), "Jan 5, 2024, 3:04:05 PM");
}

#[test]
fn unknown_configured_timezone_falls_back_to_utc() {
    let store = shop();
    store
        .set_config("websites", 1, "general/locale/timezone", "Mars/Olympus_Mons")
        .unwrap();
    store
        .insert_customer_log(1, Some("2024-01-05 20:04:05"), None)
        .unwrap();

    let stats = CustomerStatistics::new(&store, 1, "https://admin.example.test");
    let rows = stats.table_rows();
    assert_eq!(value_of(&rows, "Last Login At"), "Jan 5, 2024, 8:04:05 PM");
}

#[test]
fn payment_metadata_decodes_to_method_title() {
    let store = shop();
    let order = store
        .insert_order(1, 1, 10.0, None, None, "2024-04-01 09:00:00")
        .unwrap();
    store
        .insert_payment(
            order,
            "checkmo",
            &serde_json::json!({ "method_title": "Check / Money order", "extra": 1 }),
        )
        .unwrap();

    let stats = CustomerStatistics::new(&store, 1, "https://admin.example.test");
    let rows = stats.table_rows();
    assert_eq!(value_of(&rows, "Most Used Payment Method"), "Check / Money order");
}

#[test]
fn malformed_payment_metadata_renders_empty_without_failing() {
    let store = shop();
    let order = store
        .insert_order(1, 1, 10.0, None, None, "2024-04-01 09:00:00")
        .unwrap();
    store
        .insert_payment_raw(order, "checkmo", "{not valid json")
        .unwrap();

    let stats = CustomerStatistics::new(&store, 1, "https://admin.example.test");
    let rows = stats.table_rows();
    assert_eq!(value_of(&rows, "Most Used Payment Method"), "");
    // The rest of the report is unaffected.
    assert_eq!(value_of(&rows, "Total Orders"), "1");
}

#[test]
fn payment_metadata_without_title_renders_empty() {
    let store = shop();
    let order = store
        .insert_order(1, 1, 10.0, None, None, "2024-04-01 09:00:00")
        .unwrap();
    store
        .insert_payment(order, "checkmo", &serde_json::json!({ "cc_type": "VI" }))
        .unwrap();

    let stats = CustomerStatistics::new(&store, 1, "https://admin.example.test");
    let rows = stats.table_rows();
    assert_eq!(value_of(&rows, "Most Used Payment Method"), "");
}

#[test]
fn active_cart_flag_renders_fixed_label_or_empty() {
    let store = shop();
    let stats = CustomerStatistics::new(&store, 1, "https://admin.example.test");
    assert_eq!(value_of(&stats.table_rows(), "Active Shopping Cart Flag"), "");

    store
        .insert_quote(1, 1, true, 3, "2024-06-01 09:00:00", "2024-06-02 10:00:00")
        .unwrap();
    let stats = CustomerStatistics::new(&store, 1, "https://admin.example.test");
    let rows = stats.table_rows();
    assert_eq!(value_of(&rows, "Active Shopping Cart Flag"), "Yes");
    assert_eq!(value_of(&rows, "Products In Shopping Cart"), "3");
}

#[test]
fn rows_follow_catalog_order_exactly() {
    let store = shop();
    let stats = CustomerStatistics::new(&store, 1, "https://admin.example.test");
    let rows = stats.table_rows();

    let expected: Vec<String> = CATALOG.iter().map(|col| column_label(col.name)).collect();
    let actual: Vec<String> = rows.iter().map(|row| row.label.clone()).collect();
    assert_eq!(actual, expected);
}
