//! Facade tests: containment boundaries, idempotence, provider-outage
//! degradation, and the convenience accessors.

use customer_stats_core::{
    catalog::CATALOG,
    normalize::DisplayRow,
    statistics::{CustomerStatistics, TABLE_HEADERS},
    store::StatsStore,
};

const BASE_URL: &str = "https://admin.example.test";

fn shop() -> StatsStore {
    let store = StatsStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.insert_website(1, "Main Website", "USD").unwrap();
    store.insert_store(1, 1, "Default Store").unwrap();
    store.insert_store(2, 1, "Outlet Store").unwrap();
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
fn headers_are_the_fixed_two_column_contract() {
    let store = shop();
    let stats = CustomerStatistics::new(&store, 1, BASE_URL);
    assert_eq!(stats.table_headers(), ["Statistic Name", "Statistic Value"]);
    assert_eq!(stats.table_headers(), TABLE_HEADERS);
}

#[test]
fn customer_with_no_activity_gets_a_row_per_column_all_empty() {
    let store = shop();
    let stats = CustomerStatistics::new(&store, 1, BASE_URL);
    let rows = stats.table_rows();

    assert_eq!(rows.len(), CATALOG.len());
    for row in &rows {
        assert_eq!(row.value, "", "expected empty value for '{}'", row.label);
    }
}

#[test]
fn missing_customer_yields_empty_rows_without_erroring() {
    let store = shop();
    let stats = CustomerStatistics::new(&store, 404, BASE_URL);
    assert!(stats.table_rows().is_empty());
    assert_eq!(stats.customer_name(), "");
    assert_eq!(stats.website_name(), "");
    assert_eq!(stats.website_currency(), "");
}

#[test]
fn repeated_calls_return_identical_rows() {
    let store = shop();
    store
        .insert_order(1, 1, 42.0, Some("flatrate_flatrate"), Some("Flat Rate - Fixed"), "2024-02-01 09:00:00")
        .unwrap();
    store
        .insert_customer_log(1, Some("2024-02-02 08:00:00"), None)
        .unwrap();

    let stats = CustomerStatistics::new(&store, 1, BASE_URL);
    let first = stats.table_rows();
    let second = stats.table_rows();
    assert_eq!(first, second);

    // A fresh facade over the same data agrees too.
    let again = CustomerStatistics::new(&store, 1, BASE_URL).table_rows();
    assert_eq!(first, again);
}

#[test]
fn unavailable_provider_degrades_only_its_own_columns() {
    let store = shop();
    store
        .insert_order(1, 1, 42.0, None, None, "2024-02-01 09:00:00")
        .unwrap();
    store
        .insert_review(1, 1, "Solid product", "2024-02-05 09:00:00")
        .unwrap();

    // Take the review tables out from under the report.
    store.drop_table("review_detail").unwrap();

    let stats = CustomerStatistics::new(&store, 1, BASE_URL);
    let rows = stats.table_rows();

    assert_eq!(rows.len(), CATALOG.len(), "degraded report must keep its shape");
    assert_eq!(value_of(&rows, "Total Products Reviewed"), "");
    assert_eq!(value_of(&rows, "Last Product Reviewed At"), "");
    assert_eq!(value_of(&rows, "Total Orders"), "1", "order metrics must survive");
}

#[test]
fn accessors_resolve_identity_and_website() {
    let store = shop();
    let stats = CustomerStatistics::new(&store, 1, BASE_URL);

    assert_eq!(stats.customer_name(), "Jane Doe");
    assert_eq!(stats.website_name(), "Main Website");
    assert_eq!(stats.website_currency(), "USD");
    assert_eq!(
        stats.customer_link(),
        "https://admin.example.test/customer/index/edit/id/1/"
    );
}

#[test]
fn customer_on_storeless_website_is_contained_to_empty() {
    let store = shop();
    store.insert_website(2, "Ghost Website", "EUR").unwrap();
    // Data inconsistency upstream: the customer points at a website with no
    // stores. The facade contains the scope failure.
    store
        .insert_customer(5, 2, 1, "No", "Scope", None, "2024-01-01 00:00:00")
        .unwrap();

    let stats = CustomerStatistics::new(&store, 5, BASE_URL);
    assert!(stats.table_rows().is_empty());
    assert_eq!(stats.customer_name(), "");
}

#[test]
fn full_report_for_an_active_customer() {
    let store = shop();
    store
        .set_config("websites", 1, "general/locale/timezone", "America/New_York")
        .unwrap();
    store
        .insert_customer_log(1, Some("2024-01-05 20:04:05"), Some("2024-01-05 21:00:00"))
        .unwrap();
    store.insert_visitor(1, "2024-01-06 10:00:00").unwrap();

    let order = store
        .insert_order(
            1,
            1,
            100.00,
            Some("flatrate_flatrate"),
            Some("Flat Rate - Fixed"),
            "2024-03-01 10:00:00",
        )
        .unwrap();
    store
        .insert_payment(order, "checkmo", &serde_json::json!({ "method_title": "Check / Money order" }))
        .unwrap();
    let order = store
        .insert_order(
            1,
            2,
            50.005,
            Some("flatrate_flatrate"),
            Some("Flat Rate - Fixed"),
            "2024-03-05 10:00:00",
        )
        .unwrap();
    store
        .insert_payment(order, "checkmo", &serde_json::json!({ "method_title": "Check / Money order" }))
        .unwrap();

    store
        .insert_quote(1, 1, true, 3, "2024-06-01 09:00:00", "2024-06-02 10:00:00")
        .unwrap();
    let wishlist = store.insert_wishlist(1).unwrap();
    store
        .insert_wishlist_item(wishlist, 101, "2024-05-01 09:00:00")
        .unwrap();
    store
        .insert_review(1, 1, "Solid product", "2024-02-05 09:00:00")
        .unwrap();

    let stats = CustomerStatistics::new(&store, 1, BASE_URL);
    let rows = stats.table_rows();

    assert_eq!(value_of(&rows, "Last Login At"), "Jan 5, 2024, 3:04:05 PM");
    assert_eq!(value_of(&rows, "Total Orders"), "2");
    assert_eq!(value_of(&rows, "Total Orders Amount"), "150.01");
    assert_eq!(value_of(&rows, "Average Orders Amount"), "75");
    assert_eq!(value_of(&rows, "Most Used Payment Method"), "Check / Money order");
    assert_eq!(value_of(&rows, "Most Used Shipping Method"), "Flat Rate - Fixed");
    assert_eq!(value_of(&rows, "Active Shopping Cart Flag"), "Yes");
    assert_eq!(value_of(&rows, "Products In Shopping Cart"), "3");
    assert_eq!(value_of(&rows, "Total Products In Wishlist"), "1");
    assert_eq!(value_of(&rows, "Total Products Reviewed"), "1");
}
