//! The fixed, ordered catalog of statistic columns.
//!
//! RULE: Column names are unique and stable. They serve as both the SQL
//! aliases of the composite query and the keys of the display rows, and the
//! catalog order here is the display order.

/// How a column's raw value is interpreted when formatting for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Stored UTC datetime, converted to the report timezone for display.
    Timestamp,
    /// Monetary amount, rounded to 2 decimal places.
    Money,
    /// Non-negative integer count.
    Count,
    /// Plain text, passed through.
    Text,
    /// Any truthy value renders a fixed affirmative label.
    BooleanFlag,
    /// JSON-encoded metadata; a named sub-field is extracted for display.
    EncodedJson,
}

/// One named, typed statistic column.
#[derive(Debug, Clone, Copy)]
pub struct MetricColumn {
    pub name: &'static str,
    pub kind: ValueKind,
}

/// The full column set, in display order.
pub static CATALOG: [MetricColumn; 18] = [
    MetricColumn { name: "last_login_at",              kind: ValueKind::Timestamp },
    MetricColumn { name: "last_logout_at",             kind: ValueKind::Timestamp },
    MetricColumn { name: "last_visit_at",              kind: ValueKind::Timestamp },
    MetricColumn { name: "last_ordered_at",            kind: ValueKind::Timestamp },
    MetricColumn { name: "last_order_amount",          kind: ValueKind::Money },
    MetricColumn { name: "total_orders",               kind: ValueKind::Count },
    MetricColumn { name: "total_orders_amount",        kind: ValueKind::Money },
    MetricColumn { name: "average_orders_amount",      kind: ValueKind::Money },
    MetricColumn { name: "most_used_payment_method",   kind: ValueKind::EncodedJson },
    MetricColumn { name: "most_used_shipping_method",  kind: ValueKind::Text },
    MetricColumn { name: "active_shopping_cart_flag",  kind: ValueKind::BooleanFlag },
    MetricColumn { name: "shopping_cart_created_at",   kind: ValueKind::Timestamp },
    MetricColumn { name: "shopping_cart_modified_at",  kind: ValueKind::Timestamp },
    MetricColumn { name: "products_in_shopping_cart",  kind: ValueKind::Count },
    MetricColumn { name: "last_product_wished_at",     kind: ValueKind::Timestamp },
    MetricColumn { name: "total_products_in_wishlist", kind: ValueKind::Count },
    MetricColumn { name: "last_product_reviewed_at",   kind: ValueKind::Timestamp },
    MetricColumn { name: "total_products_reviewed",    kind: ValueKind::Count },
];

/// Look up a catalog column by name.
pub fn column(name: &str) -> Option<&'static MetricColumn> {
    CATALOG.iter().find(|c| c.name == name)
}
