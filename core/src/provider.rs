//! Per-domain metric providers.
//!
//! RULE: Every provider implements MetricProvider and declares correlated
//! scalar sub-queries only: each sub-query yields at most one value for the
//! customer row it is attached to (alias `c` in the composite query). The
//! merger attaches them as columns; providers never execute SQL themselves.
//!
//! Orders, carts and reviews carry a store id and are filtered by the store
//! scope. Session logs and wishlists have no store dimension.

use crate::store::StoreScope;

/// One column contributed by a provider: a catalog column name plus the
/// correlated sub-select that computes it.
pub struct ProviderColumn {
    pub name: &'static str,
    pub select_sql: String,
}

/// The contract every per-domain provider fulfills.
pub trait MetricProvider {
    /// Unique stable name, used in logs when a provider is skipped.
    fn name(&self) -> &'static str;

    /// The columns this provider contributes for the given store scope.
    fn columns(&self, scope: &StoreScope) -> Vec<ProviderColumn>;
}

/// All providers, in catalog order. The merger consumes this set; tests may
/// build reduced sets.
pub fn default_providers() -> Vec<Box<dyn MetricProvider>> {
    vec![
        Box::new(SessionProvider),
        Box::new(OrdersProvider),
        Box::new(PaymentPreferenceProvider),
        Box::new(ShippingPreferenceProvider),
        Box::new(ActiveCartProvider),
        Box::new(WishlistProvider),
        Box::new(ReviewsProvider),
    ]
}

// ── Session / auth ────────────────────────────────────────────────

/// Latest login, logout and visit timestamps. Recency is the descending
/// primary key of the log tables: the last row written wins.
pub struct SessionProvider;

impl MetricProvider for SessionProvider {
    fn name(&self) -> &'static str {
        "session"
    }

    fn columns(&self, _scope: &StoreScope) -> Vec<ProviderColumn> {
        vec![
            ProviderColumn {
                name: "last_login_at",
                select_sql: "(SELECT last_login_at FROM customer_log
                              WHERE customer_id = c.entity_id
                              ORDER BY log_id DESC LIMIT 1)"
                    .to_string(),
            },
            ProviderColumn {
                name: "last_logout_at",
                select_sql: "(SELECT last_logout_at FROM customer_log
                              WHERE customer_id = c.entity_id
                              ORDER BY log_id DESC LIMIT 1)"
                    .to_string(),
            },
            ProviderColumn {
                name: "last_visit_at",
                select_sql: "(SELECT last_visit_at FROM customer_visitor
                              WHERE customer_id = c.entity_id
                              ORDER BY visitor_id DESC LIMIT 1)"
                    .to_string(),
            },
        ]
    }
}

// ── Orders ────────────────────────────────────────────────────────

/// Order history metrics. Latest-by-creation-time for the most recent
/// order, COUNT/SUM/AVG over all scoped orders. SUM and AVG are NULL, not
/// zero, when the customer has never ordered.
pub struct OrdersProvider;

impl MetricProvider for OrdersProvider {
    fn name(&self) -> &'static str {
        "orders"
    }

    fn columns(&self, scope: &StoreScope) -> Vec<ProviderColumn> {
        let stores = scope.sql_list();
        vec![
            ProviderColumn {
                name: "last_ordered_at",
                select_sql: format!(
                    "(SELECT created_at FROM sales_order
                      WHERE customer_id = c.entity_id AND store_id IN {stores}
                      ORDER BY created_at DESC LIMIT 1)"
                ),
            },
            ProviderColumn {
                name: "last_order_amount",
                select_sql: format!(
                    "(SELECT grand_total FROM sales_order
                      WHERE customer_id = c.entity_id AND store_id IN {stores}
                      ORDER BY created_at DESC LIMIT 1)"
                ),
            },
            ProviderColumn {
                name: "total_orders",
                select_sql: format!(
                    "(SELECT COUNT(*) FROM sales_order
                      WHERE customer_id = c.entity_id AND store_id IN {stores})"
                ),
            },
            ProviderColumn {
                name: "total_orders_amount",
                select_sql: format!(
                    "(SELECT SUM(grand_total) FROM sales_order
                      WHERE customer_id = c.entity_id AND store_id IN {stores})"
                ),
            },
            ProviderColumn {
                name: "average_orders_amount",
                select_sql: format!(
                    "(SELECT AVG(grand_total) FROM sales_order
                      WHERE customer_id = c.entity_id AND store_id IN {stores})"
                ),
            },
        ]
    }
}

// ── Payment preference ────────────────────────────────────────────

/// The most frequently used payment method across the customer's scoped
/// orders. The value is the payment row's encoded gateway metadata; the
/// normalizer extracts the human-readable title. Frequency ties break on
/// method code ascending so the result is deterministic.
pub struct PaymentPreferenceProvider;

impl MetricProvider for PaymentPreferenceProvider {
    fn name(&self) -> &'static str {
        "payment_preference"
    }

    fn columns(&self, scope: &StoreScope) -> Vec<ProviderColumn> {
        let stores = scope.sql_list();
        vec![ProviderColumn {
            name: "most_used_payment_method",
            select_sql: format!(
                "(SELECT p.additional_information
                  FROM sales_order o
                  JOIN sales_order_payment p ON p.parent_id = o.entity_id
                  WHERE o.customer_id = c.entity_id AND o.store_id IN {stores}
                  GROUP BY p.method
                  ORDER BY COUNT(*) DESC, p.method ASC
                  LIMIT 1)"
            ),
        }]
    }
}

// ── Shipping preference ───────────────────────────────────────────

/// The most frequently used shipping method; the value is its
/// human-readable description. Same tie-break as the payment preference.
pub struct ShippingPreferenceProvider;

impl MetricProvider for ShippingPreferenceProvider {
    fn name(&self) -> &'static str {
        "shipping_preference"
    }

    fn columns(&self, scope: &StoreScope) -> Vec<ProviderColumn> {
        let stores = scope.sql_list();
        vec![ProviderColumn {
            name: "most_used_shipping_method",
            select_sql: format!(
                "(SELECT shipping_description FROM sales_order
                  WHERE customer_id = c.entity_id AND store_id IN {stores}
                        AND shipping_method IS NOT NULL
                  GROUP BY shipping_method
                  ORDER BY COUNT(*) DESC, shipping_method ASC
                  LIMIT 1)"
            ),
        }]
    }
}

// ── Active cart ───────────────────────────────────────────────────

/// The customer's single currently-active cart. At most one active cart is
/// assumed per customer; if the upstream invariant is violated, any one row
/// satisfies these sub-queries.
pub struct ActiveCartProvider;

impl MetricProvider for ActiveCartProvider {
    fn name(&self) -> &'static str {
        "active_cart"
    }

    fn columns(&self, scope: &StoreScope) -> Vec<ProviderColumn> {
        let stores = scope.sql_list();
        let cart_column = |column: &str| {
            format!(
                "(SELECT {column} FROM quote
                  WHERE customer_id = c.entity_id AND is_active = 1
                        AND store_id IN {stores}
                  LIMIT 1)"
            )
        };
        vec![
            ProviderColumn {
                name: "active_shopping_cart_flag",
                select_sql: cart_column("is_active"),
            },
            ProviderColumn {
                name: "shopping_cart_created_at",
                select_sql: cart_column("created_at"),
            },
            ProviderColumn {
                name: "shopping_cart_modified_at",
                select_sql: cart_column("updated_at"),
            },
            ProviderColumn {
                name: "products_in_shopping_cart",
                select_sql: cart_column("items_count"),
            },
        ]
    }
}

// ── Wishlist ──────────────────────────────────────────────────────

/// Latest wishlist-item add time and the item count across all the
/// customer's wishlists. Counting items (not joined rows) keeps an
/// item-less wishlist at zero.
pub struct WishlistProvider;

impl MetricProvider for WishlistProvider {
    fn name(&self) -> &'static str {
        "wishlist"
    }

    fn columns(&self, _scope: &StoreScope) -> Vec<ProviderColumn> {
        vec![
            ProviderColumn {
                name: "last_product_wished_at",
                select_sql: "(SELECT wi.added_at
                              FROM wishlist w
                              JOIN wishlist_item wi ON wi.wishlist_id = w.wishlist_id
                              WHERE w.customer_id = c.entity_id
                              ORDER BY wi.added_at DESC LIMIT 1)"
                    .to_string(),
            },
            ProviderColumn {
                name: "total_products_in_wishlist",
                select_sql: "(SELECT COUNT(wi.wishlist_item_id)
                              FROM wishlist w
                              LEFT JOIN wishlist_item wi ON wi.wishlist_id = w.wishlist_id
                              WHERE w.customer_id = c.entity_id)"
                    .to_string(),
            },
        ]
    }
}

// ── Reviews ───────────────────────────────────────────────────────

/// Latest review time and count of reviews authored by the customer in the
/// scoped stores.
pub struct ReviewsProvider;

impl MetricProvider for ReviewsProvider {
    fn name(&self) -> &'static str {
        "reviews"
    }

    fn columns(&self, scope: &StoreScope) -> Vec<ProviderColumn> {
        let stores = scope.sql_list();
        vec![
            ProviderColumn {
                name: "last_product_reviewed_at",
                select_sql: format!(
                    "(SELECT r.created_at
                      FROM review r
                      JOIN review_detail rd ON rd.review_id = r.review_id
                      WHERE rd.customer_id = c.entity_id AND rd.store_id IN {stores}
                      ORDER BY r.created_at DESC LIMIT 1)"
                ),
            },
            ProviderColumn {
                name: "total_products_reviewed",
                select_sql: format!(
                    "(SELECT COUNT(*) FROM review_detail
                      WHERE customer_id = c.entity_id AND store_id IN {stores})"
                ),
            },
        ]
    }
}
