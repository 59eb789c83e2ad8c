//! Shared primitive types used across the reporting core.

/// A customer's unique numeric identifier.
pub type CustomerId = i64;

/// A website identifier. One website owns a set of stores.
pub type WebsiteId = i64;

/// A store identifier within a website.
pub type StoreId = i64;
