//! Customer statistics aggregation for storefront admin reporting.
//!
//! Given a customer id, resolve the customer and its store scope, fan out
//! over the per-domain metric providers (sessions, orders, payment and
//! shipping preferences, active cart, wishlist, reviews), merge everything
//! into one composite record with a single correlated query, and format the
//! result into display-ready label/value rows.

pub mod catalog;
pub mod error;
pub mod merger;
pub mod normalize;
pub mod provider;
pub mod statistics;
pub mod store;
pub mod types;
