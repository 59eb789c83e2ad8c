//! The public statistics facade.
//!
//! RULE: Every public method here is a containment boundary. Internal
//! failures are logged with the operation's name and become a safe default
//! (empty string, empty row set); callers always receive a well-formed,
//! possibly empty response. The presentation layer never sees an error.
//!
//! Customer identity, store scope and website info are resolved at most
//! once per facade instance and held for its lifetime. A facade instance is
//! request-scoped; nothing here is cached across requests.

use std::cell::OnceCell;

use crate::{
    error::StatsResult,
    merger,
    normalize::{self, DisplayRow},
    provider::{self, MetricProvider},
    store::{CustomerIdentity, StatsStore, StoreScope, WebsiteInfo},
    types::CustomerId,
};

/// Fixed header contract for the generic two-column grid renderer.
pub const TABLE_HEADERS: [&str; 2] = ["Statistic Name", "Statistic Value"];

pub struct CustomerStatistics<'a> {
    store: &'a StatsStore,
    customer_id: CustomerId,
    backend_base_url: String,
    providers: Vec<Box<dyn MetricProvider>>,
    customer: OnceCell<(CustomerIdentity, StoreScope)>,
    website: OnceCell<WebsiteInfo>,
}

impl<'a> CustomerStatistics<'a> {
    pub fn new(store: &'a StatsStore, customer_id: CustomerId, backend_base_url: &str) -> Self {
        Self::with_providers(store, customer_id, backend_base_url, provider::default_providers())
    }

    /// Build a facade over a reduced or custom provider set (tests).
    pub fn with_providers(
        store: &'a StatsStore,
        customer_id: CustomerId,
        backend_base_url: &str,
        providers: Vec<Box<dyn MetricProvider>>,
    ) -> Self {
        Self {
            store,
            customer_id,
            backend_base_url: backend_base_url.to_string(),
            providers,
            customer: OnceCell::new(),
            website: OnceCell::new(),
        }
    }

    pub fn table_headers(&self) -> [&'static str; 2] {
        TABLE_HEADERS
    }

    /// The full statistics table for this customer, in catalog order.
    /// Empty when the customer cannot be resolved in its store scope or
    /// when anything downstream fails.
    pub fn table_rows(&self) -> Vec<DisplayRow> {
        self.contained("table_rows", || {
            let (identity, scope) = self.customer()?;
            let record = match merger::merge(self.store, identity, scope, &self.providers)? {
                Some(record) => record,
                None => return Ok(Vec::new()),
            };
            let tz_name = self.store.configured_timezone(identity.website_id)?;
            let tz = normalize::parse_timezone(&tz_name);
            Ok(normalize::normalize(&record, tz))
        })
    }

    pub fn customer_name(&self) -> String {
        self.contained("customer_name", || {
            let (identity, _) = self.customer()?;
            Ok(format!("{} {}", identity.firstname, identity.lastname))
        })
    }

    /// Admin URL for editing this customer.
    pub fn customer_link(&self) -> String {
        let base = self.backend_base_url.trim_end_matches('/');
        format!("{base}/customer/index/edit/id/{}/", self.customer_id)
    }

    pub fn website_name(&self) -> String {
        self.contained("website_name", || Ok(self.website()?.name.clone()))
    }

    pub fn website_currency(&self) -> String {
        self.contained("website_currency", || {
            Ok(self.website()?.base_currency_code.clone())
        })
    }

    // ── Request-scoped resolution ──────────────────────────────────

    fn customer(&self) -> StatsResult<&(CustomerIdentity, StoreScope)> {
        if let Some(resolved) = self.customer.get() {
            return Ok(resolved);
        }
        let identity = self.store.resolve_customer(self.customer_id)?;
        let scope = self.store.resolve_scope(identity.website_id)?;
        Ok(self.customer.get_or_init(|| (identity, scope)))
    }

    fn website(&self) -> StatsResult<&WebsiteInfo> {
        if let Some(info) = self.website.get() {
            return Ok(info);
        }
        let (identity, _) = self.customer()?;
        let info = self.store.get_website(identity.website_id)?;
        Ok(self.website.get_or_init(|| info))
    }

    /// The log-and-default policy applied uniformly at every public
    /// boundary.
    fn contained<T: Default>(
        &self,
        operation: &'static str,
        f: impl FnOnce() -> StatsResult<T>,
    ) -> T {
        match f() {
            Ok(value) => value,
            Err(e) => {
                log::error!("{operation} failed for customer {}: {e}", self.customer_id);
                T::default()
            }
        }
    }
}
