//! SQLite access layer.
//!
//! RULE: Only the store talks to the database. The merger, normalizer and
//! facade call store methods and never execute SQL of their own, with the
//! one exception of the composite statistics query, which the merger builds
//! and hands to [`StatsStore::query_composite_row`].
//!
//! The storefront tables (customers, orders, carts, wishlists, reviews) are
//! owned by the surrounding platform; the reporting path only reads them.
//! The insert methods in `sales` and `activity` exist for tests and the demo
//! runner.

mod activity;
mod sales;

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::{
    error::{StatsError, StatsResult},
    types::{CustomerId, StoreId, WebsiteId},
};

/// A resolved customer identity. Read once per report and held for the
/// duration of the request.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerIdentity {
    pub entity_id: CustomerId,
    pub website_id: WebsiteId,
    pub store_id: StoreId,
    pub firstname: String,
    pub lastname: String,
    pub email: Option<String>,
}

/// Website display info consumed by the report header.
#[derive(Debug, Clone, Serialize)]
pub struct WebsiteInfo {
    pub website_id: WebsiteId,
    pub name: String,
    pub base_currency_code: String,
}

/// The set of store ids visible to one customer's website. Restricts which
/// order/cart/review rows the aggregation may see.
#[derive(Debug, Clone)]
pub struct StoreScope {
    pub website_id: WebsiteId,
    store_ids: Vec<StoreId>,
}

impl StoreScope {
    pub fn new(website_id: WebsiteId, mut store_ids: Vec<StoreId>) -> Self {
        store_ids.sort_unstable();
        store_ids.dedup();
        Self {
            website_id,
            store_ids,
        }
    }

    pub fn store_ids(&self) -> &[StoreId] {
        &self.store_ids
    }

    /// Render the scope as a SQL `IN` list: `(1, 2, 3)`.
    /// Store ids are numeric, never user-supplied text.
    pub fn sql_list(&self) -> String {
        if self.store_ids.is_empty() {
            // Matches nothing; resolve_scope never returns an empty scope,
            // this covers hand-built scopes in tests.
            return "(NULL)".to_string();
        }
        let ids: Vec<String> = self.store_ids.iter().map(|id| id.to_string()).collect();
        format!("({})", ids.join(", "))
    }
}

pub struct StatsStore {
    conn: Connection,
}

impl StatsStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> StatsResult<Self> {
        let conn = Connection::open(path)?;
        // Bounded lock wait so a report query never blocks past the
        // surrounding request.
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests and the demo runner).
    pub fn in_memory() -> StatsResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> StatsResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_storefront.sql"))?;
        self.conn
            .execute_batch(include_str!("../../migrations/002_sales.sql"))?;
        self.conn
            .execute_batch(include_str!("../../migrations/003_activity.sql"))?;
        Ok(())
    }

    // ── Customer locator ───────────────────────────────────────────

    /// Resolve a customer id to exactly one identity record.
    /// Non-positive ids are invalid and never reach the database.
    pub fn resolve_customer(&self, customer_id: CustomerId) -> StatsResult<CustomerIdentity> {
        if customer_id <= 0 {
            return Err(StatsError::CustomerNotFound(customer_id));
        }
        let row = self
            .conn
            .query_row(
                "SELECT entity_id, website_id, store_id, firstname, lastname, email
                 FROM customer_entity WHERE entity_id = ?1",
                params![customer_id],
                |row| {
                    Ok(CustomerIdentity {
                        entity_id: row.get(0)?,
                        website_id: row.get(1)?,
                        store_id: row.get(2)?,
                        firstname: row.get(3)?,
                        lastname: row.get(4)?,
                        email: row.get(5)?,
                    })
                },
            )
            .optional()?;
        row.ok_or(StatsError::CustomerNotFound(customer_id))
    }

    /// Resolve a website to its store scope. A website with zero stores
    /// cannot scope any statistics.
    pub fn resolve_scope(&self, website_id: WebsiteId) -> StatsResult<StoreScope> {
        let mut stmt = self
            .conn
            .prepare("SELECT store_id FROM store WHERE website_id = ?1 ORDER BY store_id ASC")?;
        let ids: Vec<StoreId> = stmt
            .query_map(params![website_id], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        if ids.is_empty() {
            return Err(StatsError::ScopeResolution(website_id));
        }
        Ok(StoreScope::new(website_id, ids))
    }

    pub fn get_website(&self, website_id: WebsiteId) -> StatsResult<WebsiteInfo> {
        let row = self
            .conn
            .query_row(
                "SELECT website_id, name, base_currency_code
                 FROM store_website WHERE website_id = ?1",
                params![website_id],
                |row| {
                    Ok(WebsiteInfo {
                        website_id: row.get(0)?,
                        name: row.get(1)?,
                        base_currency_code: row.get(2)?,
                    })
                },
            )
            .optional()?;
        row.ok_or(StatsError::ScopeResolution(website_id))
    }

    // ── Scoped configuration ───────────────────────────────────────

    /// Read a config value with website → default scope fallback.
    pub fn config_value(&self, website_id: WebsiteId, path: &str) -> StatsResult<Option<String>> {
        let website_value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM core_config_data
                 WHERE scope = 'websites' AND scope_id = ?1 AND path = ?2",
                params![website_id, path],
                |row| row.get(0),
            )
            .optional()?;
        if website_value.is_some() {
            return Ok(website_value);
        }
        let default_value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM core_config_data
                 WHERE scope = 'default' AND scope_id = 0 AND path = ?1",
                params![path],
                |row| row.get(0),
            )
            .optional()?;
        Ok(default_value)
    }

    /// The display timezone configured for a website, falling back to UTC.
    pub fn configured_timezone(&self, website_id: WebsiteId) -> StatsResult<String> {
        Ok(self
            .config_value(website_id, "general/locale/timezone")?
            .unwrap_or_else(|| "UTC".to_string()))
    }

    // ── Composite query execution ──────────────────────────────────

    /// Probe a piece of SQL without executing it. Used by the merger to
    /// skip providers whose backing tables are unavailable.
    pub fn can_prepare(&self, sql: &str) -> bool {
        self.conn.prepare(sql).is_ok()
    }

    /// Execute the merger's composite query and hand each column's raw
    /// SQLite value to the caller. Returns `None` when no row matched.
    pub fn query_composite_row(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
        column_count: usize,
    ) -> StatsResult<Option<Vec<rusqlite::types::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let row = stmt
            .query_row(params, |row| {
                (0..column_count)
                    .map(|i| row.get::<_, rusqlite::types::Value>(i))
                    .collect::<Result<Vec<_>, _>>()
            })
            .optional()?;
        Ok(row)
    }

    // ── Storefront fixtures (tests and demo runner only) ───────────

    pub fn insert_website(&self, website_id: WebsiteId, name: &str, currency: &str) -> StatsResult<()> {
        self.conn.execute(
            "INSERT INTO store_website (website_id, name, base_currency_code) VALUES (?1, ?2, ?3)",
            params![website_id, name, currency],
        )?;
        Ok(())
    }

    pub fn insert_store(&self, store_id: StoreId, website_id: WebsiteId, name: &str) -> StatsResult<()> {
        self.conn.execute(
            "INSERT INTO store (store_id, website_id, name) VALUES (?1, ?2, ?3)",
            params![store_id, website_id, name],
        )?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn insert_customer(
        &self,
        entity_id: CustomerId,
        website_id: WebsiteId,
        store_id: StoreId,
        firstname: &str,
        lastname: &str,
        email: Option<&str>,
        created_at: &str,
    ) -> StatsResult<()> {
        self.conn.execute(
            "INSERT INTO customer_entity (entity_id, website_id, store_id, firstname, lastname, email, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![entity_id, website_id, store_id, firstname, lastname, email, created_at],
        )?;
        Ok(())
    }

    pub fn set_config(
        &self,
        scope: &str,
        scope_id: i64,
        path: &str,
        value: &str,
    ) -> StatsResult<()> {
        self.conn.execute(
            "INSERT INTO core_config_data (scope, scope_id, path, value)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(scope, scope_id, path) DO UPDATE SET value = excluded.value",
            params![scope, scope_id, path, value],
        )?;
        Ok(())
    }

    /// Drop a table out from under the report. Test helper for exercising
    /// provider-outage degradation.
    pub fn drop_table(&self, table: &str) -> StatsResult<()> {
        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {table}"))?;
        Ok(())
    }
}
