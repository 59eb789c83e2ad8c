use super::StatsStore;
use crate::{
    error::StatsResult,
    types::{CustomerId, StoreId},
};
use rusqlite::params;

impl StatsStore {
    // ── Session / visitor fixtures ────────────────────────────────

    pub fn insert_customer_log(
        &self,
        customer_id: CustomerId,
        last_login_at: Option<&str>,
        last_logout_at: Option<&str>,
    ) -> StatsResult<()> {
        self.conn.execute(
            "INSERT INTO customer_log (customer_id, last_login_at, last_logout_at)
             VALUES (?1, ?2, ?3)",
            params![customer_id, last_login_at, last_logout_at],
        )?;
        Ok(())
    }

    pub fn insert_visitor(
        &self,
        customer_id: CustomerId,
        last_visit_at: &str,
    ) -> StatsResult<()> {
        self.conn.execute(
            "INSERT INTO customer_visitor (customer_id, last_visit_at) VALUES (?1, ?2)",
            params![customer_id, last_visit_at],
        )?;
        Ok(())
    }

    // ── Cart fixtures ─────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn insert_quote(
        &self,
        customer_id: CustomerId,
        store_id: StoreId,
        is_active: bool,
        items_count: i64,
        created_at: &str,
        updated_at: &str,
    ) -> StatsResult<()> {
        self.conn.execute(
            "INSERT INTO quote (customer_id, store_id, is_active, items_count, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                customer_id,
                store_id,
                if is_active { 1 } else { 0 },
                items_count,
                created_at,
                updated_at
            ],
        )?;
        Ok(())
    }

    // ── Wishlist fixtures ─────────────────────────────────────────

    /// Create a wishlist for a customer. Returns the wishlist id.
    pub fn insert_wishlist(&self, customer_id: CustomerId) -> StatsResult<i64> {
        self.conn.execute(
            "INSERT INTO wishlist (customer_id) VALUES (?1)",
            params![customer_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_wishlist_item(
        &self,
        wishlist_id: i64,
        product_id: i64,
        added_at: &str,
    ) -> StatsResult<()> {
        self.conn.execute(
            "INSERT INTO wishlist_item (wishlist_id, product_id, added_at) VALUES (?1, ?2, ?3)",
            params![wishlist_id, product_id, added_at],
        )?;
        Ok(())
    }

    // ── Review fixtures ───────────────────────────────────────────

    pub fn insert_review(
        &self,
        customer_id: CustomerId,
        store_id: StoreId,
        title: &str,
        created_at: &str,
    ) -> StatsResult<()> {
        self.conn.execute(
            "INSERT INTO review (created_at) VALUES (?1)",
            params![created_at],
        )?;
        let review_id = self.conn.last_insert_rowid();
        self.conn.execute(
            "INSERT INTO review_detail (review_id, customer_id, store_id, title)
             VALUES (?1, ?2, ?3, ?4)",
            params![review_id, customer_id, store_id, title],
        )?;
        Ok(())
    }
}
