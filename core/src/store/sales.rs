use super::StatsStore;
use crate::{
    error::StatsResult,
    types::{CustomerId, StoreId},
};
use rusqlite::params;

impl StatsStore {
    // ── Sales fixtures ────────────────────────────────────────────

    /// Insert an order row. Returns the new order's entity id so a payment
    /// row can be attached.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_order(
        &self,
        customer_id: CustomerId,
        store_id: StoreId,
        grand_total: f64,
        shipping_method: Option<&str>,
        shipping_description: Option<&str>,
        created_at: &str,
    ) -> StatsResult<i64> {
        self.conn.execute(
            "INSERT INTO sales_order (customer_id, store_id, grand_total, shipping_method, shipping_description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                customer_id,
                store_id,
                grand_total,
                shipping_method,
                shipping_description,
                created_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Attach a payment row to an order. `additional_information` is the
    /// gateway metadata blob, stored as encoded JSON.
    pub fn insert_payment(
        &self,
        order_id: i64,
        method: &str,
        additional_information: &serde_json::Value,
    ) -> StatsResult<()> {
        let encoded = serde_json::to_string(additional_information)?;
        self.conn.execute(
            "INSERT INTO sales_order_payment (parent_id, method, additional_information)
             VALUES (?1, ?2, ?3)",
            params![order_id, method, encoded],
        )?;
        Ok(())
    }

    /// Insert a payment row with a raw, possibly malformed metadata string.
    /// Test helper for exercising tolerant decoding.
    pub fn insert_payment_raw(
        &self,
        order_id: i64,
        method: &str,
        additional_information: &str,
    ) -> StatsResult<()> {
        self.conn.execute(
            "INSERT INTO sales_order_payment (parent_id, method, additional_information)
             VALUES (?1, ?2, ?3)",
            params![order_id, method, additional_information],
        )?;
        Ok(())
    }
}
