//! Composite statistics query: one correlated query, one row per customer.
//!
//! Every provider column rides along as an independently correlated scalar
//! sub-select, so cost grows linearly with the column count and no top-level
//! join can fan the customer row out. Providers whose sub-queries cannot be
//! prepared (missing table, broken schema) are skipped with a warning and
//! their columns reported absent; the rest of the record is still produced.

use std::collections::HashMap;

use crate::{
    catalog::{self, CATALOG},
    error::StatsResult,
    provider::MetricProvider,
    store::{CustomerIdentity, StatsStore, StoreScope},
};

/// A raw per-column value as returned by the data store, before any display
/// formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl RawValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Integer(i) => Some(*i as f64),
            RawValue::Real(f) => Some(*f),
            RawValue::Text(s) => s.trim().parse().ok(),
            RawValue::Null => None,
        }
    }

    /// Truthiness for flag columns: any non-null, non-zero, non-empty value.
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Null => false,
            RawValue::Integer(i) => *i != 0,
            RawValue::Real(f) => *f != 0.0,
            RawValue::Text(s) => !s.is_empty() && s != "0",
        }
    }
}

impl From<rusqlite::types::Value> for RawValue {
    fn from(value: rusqlite::types::Value) -> Self {
        use rusqlite::types::Value;
        match value {
            Value::Null => RawValue::Null,
            Value::Integer(i) => RawValue::Integer(i),
            Value::Real(f) => RawValue::Real(f),
            Value::Text(s) => RawValue::Text(s),
            Value::Blob(b) => RawValue::Text(String::from_utf8_lossy(&b).into_owned()),
        }
    }
}

/// The merged per-customer statistics record. Every catalog column is
/// present as a key; absent metrics hold an explicit null.
#[derive(Debug, Clone)]
pub struct CompositeRecord {
    values: HashMap<&'static str, RawValue>,
}

impl CompositeRecord {
    pub fn get(&self, name: &str) -> &RawValue {
        self.values.get(name).unwrap_or(&RawValue::Null)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Build and execute the composite query.
///
/// Returns `Ok(None)` when the customer has no row inside the given store
/// scope, which is distinct from a resolved customer whose metrics are all
/// absent.
pub fn merge(
    store: &StatsStore,
    customer: &CustomerIdentity,
    scope: &StoreScope,
    providers: &[Box<dyn MetricProvider>],
) -> StatsResult<Option<CompositeRecord>> {
    // Gather each provider's columns, probing availability first.
    let mut selected: HashMap<&'static str, String> = HashMap::new();
    for provider in providers {
        let columns = provider.columns(scope);
        let probe = format!(
            "SELECT {} FROM customer_entity c LIMIT 0",
            columns
                .iter()
                .map(|col| col.select_sql.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        if !store.can_prepare(&probe) {
            log::warn!(
                "metric provider '{}' unavailable; reporting its columns as empty",
                provider.name()
            );
            continue;
        }
        for col in columns {
            if catalog::column(col.name).is_none() {
                return Err(anyhow::anyhow!(
                    "provider '{}' declared unknown column '{}'",
                    provider.name(),
                    col.name
                )
                .into());
            }
            if selected.insert(col.name, col.select_sql).is_some() {
                return Err(anyhow::anyhow!(
                    "column '{}' declared by more than one provider",
                    col.name
                )
                .into());
            }
        }
    }

    // Emit the select list in catalog order; columns without an available
    // provider select an explicit NULL so the record shape never varies.
    let select_list = CATALOG
        .iter()
        .map(|col| match selected.get(col.name) {
            Some(sql) => format!("{} AS {}", sql, col.name),
            None => format!("NULL AS {}", col.name),
        })
        .collect::<Vec<_>>()
        .join(",\n       ");

    let sql = format!(
        "SELECT {select_list}
         FROM customer_entity c
         WHERE c.entity_id = ?1 AND c.store_id IN {stores}
         GROUP BY c.entity_id
         LIMIT 1",
        stores = scope.sql_list(),
    );
    log::debug!(
        "composite statistics query for customer {} ({} columns)",
        customer.entity_id,
        CATALOG.len()
    );

    let row = store.query_composite_row(&sql, &[&customer.entity_id], CATALOG.len())?;
    Ok(row.map(|raw| {
        let values = CATALOG
            .iter()
            .zip(raw)
            .map(|(col, value)| (col.name, RawValue::from(value)))
            .collect();
        CompositeRecord { values }
    }))
}
