//! Display formatting: raw composite values -> ordered label/value rows.
//!
//! Output order always follows the column catalog, never map iteration
//! order. Absent values render as empty strings; a report never shows "0"
//! for a customer with no data in a domain.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::{
    catalog::{ValueKind, CATALOG},
    merger::{CompositeRecord, RawValue},
};

/// Stored datetimes are UTC in this format.
pub const STORED_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Medium-length display format, e.g. `Jan 5, 2026, 3:04:05 PM`.
const DISPLAY_DATETIME_FORMAT: &str = "%b %-d, %Y, %-I:%M:%S %p";

/// Fixed affirmative label for flag columns.
const FLAG_AFFIRMATIVE: &str = "Yes";

/// Sub-field extracted from encoded payment metadata for display.
const PAYMENT_TITLE_FIELD: &str = "method_title";

/// One formatted statistic, ready for a two-column grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub label: String,
    pub value: String,
}

/// Format a composite record into display rows, in catalog order.
pub fn normalize(record: &CompositeRecord, tz: Tz) -> Vec<DisplayRow> {
    CATALOG
        .iter()
        .map(|col| DisplayRow {
            label: column_label(col.name),
            value: format_value(col.kind, record.get(col.name), tz),
        })
        .collect()
}

/// Parse a configured timezone name, falling back to UTC rather than
/// failing the report.
pub fn parse_timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        log::warn!("unknown timezone '{name}', falling back to UTC");
        Tz::UTC
    })
}

/// Human-readable label for a column name: underscores to spaces, each word
/// title-cased.
pub fn column_label(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Round to 2 decimal places, the display precision for monetary values.
/// Binary-representation noise is stripped before the final rounding so a
/// stored 150.005 rounds up the way its decimal form would, half away from
/// zero.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let denoised: f64 = format!("{scaled:.6}").parse().unwrap_or(scaled);
    denoised.round() / 100.0
}

fn format_value(kind: ValueKind, raw: &RawValue, tz: Tz) -> String {
    if raw.is_absent() {
        return String::new();
    }
    match kind {
        ValueKind::BooleanFlag => {
            if raw.is_truthy() {
                FLAG_AFFIRMATIVE.to_string()
            } else {
                String::new()
            }
        }
        ValueKind::EncodedJson => decode_method_title(raw),
        ValueKind::Timestamp => raw
            .as_text()
            .map(|text| convert_datetime(text, tz))
            .unwrap_or_default(),
        ValueKind::Money | ValueKind::Count => {
            raw.as_f64().map(format_number).unwrap_or_default()
        }
        ValueKind::Text => match raw {
            RawValue::Text(s) => s.clone(),
            other => other.as_f64().map(format_number).unwrap_or_default(),
        },
    }
}

/// Extract the display title from encoded payment metadata. Malformed or
/// title-less metadata renders empty; decoding problems never surface.
fn decode_method_title(raw: &RawValue) -> String {
    let Some(text) = raw.as_text() else {
        return String::new();
    };
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(decoded) => decoded
            .get(PAYMENT_TITLE_FIELD)
            .and_then(|title| title.as_str())
            .unwrap_or("")
            .to_string(),
        Err(_) => String::new(),
    }
}

/// Convert a stored UTC datetime into the report timezone. An unparseable
/// non-empty value passes through unchanged.
fn convert_datetime(raw: &str, tz: Tz) -> String {
    match NaiveDateTime::parse_from_str(raw, STORED_DATETIME_FORMAT) {
        Ok(naive) => naive
            .and_utc()
            .with_timezone(&tz)
            .format(DISPLAY_DATETIME_FORMAT)
            .to_string(),
        Err(e) => {
            log::warn!("unparseable stored datetime '{raw}': {e}");
            raw.to_string()
        }
    }
}

/// Display precision for numbers: 2 decimals, trailing zeros dropped, and
/// zero itself rendered empty (zero counts read as "no data" in the grid).
fn format_number(value: f64) -> String {
    let rounded = round2(value);
    if rounded == 0.0 {
        return String::new();
    }
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}
