//! Firestore REST typed values.
//!
//! Every field travels as a single-key object naming its type, e.g.
//! `{"stringValue": "abc"}` or `{"integerValue": "42"}`. 64-bit integers are
//! string-encoded on the wire.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::{Map, Value, json};

pub fn string(s: &str) -> Value {
    json!({ "stringValue": s })
}

pub fn integer(n: i64) -> Value {
    json!({ "integerValue": n.to_string() })
}

pub fn double(n: f64) -> Value {
    json!({ "doubleValue": n })
}

pub fn boolean(b: bool) -> Value {
    json!({ "booleanValue": b })
}

pub fn timestamp(t: DateTime<Utc>) -> Value {
    json!({ "timestampValue": t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true) })
}

/// Calendar dates are stored as timestamps at UTC midnight.
pub fn date(d: NaiveDate) -> Value {
    timestamp(d.and_time(NaiveTime::MIN).and_utc())
}

pub fn as_string(v: &Value) -> Option<String> {
    v.get("stringValue")?.as_str().map(str::to_string)
}

#[allow(clippy::cast_possible_truncation)]
pub fn as_i64(v: &Value) -> Option<i64> {
    if let Some(s) = v.get("integerValue") {
        return match s {
            Value::String(s) => s.parse().ok(),
            other => other.as_i64(),
        };
    }
    v.get("doubleValue")?.as_f64().map(|f| f as i64)
}

#[allow(clippy::cast_precision_loss)]
pub fn as_f64(v: &Value) -> Option<f64> {
    if let Some(f) = v.get("doubleValue") {
        return f.as_f64();
    }
    as_i64(v).map(|n| n as f64)
}

pub fn as_bool(v: &Value) -> Option<bool> {
    v.get("booleanValue")?.as_bool()
}

pub fn as_timestamp(v: &Value) -> Option<DateTime<Utc>> {
    let raw = v.get("timestampValue")?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Calendar date of a timestamp, read in UTC.
///
/// Only exact for timestamps written at UTC midnight. A client that stored
/// local midnight east of UTC (e.g. `2024-05-31T22:00:00Z` for June 1st in
/// UTC+2) decodes to the previous day, and its bookings shift by one day in
/// overlap checks.
pub fn as_date(v: &Value) -> Option<NaiveDate> {
    as_timestamp(v).map(|t| t.date_naive())
}

/// The `fields` object of a `mapValue`.
pub fn as_map(v: &Value) -> Option<&Map<String, Value>> {
    v.get("mapValue")?.get("fields")?.as_object()
}

/// Elements of an `arrayValue`. An empty array omits `values` entirely.
pub fn as_array(v: &Value) -> Option<Vec<&Value>> {
    let array = v.get("arrayValue")?;
    Some(
        array
            .get("values")
            .and_then(Value::as_array)
            .map(|vals| vals.iter().collect())
            .unwrap_or_default(),
    )
}

pub fn map(fields: Map<String, Value>) -> Value {
    json!({ "mapValue": { "fields": fields } })
}

pub fn array(values: Vec<Value>) -> Value {
    json!({ "arrayValue": { "values": values } })
}
