//! Tolerant adapters from backend JSON payloads to entry sequences.
//!
//! Every list endpoint answers in one of a handful of known shapes. Each shape
//! has its own adapter; anything unrecognized yields an empty slice.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// The envelope a list payload arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `[ ... ]`
    BareList,
    /// `{ "content": [ ... ] }` (paged responses).
    Content,
    /// `{ "jobs": [ ... ] }`
    Jobs,
    /// `{ "items": [ ... ] }`
    Items,
    /// `{ "data": [ ... ] }`
    Data,
    Unrecognized,
}

const ENVELOPES: [(&str, PayloadShape); 4] = [
    ("content", PayloadShape::Content),
    ("jobs", PayloadShape::Jobs),
    ("items", PayloadShape::Items),
    ("data", PayloadShape::Data),
];

pub fn detect_shape(payload: &Value) -> PayloadShape {
    match payload {
        Value::Array(_) => PayloadShape::BareList,
        Value::Object(map) => ENVELOPES
            .iter()
            .find(|(key, _)| map.get(*key).is_some_and(Value::is_array))
            .map(|(_, shape)| *shape)
            .unwrap_or(PayloadShape::Unrecognized),
        _ => PayloadShape::Unrecognized,
    }
}

/// Returns the entry sequence of a list payload, whatever its envelope.
pub fn entries(payload: &Value) -> &[Value] {
    match detect_shape(payload) {
        PayloadShape::BareList => from_bare_list(payload),
        PayloadShape::Content => from_content_page(payload),
        PayloadShape::Jobs => from_jobs_envelope(payload),
        PayloadShape::Items => from_items_envelope(payload),
        PayloadShape::Data => from_data_envelope(payload),
        PayloadShape::Unrecognized => &[],
    }
}

fn from_bare_list(payload: &Value) -> &[Value] {
    payload.as_array().map(Vec::as_slice).unwrap_or_default()
}

fn from_content_page(payload: &Value) -> &[Value] {
    array_field(payload, "content")
}

fn from_jobs_envelope(payload: &Value) -> &[Value] {
    array_field(payload, "jobs")
}

fn from_items_envelope(payload: &Value) -> &[Value] {
    array_field(payload, "items")
}

fn from_data_envelope(payload: &Value) -> &[Value] {
    array_field(payload, "data")
}

fn array_field<'a>(payload: &'a Value, key: &str) -> &'a [Value] {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Looks up a dotted path such as `company.name`.
pub(crate) fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

/// Renders a scalar as display text. Empty or whitespace-only strings,
/// nulls, booleans and containers yield `None`.
pub(crate) fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(
            number
                .as_i64()
                .map(|n| n.to_string())
                .or_else(|| number.as_u64().map(|n| n.to_string()))
                .unwrap_or_else(|| number.to_string()),
        ),
        _ => None,
    }
}

/// First non-empty text along an ordered alias chain, or `""`.
pub(crate) fn first_text(value: &Value, aliases: &[&str]) -> String {
    first_text_opt(value, aliases).unwrap_or_default()
}

pub(crate) fn first_text_opt(value: &Value, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|alias| lookup(value, alias).and_then(text_of))
}

pub(crate) fn first_present<'a>(value: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| lookup(value, alias))
        .find(|found| match found {
            Value::Null => false,
            Value::String(text) => !text.trim().is_empty(),
            _ => true,
        })
}

/// Parses the timestamp encodings seen from the backend: RFC 3339 strings,
/// naive date-times, plain dates, epoch seconds or millis, and
/// `[year, month, day, hour, minute, second]` arrays.
pub(crate) fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp_text(text.trim()),
        Value::Number(number) => {
            let raw = number.as_i64()?;
            // Anything past 1e11 cannot be seconds in this era.
            if raw.unsigned_abs() >= 100_000_000_000 {
                Utc.timestamp_millis_opt(raw).single()
            } else {
                Utc.timestamp_opt(raw, 0).single()
            }
        }
        Value::Array(parts) => {
            let nums: Vec<i64> = parts.iter().map_while(Value::as_i64).collect();
            let (year, month, day) = match nums.as_slice() {
                [y, m, d, ..] => (*y, *m, *d),
                _ => return None,
            };
            let date = NaiveDate::from_ymd_opt(
                i32::try_from(year).ok()?,
                u32::try_from(month).ok()?,
                u32::try_from(day).ok()?,
            )?;
            let at = |idx: usize| nums.get(idx).copied().unwrap_or(0);
            let time = date.and_hms_opt(
                u32::try_from(at(3)).ok()?,
                u32::try_from(at(4)).ok()?,
                u32::try_from(at(5)).ok()?,
            )?;
            Some(Utc.from_utc_datetime(&time))
        }
        _ => None,
    }
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
