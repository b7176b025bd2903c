use serde_json::Value;

use crate::payload::text_of;

/// Choices offered by the filter inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOptions {
    pub types: Vec<String>,
    pub locations: Vec<String>,
    pub salary_ranges: Vec<String>,
    pub experience_ranges: Vec<String>,
}

impl FilterOptions {
    /// Any missing key is an empty list. Entries may be plain values or
    /// `{value, label}` objects, which reduce to their value.
    pub fn from_payload(payload: &Value) -> Self {
        let body = payload
            .get("data")
            .filter(|inner| inner.is_object())
            .unwrap_or(payload);
        Self {
            types: option_list(body, &["types", "jobTypes"]),
            locations: option_list(body, &["locations"]),
            salary_ranges: option_list(body, &["salaryRanges"]),
            experience_ranges: option_list(body, &["experienceRanges"]),
        }
    }
}

fn option_list(body: &Value, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(|item| text_of(item).or_else(|| item.get("value").and_then(text_of)))
                .collect()
        })
        .unwrap_or_default()
}
