//! Application history as returned by the "my applications" endpoint.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::payload::{entries, first_text, first_text_opt, lookup, parse_timestamp};

const JOB_REF_ALIASES: &[&str] = &["jobId", "jobPostId", "job.id", "jobPost.id"];
const APPLICATION_ID_ALIASES: &[&str] = &["id", "applicationId"];
const JOB_TITLE_ALIASES: &[&str] = &["jobTitle", "job.title", "jobPost.title", "title"];
const COMPANY_ALIASES: &[&str] = &[
    "companyName",
    "job.companyName",
    "job.company.name",
    "jobPost.companyName",
    "jobPost.company.name",
    "company",
];
const STATUS_ALIASES: &[&str] = &["status", "applicationStatus"];
const APPLIED_AT_ALIASES: &[&str] = &["appliedAt", "appliedDate", "createdAt"];

/// The job an application record refers to, as a canonical string id.
pub fn application_job_id(record: &Value) -> Option<String> {
    first_text_opt(record, JOB_REF_ALIASES)
}

/// Every job id the user has applied to, from any supported list shape.
pub fn applied_job_ids(payload: &Value) -> BTreeSet<String> {
    entries(payload)
        .iter()
        .filter_map(application_job_id)
        .collect()
}

/// One row of the applications table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationRow {
    pub application_id: String,
    pub job_id: String,
    pub job_title: String,
    pub company: String,
    pub status: String,
    pub applied_at: Option<DateTime<Utc>>,
}

impl ApplicationRow {
    pub fn from_record(record: &Value) -> Self {
        Self {
            application_id: first_text(record, APPLICATION_ID_ALIASES),
            job_id: application_job_id(record).unwrap_or_default(),
            job_title: first_text(record, JOB_TITLE_ALIASES),
            company: first_text(record, COMPANY_ALIASES),
            status: first_text(record, STATUS_ALIASES),
            applied_at: APPLIED_AT_ALIASES
                .iter()
                .find_map(|alias| lookup(record, alias).and_then(parse_timestamp)),
        }
    }
}

/// Rows newest first; undated rows keep their payload order at the end.
pub fn normalize_applications(payload: &Value) -> Vec<ApplicationRow> {
    let mut rows: Vec<ApplicationRow> = entries(payload)
        .iter()
        .filter(|record| record.is_object())
        .map(ApplicationRow::from_record)
        .collect();
    rows.sort_by_key(|row| std::cmp::Reverse(row.applied_at));
    rows
}

/// Outcome of a successful apply call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyReceipt {
    /// The backend already had an application for this job.
    pub already_applied: bool,
}

impl ApplyReceipt {
    pub fn from_payload(payload: &Value) -> Self {
        let already_applied = ["alreadyApplied", "data.alreadyApplied", "application.alreadyApplied"]
            .iter()
            .find_map(|path| lookup(payload, path).and_then(Value::as_bool))
            .unwrap_or(false);
        Self { already_applied }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn job_references_resolve_through_every_alias() {
        let payload = json!({"content": [
            {"id": 1, "jobId": 10},
            {"id": 2, "jobPostId": "20"},
            {"id": 3, "job": {"id": 30}},
            {"id": 4, "jobPost": {"id": "40"}},
            {"id": 5}
        ]});
        let ids: Vec<String> = applied_job_ids(&payload).into_iter().collect();
        assert_eq!(ids, vec!["10", "20", "30", "40"]);
    }

    #[test]
    fn rows_carry_nested_job_details() {
        let record = json!({
            "applicationId": "a-1",
            "job": {"id": 7, "title": "Platform Engineer", "company": {"name": "Initech"}},
            "status": "UNDER_REVIEW",
            "appliedAt": "2024-05-01T09:00:00Z"
        });
        let row = ApplicationRow::from_record(&record);
        assert_eq!(row.application_id, "a-1");
        assert_eq!(row.job_id, "7");
        assert_eq!(row.job_title, "Platform Engineer");
        assert_eq!(row.company, "Initech");
        assert_eq!(row.status, "UNDER_REVIEW");
        assert!(row.applied_at.is_some());
    }

    #[test]
    fn rows_are_newest_first() {
        let payload = json!([
            {"id": "old", "appliedAt": "2024-01-01"},
            {"id": "undated"},
            {"id": "new", "appliedAt": "2024-06-01"}
        ]);
        let order: Vec<String> = normalize_applications(&payload)
            .into_iter()
            .map(|row| row.application_id)
            .collect();
        assert_eq!(order, vec!["new", "old", "undated"]);
    }

    #[test]
    fn receipt_reads_already_applied_flag() {
        assert!(ApplyReceipt::from_payload(&json!({"id": 1, "alreadyApplied": true})).already_applied);
        assert!(ApplyReceipt::from_payload(&json!({"data": {"alreadyApplied": true}})).already_applied);
        assert!(!ApplyReceipt::from_payload(&json!({"id": 1})).already_applied);
        assert!(!ApplyReceipt::from_payload(&json!(null)).already_applied);
    }
}
