use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::filter::SortKey;
use crate::payload::{entries, first_present, first_text, lookup, parse_timestamp, text_of};

const ID_ALIASES: &[&str] = &["id", "jobId", "jobPostId", "_id", "uuid"];
const TITLE_ALIASES: &[&str] = &["title", "jobTitle", "role", "position"];
const COMPANY_ALIASES: &[&str] = &[
    "companyName",
    "company.name",
    "company.companyName",
    "company",
    "employerName",
    "organization",
];
const LOGO_ALIASES: &[&str] = &[
    "companyLogoUrl",
    "companyLogo",
    "company.logoUrl",
    "company.logo",
    "logoUrl",
    "logo",
];
const LOCATION_ALIASES: &[&str] = &["location", "jobLocation", "city"];
const TYPE_ALIASES: &[&str] = &["type", "jobType", "employmentType"];
const SUMMARY_ALIASES: &[&str] = &["summary", "shortDescription", "description"];
const SALARY_ALIASES: &[&str] = &["salary", "salaryRange", "maxSalary", "minSalary"];
const SKILL_ALIASES: &[&str] = &["skills", "requiredSkills", "tags"];
const POSTED_ALIASES: &[&str] = &["postedAt", "postedDate", "createdAt", "publishedAt"];
const SCORE_ALIASES: &[&str] = &["matchScore", "score", "matchPercentage"];
const WRAPPER_KEYS: &[&str] = &["job", "jobPost"];

/// Salary as the backend sent it: a number, free text, or nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Salary {
    Amount(f64),
    Text(String),
    #[default]
    Unspecified,
}

impl Salary {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(number)) => number
                .as_f64()
                .map(Salary::Amount)
                .unwrap_or(Salary::Unspecified),
            Some(other) => text_of(other).map(Salary::Text).unwrap_or_default(),
            None => Salary::Unspecified,
        }
    }

    /// Numeric value used for ordering; unparseable or missing is 0.
    pub fn numeric(&self) -> f64 {
        match self {
            Salary::Amount(amount) => *amount,
            // First number in the text: "$60,000" is 60000, "50000-70000" is 50000.
            Salary::Text(text) => {
                let digits: String = text
                    .chars()
                    .skip_while(|c| !c.is_ascii_digit())
                    .take_while(|c| c.is_ascii_digit() || matches!(c, ',' | '.'))
                    .filter(|c| *c != ',')
                    .collect();
                digits.parse().unwrap_or(0.0)
            }
            Salary::Unspecified => 0.0,
        }
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Salary::Amount(amount) if amount.fract() == 0.0 => write!(f, "{amount:.0}"),
            Salary::Amount(amount) => write!(f, "{amount:.2}"),
            Salary::Text(text) => f.write_str(text),
            Salary::Unspecified => Ok(()),
        }
    }
}

/// One job posting in the canonical shape the views render.
///
/// Text fields are never absent: a missing value is an empty string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub company_logo_url: String,
    pub location: String,
    pub job_type: String,
    pub summary: String,
    pub salary: Salary,
    pub skills: Vec<String>,
    pub posted_at: Option<DateTime<Utc>>,
    /// Opaque score computed by the backend; shown, never derived here.
    pub match_score: Option<f64>,
}

impl JobListing {
    /// Builds a listing from one raw entry, unwrapping a nested `job` or
    /// `jobPost` object when present. Never fails: unknown shapes produce
    /// empty fields.
    pub fn from_entry(entry: &Value) -> Self {
        let job = WRAPPER_KEYS
            .iter()
            .find_map(|key| entry.get(*key).filter(|inner| inner.is_object()))
            .unwrap_or(entry);
        if !job.is_object() {
            return Self::default();
        }

        let match_score = SCORE_ALIASES
            .iter()
            .find_map(|alias| {
                lookup(entry, alias)
                    .and_then(Value::as_f64)
                    .or_else(|| lookup(job, alias).and_then(Value::as_f64))
            });

        Self {
            id: first_text(job, ID_ALIASES),
            title: first_text(job, TITLE_ALIASES),
            company: first_text(job, COMPANY_ALIASES),
            company_logo_url: first_text(job, LOGO_ALIASES),
            location: first_text(job, LOCATION_ALIASES),
            job_type: first_text(job, TYPE_ALIASES),
            summary: first_text(job, SUMMARY_ALIASES),
            salary: Salary::from_value(first_present(job, SALARY_ALIASES)),
            skills: normalize_skills(first_present(job, SKILL_ALIASES)),
            posted_at: first_present(job, POSTED_ALIASES).and_then(parse_timestamp),
            match_score,
        }
    }

    fn posted_millis(&self) -> i64 {
        self.posted_at.map_or(0, |at| at.timestamp_millis())
    }
}

/// Maps any supported list payload to canonical listings, in payload order.
pub fn normalize_listings(payload: &Value) -> Vec<JobListing> {
    entries(payload).iter().map(JobListing::from_entry).collect()
}

/// Accepts a list as-is or a comma-separated string; anything else is empty.
pub fn normalize_skills(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| text_of(item).or_else(|| item.get("name").and_then(text_of)))
            .collect(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

/// Stable sort by the selected key.
pub fn sort_listings(listings: &mut [JobListing], key: SortKey) {
    match key {
        SortKey::Newest => listings.sort_by_key(|listing| std::cmp::Reverse(listing.posted_millis())),
        SortKey::SalaryDesc => {
            listings.sort_by(|a, b| b.salary.numeric().total_cmp(&a.salary.numeric()))
        }
        SortKey::SalaryAsc => {
            listings.sort_by(|a, b| a.salary.numeric().total_cmp(&b.salary.numeric()))
        }
        SortKey::Title => listings.sort_by(compare_titles),
    }
}

fn compare_titles(a: &JobListing, b: &JobListing) -> Ordering {
    a.title.to_lowercase().cmp(&b.title.to_lowercase())
}
