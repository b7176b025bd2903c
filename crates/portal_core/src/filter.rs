use std::fmt;
use std::str::FromStr;

/// Ordering applied to the job list after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Newest,
    SalaryDesc,
    SalaryAsc,
    Title,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Newest,
        SortKey::SalaryDesc,
        SortKey::SalaryAsc,
        SortKey::Title,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::SalaryDesc => "salary-desc",
            SortKey::SalaryAsc => "salary-asc",
            SortKey::Title => "title",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key `{0}`")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownSortKey(raw.to_string()))
    }
}

/// Which filter input the user edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Keyword,
    JobType,
    Location,
    SalaryRange,
    ExperienceRange,
}

/// The user's current search constraints. An empty field means
/// "no constraint on this dimension".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub keyword: String,
    pub job_type: String,
    pub location: String,
    /// Bucket token such as `50000-70000` or `100000+`.
    pub salary_range: String,
    /// Same token shape as `salary_range`, in years.
    pub max_experience_range: String,
    pub sort: SortKey,
}

impl FilterState {
    pub fn field(&self, field: FilterField) -> &str {
        match field {
            FilterField::Keyword => &self.keyword,
            FilterField::JobType => &self.job_type,
            FilterField::Location => &self.location,
            FilterField::SalaryRange => &self.salary_range,
            FilterField::ExperienceRange => &self.max_experience_range,
        }
    }

    /// Stores a new value; returns whether anything changed.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = match field {
            FilterField::Keyword => &mut self.keyword,
            FilterField::JobType => &mut self.job_type,
            FilterField::Location => &mut self.location,
            FilterField::SalaryRange => &mut self.salary_range,
            FilterField::ExperienceRange => &mut self.max_experience_range,
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    pub fn has_structured_filter(&self) -> bool {
        [
            &self.job_type,
            &self.location,
            &self.salary_range,
            &self.max_experience_range,
        ]
        .into_iter()
        .any(|value| !value.trim().is_empty())
    }

    pub fn is_unconstrained(&self) -> bool {
        self.keyword.trim().is_empty() && !self.has_structured_filter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalaryBounds {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

/// Parses a salary bucket token.
///
/// `"100000+"` is open-ended above its minimum; `"50000-70000"` bounds both
/// sides. Parts that are missing or non-numeric are left out rather than
/// treated as zero.
pub fn parse_salary_range(token: &str) -> SalaryBounds {
    let token = token.trim();
    if token.is_empty() {
        return SalaryBounds::default();
    }
    if let Some(min) = token.strip_suffix('+') {
        return SalaryBounds {
            min: parse_amount(min),
            max: None,
        };
    }
    let mut parts = token.splitn(2, '-');
    SalaryBounds {
        min: parts.next().and_then(parse_amount),
        max: parts.next().and_then(parse_amount),
    }
}

/// Parses an experience bucket into the upper bound sent as `maxExperience`.
///
/// `"2-5"` yields 5, a bare `"3"` yields 3. A trailing `+` (`"10+"`) also
/// yields its number as the upper bound: that is the parameter the search
/// endpoint accepts, even though the token reads as a lower bound.
pub fn parse_experience_bound(token: &str) -> Option<u32> {
    let token = token.trim();
    if let Some(open) = token.strip_suffix('+') {
        return open.trim().parse().ok();
    }
    token
        .rsplit('-')
        .next()
        .and_then(|upper| upper.trim().parse().ok())
}

fn parse_amount(raw: &str) -> Option<u64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    cleaned.parse().ok()
}

/// Query parameters of the filtered search endpoint. `None` fields are
/// omitted from the request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub min_salary: Option<u64>,
    pub max_salary: Option<u64>,
    pub max_experience: Option<u32>,
}

impl SearchParams {
    pub fn from_filters(filters: &FilterState) -> Self {
        let salary = parse_salary_range(&filters.salary_range);
        Self {
            keyword: non_blank(&filters.keyword),
            job_type: non_blank(&filters.job_type),
            location: non_blank(&filters.location),
            min_salary: salary.min,
            max_salary: salary.max,
            max_experience: parse_experience_bound(&filters.max_experience_range),
        }
    }

    /// Query pairs in the order the endpoint documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(keyword) = &self.keyword {
            pairs.push(("keyword", keyword.clone()));
        }
        if let Some(job_type) = &self.job_type {
            pairs.push(("type", job_type.clone()));
        }
        if let Some(location) = &self.location {
            pairs.push(("location", location.clone()));
        }
        if let Some(min) = self.min_salary {
            pairs.push(("minSalary", min.to_string()));
        }
        if let Some(max) = self.max_salary {
            pairs.push(("maxSalary", max.to_string()));
        }
        if let Some(max) = self.max_experience {
            pairs.push(("maxExperience", max.to_string()));
        }
        pairs
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The primary query for a given filter state. The public listing is only
/// ever a fallback and is chosen by the executor, never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    /// Personalized matches for the signed-in user; no parameters.
    Matches,
    Filtered(SearchParams),
}

pub fn build_search_request(filters: &FilterState) -> SearchRequest {
    if filters.is_unconstrained() {
        SearchRequest::Matches
    } else {
        SearchRequest::Filtered(SearchParams::from_filters(filters))
    }
}
