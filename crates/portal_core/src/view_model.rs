use crate::{FilterOptions, FilterState, ToastId};

pub const UNTITLED_JOB: &str = "Untitled position";
pub const NO_JOBS_MESSAGE: &str = "No jobs found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// Results are shown but reduced (unfiltered, not personalized).
    Advisory,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub text: String,
}

/// What the list area shows. An empty result and a failed load are
/// different states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListingStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Empty,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyButton {
    Apply,
    Applying,
    Applied,
    Retry,
    /// The listing has no usable id.
    Unavailable,
}

impl ApplyButton {
    pub fn label(self) -> &'static str {
        match self {
            ApplyButton::Apply => "Apply",
            ApplyButton::Applying => "Applying...",
            ApplyButton::Applied => "Applied",
            ApplyButton::Retry => "Retry",
            ApplyButton::Unavailable => "Unavailable",
        }
    }

    pub fn enabled(self) -> bool {
        matches!(self, ApplyButton::Apply | ApplyButton::Retry)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobCardView {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub company_logo_url: String,
    pub location: String,
    pub job_type: String,
    pub summary: String,
    pub salary: String,
    pub skills: Vec<String>,
    /// `YYYY-MM-DD`, empty when unknown.
    pub posted_on: String,
    pub match_score: Option<f64>,
    pub apply: ApplyButton,
    /// Inline error from the last failed attempt.
    pub apply_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardViewModel {
    pub filters: FilterState,
    pub options: FilterOptions,
    pub status: ListingStatus,
    pub cards: Vec<JobCardView>,
    pub banner: Option<Banner>,
    pub toast: Option<Toast>,
    pub applied_count: usize,
    pub dirty: bool,
}
