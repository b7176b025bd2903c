//! Job portal core: pure state machines, payload normalization and view-model helpers.
mod application;
mod apply;
mod effect;
mod filter;
mod listing;
mod msg;
mod options;
mod payload;
mod state;
mod table;
mod update;
mod view_model;

pub use application::{
    application_job_id, applied_job_ids, normalize_applications, ApplicationRow, ApplyReceipt,
};
pub use apply::{
    apply_failure_message, ApplyState, RequestFailure, ALREADY_APPLIED_MESSAGE,
    APPLIED_MESSAGE, APPLY_FAILED_MESSAGE, JOB_NOT_FOUND_MESSAGE, SESSION_EXPIRED_MESSAGE,
};
pub use effect::Effect;
pub use filter::{
    build_search_request, parse_experience_bound, parse_salary_range, FilterField, FilterState,
    SalaryBounds, SearchParams, SearchRequest, SortKey, UnknownSortKey,
};
pub use listing::{normalize_listings, normalize_skills, sort_listings, JobListing, Salary};
pub use msg::{Msg, SearchResponse, SearchSource};
pub use options::FilterOptions;
pub use payload::{detect_shape, entries, PayloadShape};
pub use state::{
    BoardState, Generation, ToastId, FALLBACK_ADVISORY, SEARCH_FAILED_MESSAGE, TOAST_DURATION,
};
pub use table::{
    update_table, ApplicationsTable, TableMsg, TableStatus, TableViewModel,
    APPLICATIONS_FAILED_MESSAGE, NO_APPLICATIONS_MESSAGE,
};
pub use update::update;
pub use view_model::{
    ApplyButton, Banner, BannerKind, BoardViewModel, JobCardView, ListingStatus, Toast, ToastKind,
    NO_JOBS_MESSAGE, UNTITLED_JOB,
};
