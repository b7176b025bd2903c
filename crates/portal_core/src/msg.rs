use serde_json::Value;

use crate::{FilterField, Generation, RequestFailure, SortKey, ToastId};

/// Where a job list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSource {
    /// The personalized or filtered query that was asked for.
    Primary,
    /// The public listing, after the primary query failed.
    Fallback { reason: RequestFailure },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub source: SearchSource,
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The board became visible; kicks off every initial load.
    Mounted,
    /// The board went away; any later response is ignored.
    Unmounted,
    /// User edited one filter input.
    FilterChanged { field: FilterField, value: String },
    /// User picked a different ordering.
    SortChanged(SortKey),
    /// A search issued with `generation` finished.
    SearchResolved {
        generation: Generation,
        result: Result<SearchResponse, RequestFailure>,
    },
    FilterOptionsLoaded {
        generation: Generation,
        result: Result<Value, RequestFailure>,
    },
    /// Application history arrived; seeds the applied-ids set.
    AppliedIdsLoaded {
        generation: Generation,
        result: Result<Value, RequestFailure>,
    },
    /// Some view announced that the user's applications changed.
    ApplicationsChanged,
    /// User clicked Apply on a card.
    ApplyClicked { job_id: String },
    ApplyResolved {
        job_id: String,
        result: Result<Value, RequestFailure>,
    },
    /// A toast's display time ran out.
    ToastExpired { toast_id: ToastId },
    /// User closed the banner.
    BannerDismissed,
}
