use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::view_model::{
    ApplyButton, Banner, BannerKind, BoardViewModel, JobCardView, ListingStatus, Toast, ToastKind,
    UNTITLED_JOB,
};
use crate::{
    build_search_request, sort_listings, ApplyState, FilterOptions, FilterState, JobListing,
    SearchRequest,
};

/// Issue counter for one data source. Only the response carrying the
/// latest generation may be committed.
pub type Generation = u64;
pub type ToastId = u64;

pub const TOAST_DURATION: Duration = Duration::from_secs(4);

pub const FALLBACK_ADVISORY: &str =
    "Showing all open positions. Personalized and filtered results are unavailable right now.";
pub const SEARCH_FAILED_MESSAGE: &str = "Could not load jobs. Please try again later.";

/// State of the job board: filters, the current result list, and the
/// apply lifecycle of every job the user touched.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    mounted: bool,
    filters: FilterState,
    options: FilterOptions,
    listings: Vec<JobListing>,
    searching: bool,
    search_error: Option<String>,
    resolved_once: bool,
    banner: Option<Banner>,
    search_generation: Generation,
    options_generation: Generation,
    applied_generation: Generation,
    applied_ids: BTreeSet<String>,
    apply_states: BTreeMap<String, ApplyState>,
    toast: Option<Toast>,
    last_toast_id: ToastId,
    toast_duration: Duration,
    dirty: bool,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            mounted: false,
            filters: FilterState::default(),
            options: FilterOptions::default(),
            listings: Vec::new(),
            searching: false,
            search_error: None,
            resolved_once: false,
            banner: None,
            search_generation: 0,
            options_generation: 0,
            applied_generation: 0,
            applied_ids: BTreeSet::new(),
            apply_states: BTreeMap::new(),
            toast: None,
            last_toast_id: 0,
            toast_duration: TOAST_DURATION,
            dirty: false,
        }
    }
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = duration;
        self
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn listings(&self) -> &[JobListing] {
        &self.listings
    }

    pub fn applied_ids(&self) -> &BTreeSet<String> {
        &self.applied_ids
    }

    pub fn apply_state(&self, job_id: &str) -> ApplyState {
        self.apply_states.get(job_id).cloned().unwrap_or_default()
    }

    pub fn search_generation(&self) -> Generation {
        self.search_generation
    }

    /// Applied either by history or by an apply call in this session.
    pub fn is_applied(&self, job_id: &str) -> bool {
        self.applied_ids.contains(job_id)
            || self
                .apply_states
                .get(job_id)
                .is_some_and(ApplyState::is_applied)
    }

    pub fn view(&self) -> BoardViewModel {
        BoardViewModel {
            filters: self.filters.clone(),
            options: self.options.clone(),
            status: self.listing_status(),
            cards: self.listings.iter().map(|l| self.card(l)).collect(),
            banner: self.banner.clone(),
            toast: self.toast.clone(),
            applied_count: self.applied_ids.len(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn listing_status(&self) -> ListingStatus {
        if self.searching {
            ListingStatus::Loading
        } else if let Some(error) = &self.search_error {
            ListingStatus::Error(error.clone())
        } else if !self.resolved_once {
            ListingStatus::Idle
        } else if self.listings.is_empty() {
            ListingStatus::Empty
        } else {
            ListingStatus::Ready
        }
    }

    fn card(&self, listing: &JobListing) -> JobCardView {
        let state = self.apply_state(&listing.id);
        let apply = if listing.id.is_empty() {
            ApplyButton::Unavailable
        } else if self.is_applied(&listing.id) {
            ApplyButton::Applied
        } else {
            match state {
                ApplyState::Pending => ApplyButton::Applying,
                ApplyState::Failed { .. } => ApplyButton::Retry,
                ApplyState::Idle | ApplyState::Applied { .. } => ApplyButton::Apply,
            }
        };
        let apply_error = match (&state, apply) {
            (ApplyState::Failed { message }, ApplyButton::Retry) => Some(message.clone()),
            _ => None,
        };
        JobCardView {
            job_id: listing.id.clone(),
            title: if listing.title.is_empty() {
                UNTITLED_JOB.to_string()
            } else {
                listing.title.clone()
            },
            company: listing.company.clone(),
            company_logo_url: listing.company_logo_url.clone(),
            location: listing.location.clone(),
            job_type: listing.job_type.clone(),
            summary: listing.summary.clone(),
            salary: listing.salary.to_string(),
            skills: listing.skills.clone(),
            posted_on: listing
                .posted_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            match_score: listing.match_score,
            apply,
            apply_error,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mount(&mut self) -> bool {
        if self.mounted {
            return false;
        }
        self.mounted = true;
        self.mark_dirty();
        true
    }

    pub(crate) fn unmount(&mut self) {
        self.mounted = false;
        self.searching = false;
        self.toast = None;
        // Results of in-flight applies are dropped from here on.
        self.apply_states.retain(|_, state| !state.is_pending());
        self.mark_dirty();
    }

    pub(crate) fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    /// Starts a new search generation; responses to older ones are stale
    /// from here on.
    pub(crate) fn begin_search(&mut self) -> (Generation, SearchRequest) {
        self.search_generation += 1;
        self.searching = true;
        self.mark_dirty();
        (self.search_generation, build_search_request(&self.filters))
    }

    pub(crate) fn begin_options_load(&mut self) -> Generation {
        self.options_generation += 1;
        self.options_generation
    }

    pub(crate) fn begin_applied_load(&mut self) -> Generation {
        self.applied_generation += 1;
        self.applied_generation
    }

    pub(crate) fn is_current_search(&self, generation: Generation) -> bool {
        self.mounted && generation == self.search_generation
    }

    pub(crate) fn is_current_options(&self, generation: Generation) -> bool {
        self.mounted && generation == self.options_generation
    }

    pub(crate) fn is_current_applied(&self, generation: Generation) -> bool {
        self.mounted && generation == self.applied_generation
    }

    pub(crate) fn resort(&mut self) {
        sort_listings(&mut self.listings, self.filters.sort);
        self.mark_dirty();
    }

    pub(crate) fn commit_listings(&mut self, mut listings: Vec<JobListing>, advisory: bool) {
        sort_listings(&mut listings, self.filters.sort);
        self.listings = listings;
        self.searching = false;
        self.search_error = None;
        self.resolved_once = true;
        self.banner = advisory.then(|| Banner {
            kind: BannerKind::Advisory,
            text: FALLBACK_ADVISORY.to_string(),
        });
        self.mark_dirty();
    }

    pub(crate) fn commit_search_failure(&mut self) {
        self.listings.clear();
        self.searching = false;
        self.search_error = Some(SEARCH_FAILED_MESSAGE.to_string());
        self.resolved_once = true;
        self.banner = Some(Banner {
            kind: BannerKind::Error,
            text: SEARCH_FAILED_MESSAGE.to_string(),
        });
        self.mark_dirty();
    }

    pub(crate) fn set_options(&mut self, options: FilterOptions) {
        self.options = options;
        self.mark_dirty();
    }

    pub(crate) fn replace_applied_ids(&mut self, ids: BTreeSet<String>) {
        if self.applied_ids != ids {
            self.applied_ids = ids;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_apply_state(&mut self, job_id: &str, state: ApplyState) {
        if state.is_applied() {
            self.applied_ids.insert(job_id.to_string());
        }
        self.apply_states.insert(job_id.to_string(), state);
        self.mark_dirty();
    }

    pub(crate) fn dismiss_banner(&mut self) -> bool {
        let had_banner = self.banner.take().is_some();
        if had_banner {
            self.mark_dirty();
        }
        had_banner
    }

    /// Shows a toast and returns its id and display time.
    pub(crate) fn show_toast(&mut self, kind: ToastKind, text: &str) -> (ToastId, Duration) {
        self.last_toast_id += 1;
        self.toast = Some(Toast {
            id: self.last_toast_id,
            kind,
            text: text.to_string(),
        });
        self.mark_dirty();
        (self.last_toast_id, self.toast_duration)
    }

    pub(crate) fn expire_toast(&mut self, toast_id: ToastId) {
        if self.toast.as_ref().is_some_and(|toast| toast.id == toast_id) {
            self.toast = None;
            self.mark_dirty();
        }
    }
}
