use std::time::Duration;

use crate::{Generation, SearchRequest, ToastId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the primary query, falling back to the public listing on failure.
    RunSearch {
        generation: Generation,
        request: SearchRequest,
    },
    LoadFilterOptions { generation: Generation },
    /// Fetch application history for the board's applied-ids set.
    LoadAppliedIds { generation: Generation },
    /// Fetch application history for the applications table.
    LoadApplications { generation: Generation },
    SubmitApplication { job_id: String },
    /// Tell every subscribed view that applications changed.
    BroadcastApplicationsChanged,
    ScheduleToastExpiry { toast_id: ToastId, after: Duration },
    /// The backend rejected our credentials; hand over to the login flow.
    RequireLogin,
}
