use std::time::Duration;

use portal_core::{
    Effect, Msg, RequestFailure, SearchRequest, SearchResponse, SearchSource, TableMsg,
};
use portal_engine::{
    ApiError, ApplicationsBus, EngineEvent, EngineHandle, FailureKind, SearchQuery, SearchReport,
};
use portal_logging::{portal_debug, portal_info, portal_warn};

/// A message for one of the two views.
#[derive(Debug, Clone, PartialEq)]
pub enum AppMsg {
    Board(Msg),
    Table(TableMsg),
}

/// Turns view effects into engine commands and engine events back into
/// view messages.
pub struct EffectRunner {
    engine: EngineHandle,
    bus: ApplicationsBus,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, bus: ApplicationsBus) -> Self {
        Self { engine, bus }
    }

    /// Runs the effects; returns true when one of them asked for a login.
    pub fn run(&self, effects: Vec<Effect>) -> bool {
        let mut login_required = false;
        for effect in effects {
            portal_debug!("effect {:?}", effect);
            match effect {
                Effect::RunSearch {
                    generation,
                    request,
                } => self.engine.search(generation, search_query(request)),
                Effect::LoadFilterOptions { generation } => {
                    self.engine.load_filter_options(generation)
                }
                Effect::LoadAppliedIds { generation } => self.engine.load_applied_ids(generation),
                Effect::LoadApplications { generation } => {
                    self.engine.load_applications(generation)
                }
                Effect::SubmitApplication { job_id } => {
                    portal_info!("submitting application for job {}", job_id);
                    self.engine.apply(job_id);
                }
                Effect::BroadcastApplicationsChanged => {
                    let notified = self.bus.publish();
                    portal_debug!("applications changed; {} view(s) notified", notified);
                }
                Effect::ScheduleToastExpiry { toast_id, after } => {
                    self.engine.start_timer(toast_id, after)
                }
                Effect::RequireLogin => {
                    portal_warn!("backend rejected the session; sign-in required");
                    login_required = true;
                }
            }
        }
        login_required
    }

    pub fn next_event(&self, timeout: Duration) -> Option<AppMsg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }

    pub fn try_next_event(&self) -> Option<AppMsg> {
        self.engine.try_recv().map(map_event)
    }

    pub fn in_flight(&self) -> usize {
        self.engine.in_flight()
    }
}

fn search_query(request: SearchRequest) -> SearchQuery {
    match request {
        SearchRequest::Matches => SearchQuery::Matches,
        SearchRequest::Filtered(params) => SearchQuery::Filtered(
            params
                .query_pairs()
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        ),
    }
}

pub fn map_event(event: EngineEvent) -> AppMsg {
    match event {
        EngineEvent::SearchCompleted { generation, result } => AppMsg::Board(Msg::SearchResolved {
            generation,
            result: result.map(search_response).map_err(|err| map_failure(&err)),
        }),
        EngineEvent::FilterOptionsLoaded { generation, result } => {
            AppMsg::Board(Msg::FilterOptionsLoaded {
                generation,
                result: result.map_err(|err| map_failure(&err)),
            })
        }
        EngineEvent::AppliedIdsLoaded { generation, result } => {
            AppMsg::Board(Msg::AppliedIdsLoaded {
                generation,
                result: result.map_err(|err| map_failure(&err)),
            })
        }
        EngineEvent::ApplicationsLoaded { generation, result } => {
            AppMsg::Table(TableMsg::Loaded {
                generation,
                result: result.map_err(|err| map_failure(&err)),
            })
        }
        EngineEvent::ApplyCompleted { job_id, result } => {
            if let Err(err) = &result {
                portal_warn!("application for job {} failed: {}", job_id, err);
            }
            AppMsg::Board(Msg::ApplyResolved {
                job_id,
                result: result.map_err(|err| map_failure(&err)),
            })
        }
        EngineEvent::TimerElapsed { timer_id } => {
            AppMsg::Board(Msg::ToastExpired { toast_id: timer_id })
        }
    }
}

fn search_response(report: SearchReport) -> SearchResponse {
    let source = match report.fallback_reason {
        Some(reason) => SearchSource::Fallback {
            reason: map_failure(&reason),
        },
        None => SearchSource::Primary,
    };
    SearchResponse {
        source,
        payload: report.payload,
    }
}

pub fn map_failure(err: &ApiError) -> RequestFailure {
    match err.kind {
        FailureKind::Unauthorized(_) => RequestFailure::Unauthorized,
        FailureKind::NotFound => RequestFailure::NotFound,
        FailureKind::Conflict => RequestFailure::Conflict,
        FailureKind::Timeout => RequestFailure::Timeout,
        FailureKind::HttpStatus(code) => RequestFailure::Server(code),
        FailureKind::Decode | FailureKind::TooLarge { .. } => RequestFailure::Malformed,
        FailureKind::InvalidUrl | FailureKind::Network => RequestFailure::Network,
    }
}
