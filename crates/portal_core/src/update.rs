use crate::apply::{apply_failure_message, ALREADY_APPLIED_MESSAGE, APPLIED_MESSAGE};
use crate::view_model::ToastKind;
use crate::{
    applied_job_ids, normalize_listings, ApplyReceipt, ApplyState, BoardState, Effect,
    FilterOptions, Msg, RequestFailure, SearchSource,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: BoardState, msg: Msg) -> (BoardState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => {
            if !state.mount() {
                return (state, Vec::new());
            }
            let (generation, request) = state.begin_search();
            vec![
                Effect::RunSearch {
                    generation,
                    request,
                },
                Effect::LoadFilterOptions {
                    generation: state.begin_options_load(),
                },
                Effect::LoadAppliedIds {
                    generation: state.begin_applied_load(),
                },
            ]
        }
        Msg::Unmounted => {
            if state.is_mounted() {
                state.unmount();
            }
            Vec::new()
        }
        Msg::FilterChanged { field, value } => {
            if !state.filters_mut().set(field, value) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            search_if_mounted(&mut state)
        }
        Msg::SortChanged(sort) => {
            if state.filters().sort == sort {
                return (state, Vec::new());
            }
            state.filters_mut().sort = sort;
            // Reorder what is on screen now; the re-fetch lands in the same order.
            state.resort();
            search_if_mounted(&mut state)
        }
        Msg::SearchResolved { generation, result } => {
            if !state.is_current_search(generation) {
                return (state, Vec::new());
            }
            match result {
                Ok(response) => {
                    state.commit_listings(
                        normalize_listings(&response.payload),
                        matches!(response.source, SearchSource::Fallback { .. }),
                    );
                    match response.source {
                        SearchSource::Fallback { reason } => escalate(reason),
                        SearchSource::Primary => Vec::new(),
                    }
                }
                Err(failure) => {
                    state.commit_search_failure();
                    escalate(failure)
                }
            }
        }
        Msg::FilterOptionsLoaded { generation, result } => {
            if !state.is_current_options(generation) {
                return (state, Vec::new());
            }
            match result {
                Ok(payload) => {
                    state.set_options(FilterOptions::from_payload(&payload));
                    Vec::new()
                }
                Err(failure) => escalate(failure),
            }
        }
        Msg::AppliedIdsLoaded { generation, result } => {
            if !state.is_current_applied(generation) {
                return (state, Vec::new());
            }
            match result {
                Ok(payload) => {
                    state.replace_applied_ids(applied_job_ids(&payload));
                    Vec::new()
                }
                // Best effort: keep the ids we already know about.
                Err(failure) => escalate(failure),
            }
        }
        Msg::ApplicationsChanged => {
            if !state.is_mounted() {
                return (state, Vec::new());
            }
            vec![Effect::LoadAppliedIds {
                generation: state.begin_applied_load(),
            }]
        }
        Msg::ApplyClicked { job_id } => {
            let job_id = job_id.trim();
            if job_id.is_empty()
                || !state.is_mounted()
                || state.is_applied(job_id)
                || !state.apply_state(job_id).accepts_submit()
            {
                return (state, Vec::new());
            }
            state.set_apply_state(job_id, ApplyState::Pending);
            vec![Effect::SubmitApplication {
                job_id: job_id.to_string(),
            }]
        }
        Msg::ApplyResolved { job_id, result } => {
            if !state.is_mounted() || !state.apply_state(&job_id).is_pending() {
                return (state, Vec::new());
            }
            resolve_apply(&mut state, &job_id, result)
        }
        Msg::ToastExpired { toast_id } => {
            state.expire_toast(toast_id);
            Vec::new()
        }
        Msg::BannerDismissed => {
            state.dismiss_banner();
            Vec::new()
        }
    };

    (state, effects)
}

fn search_if_mounted(state: &mut BoardState) -> Vec<Effect> {
    if !state.is_mounted() {
        return Vec::new();
    }
    let (generation, request) = state.begin_search();
    vec![Effect::RunSearch {
        generation,
        request,
    }]
}

fn resolve_apply(
    state: &mut BoardState,
    job_id: &str,
    result: Result<serde_json::Value, RequestFailure>,
) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(3);
    let (toast_kind, toast_text) = match result {
        Ok(payload) => {
            let receipt = ApplyReceipt::from_payload(&payload);
            state.set_apply_state(
                job_id,
                ApplyState::Applied {
                    already_applied: receipt.already_applied,
                },
            );
            effects.push(Effect::BroadcastApplicationsChanged);
            if receipt.already_applied {
                (ToastKind::Info, ALREADY_APPLIED_MESSAGE)
            } else {
                (ToastKind::Success, APPLIED_MESSAGE)
            }
        }
        // The backend already holds an application for this job.
        Err(RequestFailure::Conflict) => {
            state.set_apply_state(
                job_id,
                ApplyState::Applied {
                    already_applied: true,
                },
            );
            (ToastKind::Info, ALREADY_APPLIED_MESSAGE)
        }
        Err(failure) => {
            let message = apply_failure_message(failure);
            state.set_apply_state(
                job_id,
                ApplyState::Failed {
                    message: message.to_string(),
                },
            );
            effects.extend(escalate(failure));
            (ToastKind::Error, message)
        }
    };
    let (toast_id, after) = state.show_toast(toast_kind, toast_text);
    effects.push(Effect::ScheduleToastExpiry { toast_id, after });
    effects
}

fn escalate(failure: RequestFailure) -> Vec<Effect> {
    if failure == RequestFailure::Unauthorized {
        vec![Effect::RequireLogin]
    } else {
        Vec::new()
    }
}
