use std::time::Duration;

use portal_core::{
    update, ApplyButton, ApplyState, BoardState, Effect, Msg, RequestFailure, SearchResponse,
    SearchSource, ToastKind, ALREADY_APPLIED_MESSAGE, APPLIED_MESSAGE, JOB_NOT_FOUND_MESSAGE,
    TOAST_DURATION,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    portal_logging::initialize_for_tests();
}

/// A mounted board showing jobs `a`, `b` and `c`.
fn board() -> BoardState {
    let (state, _) = update(BoardState::new(), Msg::Mounted);
    let (state, _) = update(
        state,
        Msg::SearchResolved {
            generation: 1,
            result: Ok(SearchResponse {
                source: SearchSource::Primary,
                payload: json!([
                    {"id": "a", "title": "A"},
                    {"id": "b", "title": "B"},
                    {"id": "c", "title": "C"}
                ]),
            }),
        },
    );
    state
}

fn click(state: BoardState, job_id: &str) -> (BoardState, Vec<Effect>) {
    update(
        state,
        Msg::ApplyClicked {
            job_id: job_id.to_string(),
        },
    )
}

fn resolve(
    state: BoardState,
    job_id: &str,
    result: Result<serde_json::Value, RequestFailure>,
) -> (BoardState, Vec<Effect>) {
    update(
        state,
        Msg::ApplyResolved {
            job_id: job_id.to_string(),
            result,
        },
    )
}

fn button(state: &BoardState, job_id: &str) -> ApplyButton {
    state
        .view()
        .cards
        .into_iter()
        .find(|card| card.job_id == job_id)
        .map(|card| card.apply)
        .expect("card present")
}

#[test]
fn double_click_while_pending_submits_once() {
    init_logging();
    let (state, first) = click(board(), "a");
    let (state, second) = click(state, "a");

    assert_eq!(
        first,
        vec![Effect::SubmitApplication {
            job_id: "a".to_string()
        }]
    );
    assert!(second.is_empty());
    assert_eq!(button(&state, "a"), ApplyButton::Applying);
    assert!(!button(&state, "a").enabled());
}

#[test]
fn successful_apply_marks_applied_and_broadcasts() {
    init_logging();
    let (state, _) = click(board(), "a");
    let (state, effects) = resolve(state, "a", Ok(json!({"id": 99, "jobId": "a"})));

    let view = state.view();
    let toast = view.toast.clone().expect("toast");
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.text, APPLIED_MESSAGE);
    assert_eq!(
        effects,
        vec![
            Effect::BroadcastApplicationsChanged,
            Effect::ScheduleToastExpiry {
                toast_id: toast.id,
                after: TOAST_DURATION,
            },
        ]
    );
    assert_eq!(button(&state, "a"), ApplyButton::Applied);
    assert!(state.applied_ids().contains("a"));

    let (_state, effects) = click(state, "a");
    assert!(effects.is_empty());
}

#[test]
fn already_applied_response_uses_a_different_toast() {
    init_logging();
    let (state, _) = click(board(), "b");
    let (state, _) = resolve(state, "b", Ok(json!({"alreadyApplied": true})));

    assert_eq!(
        state.apply_state("b"),
        ApplyState::Applied {
            already_applied: true
        }
    );
    assert_eq!(button(&state, "b"), ApplyButton::Applied);
    let toast = state.view().toast.expect("toast");
    assert_eq!(toast.kind, ToastKind::Info);
    assert_eq!(toast.text, ALREADY_APPLIED_MESSAGE);
    assert_ne!(toast.text, APPLIED_MESSAGE);
}

#[test]
fn conflict_is_reconciled_as_already_applied_without_broadcast() {
    init_logging();
    let (state, _) = click(board(), "c");
    let (state, effects) = resolve(state, "c", Err(RequestFailure::Conflict));

    assert!(!effects.contains(&Effect::BroadcastApplicationsChanged));
    assert_eq!(button(&state, "c"), ApplyButton::Applied);
    assert_eq!(
        state.view().toast.map(|t| t.text),
        Some(ALREADY_APPLIED_MESSAGE.to_string())
    );
}

#[test]
fn failure_allows_retry_and_keeps_job_unapplied() {
    init_logging();
    let (state, _) = click(board(), "a");
    let (state, effects) = resolve(state, "a", Err(RequestFailure::NotFound));

    assert!(!state.applied_ids().contains("a"));
    assert_eq!(button(&state, "a"), ApplyButton::Retry);
    let card = state
        .view()
        .cards
        .into_iter()
        .find(|c| c.job_id == "a")
        .unwrap();
    assert_eq!(card.apply_error.as_deref(), Some(JOB_NOT_FOUND_MESSAGE));
    assert!(matches!(
        effects.as_slice(),
        [Effect::ScheduleToastExpiry { .. }]
    ));

    let (state, effects) = click(state, "a");
    assert_eq!(effects.len(), 1);
    assert_eq!(state.apply_state("a"), ApplyState::Pending);
}

#[test]
fn unauthorized_apply_requires_login() {
    init_logging();
    let (state, _) = click(board(), "a");
    let (_state, effects) = resolve(state, "a", Err(RequestFailure::Unauthorized));
    assert!(effects.contains(&Effect::RequireLogin));
}

#[test]
fn toast_expires_only_for_its_own_id() {
    init_logging();
    let state = board().with_toast_duration(Duration::from_millis(10));
    let (state, _) = click(state, "a");
    let (state, effects) = resolve(state, "a", Err(RequestFailure::Timeout));
    let Some(Effect::ScheduleToastExpiry { toast_id, after }) = effects.last().cloned() else {
        panic!("expected a toast expiry");
    };
    assert_eq!(after, Duration::from_millis(10));

    let (state, _) = click(state, "b");
    let (state, _) = resolve(state, "b", Ok(json!({})));
    let newer = state.view().toast.expect("toast").id;
    assert!(newer > toast_id);

    let (state, _) = update(state, Msg::ToastExpired { toast_id });
    assert!(state.view().toast.is_some());
    let (state, _) = update(state, Msg::ToastExpired { toast_id: newer });
    assert!(state.view().toast.is_none());
}

#[test]
fn history_seeds_applied_badges() {
    init_logging();
    let (state, effects) = update(
        board(),
        Msg::AppliedIdsLoaded {
            generation: 1,
            result: Ok(json!([{"jobId": "b"}, {"job": {"id": "c"}}])),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(button(&state, "a"), ApplyButton::Apply);
    assert_eq!(button(&state, "b"), ApplyButton::Applied);
    assert_eq!(button(&state, "c"), ApplyButton::Applied);
    assert_eq!(state.view().applied_count, 2);

    let (_state, effects) = click(state, "b");
    assert!(effects.is_empty());
}

#[test]
fn failed_history_reload_keeps_known_ids() {
    init_logging();
    let (state, _) = update(
        board(),
        Msg::AppliedIdsLoaded {
            generation: 1,
            result: Ok(json!([{"jobId": "a"}])),
        },
    );
    let (state, effects) = update(state, Msg::ApplicationsChanged);
    assert_eq!(effects, vec![Effect::LoadAppliedIds { generation: 2 }]);

    let (state, _) = update(
        state,
        Msg::AppliedIdsLoaded {
            generation: 2,
            result: Err(RequestFailure::Network),
        },
    );
    assert!(state.applied_ids().contains("a"));
}

#[test]
fn stale_history_load_is_ignored() {
    init_logging();
    let (state, _) = update(board(), Msg::ApplicationsChanged);
    let (state, _) = update(
        state,
        Msg::AppliedIdsLoaded {
            generation: 1,
            result: Ok(json!([{"jobId": "a"}])),
        },
    );
    assert!(state.applied_ids().is_empty());
}

#[test]
fn blank_job_id_is_a_noop() {
    init_logging();
    let state = board();
    let (next, effects) = click(state.clone(), "  ");
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn listing_without_id_cannot_be_applied_to() {
    init_logging();
    let (state, _) = update(BoardState::new(), Msg::Mounted);
    let (state, _) = update(
        state,
        Msg::SearchResolved {
            generation: 1,
            result: Ok(SearchResponse {
                source: SearchSource::Primary,
                payload: json!([{"title": "Mystery"}]),
            }),
        },
    );
    let card = &state.view().cards[0];
    assert_eq!(card.apply, ApplyButton::Unavailable);
    assert!(!card.apply.enabled());
}

#[test]
fn late_apply_result_for_idle_job_is_ignored() {
    init_logging();
    let state = board();
    let (next, effects) = resolve(state.clone(), "a", Ok(json!({})));
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn apply_in_flight_at_unmount_can_be_retried_after_remount() {
    init_logging();
    let (state, _) = click(board(), "a");
    let (state, _) = update(state, Msg::Unmounted);
    let (state, effects) = resolve(state, "a", Err(RequestFailure::Timeout));
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::Mounted);
    let Some(Effect::RunSearch { generation, .. }) = effects.first().cloned() else {
        panic!("expected a search on remount, got {effects:?}");
    };
    let (state, _) = update(
        state,
        Msg::SearchResolved {
            generation,
            result: Ok(SearchResponse {
                source: SearchSource::Primary,
                payload: json!([{"id": "a", "title": "A"}]),
            }),
        },
    );
    assert_eq!(state.apply_state("a"), ApplyState::Idle);
    assert_eq!(button(&state, "a"), ApplyButton::Apply);

    let (state, effects) = click(state, "a");
    assert_eq!(
        effects,
        vec![Effect::SubmitApplication {
            job_id: "a".to_string()
        }]
    );
    assert_eq!(button(&state, "a"), ApplyButton::Applying);
}
