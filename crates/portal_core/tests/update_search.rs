use std::sync::Once;

use portal_core::{
    update, BannerKind, BoardState, Effect, FilterField, ListingStatus, Msg, RequestFailure,
    SearchParams, SearchRequest, SearchResponse, SearchSource, SortKey, FALLBACK_ADVISORY,
    SEARCH_FAILED_MESSAGE,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(portal_logging::initialize_for_tests);
}

fn mounted() -> (BoardState, Vec<Effect>) {
    update(BoardState::new(), Msg::Mounted)
}

fn search_generation(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::RunSearch { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("run search effect")
}

fn resolved(generation: u64, source: SearchSource, payload: Value) -> Msg {
    Msg::SearchResolved {
        generation,
        result: Ok(SearchResponse { source, payload }),
    }
}

fn change(state: BoardState, field: FilterField, value: &str) -> (BoardState, Vec<Effect>) {
    update(
        state,
        Msg::FilterChanged {
            field,
            value: value.to_string(),
        },
    )
}

#[test]
fn mount_with_blank_filters_requests_personalized_matches() {
    init_logging();
    let (mut state, effects) = mounted();

    assert_eq!(
        effects,
        vec![
            Effect::RunSearch {
                generation: 1,
                request: SearchRequest::Matches,
            },
            Effect::LoadFilterOptions { generation: 1 },
            Effect::LoadAppliedIds { generation: 1 },
        ]
    );
    assert_eq!(state.view().status, ListingStatus::Loading);
    assert!(state.consume_dirty());
}

#[test]
fn second_mount_is_ignored() {
    init_logging();
    let (state, _) = mounted();
    let (_state, effects) = update(state, Msg::Mounted);
    assert!(effects.is_empty());
}

#[test]
fn keyword_and_salary_filters_issue_filtered_search() {
    init_logging();
    let (state, _) = mounted();
    let (state, _) = change(state, FilterField::Keyword, "engineer");
    let (_state, effects) = change(state, FilterField::SalaryRange, "80000+");

    let Some(Effect::RunSearch { generation, request }) = effects.first() else {
        panic!("expected a search, got {effects:?}");
    };
    assert_eq!(*generation, 3);
    let SearchRequest::Filtered(params) = request else {
        panic!("expected filtered search");
    };
    assert_eq!(
        params,
        &SearchParams {
            keyword: Some("engineer".into()),
            min_salary: Some(80_000),
            ..SearchParams::default()
        }
    );
    assert!(!params.query_pairs().iter().any(|(key, _)| *key == "maxSalary"));
}

#[test]
fn unchanged_filter_value_does_not_refetch() {
    init_logging();
    let (state, _) = mounted();
    let (state, effects) = change(state, FilterField::Location, "Remote");
    assert_eq!(effects.len(), 1);
    let (_state, effects) = change(state, FilterField::Location, "Remote");
    assert!(effects.is_empty());
}

#[test]
fn filters_edited_before_mount_apply_on_mount() {
    init_logging();
    let (state, effects) = change(BoardState::new(), FilterField::JobType, "CONTRACT");
    assert!(effects.is_empty());

    let (_state, effects) = update(state, Msg::Mounted);
    assert!(matches!(
        effects.first(),
        Some(Effect::RunSearch {
            request: SearchRequest::Filtered(SearchParams { job_type: Some(t), .. }),
            ..
        }) if t == "CONTRACT"
    ));
}

#[test]
fn results_are_normalized_and_sorted_newest_first() {
    init_logging();
    let (state, effects) = mounted();
    let generation = search_generation(&effects);
    let payload = json!({"content": [
        {"job": {"id": 1, "title": "Older", "postedAt": "2024-01-01T00:00:00Z"}},
        {"jobPost": {"id": 2, "title": "Newer", "postedAt": "2024-02-01T00:00:00Z"}}
    ]});

    let (state, effects) = update(state, resolved(generation, SearchSource::Primary, payload));
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.status, ListingStatus::Ready);
    assert_eq!(view.banner, None);
    let titles: Vec<_> = view.cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Newer", "Older"]);
    assert_eq!(view.cards[0].posted_on, "2024-02-01");
}

#[test]
fn stale_search_response_never_overwrites_newer_state() {
    init_logging();
    let (state, effects) = mounted();
    let first = search_generation(&effects);
    let (state, effects) = change(state, FilterField::Keyword, "rust");
    let second = search_generation(&effects);
    assert!(second > first);

    let (state, _) = update(
        state,
        resolved(second, SearchSource::Primary, json!([{"id": "new", "title": "Rust dev"}])),
    );
    let (mut state, effects) = update(
        state,
        resolved(first, SearchSource::Primary, json!([{"id": "old", "title": "Anything"}])),
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.cards.len(), 1);
    assert_eq!(view.cards[0].job_id, "new");
    assert!(state.consume_dirty());
    let (mut state, _) = update(
        state,
        resolved(first, SearchSource::Primary, json!([{"id": "old"}])),
    );
    assert!(!state.consume_dirty());
}

#[test]
fn response_after_unmount_is_discarded() {
    init_logging();
    let (state, effects) = mounted();
    let generation = search_generation(&effects);
    let (state, _) = update(state, Msg::Unmounted);
    let (state, _) = update(
        state,
        resolved(generation, SearchSource::Primary, json!([{"id": 1}])),
    );
    assert!(state.listings().is_empty());
}

#[test]
fn fallback_results_carry_an_advisory_banner() {
    init_logging();
    let (state, effects) = mounted();
    let generation = search_generation(&effects);
    let (state, effects) = update(
        state,
        resolved(
            generation,
            SearchSource::Fallback {
                reason: RequestFailure::Timeout,
            },
            json!({"jobs": [{"id": 5, "title": "Public"}]}),
        ),
    );

    assert!(effects.is_empty());
    let view = state.view();
    let banner = view.banner.expect("advisory banner");
    assert_eq!(banner.kind, BannerKind::Advisory);
    assert_eq!(banner.text, FALLBACK_ADVISORY);
    assert_eq!(view.status, ListingStatus::Ready);

    let (state, _) = update(state, Msg::BannerDismissed);
    assert_eq!(state.view().banner, None);
}

#[test]
fn total_failure_is_an_error_not_an_empty_list() {
    init_logging();
    let (state, effects) = mounted();
    let generation = search_generation(&effects);
    let (failed, _) = update(
        state.clone(),
        Msg::SearchResolved {
            generation,
            result: Err(RequestFailure::Network),
        },
    );
    let view = failed.view();
    assert_eq!(
        view.status,
        ListingStatus::Error(SEARCH_FAILED_MESSAGE.to_string())
    );
    assert_eq!(view.banner.map(|b| b.kind), Some(BannerKind::Error));
    assert!(view.cards.is_empty());

    let (empty, _) = update(
        state,
        resolved(generation, SearchSource::Primary, json!({"items": []})),
    );
    assert_eq!(empty.view().status, ListingStatus::Empty);
    assert_eq!(empty.view().banner, None);
}

#[test]
fn unauthorized_primary_escalates_to_login() {
    init_logging();
    let (state, effects) = mounted();
    let generation = search_generation(&effects);
    let (_state, effects) = update(
        state,
        resolved(
            generation,
            SearchSource::Fallback {
                reason: RequestFailure::Unauthorized,
            },
            json!([]),
        ),
    );
    assert_eq!(effects, vec![Effect::RequireLogin]);
}

#[test]
fn sort_change_reorders_immediately_and_refetches() {
    init_logging();
    let (state, effects) = mounted();
    let generation = search_generation(&effects);
    let (state, _) = update(
        state,
        resolved(
            generation,
            SearchSource::Primary,
            json!([
                {"id": 1, "title": "banana", "salary": 10},
                {"id": 2, "title": "Apple", "salary": 30}
            ]),
        ),
    );

    let (state, effects) = update(state, Msg::SortChanged(SortKey::Title));
    let titles: Vec<_> = state.listings().iter().map(|l| l.title.clone()).collect();
    assert_eq!(titles, vec!["Apple", "banana"]);
    assert_eq!(search_generation(&effects), generation + 1);

    let (_state, effects) = update(state, Msg::SortChanged(SortKey::Title));
    assert!(effects.is_empty());
}

#[test]
fn filter_options_load_and_ignore_failures() {
    init_logging();
    let (state, _) = mounted();
    let (state, _) = update(
        state,
        Msg::FilterOptionsLoaded {
            generation: 1,
            result: Ok(json!({"types": ["FULL_TIME"], "locations": ["Oslo"]})),
        },
    );
    assert_eq!(state.view().options.types, vec!["FULL_TIME"]);

    let (state, effects) = update(
        state,
        Msg::FilterOptionsLoaded {
            generation: 1,
            result: Err(RequestFailure::Server(500)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().options.locations, vec!["Oslo"]);
}
