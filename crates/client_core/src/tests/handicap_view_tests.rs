use super::*;

use std::time::Duration;

use crate::test_support::{Call, Gate, RecordingApi};

#[tokio::test]
async fn new_state_is_loading_and_issues_no_request() {
    let api = Arc::new(RecordingApi::ok(Some(4.2)));
    let view = HandicapViewState::new(api.clone());

    assert_eq!(view.snapshot(), HandicapSnapshot::Loading);
    assert!(!view.refresh_enabled());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn start_refreshes_once() {
    let api = Arc::new(RecordingApi::ok(Some(4.2)));
    let view = HandicapViewState::start(api.clone()).await;

    assert_eq!(view.snapshot(), HandicapSnapshot::Available(Some(4.2)));
    assert_eq!(api.calls(), vec![Call::Fetch]);
}

#[tokio::test]
async fn refresh_keeps_no_rounds_distinct_from_zero() {
    let api = Arc::new(RecordingApi::ok(None));
    let view = HandicapViewState::start(api.clone()).await;
    assert_eq!(view.snapshot(), HandicapSnapshot::Available(None));

    api.set_handicap(Some(0.0));
    assert_eq!(view.refresh().await, HandicapSnapshot::Available(Some(0.0)));
}

#[tokio::test]
async fn failed_fetch_settles_in_generic_error() {
    let api = Arc::new(RecordingApi::ok(None).failing_fetch("connection refused"));
    let view = HandicapViewState::start(api).await;

    assert_eq!(
        view.snapshot(),
        HandicapSnapshot::Error("Failed to load handicap".to_string())
    );
    assert!(view.refresh_enabled());
}

#[tokio::test]
async fn sequential_refreshes_with_same_response_agree() {
    let api = Arc::new(RecordingApi::ok(Some(12.3)));
    let view = HandicapViewState::new(api.clone());

    let first = view.refresh().await;
    let second = view.refresh().await;

    assert_eq!(first, HandicapSnapshot::Available(Some(12.3)));
    assert_eq!(first, second);
    assert_eq!(api.calls(), vec![Call::Fetch, Call::Fetch]);
}

#[tokio::test]
async fn manual_refresh_refused_while_loading() {
    let gate = Gate::default();
    let api = Arc::new(RecordingApi::ok(Some(8.0)).gated_fetch(gate.clone()));
    let view = HandicapViewState::new(api.clone());
    assert_eq!(
        view.request_refresh().await,
        Err(RefreshRejected::AlreadyLoading)
    );

    let in_flight = tokio::spawn({
        let view = view.clone();
        async move { view.refresh().await }
    });
    gate.entered.notified().await;

    assert_eq!(view.snapshot(), HandicapSnapshot::Loading);
    assert_eq!(
        view.request_refresh().await,
        Err(RefreshRejected::AlreadyLoading)
    );

    gate.release.notify_one();
    let settled = in_flight.await.expect("refresh task");
    assert_eq!(settled, HandicapSnapshot::Available(Some(8.0)));
    assert!(view.refresh_enabled());
    assert_eq!(api.calls(), vec![Call::Fetch]);
}

#[tokio::test]
async fn manual_refresh_allowed_after_error() {
    let api = Arc::new(RecordingApi::ok(None).failing_fetch("boom"));
    let view = HandicapViewState::start(api.clone()).await;

    let result = view.request_refresh().await;
    assert_eq!(
        result,
        Ok(HandicapSnapshot::Error(LOAD_FAILED_MESSAGE.to_string()))
    );
    assert_eq!(api.calls().len(), 2);
}

#[tokio::test]
async fn subscribers_see_loading_then_terminal_state() {
    let gate = Gate::default();
    let api = Arc::new(RecordingApi::ok(Some(3.3)).gated_fetch(gate.clone()));
    let view = HandicapViewState::new(api);
    let mut rx = view.subscribe();

    let in_flight = tokio::spawn({
        let view = view.clone();
        async move { view.refresh().await }
    });
    gate.entered.notified().await;
    assert_eq!(*rx.borrow(), HandicapSnapshot::Loading);

    gate.release.notify_one();
    in_flight.await.expect("refresh task");
    rx.changed().await.expect("snapshot changed");
    assert_eq!(*rx.borrow_and_update(), HandicapSnapshot::Available(Some(3.3)));
}

#[tokio::test]
async fn abandoned_refresh_does_not_stay_loading() {
    let gate = Gate::default();
    let api = Arc::new(RecordingApi::ok(Some(1.0)).gated_fetch(gate));
    let view = HandicapViewState::new(api);

    let outcome = tokio::time::timeout(Duration::from_millis(20), view.refresh()).await;
    assert!(outcome.is_err(), "gated fetch should not complete");

    assert_eq!(
        view.snapshot(),
        HandicapSnapshot::Error(LOAD_FAILED_MESSAGE.to_string())
    );
    assert!(view.refresh_enabled());
}
