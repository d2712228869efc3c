//! Integration tests for hitboard-srv API endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - View, slice and metric listing endpoints
//! - Window, axes and selection control events
//! - Event bus fan-out of control events
//! - Dataset loading from disk

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use hitboard_common::config::SourceEncoding;
use hitboard_common::events::{EventBus, HitboardEvent};
use hitboard_core::{AxisChoice, ControlEvent, SelectionStore, Session};
use hitboard_srv::loader::{load_universe, load_universe_from_reader};
use hitboard_srv::{build_router, AppState};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot` method

const HEADER: &str = "track_name,artist(s)_name,in_spotify_playlists,streams,in_apple_playlists,in_deezer_playlists,key,mode,danceability_%,valence_%,energy_%,acousticness_%,instrumentalness_%,liveness_%,speechiness_%";

/// Test helper: twelve tracks, streams descending from "Track 01"
fn catalog_csv() -> String {
    let mut out = String::from(HEADER);
    for i in 1..=12u64 {
        let mode = if i % 3 == 0 { "Minor" } else { "Major" };
        let key = ["C", "C#", "D", "G"][(i % 4) as usize];
        out.push_str(&format!(
            "\nTrack {:02},Artist {},{},{},{},{},{},{},{},50,{},20,0,10,5",
            i,
            i,
            1000 - i * 10,
            (13 - i) * 1_000_000,
            100 - i,
            50 - i,
            key,
            mode,
            40 + i,
            60 + i,
        ));
    }
    out.push('\n');
    out
}

/// Test helper: app state over the in-memory catalog with window 5
fn setup_state() -> AppState {
    let csv = catalog_csv();
    let universe = load_universe_from_reader(csv.as_bytes(), SourceEncoding::Utf8, 100)
        .expect("Should load catalog");
    let session = Session::new(
        Arc::new(universe),
        5,
        AxisChoice::default(),
        SelectionStore::new(),
    );
    AppState::new(session, EventBus::new(64))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_router(setup_state());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "hitboard-srv");
    assert!(body["version"].is_string());
    assert_eq!(body["universe_size"], 12);
    assert_eq!(body["window"], 5);
}

#[tokio::test]
async fn test_health_reports_empty_catalog() {
    let universe = load_universe_from_reader(HEADER.as_bytes(), SourceEncoding::Utf8, 100)
        .expect("Header-only catalog should load");
    let session = Session::new(
        Arc::new(universe),
        10,
        AxisChoice::default(),
        SelectionStore::new(),
    );
    let app = build_router(AppState::new(session, EventBus::new(8)));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "empty");
    assert_eq!(body["universe_size"], 0);
    assert_eq!(body["window"], 0);
}

// =============================================================================
// View Endpoints
// =============================================================================

#[tokio::test]
async fn test_view_reflects_initial_window() {
    let app = build_router(setup_state());

    let response = app.oneshot(get("/api/view")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let view = &body["view"];
    assert_eq!(view["window"], 5);
    assert_eq!(view["slice_len"], 5);
    assert_eq!(view["popularity"]["title"], "Top 5 Songs Streaming on Spotify");
    assert_eq!(view["popularity"]["rows"][0]["track_name"], "Track 01");
    assert_eq!(view["popularity"]["rows"][0]["position"], 1);
    assert_eq!(view["metric_dots"].as_array().unwrap().len(), 5 * 6);
    assert_eq!(view["heatmap"].as_array().unwrap().len(), 5 * 6);
    assert_eq!(view["mode_split"]["scale_ceiling"].as_f64().unwrap(), 5.0 / 6.0);
    assert!(body["selection"].is_null());

    let marks = body["marks"].as_array().unwrap();
    assert_eq!(marks.len(), 5);
    assert_eq!(marks[0]["emphasis"], "Neutral");
    assert_eq!(marks[0]["colors"]["PopularityBar"], "steelblue");
}

#[tokio::test]
async fn test_slice_endpoint_positions() {
    let app = build_router(setup_state());

    let response = app.oneshot(get("/api/slice")).await.unwrap();
    let body = extract_json(response.into_body()).await;

    assert_eq!(body["window"], 5);
    assert_eq!(body["universe_size"], 12);
    let rows = body["rows"].as_array().unwrap();
    let positions: Vec<u64> = rows.iter().map(|r| r["position"].as_u64().unwrap()).collect();
    assert_eq!(positions, vec![1, 2, 3, 4, 5]);
    assert_eq!(rows[0]["spotify_rank"], 1);
}

#[tokio::test]
async fn test_metrics_endpoint_lists_all_metrics() {
    let app = build_router(setup_state());

    let response = app.oneshot(get("/api/metrics")).await.unwrap();
    let body = extract_json(response.into_body()).await;

    let metrics = body.as_array().unwrap();
    assert_eq!(metrics.len(), 7);
    assert_eq!(metrics[0]["column"], "danceability_%");
    assert_eq!(metrics[0]["title"], "Danceability %");
}

// =============================================================================
// Control Events
// =============================================================================

#[tokio::test]
async fn test_set_window_clamps_and_rederives() {
    let state = setup_state();
    let mut rx = state.events.subscribe();
    let app = build_router(state.clone());

    let response = app
        .oneshot(post_json("/api/window", json!({ "n": 500 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["window"], 12);
    assert_eq!(body["slice_len"], 12);

    let session = state.session.lock().await;
    assert_eq!(session.view().slice_len, 12);
    assert_eq!(session.view().stream_share.value, 100);
    drop(session);

    match rx.try_recv() {
        Ok(HitboardEvent::WindowChanged { window, slice_len, .. }) => {
            assert_eq!(window, 12);
            assert_eq!(slice_len, 12);
        }
        other => panic!("Expected WindowChanged, got {:?}", other),
    }
}

#[tokio::test]
async fn test_negative_window_clamps_to_zero() {
    let state = setup_state();
    let app = build_router(state.clone());

    let response = app
        .oneshot(post_json("/api/window", json!({ "n": -5 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["window"], 0);
    assert_eq!(body["slice_len"], 0);
    assert_eq!(state.session.lock().await.window(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_window_events_arrive_in_apply_order() {
    let state = setup_state();
    let mut rx = state.events.subscribe();

    let mut handles = Vec::new();
    for n in 1..=12 {
        let app = build_router(state.clone());
        handles.push(tokio::spawn(async move {
            app.oneshot(post_json("/api/window", json!({ "n": n })))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().status(), StatusCode::OK);
    }

    let mut last = None;
    while let Ok(event) = rx.try_recv() {
        if let HitboardEvent::WindowChanged { window, .. } = event {
            last = Some(window);
        }
    }
    assert_eq!(last, Some(state.session.lock().await.window()));
}

#[tokio::test]
async fn test_set_window_zero_gives_empty_views() {
    let state = setup_state();
    let app = build_router(state.clone());

    app.oneshot(post_json("/api/window", json!({ "n": 0 })))
        .await
        .unwrap();

    let session = state.session.lock().await;
    let view = session.view();
    assert_eq!(view.slice_len, 0);
    assert_eq!(view.popularity.max_streams, 0);
    assert_eq!(view.stream_share.value, 0);
    assert_eq!(view.mode_share.value, 0);
    assert!(view.metric_dots.is_empty());
}

#[tokio::test]
async fn test_set_axes() {
    let state = setup_state();
    let mut rx = state.events.subscribe();
    let app = build_router(state.clone());

    let response = app
        .oneshot(post_json(
            "/api/axes",
            json!({ "x": "valence_%", "y": "Speechiness %" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let session = state.session.lock().await;
    assert_eq!(session.view().correlation.x_title, "Valence %");
    assert_eq!(session.view().correlation.y_title, "Speechiness %");
    assert_eq!(session.view().correlation.points[0].x, 50);
    drop(session);

    assert!(matches!(
        rx.try_recv(),
        Ok(HitboardEvent::AxesChanged { ref x, ref y, .. }) if x == "valence_%" && y == "speechiness_%"
    ));
}

#[tokio::test]
async fn test_set_axes_unknown_metric_is_bad_request() {
    let state = setup_state();
    let app = build_router(state.clone());

    let response = app
        .oneshot(post_json("/api/axes", json!({ "x": "tempo", "y": "energy_%" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("tempo"));

    // Axes unchanged
    assert_eq!(state.session.lock().await.axes(), AxisChoice::default());
}

#[tokio::test]
async fn test_selection_round_trip_through_view() {
    let state = setup_state();
    let mut rx = state.events.subscribe();

    let response = build_router(state.clone())
        .oneshot(post_json("/api/selection", json!({ "track": "Track 02" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["track"], "Track 02");
    assert!(body["previous"].is_null());

    let response = build_router(state.clone())
        .oneshot(get("/api/view"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["selection"], "Track 02");

    let marks = body["marks"].as_array().unwrap();
    assert_eq!(marks[0]["emphasis"], "Dimmed");
    assert_eq!(marks[0]["colors"]["MetricDots"], "lightgray");
    assert_eq!(marks[1]["emphasis"], "Highlighted");
    assert_eq!(marks[1]["colors"]["MetricDots"], "darkgreen");

    assert!(matches!(
        rx.try_recv(),
        Ok(HitboardEvent::SelectionChanged { track: Some(ref t), previous: None, .. }) if t == "Track 02"
    ));
}

#[tokio::test]
async fn test_in_process_selection_reaches_event_bus() {
    let state = setup_state();
    let mut rx = state.events.subscribe();

    state
        .session
        .lock()
        .await
        .apply(ControlEvent::Select(Some("Track 03".to_string())));
    state.session.lock().await.apply(ControlEvent::Select(None));

    assert!(matches!(
        rx.try_recv(),
        Ok(HitboardEvent::SelectionChanged { track: Some(_), .. })
    ));
    assert!(matches!(
        rx.try_recv(),
        Ok(HitboardEvent::SelectionChanged { track: None, previous: Some(_), .. })
    ));
}

// =============================================================================
// Dataset Loading
// =============================================================================

#[test]
fn test_load_universe_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(catalog_csv().as_bytes()).unwrap();

    let universe = load_universe(file.path(), SourceEncoding::Utf8, 10).unwrap();
    assert_eq!(universe.len(), 10);
    assert_eq!(universe.items()[0].item.track_name, "Track 01");
}

#[test]
fn test_load_universe_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_universe(&dir.path().join("missing.csv"), SourceEncoding::Utf8, 100);
    assert!(matches!(result, Err(hitboard_common::Error::Io(_))));
}
