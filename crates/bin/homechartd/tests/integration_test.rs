//! End-to-end smoke tests for the full homechartd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repos,
//! real services, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot`. No TCP port is bound; the peer address is
//! injected as a [`ConnectInfo`] extension.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode, header};
use chrono::Duration;
use http_body_util::BodyExt;
use homechart_adapter_http_axum::router;
use homechart_adapter_http_axum::state::AppState;
use homechart_adapter_storage_sqlite_sqlx::{
    Config, SqliteReadingRepository, SqliteSessionStore,
};
use homechart_app::access::{AccessPolicy, AccessService};
use homechart_app::services::chart_service::ChartService;
use homechart_domain::id::HomeId;
use tower::ServiceExt;

type State = AppState<SqliteReadingRepository, SqliteSessionStore>;

const TRUSTED: &str = "127.0.0.1:50000";
const UNTRUSTED: &str = "203.0.113.9:50000";

/// Build fully-wired state backed by an in-memory `SQLite` database.
async fn state() -> State {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");

    let pool = db.pool().clone();

    let reading_repo = SqliteReadingRepository::new(pool.clone());
    let session_store = SqliteSessionStore::new(pool);

    AppState::new(
        ChartService::new(reading_repo),
        AccessService::new(AccessPolicy::default(), session_store),
    )
}

fn from_addr(addr: &str) -> axum::http::request::Builder {
    let addr: SocketAddr = addr.parse().unwrap();
    Request::builder().extension(ConnectInfo(addr))
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_reading(state: &State, home: i64, at: &str, value: f64) {
    let resp = router::build(state.clone())
        .oneshot(
            from_addr(TRUSTED)
                .method("POST")
                .uri(format!(
                    "/api/sensors/living.humidity/readings?homeId={home}"
                ))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(
                    r#"{{"recordedAt":"{at}","value":{value}}}"#
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

const CHART_URI: &str = "/api/sensors/living.humidity/chart?from=2024-01-01T00:00:00Z&to=2024-01-01T00:01:40Z&bins=5";

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = router::build(state().await)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_resample_stored_readings_for_trusted_caller() {
    let state = state().await;
    post_reading(&state, 1, "2024-01-01T00:00:00Z", 0.0).await;
    post_reading(&state, 1, "2024-01-01T00:00:50Z", 100.0).await;
    post_reading(&state, 1, "2024-01-01T00:01:40Z", 0.0).await;

    let resp = router::build(state)
        .oneshot(
            from_addr(TRUSTED)
                .uri(format!("{CHART_URI}&homeId=1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(
        json,
        serde_json::json!({
            "1704067200000": 0.0,
            "1704067220000": 40.0,
            "1704067240000": 80.0,
            "1704067260000": 80.0,
            "1704067280000": 40.0,
        })
    );
}

#[tokio::test]
async fn should_keep_homes_apart() {
    let state = state().await;
    post_reading(&state, 1, "2024-01-01T00:00:00Z", 10.0).await;
    post_reading(&state, 2, "2024-01-01T00:00:00Z", 99.0).await;

    let resp = router::build(state)
        .oneshot(
            from_addr(TRUSTED)
                .uri(format!("{CHART_URI}&homeId=1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(resp).await;
    assert!(
        json.as_object()
            .unwrap()
            .values()
            .all(|value| *value == 10.0)
    );
}

#[tokio::test]
async fn should_fill_empty_range_with_zeros() {
    let resp = router::build(state().await)
        .oneshot(
            from_addr(TRUSTED)
                .uri(format!("{CHART_URI}&homeId=1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 5);
    assert!(object.values().all(|value| *value == 0.0));
}

#[tokio::test]
async fn should_return_error_envelope_for_zero_bins() {
    let resp = router::build(state().await)
        .oneshot(
            from_addr(TRUSTED)
                .uri("/api/sensors/living.humidity/chart?bins=0&homeId=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(resp).await;
    assert_eq!(json["statusCode"], 500);
    assert_eq!(json["errorMessage"], "bin count must be positive, got 0");
}

#[tokio::test]
async fn should_return_error_envelope_for_missing_home_id() {
    let resp = router::build(state().await)
        .oneshot(
            from_addr(TRUSTED)
                .uri(CHART_URI)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(resp).await;
    assert_eq!(json["statusCode"], 500);
}

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_reject_untrusted_caller_without_session() {
    let resp = router::build(state().await)
        .oneshot(
            from_addr(UNTRUSTED)
                .uri(format!("{CHART_URI}&homeId=1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["statusCode"], 401);
}

#[tokio::test]
async fn should_serve_session_home_and_ignore_home_param_for_untrusted_caller() {
    let state = state().await;
    post_reading(&state, 4, "2024-01-01T00:00:00Z", 55.0).await;
    post_reading(&state, 5, "2024-01-01T00:00:00Z", 1.0).await;
    let token = state
        .access_service
        .open_session(HomeId::new(4).unwrap(), Duration::hours(1))
        .await
        .unwrap();

    let resp = router::build(state)
        .oneshot(
            from_addr(UNTRUSTED)
                .uri(format!("{CHART_URI}&homeId=5"))
                .header("x-session-token", token.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert!(
        json.as_object()
            .unwrap()
            .values()
            .all(|value| *value == 55.0)
    );
}

#[tokio::test]
async fn should_reject_expired_session() {
    let state = state().await;
    let token = state
        .access_service
        .open_session(HomeId::new(4).unwrap(), Duration::seconds(-1))
        .await
        .unwrap();

    let resp = router::build(state)
        .oneshot(
            from_addr(UNTRUSTED)
                .uri(CHART_URI)
                .header("x-session-token", token.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
