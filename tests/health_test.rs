mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn liveness_is_ok() {
    let app = common::test_app().await;
    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body.get("database").is_none());
}

#[tokio::test]
async fn api_health_pings_database() {
    let app = common::test_app().await;
    let (status, body) = app.get("/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = common::test_app().await;
    let (status, _) = app.get("/api/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
