mod common;

use axum::http::StatusCode;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use tableronde_api::entities::verification_token;

/// Pull the token out of the last sign-in link that was "sent".
fn last_token(app: &common::TestApp) -> String {
    app.mailer
        .sent()
        .last()
        .and_then(|email| email.url.split("token=").nth(1).map(str::to_string))
        .unwrap_or_default()
}

#[tokio::test]
async fn sign_in_link_flow() {
    let app = common::test_app().await;

    let (status, body) = app
        .post(
            "/api/auth/signin",
            None,
            &json!({ "email": "  Alice@Example.com " }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert!(
        sent[0]
            .url
            .starts_with("http://localhost:3001/signin/verify?email=alice%40example.com&token=")
    );

    assert_eq!(sent[0].expires_in_secs, app.config.signin_token_ttl_secs);
    assert!(sent[0].html().contains("Il expirera dans 10 minutes."));

    let token = last_token(&app);
    assert_eq!(token.len(), 32);

    let (status, auth) = app
        .post(
            "/api/auth/verify",
            None,
            &json!({ "email": "alice@example.com", "token": token }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "verify failed: {auth}");
    assert_eq!(auth["user"]["email"], "alice@example.com");

    let jwt = auth["token"].as_str().unwrap_or_default();
    let (status, me) = app.get("/api/me", Some(jwt)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], auth["user"]["id"]);
    assert_eq!(me["radiusKmDefault"], 10);
}

#[tokio::test]
async fn sign_in_token_is_single_use() {
    let app = common::test_app().await;
    app.post("/api/auth/signin", None, &json!({ "email": "bob@example.com" }))
        .await;
    let token = last_token(&app);
    let body = json!({ "email": "bob@example.com", "token": token });

    let (status, _) = app.post("/api/auth/verify", None, &body).await;
    assert_eq!(status, StatusCode::OK);

    let (status, error) = app.post("/api/auth/verify", None, &body).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error["error"]["code"], "UNAUTHORIZED");

    let remaining = verification_token::Entity::find()
        .count(&app.db)
        .await
        .unwrap_or_default();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn wrong_token_or_email_is_rejected() {
    let app = common::test_app().await;
    app.post("/api/auth/signin", None, &json!({ "email": "carol@example.com" }))
        .await;
    let token = last_token(&app);

    let (status, _) = app
        .post(
            "/api/auth/verify",
            None,
            &json!({ "email": "carol@example.com", "token": "x".repeat(32) }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/api/auth/verify",
            None,
            &json!({ "email": "mallory@example.com", "token": token }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sign_in_validates_email() {
    let app = common::test_app().await;

    let (status, body) = app
        .post("/api/auth/signin", None, &json!({ "email": "not-an-email" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["fields"]["email"].is_array());
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn sign_in_is_rate_limited_per_email() {
    let app = common::test_app().await;
    let body = json!({ "email": "dave@example.com" });

    for _ in 0..app.config.signin_rate_limit.limit {
        let (status, _) = app.post("/api/auth/signin", None, &body).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = app.post("/api/auth/signin", None, &body).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, _) = app
        .post("/api/auth/signin", None, &json!({ "email": "erin@example.com" }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn any_outstanding_link_works() {
    let app = common::test_app().await;
    let body = json!({ "email": "frank@example.com" });

    app.post("/api/auth/signin", None, &body).await;
    let first = last_token(&app);
    app.post("/api/auth/signin", None, &body).await;

    let (status, _) = app
        .post(
            "/api/auth/verify",
            None,
            &json!({ "email": "frank@example.com", "token": first }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}
