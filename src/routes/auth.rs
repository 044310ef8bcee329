use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::auth::normalize_email;
use crate::dto::auth::{AuthResponse, NoticeResponse, SignInRequest, VerifyRequest};
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::services::AuthService;
use crate::state::AppState;
use crate::validation::{FieldErrors, validate_email};

/// Sign-in link routes, mounted at `/api/auth`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signin", post(request_sign_in))
        .route("/verify", post(verify_sign_in))
}

/// Email a single-use sign-in link.
///
/// Mail delivery failures are logged and the caller still gets the same notice.
async fn request_sign_in(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignInRequest>,
) -> Result<Json<NoticeResponse>, AppError> {
    let mut errors = FieldErrors::new();
    errors.check("email", validate_email(&body.email));
    errors.into_result()?;

    let email = normalize_email(&body.email);

    let key = format!("signin:{email}");
    if !state
        .rate_limiter
        .check_policy(&key, state.config.signin_rate_limit)
    {
        tracing::warn!(email = %email, "Sign-in rate limit hit");
        return Err(AppError::TooManyRequests(
            "Too many sign-in requests. Try again later.".to_string(),
        ));
    }

    let link = AuthService::create_sign_in_link(&state.db, &state.config, &email).await?;
    if let Err(e) = state.mailer.send_sign_in(&link).await {
        tracing::error!(email = %email, "Failed to send sign-in email: {e:#}");
    } else {
        tracing::info!(email = %email, "Sign-in link issued");
    }

    Ok(Json(NoticeResponse {
        message: "Check your inbox for a sign-in link.".to_string(),
    }))
}

async fn verify_sign_in(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<VerifyRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response =
        AuthService::verify_sign_in(&state.db, &state.config, &body.email, &body.token).await?;
    Ok(Json(response))
}
