use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::dto::message::{MessageResponse, PostMessageRequest};
use crate::dto::rsvp::{RsvpRequest, RsvpResponse};
use crate::dto::session::{
    CreateSessionRequest, ListSessionsQuery, SearchSessionsRequest, SessionSummary,
};
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::services::{MessageService, RsvpService, SessionService};
use crate::state::AppState;

/// Session routes, mounted at `/api/sessions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/search", post(search_sessions))
        .route("/{id}", get(get_session))
        .route("/{id}/rsvp", post(upsert_rsvp))
        .route("/{id}/messages", get(list_messages).post(post_message))
}

async fn create_session(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<CreateSessionRequest>,
) -> Result<Json<SessionSummary>, AppError> {
    let new_session = body.validate()?;
    let summary = SessionService::create_session(&state.db, user.id, new_session).await?;
    Ok(Json(summary))
}

async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<Vec<SessionSummary>>, AppError> {
    let sessions = SessionService::list_sessions(&state.db, query.limit()).await?;
    Ok(Json(sessions))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    Ok(Json(SessionService::summarize(&state.db, id).await?))
}

async fn search_sessions(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ApiJson(body): ApiJson<SearchSessionsRequest>,
) -> Result<Json<Vec<SessionSummary>>, AppError> {
    let filter = body.validate()?;
    let sessions = SessionService::search_sessions(&state.db, filter).await?;
    Ok(Json(sessions))
}

async fn upsert_rsvp(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<RsvpRequest>,
) -> Result<Json<RsvpResponse>, AppError> {
    let rsvp = RsvpService::upsert_rsvp(&state.db, user.id, id, body).await?;
    Ok(Json(rsvp))
}

async fn list_messages(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    Ok(Json(MessageService::list_messages(&state.db, id).await?))
}

async fn post_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<PostMessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let body = body.validate()?;
    MessageService::ensure_session(&state.db, id).await?;

    let key = format!("message:{}", user.id);
    if !state
        .rate_limiter
        .check_policy(&key, state.config.message_rate_limit)
    {
        tracing::warn!(user_id = %user.id, "Message rate limit hit");
        return Err(AppError::TooManyRequests(
            "Too many messages, slow down.".to_string(),
        ));
    }

    let message = MessageService::post_message(&state.db, user.id, id, body).await?;
    Ok(Json(message))
}
