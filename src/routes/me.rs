use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::auth::middleware::AuthUser;
use crate::dto::user::{FavoriteGamesRequest, ProfileResponse, UpdateProfileRequest};
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::services::UserService;
use crate::state::AppState;

/// Profile routes for the signed-in user, mounted at `/api/me`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).patch(update_profile))
        .route("/favorite-games", put(replace_favorite_games))
}

async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    Ok(Json(UserService::get_profile(&state.db, &user).await?))
}

async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let changes = body.validate()?;
    Ok(Json(UserService::update_profile(&state.db, user, changes).await?))
}

async fn replace_favorite_games(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<FavoriteGamesRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let names = body.validate()?;
    Ok(Json(
        UserService::replace_favorite_games(&state.db, &user, names).await?,
    ))
}
