mod auth;
mod health;
mod me;
mod sessions;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health`: liveness
/// - `/api/health`: liveness plus database ping
/// - `/api/auth/*`: sign-in links
/// - `/api/me/*`: profile of the signed-in user
/// - `/api/sessions/*`: sessions, RSVPs and message threads
pub fn router() -> Router<AppState> {
    let api = Router::new()
        .merge(health::api_router())
        .nest("/auth", auth::router())
        .nest("/me", me::router())
        .nest("/sessions", sessions::router());

    Router::new()
        .merge(health::root_router())
        .nest("/api", api)
}
