use serde::{Deserialize, Serialize};

use crate::dto::user::UserResponse;

/// `POST /api/auth/signin` body.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
}

/// `POST /api/auth/verify` body: the two query parameters of the emailed link.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoticeResponse {
    pub message: String,
}
