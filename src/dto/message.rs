use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::to_iso;
use crate::entities::message;
use crate::error::AppError;
use crate::validation::{FieldErrors, max_chars};

pub const MAX_BODY_CHARS: usize = 500;

/// `POST /api/sessions/{id}/messages` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostMessageRequest {
    pub body: Option<String>,
}

impl PostMessageRequest {
    /// Return the message body if it holds 1 to 500 characters.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` on a missing, empty or oversized body.
    pub fn validate(self) -> Result<String, AppError> {
        let mut errors = FieldErrors::new();
        let body = self.body.unwrap_or_default();

        if body.is_empty() {
            errors.add("body", "Message cannot be empty.");
        }
        errors.check("body", max_chars(&body, MAX_BODY_CHARS, "Message"));

        errors.into_result()?;
        Ok(body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: String,
}

impl From<message::Model> for MessageResponse {
    fn from(model: message::Model) -> Self {
        Self {
            id: model.id,
            session_id: model.session_id,
            author_id: model.author_id,
            body: model.body,
            created_at: to_iso(&model.created_at),
        }
    }
}
