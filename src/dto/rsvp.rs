use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::to_iso;
use crate::entities::rsvp::{self, RsvpStatus};

/// `POST /api/sessions/{id}/rsvp` body. Both fields replace any previous values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    pub note: Option<String>,
    pub will_bring: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub status: RsvpStatus,
    pub note: Option<String>,
    pub will_bring: Option<String>,
    pub created_at: String,
}

impl From<rsvp::Model> for RsvpResponse {
    fn from(model: rsvp::Model) -> Self {
        Self {
            id: model.id,
            session_id: model.session_id,
            user_id: model.user_id,
            status: model.status,
            note: model.note,
            will_bring: model.will_bring,
            created_at: to_iso(&model.created_at),
        }
    }
}
