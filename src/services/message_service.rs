use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::dto::message::MessageResponse;
use crate::entities::{game_session, message};
use crate::error::AppError;

pub struct MessageService;

impl MessageService {
    /// Append a message to a session thread. `body` must already be validated.
    pub async fn post_message(
        db: &DatabaseConnection,
        author_id: Uuid,
        session_id: Uuid,
        body: String,
    ) -> Result<MessageResponse, AppError> {
        Self::ensure_session(db, session_id).await?;

        let saved = message::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(session_id),
            author_id: Set(author_id),
            body: Set(body),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(db)
        .await
        .map_err(|e| AppError::Persistence(e.into()))?;

        tracing::info!(message_id = %saved.id, session_id = %session_id, "Message posted");
        Ok(saved.into())
    }

    /// Thread of a session, oldest first.
    pub async fn list_messages(
        db: &DatabaseConnection,
        session_id: Uuid,
    ) -> Result<Vec<MessageResponse>, AppError> {
        Self::ensure_session(db, session_id).await?;

        let messages = message::Entity::find()
            .filter(message::Column::SessionId.eq(session_id))
            .order_by_asc(message::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(messages.into_iter().map(Into::into).collect())
    }

    /// `NotFound` unless the session exists.
    pub async fn ensure_session(db: &DatabaseConnection, session_id: Uuid) -> Result<(), AppError> {
        game_session::Entity::find_by_id(session_id)
            .one(db)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found.")))
    }
}
