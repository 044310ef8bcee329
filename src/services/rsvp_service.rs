use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

use crate::dto::rsvp::{RsvpRequest, RsvpResponse};
use crate::entities::game_session;
use crate::entities::rsvp::{self, RsvpStatus};
use crate::error::AppError;

pub struct RsvpService;

impl RsvpService {
    /// Create or replace the caller's RSVP to a session.
    ///
    /// The write is a single insert keyed on `(session_id, user_id)` that updates
    /// status, note and `will_bring` on conflict, so concurrent submissions for the
    /// same pair collapse into one row. Status is reset to `PENDING` and
    /// `created_at` to now on every submission. Capacity is not checked.
    pub async fn upsert_rsvp(
        db: &DatabaseConnection,
        user_id: Uuid,
        session_id: Uuid,
        request: RsvpRequest,
    ) -> Result<RsvpResponse, AppError> {
        let txn = db.begin().await?;

        game_session::Entity::find_by_id(session_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found.")))?;

        let row = rsvp::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(session_id),
            user_id: Set(user_id),
            status: Set(RsvpStatus::Pending),
            note: Set(request.note),
            will_bring: Set(request.will_bring),
            created_at: Set(Utc::now().fixed_offset()),
        };

        rsvp::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([rsvp::Column::SessionId, rsvp::Column::UserId])
                    .update_columns([
                        rsvp::Column::Status,
                        rsvp::Column::Note,
                        rsvp::Column::WillBring,
                        rsvp::Column::CreatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| AppError::Persistence(e.into()))?;

        let saved = rsvp::Entity::find()
            .filter(rsvp::Column::SessionId.eq(session_id))
            .filter(rsvp::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::Persistence(anyhow::anyhow!("RSVP missing after upsert"))
            })?;

        txn.commit().await?;

        tracing::info!(
            rsvp_id = %saved.id,
            session_id = %session_id,
            user_id = %user_id,
            "RSVP recorded"
        );

        Ok(saved.into())
    }
}
