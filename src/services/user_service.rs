use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::dto::user::{ProfileChanges, ProfileResponse};
use crate::entities::{favorite_game, game, user};
use crate::error::AppError;
use crate::services::GameService;

/// Discovery radius given to new accounts.
pub const DEFAULT_RADIUS_KM: i32 = 10;

pub struct UserService;

impl UserService {
    pub async fn get_profile(
        db: &DatabaseConnection,
        user: &user::Model,
    ) -> Result<ProfileResponse, AppError> {
        let favorite_games = user
            .find_related(game::Entity)
            .order_by_asc(game::Column::Name)
            .all(db)
            .await?
            .into_iter()
            .map(|g| g.name)
            .collect();

        Ok(ProfileResponse {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
            radius_km_default: user.radius_km_default,
            favorite_games,
        })
    }

    pub async fn update_profile(
        db: &DatabaseConnection,
        user: user::Model,
        changes: ProfileChanges,
    ) -> Result<ProfileResponse, AppError> {
        if changes == ProfileChanges::default() {
            return Self::get_profile(db, &user).await;
        }

        let mut active: user::ActiveModel = user.into();
        if let Some(name) = changes.name {
            active.name = Set(Some(name).filter(|n| !n.is_empty()));
        }
        if let Some(radius) = changes.radius_km_default {
            active.radius_km_default = Set(radius);
        }

        let updated = active
            .update(db)
            .await
            .map_err(|e| AppError::Persistence(e.into()))?;

        tracing::info!(user_id = %updated.id, "Profile updated");
        Self::get_profile(db, &updated).await
    }

    /// Replace the user's favorite games, creating unknown names like session creation does.
    pub async fn replace_favorite_games(
        db: &DatabaseConnection,
        user: &user::Model,
        names: Vec<String>,
    ) -> Result<ProfileResponse, AppError> {
        let txn = db.begin().await?;

        favorite_game::Entity::delete_many()
            .filter(favorite_game::Column::UserId.eq(user.id))
            .exec(&txn)
            .await?;

        let games = GameService::ensure_games(&txn, &names).await?;
        if !games.is_empty() {
            let now = Utc::now().fixed_offset();
            let rows = games.iter().map(|g| favorite_game::ActiveModel {
                user_id: Set(user.id),
                game_id: Set(g.id),
                created_at: Set(now),
            });
            favorite_game::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| AppError::Persistence(e.into()))?;
        }

        txn.commit().await?;

        tracing::info!(user_id = %user.id, count = games.len(), "Favorite games replaced");
        Self::get_profile(db, user).await
    }

    /// Find the account for a verified email, creating it on first sign-in.
    pub async fn find_or_create_by_email<C>(conn: &C, email: &str) -> Result<user::Model, AppError>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now().fixed_offset();

        if let Some(existing) = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await?
        {
            if existing.email_verified.is_some() {
                return Ok(existing);
            }
            let mut active: user::ActiveModel = existing.into();
            active.email_verified = Set(Some(now));
            return Ok(active.update(conn).await?);
        }

        let created = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(None),
            email: Set(email.to_string()),
            email_verified: Set(Some(now)),
            image: Set(None),
            radius_km_default: Set(DEFAULT_RADIUS_KM),
            created_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| AppError::Persistence(e.into()))?;

        tracing::info!(user_id = %created.id, "User created");
        Ok(created)
    }
}
