use std::collections::HashSet;

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entities::game;
use crate::error::AppError;

/// Longest accepted game name.
pub const MAX_GAME_NAME_CHARS: usize = 100;

/// Trim and deduplicate free-text game names, keeping first-seen order.
///
/// # Errors
///
/// Returns a message when the list is empty or a name is blank or too long.
pub fn normalize_game_names(names: &[String]) -> Result<Vec<String>, String> {
    if names.is_empty() {
        return Err("At least one game is required.".to_string());
    }

    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            return Err("Game names cannot be empty.".to_string());
        }
        if name.chars().count() > MAX_GAME_NAME_CHARS {
            return Err(format!(
                "Game names must be at most {MAX_GAME_NAME_CHARS} characters."
            ));
        }
        if seen.insert(name.to_string()) {
            normalized.push(name.to_string());
        }
    }
    Ok(normalized)
}

pub struct GameService;

impl GameService {
    /// Resolve names to game rows, creating the unknown ones with default attributes.
    ///
    /// Creation is "insert, ignore if the name exists" followed by a read-back on the
    /// same connection, so two callers racing on a new name end up sharing one row.
    /// Run it inside the caller's transaction. The result follows the order of `names`.
    pub async fn ensure_games<C>(conn: &C, names: &[String]) -> Result<Vec<game::Model>, AppError>
    where
        C: ConnectionTrait,
    {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now().fixed_offset();
        let rows = names.iter().map(|name| game::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.clone()),
            category: Set(game::DEFAULT_CATEGORY.to_string()),
            min_players: Set(game::DEFAULT_MIN_PLAYERS),
            max_players: Set(game::DEFAULT_MAX_PLAYERS),
            duration_min: Set(game::DEFAULT_DURATION_MIN),
            thumbnail_url: Set(None),
            bgg_id: Set(None),
            created_at: Set(now),
        });

        game::Entity::insert_many(rows)
            .on_conflict(OnConflict::column(game::Column::Name).do_nothing().to_owned())
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Persistence(e.into()))?;

        let found = game::Entity::find()
            .filter(game::Column::Name.is_in(names.iter().cloned()))
            .all(conn)
            .await?;

        let games: Vec<game::Model> = names
            .iter()
            .filter_map(|name| found.iter().find(|g| &g.name == name).cloned())
            .collect();

        if games.len() != names.len() {
            return Err(AppError::Persistence(anyhow::anyhow!(
                "expected {} games after insert, found {}",
                names.len(),
                games.len()
            )));
        }

        tracing::debug!(count = games.len(), "Games resolved");
        Ok(games)
    }
}
