use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::dto::session::{NewSession, SessionFilter, SessionSummary};
use crate::dto::to_iso;
use crate::entities::{game, game_session, rsvp, session_game};
use crate::error::AppError;
use crate::services::GameService;
use crate::utils::location_key;

pub struct SessionService;

impl SessionService {
    /// Create a session hosted by `host_id` and return its summary.
    ///
    /// Unknown games are created, the session row is written and linked to its
    /// games in a single transaction. Status always starts as `OPEN`.
    pub async fn create_session(
        db: &DatabaseConnection,
        host_id: Uuid,
        new_session: NewSession,
    ) -> Result<SessionSummary, AppError> {
        let txn = db.begin().await?;

        let games = GameService::ensure_games(&txn, &new_session.games).await?;

        let contribution = new_session.contribution;
        let coordinate = new_session.coordinate;
        let session = game_session::ActiveModel {
            id: Set(Uuid::new_v4()),
            host_id: Set(host_id),
            title: Set(new_session.title),
            description: Set(new_session.description),
            location_key: Set(location_key(coordinate, &new_session.address_approx)),
            address_approx: Set(new_session.address_approx),
            latitude: Set(coordinate.map(|c| c.latitude)),
            longitude: Set(coordinate.map(|c| c.longitude)),
            starts_at: Set(new_session.starts_at),
            ends_at: Set(new_session.ends_at),
            capacity: Set(new_session.capacity),
            visibility: Set(new_session.visibility),
            contribution_type: Set(contribution.kind()),
            contribution_note: Set(contribution.note()),
            price_cents: Set(contribution.price_cents()),
            status: Set(game_session::SessionStatus::Open),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Persistence(e.into()))?;

        let links = games
            .iter()
            .zip(0..)
            .map(|(g, position)| session_game::ActiveModel {
                session_id: Set(session.id),
                game_id: Set(g.id),
                position: Set(position),
            });
        session_game::Entity::insert_many(links)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| AppError::Persistence(e.into()))?;

        txn.commit().await?;

        tracing::info!(
            session_id = %session.id,
            host_id = %host_id,
            games = games.len(),
            location_key = %session.location_key,
            "Session created"
        );

        Self::summarize(db, session.id).await
    }

    /// Summary of a single session.
    pub async fn summarize<C>(conn: &C, session_id: Uuid) -> Result<SessionSummary, AppError>
    where
        C: ConnectionTrait,
    {
        let session = game_session::Entity::find_by_id(session_id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found.")))?;

        Self::summarize_many(conn, vec![session])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("summary missing for {session_id}")))
    }

    /// Summaries for many sessions, in the order given.
    ///
    /// Games and RSVP statuses are fetched once for the whole id set; each summary is
    /// then assembled on its own, so the result for a session does not depend on
    /// which other sessions are in the batch.
    pub async fn summarize_many<C>(
        conn: &C,
        sessions: Vec<game_session::Model>,
    ) -> Result<Vec<SessionSummary>, AppError>
    where
        C: ConnectionTrait,
    {
        if sessions.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = sessions.iter().map(|s| s.id).collect();

        let game_rows = session_game::Entity::find()
            .filter(session_game::Column::SessionId.is_in(ids.clone()))
            .find_also_related(game::Entity)
            .order_by_asc(session_game::Column::Position)
            .all(conn)
            .await?;

        let mut games_by_session: HashMap<Uuid, Vec<String>> = HashMap::new();
        for (link, game) in game_rows {
            if let Some(game) = game {
                games_by_session
                    .entry(link.session_id)
                    .or_default()
                    .push(game.name);
            }
        }

        let statuses: Vec<(Uuid, rsvp::RsvpStatus)> = rsvp::Entity::find()
            .select_only()
            .column(rsvp::Column::SessionId)
            .column(rsvp::Column::Status)
            .filter(rsvp::Column::SessionId.is_in(ids))
            .into_tuple()
            .all(conn)
            .await?;

        let mut attendees: HashMap<Uuid, u64> = HashMap::new();
        for (session_id, status) in statuses {
            if status.counts_as_attendee() {
                *attendees.entry(session_id).or_default() += 1;
            }
        }

        Ok(sessions
            .into_iter()
            .map(|session| {
                let games = games_by_session.remove(&session.id).unwrap_or_default();
                let attendees_count = attendees.get(&session.id).copied().unwrap_or(0);
                build_summary(session, games, attendees_count)
            })
            .collect())
    }

    /// Sessions in listing order: soonest first, newest-created first on ties.
    pub async fn list_sessions(
        db: &DatabaseConnection,
        limit: u64,
    ) -> Result<Vec<SessionSummary>, AppError> {
        let sessions = game_session::Entity::find()
            .order_by_asc(game_session::Column::StartsAt)
            .order_by_desc(game_session::Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await?;

        Self::summarize_many(db, sessions).await
    }

    /// Sessions matching every given filter, in listing order.
    ///
    /// Filters are applied in the query, before the limit. An empty game list
    /// does not filter.
    pub async fn search_sessions(
        db: &DatabaseConnection,
        filter: SessionFilter,
    ) -> Result<Vec<SessionSummary>, AppError> {
        let mut query = game_session::Entity::find();

        if let Some(visibility) = filter.visibility {
            query = query.filter(game_session::Column::Visibility.eq(visibility));
        }

        if let Some(games) = filter.games.filter(|g| !g.is_empty()) {
            let matching_sessions = Query::select()
                .column(session_game::Column::SessionId)
                .from(session_game::Entity)
                .inner_join(
                    game::Entity,
                    Expr::col((game::Entity, game::Column::Id))
                        .equals((session_game::Entity, session_game::Column::GameId)),
                )
                .and_where(game::Column::Name.is_in(games))
                .to_owned();
            query = query.filter(game_session::Column::Id.in_subquery(matching_sessions));
        }

        let sessions = query
            .order_by_asc(game_session::Column::StartsAt)
            .order_by_desc(game_session::Column::CreatedAt)
            .limit(filter.limit.unwrap_or(crate::dto::session::DEFAULT_LIST_LIMIT))
            .all(db)
            .await?;

        tracing::debug!(results = sessions.len(), "Session search");
        Self::summarize_many(db, sessions).await
    }
}

fn build_summary(
    session: game_session::Model,
    games: Vec<String>,
    attendees_count: u64,
) -> SessionSummary {
    let contribution = session.contribution();
    let coordinate = session.coordinate();
    SessionSummary {
        id: session.id,
        title: session.title,
        games,
        starts_at: to_iso(&session.starts_at),
        ends_at: to_iso(&session.ends_at),
        address_approx: session.address_approx,
        description: session.description,
        capacity: session.capacity,
        attendees_count,
        contribution,
        visibility: session.visibility,
        status: session.status,
        latitude: coordinate.map(|c| c.latitude),
        longitude: coordinate.map(|c| c.longitude),
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::entities::game_session::{
        Contribution, ContributionType, SessionStatus, Visibility,
    };

    fn model() -> game_session::Model {
        let start = DateTime::parse_from_rfc3339("2026-11-20T18:00:00Z").unwrap_or_default();
        game_session::Model {
            id: Uuid::new_v4(),
            host_id: Uuid::new_v4(),
            title: "Soirée jeux".to_string(),
            description: None,
            address_approx: "Lyon 7e".to_string(),
            latitude: None,
            longitude: None,
            location_key: "Lyon 7e".to_string(),
            starts_at: start,
            ends_at: start,
            capacity: 2,
            visibility: Visibility::Public,
            contribution_type: ContributionType::Items,
            contribution_note: None,
            price_cents: Some(100),
            status: SessionStatus::Open,
            created_at: start,
        }
    }

    #[test]
    fn summary_uses_contribution_variant_and_iso_times() {
        let summary = build_summary(model(), vec!["Catan".to_string()], 3);

        assert_eq!(
            summary.contribution,
            Contribution::Items {
                note: String::new()
            }
        );
        assert_eq!(summary.starts_at, "2026-11-20T18:00:00.000Z");
        assert_eq!(summary.attendees_count, 3);
    }

    #[test]
    fn half_a_stored_coordinate_is_not_exposed() {
        let session = game_session::Model {
            latitude: Some(45.75),
            ..model()
        };
        let summary = build_summary(session, Vec::new(), 0);
        assert_eq!(summary.latitude, None);
        assert_eq!(summary.longitude, None);

        let session = game_session::Model {
            latitude: Some(45.75),
            longitude: Some(4.84),
            ..model()
        };
        let summary = build_summary(session, Vec::new(), 0);
        assert_eq!(summary.latitude, Some(45.75));
        assert_eq!(summary.longitude, Some(4.84));
    }
}
