use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::game_session::{
    Contribution, ContributionType, Coordinate, SessionStatus, Visibility,
};
use crate::error::AppError;
use crate::services::game_service::normalize_game_names;
use crate::validation::{FieldErrors, max_chars, min_chars};

pub const MIN_CAPACITY: i64 = 2;
pub const MAX_CAPACITY: i64 = 12;
pub const DEFAULT_LIST_LIMIT: u64 = 20;
pub const MAX_LIST_LIMIT: u64 = 50;

// ============ Request DTOs ============

/// `POST /api/sessions` body.
///
/// Required fields are optional here so that a missing field is reported as a
/// field error instead of a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub games: Vec<String>,
    pub address_approx: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub capacity: Option<i64>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub contribution_type: ContributionType,
    pub contribution_note: Option<String>,
    pub price_cents: Option<i64>,
}

/// A session creation request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub title: String,
    pub description: Option<String>,
    /// Trimmed, deduplicated, in first-seen order. Never empty.
    pub games: Vec<String>,
    pub address_approx: String,
    pub coordinate: Option<Coordinate>,
    /// Normalized to UTC.
    pub starts_at: DateTime<FixedOffset>,
    pub ends_at: DateTime<FixedOffset>,
    pub capacity: i32,
    pub visibility: Visibility,
    pub contribution: Contribution,
}

impl CreateSessionRequest {
    /// Check every field and build a [`NewSession`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every invalid field.
    pub fn validate(self) -> Result<NewSession, AppError> {
        let mut errors = FieldErrors::new();

        let title = self.title.unwrap_or_default();
        errors.check("title", min_chars(&title, 4, "Title"));

        let description = self.description.filter(|d| !d.trim().is_empty());
        if let Some(description) = &description {
            errors.check("description", max_chars(description, 800, "Description"));
        }

        let games = match normalize_game_names(&self.games) {
            Ok(games) => games,
            Err(message) => {
                errors.add("games", message);
                Vec::new()
            }
        };

        let address_approx = self.address_approx.unwrap_or_default();
        errors.check("addressApprox", min_chars(&address_approx, 3, "Address"));

        let coordinate = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => {
                if !(-90.0..=90.0).contains(&latitude) {
                    errors.add("latitude", "Latitude must be between -90 and 90.");
                }
                if !(-180.0..=180.0).contains(&longitude) {
                    errors.add("longitude", "Longitude must be between -180 and 180.");
                }
                Some(Coordinate {
                    latitude,
                    longitude,
                })
            }
            (Some(_), None) => {
                errors.add("longitude", "Longitude is required when latitude is set.");
                None
            }
            (None, Some(_)) => {
                errors.add("latitude", "Latitude is required when longitude is set.");
                None
            }
            (None, None) => None,
        };

        let starts_at = parse_instant(self.starts_at.as_deref(), "startsAt", &mut errors);
        let ends_at = parse_instant(self.ends_at.as_deref(), "endsAt", &mut errors);
        if let (Some(start), Some(end)) = (starts_at, ends_at)
            && end <= start
        {
            errors.add("endsAt", "End time must be after start time.");
        }

        let capacity = match self.capacity {
            Some(c) if (MIN_CAPACITY..=MAX_CAPACITY).contains(&c) => i32::try_from(c).ok(),
            Some(_) => {
                errors.add(
                    "capacity",
                    format!("Capacity must be between {MIN_CAPACITY} and {MAX_CAPACITY}."),
                );
                None
            }
            None => {
                errors.add("capacity", "Capacity is required.");
                None
            }
        };

        let contribution = match self.contribution_type {
            ContributionType::None => Contribution::None,
            ContributionType::Money => {
                let price = self.price_cents.unwrap_or(0);
                match i32::try_from(price) {
                    Ok(price_cents) if price_cents >= 0 => Contribution::Money { price_cents },
                    _ => {
                        errors.add("priceCents", "Price must be a non-negative amount in cents.");
                        Contribution::Money { price_cents: 0 }
                    }
                }
            }
            ContributionType::Items => Contribution::Items {
                note: self.contribution_note.unwrap_or_default(),
            },
        };

        errors.into_result()?;

        // Every branch that leaves these empty recorded an error above
        let (Some(starts_at), Some(ends_at), Some(capacity)) = (starts_at, ends_at, capacity)
        else {
            return Err(AppError::Internal(anyhow::anyhow!(
                "validated session request is missing required values"
            )));
        };

        Ok(NewSession {
            title,
            description,
            games,
            address_approx,
            coordinate,
            starts_at,
            ends_at,
            capacity,
            visibility: self.visibility,
            contribution,
        })
    }
}

fn parse_instant(
    raw: Option<&str>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<DateTime<FixedOffset>> {
    let Some(raw) = raw else {
        errors.add(field, "Date is required.");
        return None;
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(instant) => Some(instant.with_timezone(&Utc).fixed_offset()),
        Err(_) => {
            errors.add(field, "Date must be an ISO 8601 timestamp.");
            None
        }
    }
}

/// `POST /api/sessions/search` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSessionsRequest {
    pub games: Option<Vec<String>>,
    pub visibility: Option<Visibility>,
    pub limit: Option<i64>,
}

/// Validated search filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    /// A session matches when it plans at least one of these games.
    pub games: Option<Vec<String>>,
    pub visibility: Option<Visibility>,
    pub limit: Option<u64>,
}

impl SearchSessionsRequest {
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an out-of-range limit or an empty game name.
    pub fn validate(self) -> Result<SessionFilter, AppError> {
        let mut errors = FieldErrors::new();

        if let Some(games) = &self.games
            && games.iter().any(|g| g.is_empty())
        {
            errors.add("games", "Game names cannot be empty.");
        }

        let limit = match self.limit {
            None => None,
            Some(l) => match u64::try_from(l) {
                Ok(l) if (1..=MAX_LIST_LIMIT).contains(&l) => Some(l),
                _ => {
                    errors.add(
                        "limit",
                        format!("Limit must be between 1 and {MAX_LIST_LIMIT}."),
                    );
                    None
                }
            },
        };

        errors.into_result()?;

        Ok(SessionFilter {
            games: self.games,
            visibility: self.visibility,
            limit,
        })
    }
}

/// `GET /api/sessions` query string.
#[derive(Debug, Clone, Deserialize)]
pub struct ListSessionsQuery {
    pub limit: Option<u64>,
}

impl ListSessionsQuery {
    /// The requested limit, defaulted and clamped to `1..=50`.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }
}

// ============ Response DTOs ============

/// Public projection of a session. Never carries RSVP identities or message bodies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: Uuid,
    pub title: String,
    pub games: Vec<String>,
    pub starts_at: String,
    pub ends_at: String,
    pub address_approx: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub attendees_count: u64,
    pub contribution: Contribution,
    pub visibility: Visibility,
    pub status: SessionStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateSessionRequest {
        CreateSessionRequest {
            title: Some("Soirée Catan".to_string()),
            games: vec!["Catan".to_string()],
            address_approx: Some("Lyon 7e".to_string()),
            starts_at: Some("2026-11-20T18:00:00Z".to_string()),
            ends_at: Some("2026-11-20T22:00:00Z".to_string()),
            capacity: Some(4),
            ..CreateSessionRequest::default()
        }
    }

    fn field_errors(result: Result<NewSession, AppError>) -> FieldErrors {
        match result {
            Err(AppError::Validation(errors)) => errors,
            _ => FieldErrors::new(),
        }
    }

    #[test]
    fn valid_request_passes_with_defaults() {
        let session = valid_request().validate().ok();
        assert!(session.is_some(), "valid request was rejected");

        if let Some(session) = session {
            assert_eq!(session.visibility, Visibility::Public);
            assert_eq!(session.contribution, Contribution::None);
            assert_eq!(session.capacity, 4);
            assert_eq!(session.games, vec!["Catan".to_string()]);
            assert!(session.coordinate.is_none());
        }
    }

    #[test]
    fn every_invalid_field_is_reported() {
        let request = CreateSessionRequest {
            title: Some("abc".to_string()),
            games: vec![],
            address_approx: Some("ab".to_string()),
            capacity: Some(13),
            starts_at: None,
            ends_at: Some("tomorrow".to_string()),
            ..valid_request()
        };

        let errors = field_errors(request.validate());
        for field in ["title", "games", "addressApprox", "capacity", "startsAt", "endsAt"] {
            assert!(!errors.messages(field).is_empty(), "missing error for {field}");
        }
    }

    #[test]
    fn end_must_follow_start() {
        let request = CreateSessionRequest {
            ends_at: Some("2026-11-20T18:00:00Z".to_string()),
            ..valid_request()
        };
        let errors = field_errors(request.validate());
        assert_eq!(errors.messages("endsAt").len(), 1);
    }

    #[test]
    fn half_a_coordinate_is_rejected() {
        let request = CreateSessionRequest {
            latitude: Some(45.76),
            ..valid_request()
        };
        let errors = field_errors(request.validate());
        assert!(!errors.messages("longitude").is_empty());
    }

    #[test]
    fn capacity_bounds_are_inclusive() {
        for capacity in [2, 12] {
            let request = CreateSessionRequest {
                capacity: Some(capacity),
                ..valid_request()
            };
            assert!(request.validate().is_ok(), "capacity {capacity} rejected");
        }
        for capacity in [1, 13] {
            let request = CreateSessionRequest {
                capacity: Some(capacity),
                ..valid_request()
            };
            assert!(request.validate().is_err(), "capacity {capacity} accepted");
        }
    }

    #[test]
    fn money_defaults_price_and_rejects_negative() {
        let request = CreateSessionRequest {
            contribution_type: ContributionType::Money,
            ..valid_request()
        };
        let contribution = request.validate().map(|s| s.contribution).ok();
        assert_eq!(contribution, Some(Contribution::Money { price_cents: 0 }));

        let request = CreateSessionRequest {
            contribution_type: ContributionType::Money,
            price_cents: Some(-1),
            ..valid_request()
        };
        let errors = field_errors(request.validate());
        assert!(!errors.messages("priceCents").is_empty());
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let request = CreateSessionRequest {
            starts_at: Some("2026-11-20T20:00:00+02:00".to_string()),
            ends_at: Some("2026-11-20T23:00:00+02:00".to_string()),
            ..valid_request()
        };
        let starts_at = request.validate().map(|s| s.starts_at.to_rfc3339()).ok();
        assert_eq!(starts_at.as_deref(), Some("2026-11-20T18:00:00+00:00"));
    }

    #[test]
    fn search_limit_bounds() {
        let ok = SearchSessionsRequest {
            limit: Some(50),
            ..SearchSessionsRequest::default()
        };
        assert!(ok.validate().is_ok());

        let too_big = SearchSessionsRequest {
            limit: Some(51),
            ..SearchSessionsRequest::default()
        };
        assert!(too_big.validate().is_err());

        let zero = SearchSessionsRequest {
            limit: Some(0),
            ..SearchSessionsRequest::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn list_limit_is_clamped() {
        assert_eq!(ListSessionsQuery { limit: None }.limit(), DEFAULT_LIST_LIMIT);
        assert_eq!(ListSessionsQuery { limit: Some(500) }.limit(), MAX_LIST_LIMIT);
        assert_eq!(ListSessionsQuery { limit: Some(0) }.limit(), 1);
    }
}
