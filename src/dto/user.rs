use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::user;
use crate::error::AppError;
use crate::services::game_service::normalize_game_names;
use crate::validation::{FieldErrors, max_chars};

pub const MIN_RADIUS_KM: i64 = 1;
pub const MAX_RADIUS_KM: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

impl From<&user::Model> for UserResponse {
    fn from(u: &user::Model) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            image: u.image.clone(),
        }
    }
}

/// `GET /api/me` response: identity plus discovery preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub radius_km_default: i32,
    pub favorite_games: Vec<String>,
}

/// `PATCH /api/me` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub radius_km_default: Option<i64>,
}

/// A validated profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub radius_km_default: Option<i32>,
}

impl UpdateProfileRequest {
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an oversized name or an out-of-range radius.
    pub fn validate(self) -> Result<ProfileChanges, AppError> {
        let mut errors = FieldErrors::new();

        let name = self.name.map(|n| n.trim().to_string());
        if let Some(name) = &name {
            errors.check("name", max_chars(name, 100, "Name"));
        }

        let radius_km_default = match self.radius_km_default {
            None => None,
            Some(r) if (MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&r) => i32::try_from(r).ok(),
            Some(_) => {
                errors.add(
                    "radiusKmDefault",
                    format!("Radius must be between {MIN_RADIUS_KM} and {MAX_RADIUS_KM} km."),
                );
                None
            }
        };

        errors.into_result()?;
        Ok(ProfileChanges {
            name,
            radius_km_default,
        })
    }
}

/// `PUT /api/me/favorite-games` body. An empty list clears the favorites.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FavoriteGamesRequest {
    #[serde(default)]
    pub games: Vec<String>,
}

impl FavoriteGamesRequest {
    /// Trimmed, deduplicated game names.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a name is blank.
    pub fn validate(self) -> Result<Vec<String>, AppError> {
        if self.games.is_empty() {
            return Ok(Vec::new());
        }
        normalize_game_names(&self.games).map_err(|message| {
            let mut errors = FieldErrors::new();
            errors.add("games", message);
            AppError::Validation(errors)
        })
    }
}
