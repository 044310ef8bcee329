use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Who can discover a session.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    #[default]
    #[sea_orm(string_value = "PUBLIC")]
    Public,
    #[sea_orm(string_value = "FRIENDS")]
    Friends,
    #[sea_orm(string_value = "LINK")]
    Link,
}

/// Session lifecycle status.
///
/// Only `Open` is ever written by this service; the other states are owned by
/// whatever process closes or cancels sessions and are passed through on read.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionStatus {
    #[default]
    #[sea_orm(string_value = "OPEN")]
    Open,
    #[sea_orm(string_value = "FULL")]
    Full,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
    #[sea_orm(string_value = "DONE")]
    Done,
}

/// Discriminant of the contribution asked of attendees, as stored.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "UPPERCASE")]
pub enum ContributionType {
    #[default]
    #[sea_orm(string_value = "NONE")]
    None,
    #[sea_orm(string_value = "MONEY")]
    Money,
    #[sea_orm(string_value = "ITEMS")]
    Items,
}

/// What attendees are asked to bring or pay.
///
/// Stored across `contribution_type`, `price_cents` and `contribution_note`;
/// only the column matching the variant is ever populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Contribution {
    None,
    Money {
        #[serde(rename = "priceCents")]
        price_cents: i32,
    },
    Items {
        note: String,
    },
}

impl Contribution {
    /// Rebuild the variant from its stored columns, defaulting a missing price
    /// to 0 and a missing note to an empty string.
    #[must_use]
    pub fn from_columns(
        kind: ContributionType,
        price_cents: Option<i32>,
        note: Option<String>,
    ) -> Self {
        match kind {
            ContributionType::None => Self::None,
            ContributionType::Money => Self::Money {
                price_cents: price_cents.unwrap_or(0),
            },
            ContributionType::Items => Self::Items {
                note: note.unwrap_or_default(),
            },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ContributionType {
        match self {
            Self::None => ContributionType::None,
            Self::Money { .. } => ContributionType::Money,
            Self::Items { .. } => ContributionType::Items,
        }
    }

    #[must_use]
    pub const fn price_cents(&self) -> Option<i32> {
        match self {
            Self::Money { price_cents } => Some(*price_cents),
            _ => None,
        }
    }

    #[must_use]
    pub fn note(&self) -> Option<String> {
        match self {
            Self::Items { note } => Some(note.clone()),
            _ => None,
        }
    }
}

/// A latitude/longitude pair. Sessions either carry both or neither.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub address_approx: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_key: String,
    pub starts_at: DateTimeWithTimeZone,
    pub ends_at: DateTimeWithTimeZone,
    pub capacity: i32,
    pub visibility: Visibility,
    pub contribution_type: ContributionType,
    pub contribution_note: Option<String>,
    pub price_cents: Option<i32>,
    pub status: SessionStatus,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// The stored coordinate pair, if both halves are present.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn contribution(&self) -> Contribution {
        Contribution::from_columns(
            self.contribution_type,
            self.price_cents,
            self.contribution_note.clone(),
        )
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::HostId",
        to = "super::user::Column::Id"
    )]
    Host,
    #[sea_orm(has_many = "super::session_game::Entity")]
    SessionGames,
    #[sea_orm(has_many = "super::rsvp::Entity")]
    Rsvps,
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Host.def()
    }
}

impl Related<super::session_game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionGames.def()
    }
}

impl Related<super::rsvp::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rsvps.def()
    }
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl Related<super::game::Entity> for Entity {
    fn to() -> RelationDef {
        super::session_game::Relation::Game.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::session_game::Relation::Session.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_without_price_defaults_to_zero() {
        let contribution = Contribution::from_columns(ContributionType::Money, None, None);
        assert_eq!(contribution, Contribution::Money { price_cents: 0 });
    }

    #[test]
    fn items_without_note_defaults_to_empty() {
        let contribution =
            Contribution::from_columns(ContributionType::Items, Some(300), None);
        assert_eq!(
            contribution,
            Contribution::Items {
                note: String::new()
            }
        );
    }

    #[test]
    fn none_ignores_stray_columns() {
        let contribution = Contribution::from_columns(
            ContributionType::None,
            Some(500),
            Some("snacks".to_string()),
        );
        assert_eq!(contribution, Contribution::None);
    }

    #[test]
    fn contribution_serializes_as_tagged_union() {
        let none = serde_json::to_value(Contribution::None).unwrap_or_default();
        assert_eq!(none, serde_json::json!({ "type": "NONE" }));

        let money =
            serde_json::to_value(Contribution::Money { price_cents: 500 }).unwrap_or_default();
        assert_eq!(money, serde_json::json!({ "type": "MONEY", "priceCents": 500 }));

        let items = serde_json::to_value(Contribution::Items {
            note: "Chips".to_string(),
        })
        .unwrap_or_default();
        assert_eq!(items, serde_json::json!({ "type": "ITEMS", "note": "Chips" }));
    }

    #[test]
    fn variant_round_trips_through_columns() {
        let items = Contribution::Items {
            note: "Boissons".to_string(),
        };
        let rebuilt = Contribution::from_columns(items.kind(), items.price_cents(), items.note());
        assert_eq!(rebuilt, items);
    }
}
