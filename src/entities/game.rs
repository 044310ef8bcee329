use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attributes given to games that are created implicitly from a free-text name.
pub const DEFAULT_CATEGORY: &str = "Divers";
pub const DEFAULT_MIN_PLAYERS: i32 = 2;
pub const DEFAULT_MAX_PLAYERS: i32 = 6;
pub const DEFAULT_DURATION_MIN: i32 = 60;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub category: String,
    pub min_players: i32,
    pub max_players: i32,
    pub duration_min: i32,
    pub thumbnail_url: Option<String>,
    pub bgg_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session_game::Entity")]
    SessionGames,
    #[sea_orm(has_many = "super::favorite_game::Entity")]
    FavoriteGames,
}

impl Related<super::session_game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionGames.def()
    }
}

impl Related<super::favorite_game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoriteGames.def()
    }
}

impl Related<super::game_session::Entity> for Entity {
    fn to() -> RelationDef {
        super::session_game::Relation::Session.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::session_game::Relation::Game.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
