use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub email_verified: Option<DateTimeWithTimeZone>,
    pub image: Option<String>,
    pub radius_km_default: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_session::Entity")]
    HostedSessions,
    #[sea_orm(has_many = "super::rsvp::Entity")]
    Rsvps,
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
    #[sea_orm(has_many = "super::favorite_game::Entity")]
    FavoriteGames,
}

impl Related<super::game_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HostedSessions.def()
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

impl Related<super::favorite_game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoriteGames.def()
    }
}

impl Related<super::game::Entity> for Entity {
    fn to() -> RelationDef {
        super::favorite_game::Relation::Game.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::favorite_game::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
