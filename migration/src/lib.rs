pub use sea_orm_migration::prelude::*;

mod m20261016_000001_create_users_table;
mod m20261016_000002_create_verification_tokens_table;
mod m20261016_000003_create_games_table;
mod m20261016_000004_create_game_sessions_table;
mod m20261016_000005_create_game_session_games_table;
mod m20261016_000006_create_favorite_games_table;
mod m20261016_000007_create_rsvps_table;
mod m20261016_000008_create_messages_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_create_users_table::Migration),
            Box::new(m20261016_000002_create_verification_tokens_table::Migration),
            Box::new(m20261016_000003_create_games_table::Migration),
            Box::new(m20261016_000004_create_game_sessions_table::Migration),
            Box::new(m20261016_000005_create_game_session_games_table::Migration),
            Box::new(m20261016_000006_create_favorite_games_table::Migration),
            Box::new(m20261016_000007_create_rsvps_table::Migration),
            Box::new(m20261016_000008_create_messages_table::Migration),
        ]
    }
}
