use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameSessionGames::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GameSessionGames::SessionId).uuid().not_null())
                    .col(ColumnDef::new(GameSessionGames::GameId).uuid().not_null())
                    .col(
                        ColumnDef::new(GameSessionGames::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(GameSessionGames::SessionId)
                            .col(GameSessionGames::GameId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_session_games_session_id")
                            .from(GameSessionGames::Table, GameSessionGames::SessionId)
                            .to(GameSessions::Table, GameSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_session_games_game_id")
                            .from(GameSessionGames::Table, GameSessionGames::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Add index on game_id for filtering sessions by game
        manager
            .create_index(
                Index::create()
                    .name("idx_game_session_games_game_id")
                    .table(GameSessionGames::Table)
                    .col(GameSessionGames::GameId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameSessionGames::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GameSessionGames {
    Table,
    SessionId,
    GameId,
    Position,
}

#[derive(DeriveIden)]
enum GameSessions {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
}
