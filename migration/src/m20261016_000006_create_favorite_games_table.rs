use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FavoriteGames::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FavoriteGames::UserId).uuid().not_null())
                    .col(ColumnDef::new(FavoriteGames::GameId).uuid().not_null())
                    .col(
                        ColumnDef::new(FavoriteGames::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(FavoriteGames::UserId)
                            .col(FavoriteGames::GameId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_games_user_id")
                            .from(FavoriteGames::Table, FavoriteGames::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_games_game_id")
                            .from(FavoriteGames::Table, FavoriteGames::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FavoriteGames::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FavoriteGames {
    Table,
    UserId,
    GameId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
}
