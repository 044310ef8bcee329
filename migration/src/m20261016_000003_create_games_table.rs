use sea_orm_migration::prelude::*;

/// Creates the `games` catalogue. `name` is unique so that concurrent
/// auto-creation of the same title collapses onto one row.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
    Name,
    Category,
    MinPlayers,
    MaxPlayers,
    DurationMin,
    ThumbnailUrl,
    BggId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Games::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Games::Name).text().not_null())
                    .col(ColumnDef::new(Games::Category).text().not_null())
                    .col(ColumnDef::new(Games::MinPlayers).integer().not_null())
                    .col(ColumnDef::new(Games::MaxPlayers).integer().not_null())
                    .col(ColumnDef::new(Games::DurationMin).integer().not_null())
                    .col(ColumnDef::new(Games::ThumbnailUrl).text().null())
                    .col(ColumnDef::new(Games::BggId).integer().null())
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("games_name_key")
                    .table(Games::Table)
                    .col(Games::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}
