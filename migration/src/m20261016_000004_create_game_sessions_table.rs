use sea_orm_migration::prelude::*;

/// Creates the `game_sessions` table: one row per scheduled meetup.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum GameSessions {
    Table,
    Id,
    HostId,
    Title,
    Description,
    AddressApprox,
    Latitude,
    Longitude,
    LocationKey,
    StartsAt,
    EndsAt,
    Capacity,
    Visibility,
    ContributionType,
    ContributionNote,
    PriceCents,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameSessions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameSessions::HostId).uuid().not_null())
                    .col(ColumnDef::new(GameSessions::Title).text().not_null())
                    .col(ColumnDef::new(GameSessions::Description).text().null())
                    .col(ColumnDef::new(GameSessions::AddressApprox).text().not_null())
                    .col(ColumnDef::new(GameSessions::Latitude).double().null())
                    .col(ColumnDef::new(GameSessions::Longitude).double().null())
                    .col(ColumnDef::new(GameSessions::LocationKey).text().not_null())
                    .col(
                        ColumnDef::new(GameSessions::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameSessions::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameSessions::Capacity)
                            .integer()
                            .not_null()
                            .check(Expr::col(GameSessions::Capacity).between(2, 12)),
                    )
                    .col(
                        ColumnDef::new(GameSessions::Visibility)
                            .string_len(20)
                            .not_null()
                            .default("PUBLIC"),
                    )
                    .col(
                        ColumnDef::new(GameSessions::ContributionType)
                            .string_len(20)
                            .not_null()
                            .default("NONE"),
                    )
                    .col(ColumnDef::new(GameSessions::ContributionNote).text().null())
                    .col(
                        ColumnDef::new(GameSessions::PriceCents)
                            .integer()
                            .null()
                            .check(Expr::col(GameSessions::PriceCents).gte(0)),
                    )
                    .col(
                        ColumnDef::new(GameSessions::Status)
                            .string_len(20)
                            .not_null()
                            .default("OPEN"),
                    )
                    .col(
                        ColumnDef::new(GameSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_sessions_host_id")
                            .from(GameSessions::Table, GameSessions::HostId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("game_sessions_location_key_idx")
                    .table(GameSessions::Table)
                    .col(GameSessions::LocationKey)
                    .to_owned(),
            )
            .await?;

        // Listing path sorts on starts_at
        manager
            .create_index(
                Index::create()
                    .name("game_sessions_starts_at_idx")
                    .table(GameSessions::Table)
                    .col(GameSessions::StartsAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameSessions::Table).to_owned())
            .await
    }
}
