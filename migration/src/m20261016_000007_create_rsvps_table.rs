use sea_orm_migration::prelude::*;

/// Creates the `rsvps` table. The unique `(session_id, user_id)` index is the
/// conflict target of the RSVP upsert.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Rsvps {
    Table,
    Id,
    SessionId,
    UserId,
    Status,
    Note,
    WillBring,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GameSessions {
    Table,
    Id,
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
                    .table(Rsvps::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rsvps::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rsvps::SessionId).uuid().not_null())
                    .col(ColumnDef::new(Rsvps::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Rsvps::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Rsvps::Note).text().null())
                    .col(ColumnDef::new(Rsvps::WillBring).text().null())
                    .col(
                        ColumnDef::new(Rsvps::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rsvps_session_id")
                            .from(Rsvps::Table, Rsvps::SessionId)
                            .to(GameSessions::Table, GameSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rsvps_user_id")
                            .from(Rsvps::Table, Rsvps::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("rsvps_session_user_key")
                    .table(Rsvps::Table)
                    .col(Rsvps::SessionId)
                    .col(Rsvps::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rsvps::Table).to_owned())
            .await
    }
}
