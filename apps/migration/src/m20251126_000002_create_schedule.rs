use sea_orm_migration::prelude::*;

use super::m20251126_000001_create_accounts::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sessions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sessions::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Sessions::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Sessions::Category).string_len(50).not_null())
                    .col(ColumnDef::new(Sessions::MaxParticipants).integer().not_null())
                    .col(ColumnDef::new(Sessions::InstructorId).uuid().null())
                    .col(
                        ColumnDef::new(Sessions::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_instructor")
                            .from(Sessions::Table, Sessions::InstructorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_sessions_instructor_start")
                    .table(Sessions::Table)
                    .col(Sessions::InstructorId)
                    .col(Sessions::StartTime)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bookings::UserId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::SessionId).uuid().not_null())
                    .col(
                        ColumnDef::new(Bookings::BookedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(32)
                            .not_null()
                            .default("Confirmed"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_user")
                            .from(Bookings::Table, Bookings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_session")
                            .from(Bookings::Table, Bookings::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One booking per member and session.
        manager
            .create_index(
                Index::create()
                    .name("ux_bookings_user_session")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .col(Bookings::SessionId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_bookings_session")
                    .table(Bookings::Table)
                    .col(Bookings::SessionId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    Id,
    Title,
    Description,
    Category,
    MaxParticipants,
    InstructorId,
    StartTime,
    EndTime,
    IsDeleted,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    UserId,
    SessionId,
    BookedAt,
    Status,
}
