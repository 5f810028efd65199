//! Create activity response table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivityResponse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityResponse::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityResponse::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(ActivityResponse::ActivityId).string_len(32).not_null())
                    .col(ColumnDef::new(ActivityResponse::ResponseType).string_len(8).not_null())
                    .col(ColumnDef::new(ActivityResponse::StringResponse).text())
                    .col(ColumnDef::new(ActivityResponse::ImageResponse).string_len(512))
                    .col(ColumnDef::new(ActivityResponse::VideoResponse).string_len(512))
                    .col(ColumnDef::new(ActivityResponse::AudioResponse).string_len(512))
                    .col(
                        ColumnDef::new(ActivityResponse::TimeMinutes)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(ActivityResponse::TimeMinutes).gte(0)),
                    )
                    .col(
                        ColumnDef::new(ActivityResponse::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ActivityResponse::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_response_user")
                            .from(ActivityResponse::Table, ActivityResponse::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_response_activity")
                            .from(ActivityResponse::Table, ActivityResponse::ActivityId)
                            .to(Activity::Table, Activity::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, activity_id) - one response per activity
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_response_user_activity")
                    .table(ActivityResponse::Table)
                    .col(ActivityResponse::UserId)
                    .col(ActivityResponse::ActivityId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: activity_id
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_response_activity_id")
                    .table(ActivityResponse::Table)
                    .col(ActivityResponse::ActivityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityResponse::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ActivityResponse {
    Table,
    Id,
    UserId,
    ActivityId,
    ResponseType,
    StringResponse,
    ImageResponse,
    VideoResponse,
    AudioResponse,
    TimeMinutes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Activity {
    Table,
    Id,
}
