//! Create user score table migration.
//!
//! Initial and final self-assessments share one table, keyed by `kind`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn score_column(column: UserScore) -> ColumnDef {
    ColumnDef::new(column.clone())
        .integer()
        .not_null()
        .default(0)
        .check(Expr::col(column).between(0, 100))
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserScore::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserScore::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserScore::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(UserScore::Kind).string_len(16).not_null())
                    .col(score_column(UserScore::SelfControl))
                    .col(score_column(UserScore::Leadership))
                    .col(score_column(UserScore::SocialAwareness))
                    .col(score_column(UserScore::SocialInnovation))
                    .col(score_column(UserScore::SystemicThinking))
                    .col(score_column(UserScore::ScientificThinking))
                    .col(score_column(UserScore::CriticalThinking))
                    .col(score_column(UserScore::InnovativeThinking))
                    .col(
                        ColumnDef::new(UserScore::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_score_user")
                            .from(UserScore::Table, UserScore::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, kind) - one initial and one final score per user
        manager
            .create_index(
                Index::create()
                    .name("idx_user_score_user_kind")
                    .table(UserScore::Table)
                    .col(UserScore::UserId)
                    .col(UserScore::Kind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserScore::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone)]
enum UserScore {
    Table,
    Id,
    UserId,
    Kind,
    SelfControl,
    Leadership,
    SocialAwareness,
    SocialInnovation,
    SystemicThinking,
    ScientificThinking,
    CriticalThinking,
    InnovativeThinking,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
