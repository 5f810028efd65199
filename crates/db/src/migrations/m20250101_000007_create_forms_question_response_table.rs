//! Create forms question response table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FormsQuestionResponse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormsQuestionResponse::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FormsQuestionResponse::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FormsQuestionResponse::QuestionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FormsQuestionResponse::Score)
                            .integer()
                            .not_null()
                            .check(Expr::col(FormsQuestionResponse::Score).between(0, 100)),
                    )
                    .col(
                        ColumnDef::new(FormsQuestionResponse::TimeMinutes)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(FormsQuestionResponse::TimeMinutes).gte(0)),
                    )
                    .col(
                        ColumnDef::new(FormsQuestionResponse::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(FormsQuestionResponse::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forms_question_response_user")
                            .from(FormsQuestionResponse::Table, FormsQuestionResponse::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forms_question_response_question")
                            .from(FormsQuestionResponse::Table, FormsQuestionResponse::QuestionId)
                            .to(FormsQuestion::Table, FormsQuestion::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, question_id) - one answer per question
        manager
            .create_index(
                Index::create()
                    .name("idx_forms_question_response_user_question")
                    .table(FormsQuestionResponse::Table)
                    .col(FormsQuestionResponse::UserId)
                    .col(FormsQuestionResponse::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FormsQuestionResponse::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FormsQuestionResponse {
    Table,
    Id,
    UserId,
    QuestionId,
    Score,
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
enum FormsQuestion {
    Table,
    Id,
}
