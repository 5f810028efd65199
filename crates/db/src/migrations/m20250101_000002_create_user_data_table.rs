//! Create user data (profile) table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserData::UserId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserData::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(UserData::AcademicDegree).string_len(255).not_null())
                    .col(ColumnDef::new(UserData::Institution).string_len(255).not_null())
                    .col(ColumnDef::new(UserData::Gender).string_len(64).not_null())
                    .col(ColumnDef::new(UserData::Age).integer().not_null())
                    .col(ColumnDef::new(UserData::Country).string_len(128).not_null())
                    .col(ColumnDef::new(UserData::Discipline).string_len(255).not_null())
                    .col(
                        ColumnDef::new(UserData::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(UserData::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_data_user")
                            .from(UserData::Table, UserData::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserData::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserData {
    Table,
    UserId,
    FullName,
    AcademicDegree,
    Institution,
    Gender,
    Age,
    Country,
    Discipline,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
