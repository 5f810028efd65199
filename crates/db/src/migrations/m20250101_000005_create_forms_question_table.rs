//! Create forms question table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FormsQuestion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormsQuestion::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FormsQuestion::Question).string_len(255).not_null())
                    .col(ColumnDef::new(FormsQuestion::Description).text().not_null())
                    .col(
                        ColumnDef::new(FormsQuestion::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(FormsQuestion::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FormsQuestion::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FormsQuestion {
    Table,
    Id,
    Question,
    Description,
    CreatedAt,
    UpdatedAt,
}
