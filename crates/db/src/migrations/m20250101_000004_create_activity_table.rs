//! Create activity table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activity::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activity::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Activity::Description).text().not_null())
                    .col(ColumnDef::new(Activity::ParentId).string_len(32))
                    .col(
                        ColumnDef::new(Activity::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Activity::UpdatedAt).timestamp_with_time_zone())
                    // Deleting a module turns its sub-activities into top-level activities
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_parent")
                            .from(Activity::Table, Activity::ParentId)
                            .to(Activity::Table, Activity::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: title
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_title")
                    .table(Activity::Table)
                    .col(Activity::Title)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: parent_id (for listing sub-activities)
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_parent_id")
                    .table(Activity::Table)
                    .col(Activity::ParentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activity::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Activity {
    Table,
    Id,
    Title,
    Description,
    ParentId,
    CreatedAt,
    UpdatedAt,
}
