//! Create module completion table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModuleCompletion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModuleCompletion::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ModuleCompletion::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(ModuleCompletion::ActivityId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ModuleCompletion::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_module_completion_user")
                            .from(ModuleCompletion::Table, ModuleCompletion::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_module_completion_activity")
                            .from(ModuleCompletion::Table, ModuleCompletion::ActivityId)
                            .to(Activity::Table, Activity::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, activity_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_module_completion_user_activity")
                    .table(ModuleCompletion::Table)
                    .col(ModuleCompletion::UserId)
                    .col(ModuleCompletion::ActivityId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModuleCompletion::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ModuleCompletion {
    Table,
    Id,
    UserId,
    ActivityId,
    CreatedAt,
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
