//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_user_data_table;
mod m20250101_000003_create_user_score_table;
mod m20250101_000004_create_activity_table;
mod m20250101_000005_create_forms_question_table;
mod m20250101_000006_create_activity_response_table;
mod m20250101_000007_create_forms_question_response_table;
mod m20250101_000008_create_module_completion_table;
mod m20250101_000009_create_user_defaults_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_user_data_table::Migration),
            Box::new(m20250101_000003_create_user_score_table::Migration),
            Box::new(m20250101_000004_create_activity_table::Migration),
            Box::new(m20250101_000005_create_forms_question_table::Migration),
            Box::new(m20250101_000006_create_activity_response_table::Migration),
            Box::new(m20250101_000007_create_forms_question_response_table::Migration),
            Box::new(m20250101_000008_create_module_completion_table::Migration),
            Box::new(m20250101_000009_create_user_defaults_table::Migration),
        ]
    }
}
