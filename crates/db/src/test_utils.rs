//! Test utilities for database operations.
//!
//! Helpers for connecting to a throwaway `PostgreSQL` database, migrating it,
//! and seeding rows for integration tests.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Set,
    Statement,
};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

use tracing::info;

use crate::entities::{activity, user};
use crate::migrations::Migrator;

/// Tables truncated by [`TestDatabase::cleanup`], children first.
const TABLES: &[&str] = &[
    "user_defaults",
    "module_completion",
    "forms_question_response",
    "activity_response",
    "forms_question",
    "activity",
    "user_score",
    "user_data",
    "user",
];

/// Test database configuration.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database username.
    pub username: String,
    /// Database password.
    pub password: String,
    /// Database name.
    pub database: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("TEST_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: std::env::var("TEST_DB_USER").unwrap_or_else(|_| "sel4c_test".to_string()),
            password: std::env::var("TEST_DB_PASSWORD")
                .unwrap_or_else(|_| "sel4c_test".to_string()),
            database: std::env::var("TEST_DB_NAME").unwrap_or_else(|_| "sel4c_test".to_string()),
        }
    }
}

impl TestDbConfig {
    /// Get the database URL.
    #[must_use]
    pub fn database_url(&self) -> String {
        self.url_for(&self.database)
    }

    /// URL of the maintenance database used to create and drop test databases.
    #[must_use]
    pub fn postgres_url(&self) -> String {
        self.url_for("postgres")
    }

    fn url_for(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, database
        )
    }
}

/// A migrated test database.
pub struct TestDatabase {
    /// Database connection, shared with the repositories under test.
    pub conn: Arc<DatabaseConnection>,
    /// Database configuration.
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Connect to the configured test database and apply migrations.
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_config(TestDbConfig::default()).await
    }

    /// Connect with a custom configuration and apply migrations.
    pub async fn with_config(config: TestDbConfig) -> Result<Self, DbErr> {
        let conn = Database::connect(&config.database_url()).await?;
        Migrator::up(&conn, None).await?;

        info!(database = %config.database, "Connected to test database");

        Ok(Self {
            conn: Arc::new(conn),
            config,
        })
    }

    /// Create and migrate a uniquely named database, for tests that run in parallel.
    pub async fn create_unique() -> Result<Self, DbErr> {
        let mut config = TestDbConfig::default();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        config.database = format!("sel4c_test_{}", &suffix[..8]);

        let admin = Database::connect(&config.postgres_url()).await?;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("CREATE DATABASE \"{}\"", config.database),
            ))
            .await?;
        admin.close().await?;

        info!(database = %config.database, "Created unique test database");

        Self::with_config(config).await
    }

    /// Get the database connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        self.conn.as_ref()
    }

    /// Shared handle for constructing repositories.
    #[must_use]
    pub fn shared(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Remove every row from the application tables.
    pub async fn cleanup(&self) -> Result<(), DbErr> {
        for table in TABLES {
            self.connection()
                .execute(Statement::from_string(
                    DatabaseBackend::Postgres,
                    format!("TRUNCATE TABLE \"{table}\" CASCADE"),
                ))
                .await?;
        }

        info!("Cleaned up test database");
        Ok(())
    }

    /// Drop the database. Consumes `self` to close the connection first.
    ///
    /// Repositories still holding the connection keep their pool open; the
    /// drop is forced either way.
    pub async fn drop_database(self) -> Result<(), DbErr> {
        if let Ok(conn) = Arc::try_unwrap(self.conn) {
            conn.close().await?;
        }

        let admin = Database::connect(&self.config.postgres_url()).await?;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", self.config.database),
            ))
            .await?;
        admin.close().await?;

        info!(database = %self.config.database, "Dropped test database");
        Ok(())
    }

    /// Insert a user with a placeholder password hash.
    pub async fn insert_user(
        &self,
        id: &str,
        email: &str,
        is_superuser: bool,
    ) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            id: Set(id.to_string()),
            email: Set(email.to_string()),
            name: Set(id.to_string()),
            password: Set("!".to_string()),
            token: Set(None),
            is_active: Set(true),
            is_staff: Set(is_superuser),
            is_superuser: Set(is_superuser),
            last_login: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(self.connection())
        .await
    }

    /// Insert an activity.
    pub async fn insert_activity(
        &self,
        id: &str,
        title: &str,
        parent_id: Option<&str>,
    ) -> Result<activity::Model, DbErr> {
        activity::ActiveModel {
            id: Set(id.to_string()),
            title: Set(title.to_string()),
            description: Set(String::new()),
            parent_id: Set(parent_id.map(str::to_string)),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(self.connection())
        .await
    }
}
