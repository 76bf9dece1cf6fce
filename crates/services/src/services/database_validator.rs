//! Startup check that migrations ran and every content table is in place

use db::models::content_kind::ContentKind;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

pub const ENGAGEMENT_TABLES: &[&str] = &["users", "likes", "comments", "shares", "pronunciations"];

#[derive(Debug, Error)]
pub enum DatabaseValidationError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("missing tables: {}", .0.join(", "))]
    MissingTables(Vec<String>),
}

pub struct DatabaseValidator {
    pool: SqlitePool,
}

impl DatabaseValidator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Check if the database is initialized and every table the service writes to exists
    pub async fn validate(&self) -> Result<ValidationResult, DatabaseValidationError> {
        let migrations_table_exists = self.table_exists("_sqlx_migrations").await?;
        if !migrations_table_exists {
            warn!("Database not initialized - _sqlx_migrations table does not exist");
            return Ok(ValidationResult {
                is_initialized: false,
                migrations_applied: 0,
                warnings: vec!["Database has not been initialized. Run migrations.".to_string()],
            });
        }

        let migrations_applied =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
                .fetch_one(&self.pool)
                .await?;

        let missing = self.validate_tables(&required_tables()).await?;
        if !missing.is_empty() {
            return Err(DatabaseValidationError::MissingTables(missing));
        }

        info!(migrations_applied, "Database validation complete");
        Ok(ValidationResult {
            is_initialized: true,
            migrations_applied: migrations_applied as usize,
            warnings: vec![],
        })
    }

    /// Names from `required_tables` that do not exist
    pub async fn validate_tables(
        &self,
        required_tables: &[&str],
    ) -> Result<Vec<String>, DatabaseValidationError> {
        let mut missing_tables = Vec::new();
        for table in required_tables {
            if !self.table_exists(table).await? {
                missing_tables.push(table.to_string());
            }
        }
        Ok(missing_tables)
    }

    async fn table_exists(&self, table: &str) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = $1",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }
}

/// One table per content kind plus the shared user and engagement tables
pub fn required_tables() -> Vec<&'static str> {
    ContentKind::all()
        .into_iter()
        .map(|kind| kind.entity().table)
        .chain(ENGAGEMENT_TABLES.iter().copied())
        .collect()
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_initialized: bool,
    pub migrations_applied: usize,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.is_initialized && self.warnings.is_empty()
    }

    pub fn summary(&self) -> String {
        if !self.is_initialized {
            "Database not initialized - migrations need to be run".to_string()
        } else if !self.warnings.is_empty() {
            format!("Database validation warnings: {}", self.warnings.join(", "))
        } else {
            format!("Database OK - {} migrations applied", self.migrations_applied)
        }
    }
}

#[cfg(test)]
mod tests {
    use db::DBService;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    #[tokio::test]
    async fn test_migrated_database_is_valid() {
        let db = DBService::new_in_memory().await.unwrap();
        let result = DatabaseValidator::new(db.pool).validate().await.unwrap();
        assert!(result.is_ok());
        assert_eq!(result.migrations_applied, 1);
        assert_eq!(result.summary(), "Database OK - 1 migrations applied");
    }

    #[tokio::test]
    async fn test_empty_database_is_not_initialized() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let result = DatabaseValidator::new(pool).validate().await.unwrap();
        assert!(!result.is_initialized);
        assert!(!result.is_ok());
    }

    #[tokio::test]
    async fn test_dropped_table_is_reported() {
        let db = DBService::new_in_memory().await.unwrap();
        sqlx::query("DROP TABLE words").execute(&db.pool).await.unwrap();
        let err = DatabaseValidator::new(db.pool).validate().await.unwrap_err();
        match err {
            DatabaseValidationError::MissingTables(tables) => assert_eq!(tables, vec!["words"]),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_required_tables_cover_every_kind() {
        let tables = required_tables();
        assert_eq!(tables.len(), ContentKind::all().len() + ENGAGEMENT_TABLES.len());
        assert!(tables.contains(&"products"));
    }
}
