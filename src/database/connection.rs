use crate::config::DatabaseConfig;
use crate::error::AppResult;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub type DbPool = DatabaseConnection;

pub async fn create_pool(config: &DatabaseConfig) -> AppResult<DbPool> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);

    let pool = Database::connect(options).await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> AppResult<()> {
    Migrator::up(pool, None).await?;
    Ok(())
}

#[cfg(test)]
pub mod test_utils {
    use super::*;

    /// In-memory SQLite with the real schema applied.
    pub async fn setup_test_db() -> DbPool {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to test database");
        run_migrations(&db)
            .await
            .expect("Failed to run migrations");
        db
    }
}
