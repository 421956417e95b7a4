use std::time::Duration;

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Fixture cards loaded into an empty store when seeding is enabled.
const SEED_CASH_CARDS: &[(i64, f64, &str)] = &[
    (99, 123.45, "sarah1"),
    (100, 1.00, "sarah1"),
    (101, 150.00, "sarah1"),
    (102, 200.00, "kumar2"),
];

/// Owns the connection pool and the schema it serves
#[derive(Clone)]
pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    /// Connect, create the schema if needed, and optionally seed the fixture cards.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = if Self::is_in_memory(&config.url) {
            // Every connection to :memory: is its own database, so pin exactly one.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .connect(&config.url)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections.max(1))
                .connect(&config.url)
                .await?
        };

        info!("Created database pool for: {}", config.url);

        let manager = Self { pool };
        manager.migrate().await?;
        if config.seed {
            manager.seed().await?;
        }
        Ok(manager)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cash_card (
                id     INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL    NOT NULL,
                owner  TEXT    NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_cash_card_owner ON cash_card (owner)")
            .execute(&self.pool)
            .await?;

        debug!("cash_card schema ready");
        Ok(())
    }

    /// Insert the fixture cards, but only into an empty table.
    async fn seed(&self) -> Result<(), DatabaseError> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cash_card")
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            debug!(existing, "cash_card table already populated, skipping seed");
            return Ok(());
        }

        for (id, amount, owner) in SEED_CASH_CARDS {
            sqlx::query("INSERT INTO cash_card (id, amount, owner) VALUES (?, ?, ?)")
                .bind(*id)
                .bind(*amount)
                .bind(*owner)
                .execute(&self.pool)
                .await?;
        }

        info!(count = SEED_CASH_CARDS.len(), "Seeded cash_card fixtures");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    fn is_in_memory(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config(seed: bool) -> DatabaseConfig {
        DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
            seed,
        }
    }

    #[test]
    fn detects_in_memory_urls() {
        assert!(DatabaseManager::is_in_memory("sqlite::memory:"));
        assert!(DatabaseManager::is_in_memory("sqlite://cards?mode=memory&cache=shared"));
        assert!(!DatabaseManager::is_in_memory("sqlite://cashcards.db?mode=rwc"));
    }

    #[tokio::test]
    async fn seeds_fixtures_once() {
        let manager = DatabaseManager::connect(&memory_config(true)).await.unwrap();
        manager.seed().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cash_card")
            .fetch_one(manager.pool())
            .await
            .unwrap();
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn unseeded_store_is_empty_and_healthy() {
        let manager = DatabaseManager::connect(&memory_config(false)).await.unwrap();
        manager.health_check().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cash_card")
            .fetch_one(manager.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
