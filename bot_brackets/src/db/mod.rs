//! Persistent protection store.
//!
//! The guild tracker table and the friend list both live in PostgreSQL when
//! a `DATABASE_URL` is configured. `Database` owns the pool and hands out the
//! repositories that read and write through it; without a database the
//! in-memory repositories stand in.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub mod config;
pub mod repository;

pub use config::DatabaseConfig;
pub use repository::{
    GuildTrackerRepository, PgGuildTrackerRepository, PgSocialRepository, STORE_QUERY_TIMEOUT,
    SocialRepository,
    memory::{InMemoryGuildTrackerRepository, InMemorySocialRepository},
};

/// Connection pool shared by the guild tracker and friend list repositories
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open the pool and make sure the server answers
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bot_brackets::db::{Database, DatabaseConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let db = Database::new(&DatabaseConfig::development()).await?;
    ///     let guilds = db.guild_tracker();
    ///     guilds.ensure_schema().await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.database_url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Guild tracker table backed by this pool
    pub fn guild_tracker(&self) -> PgGuildTrackerRepository {
        PgGuildTrackerRepository::new(self.pool.clone())
    }

    /// `character_social` friend list backed by this pool
    pub fn social(&self) -> PgSocialRepository {
        PgSocialRepository::new(self.pool.clone())
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
