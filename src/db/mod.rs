//! Database connection and repositories
//!
//! The catalog keeps three collections (authors, books, users) in SQLite.

pub mod authors;
pub mod books;
pub mod seed;
pub mod sqlite_helpers;
pub mod users;
pub mod validation;

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use authors::{AuthorRecord, AuthorRepository, CreateAuthor};
pub use books::{BookRecord, BookRepository, CreateBook};
pub use seed::{SeedResult, seed_sample_catalog};
pub use users::{CreateUser, UserRecord, UsersRepository};
pub use validation::ValidationError;

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the store at `url` (a `sqlite:` URL or a file path), creating it if missing
    pub async fn connect(url: &str) -> Result<Self> {
        let options = if url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(url)
                .with_context(|| format!("Invalid database URL: {url}"))?
        } else {
            SqliteConnectOptions::new().filename(url)
        };
        let options = options.create_if_missing(true).foreign_keys(true);

        if let Some(parent) = options.get_filename().parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }

    /// Open a private in-memory store with migrations applied
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Check the store answers queries
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }

    /// Get an authors repository
    pub fn authors(&self) -> AuthorRepository {
        AuthorRepository::new(self.pool.clone())
    }

    /// Get a books repository
    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    /// Get a users repository
    pub fn users(&self) -> UsersRepository {
        UsersRepository::new(self.pool.clone())
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
