//! Users repository for authentication

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use sqlx::SqlitePool as Pool;

use super::sqlite_helpers::{is_unique_violation, new_id, now_iso8601};
use super::validation::{MIN_USERNAME_LEN, ValidationError, require_min_len};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub favorite_genre: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub favorite_genre: String,
    pub password_hash: String,
}

impl CreateUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_min_len("username", &self.username, MIN_USERNAME_LEN)?;
        require_min_len("favoriteGenre", &self.favorite_genre, 1)
    }
}

type UserRow = (String, String, String, String, String);

fn row_to_record(r: UserRow) -> UserRecord {
    UserRecord {
        id: r.0,
        username: r.1,
        favorite_genre: r.2,
        password_hash: r.3,
        created_at: r.4,
    }
}

pub struct UsersRepository {
    pool: Pool,
}

impl UsersRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, user: CreateUser) -> Result<UserRecord> {
        user.validate()?;

        let id = new_id();
        let username = user.username.trim().to_string();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, favorite_genre, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&username)
        .bind(&user.favorite_genre)
        .bind(&user.password_hash)
        .bind(now_iso8601())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                anyhow!(ValidationError::Duplicate { field: "username", value: username.clone() })
            } else {
                e.into()
            }
        })?;

        self.get_by_id(&id).await?.ok_or_else(|| anyhow!("Failed to create user"))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, favorite_genre, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// Get user by username, trimmed the same way usernames are stored
    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, favorite_genre, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }
}
