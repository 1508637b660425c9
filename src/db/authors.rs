//! Authors repository

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sqlx::SqlitePool as Pool;

use super::sqlite_helpers::{is_unique_violation, new_id, now_iso8601};
use super::validation::{MIN_AUTHOR_NAME_LEN, ValidationError, require_min_len};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AuthorRecord {
    pub id: String,
    pub name: String,
    pub born: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateAuthor {
    pub name: String,
    pub born: Option<i32>,
}

impl CreateAuthor {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_min_len("name", &self.name, MIN_AUTHOR_NAME_LEN)
    }
}

const SELECT_AUTHOR: &str = "SELECT id, name, born, created_at, updated_at FROM authors";

pub struct AuthorRepository {
    pool: Pool,
}

impl AuthorRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Validate and insert a new author
    pub async fn create(&self, input: CreateAuthor) -> Result<AuthorRecord> {
        input.validate()?;

        let id = new_id();
        let now = now_iso8601();
        let name = input.name.trim().to_string();

        sqlx::query(
            "INSERT INTO authors (id, name, born, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&name)
        .bind(input.born)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                anyhow!(ValidationError::Duplicate { field: "name", value: name.clone() })
            } else {
                e.into()
            }
        })?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow!("Failed to create author"))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<AuthorRecord>> {
        let record = sqlx::query_as::<_, AuthorRecord>(&format!("{SELECT_AUTHOR} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    /// Case-sensitive name lookup, trimmed the same way names are stored
    pub async fn get_by_name(&self, name: &str) -> Result<Option<AuthorRecord>> {
        let record =
            sqlx::query_as::<_, AuthorRecord>(&format!("{SELECT_AUTHOR} WHERE name = ?"))
                .bind(name.trim())
                .fetch_optional(&self.pool)
                .await?;
        Ok(record)
    }

    /// All authors in insertion order
    pub async fn list(&self) -> Result<Vec<AuthorRecord>> {
        let records =
            sqlx::query_as::<_, AuthorRecord>(&format!("{SELECT_AUTHOR} ORDER BY rowid"))
                .fetch_all(&self.pool)
                .await?;
        Ok(records)
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Set the birth year, returning the updated record or None if the id is unknown
    pub async fn update_born(&self, id: &str, born: i32) -> Result<Option<AuthorRecord>> {
        let result = sqlx::query("UPDATE authors SET born = ?, updated_at = ? WHERE id = ?")
            .bind(born)
            .bind(now_iso8601())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }
}
