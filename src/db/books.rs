//! Books repository
//!
//! A book references its author by id. Genres are kept as an ordered JSON array.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use sqlx::SqlitePool as Pool;

use super::sqlite_helpers::{is_unique_violation, json_to_vec, new_id, now_iso8601, vec_to_json};
use super::validation::{MIN_BOOK_TITLE_LEN, ValidationError, require_min_len};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub published: Option<i32>,
    pub author_id: String,
    pub genres: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateBook {
    pub title: String,
    pub published: Option<i32>,
    pub author_id: String,
    pub genres: Vec<String>,
}

impl CreateBook {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_min_len("title", &self.title, MIN_BOOK_TITLE_LEN)?;
        if self.author_id.is_empty() {
            return Err(ValidationError::Required { field: "author" });
        }
        Ok(())
    }
}

type BookRow = (String, String, Option<i32>, String, String, String);

fn row_to_record(r: BookRow) -> BookRecord {
    BookRecord {
        id: r.0,
        title: r.1,
        published: r.2,
        author_id: r.3,
        genres: json_to_vec(&r.4),
        created_at: r.5,
    }
}

const SELECT_BOOK: &str =
    "SELECT id, title, published, author_id, genres, created_at FROM books";

pub struct BookRepository {
    pool: Pool,
}

impl BookRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Validate and insert a new book
    pub async fn create(&self, input: CreateBook) -> Result<BookRecord> {
        input.validate()?;

        let id = new_id();
        let now = now_iso8601();
        let title = input.title.trim().to_string();

        sqlx::query(
            r#"
            INSERT INTO books (id, title, published, author_id, genres, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&title)
        .bind(input.published)
        .bind(&input.author_id)
        .bind(vec_to_json(&input.genres))
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                anyhow!(ValidationError::Duplicate { field: "title", value: title.clone() })
            } else {
                e.into()
            }
        })?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow!("Failed to create book"))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<BookRecord>> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{SELECT_BOOK} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(row_to_record))
    }

    /// All books in insertion order
    pub async fn list(&self) -> Result<Vec<BookRecord>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!("{SELECT_BOOK} ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(row_to_record).collect())
    }

    /// Books whose genres contain `genre` (case-sensitive exact match)
    pub async fn list_by_genre(&self, genre: &str) -> Result<Vec<BookRecord>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "{SELECT_BOOK} WHERE EXISTS (SELECT 1 FROM json_each(books.genres) WHERE json_each.value = ?) ORDER BY rowid"
        ))
        .bind(genre)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_record).collect())
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_author(&self, author_id: &str) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
