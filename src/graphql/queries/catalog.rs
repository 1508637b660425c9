use std::collections::HashMap;

use super::prelude::*;

#[derive(Default)]
pub struct CatalogQueries;

#[Object]
impl CatalogQueries {
    /// Total number of books
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let db = ctx.data_unchecked::<Database>();
        let count = db
            .books()
            .count()
            .await
            .map_err(|e| ApiError::internal(e).extend())?;
        Ok(count as i32)
    }

    /// Total number of authors
    async fn author_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let db = ctx.data_unchecked::<Database>();
        let count = db
            .authors()
            .count()
            .await
            .map_err(|e| ApiError::internal(e).extend())?;
        Ok(count as i32)
    }

    /// All books, optionally only those tagged with `genre` (exact match)
    async fn all_books(&self, ctx: &Context<'_>, genre: Option<String>) -> Result<Vec<Book>> {
        let db = ctx.data_unchecked::<Database>();
        let books = db.books();

        let records = match genre.as_deref() {
            Some(genre) => books.list_by_genre(genre).await,
            None => books.list().await,
        }
        .map_err(|e| ApiError::internal(e).extend())?;

        // Author names are joined here rather than in the store
        let author_names: HashMap<String, String> = db
            .authors()
            .list()
            .await
            .map_err(|e| ApiError::internal(e).extend())?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect();

        records
            .into_iter()
            .map(|record| -> Result<Book> {
                let name = author_names.get(&record.author_id).cloned().ok_or_else(|| {
                    ApiError::internal(format!(
                        "book {} references missing author {}",
                        record.id, record.author_id
                    ))
                    .extend()
                })?;
                Ok(Book::from_record(record, name))
            })
            .collect()
    }

    /// All authors
    async fn all_authors(&self, ctx: &Context<'_>) -> Result<Vec<Author>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db
            .authors()
            .list()
            .await
            .map_err(|e| ApiError::internal(e).extend())?;
        Ok(records.into_iter().map(Author::from).collect())
    }
}
