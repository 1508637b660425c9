//! Catalog mutations: authors and books
//!
//! `addBook` and `editAuthor` require an authenticated user; `addAuthor` does not.

use super::prelude::*;

#[derive(Default)]
pub struct CatalogMutations;

#[Object]
impl CatalogMutations {
    /// Add a book by an existing author (looked up by exact name)
    #[graphql(guard = "AuthGuard")]
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        author: String,
        published: Option<i32>,
        genres: Option<Vec<String>>,
    ) -> Result<Option<Book>> {
        let db = ctx.data_unchecked::<Database>();
        let invalid_args = || {
            json!({
                "title": title,
                "author": author,
                "published": published,
                "genres": genres,
            })
        };

        let author_record = db
            .authors()
            .get_by_name(&author)
            .await
            .map_err(|e| ApiError::internal(e).extend())?
            .ok_or_else(|| {
                tracing::warn!(author = %author, "addBook rejected, author not found");
                ApiError::user_input(format!("author not found: {author}"), invalid_args()).extend()
            })?;

        let record = db
            .books()
            .create(CreateBook {
                title: title.clone(),
                published,
                author_id: author_record.id.clone(),
                genres: genres.clone().unwrap_or_default(),
            })
            .await
            .map_err(|e| ApiError::user_input(e, invalid_args()).extend())?;

        tracing::info!(book_id = %record.id, title = %record.title, author = %author_record.name, "Book added");
        Ok(Some(Book::from_record(record, author_record.name)))
    }

    /// Set an author's birth year; null when no author has that name
    #[graphql(guard = "AuthGuard")]
    async fn edit_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        set_born_to: i32,
    ) -> Result<Option<Author>> {
        let db = ctx.data_unchecked::<Database>();
        let authors = db.authors();

        let Some(existing) = authors
            .get_by_name(&name)
            .await
            .map_err(|e| ApiError::internal(e).extend())?
        else {
            tracing::debug!(name = %name, "editAuthor found no author");
            return Ok(None);
        };

        let updated = authors
            .update_born(&existing.id, set_born_to)
            .await
            .map_err(|e| {
                ApiError::user_input(e, json!({ "name": name, "setBornTo": set_born_to })).extend()
            })?;

        if let Some(author) = &updated {
            tracing::info!(author_id = %author.id, born = set_born_to, "Author birth year updated");
        }
        Ok(updated.map(Author::from))
    }

    /// Add a new author
    async fn add_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        born: Option<i32>,
    ) -> Result<Option<Author>> {
        let db = ctx.data_unchecked::<Database>();

        let record = db
            .authors()
            .create(CreateAuthor { name: name.clone(), born })
            .await
            .map_err(|e| ApiError::user_input(e, json!({ "name": name, "born": born })).extend())?;

        tracing::info!(author_id = %record.id, name = %record.name, "Author added");
        Ok(Some(Author::from(record)))
    }
}
