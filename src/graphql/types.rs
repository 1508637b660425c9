//! GraphQL type definitions
//!
//! These types mirror the stored records but are decorated with async-graphql attributes.

use async_graphql::{ComplexObject, Context, ErrorExtensions, ID, SimpleObject};

use crate::db::{AuthorRecord, BookRecord, Database, UserRecord};

use super::errors::ApiError;

/// A catalogued book
#[derive(Debug, Clone, SimpleObject)]
pub struct Book {
    pub title: String,
    pub published: Option<i32>,
    /// Author's display name
    pub author: String,
    pub genres: Option<Vec<String>>,
    pub id: ID,
}

impl Book {
    pub fn from_record(record: BookRecord, author_name: String) -> Self {
        Self {
            title: record.title,
            published: record.published,
            author: author_name,
            genres: Some(record.genres),
            id: ID(record.id),
        }
    }
}

/// A book author
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Author {
    pub name: Option<String>,
    pub born: Option<i32>,
    pub id: ID,
}

#[ComplexObject]
impl Author {
    /// Number of books referencing this author
    async fn book_count(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<i32>> {
        let db = ctx.data_unchecked::<Database>();
        let count = db
            .books()
            .count_by_author(&self.id)
            .await
            .map_err(|e| ApiError::internal(e).extend())?;
        Ok(Some(count as i32))
    }
}

impl From<AuthorRecord> for Author {
    fn from(record: AuthorRecord) -> Self {
        Self {
            name: Some(record.name),
            born: record.born,
            id: ID(record.id),
        }
    }
}

/// A registered user
#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    pub username: String,
    pub favorite_genre: String,
    pub id: ID,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            username: record.username,
            favorite_genre: record.favorite_genre,
            id: ID(record.id),
        }
    }
}

impl From<&UserRecord> for User {
    fn from(record: &UserRecord) -> Self {
        Self::from(record.clone())
    }
}

/// A signed bearer token
#[derive(Debug, Clone, SimpleObject)]
pub struct Token {
    pub value: String,
}
