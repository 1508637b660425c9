//! Sample catalog for a fresh store.
//!
//! Inserts a small set of authors and books when the authors table is empty.
//! A store that already holds any author is left untouched.

use anyhow::{Result, anyhow};
use tracing::{debug, info};

use super::{CreateAuthor, CreateBook, Database};

/// Result of running seed operations.
#[derive(Debug, Default, PartialEq)]
pub struct SeedResult {
    pub authors: usize,
    pub books: usize,
}

#[derive(Debug)]
struct AuthorRow {
    name: &'static str,
    born: Option<i32>,
}

#[derive(Debug)]
struct BookRow {
    title: &'static str,
    published: i32,
    author: &'static str,
    genres: &'static [&'static str],
}

const AUTHORS: &[AuthorRow] = &[
    AuthorRow { name: "Robert Martin", born: Some(1952) },
    AuthorRow { name: "Martin Fowler", born: Some(1963) },
    AuthorRow { name: "Fyodor Dostoevsky", born: Some(1821) },
    AuthorRow { name: "Joshua Kerievsky", born: None },
    AuthorRow { name: "Sandi Metz", born: None },
];

const BOOKS: &[BookRow] = &[
    BookRow {
        title: "Clean Code",
        published: 2008,
        author: "Robert Martin",
        genres: &["refactoring"],
    },
    BookRow {
        title: "Agile software development",
        published: 2002,
        author: "Robert Martin",
        genres: &["agile", "patterns", "design"],
    },
    BookRow {
        title: "Refactoring, edition 2",
        published: 2018,
        author: "Martin Fowler",
        genres: &["refactoring"],
    },
    BookRow {
        title: "Refactoring to patterns",
        published: 2008,
        author: "Joshua Kerievsky",
        genres: &["refactoring", "patterns"],
    },
    BookRow {
        title: "Practical Object-Oriented Design, An Agile Primer Using Ruby",
        published: 2012,
        author: "Sandi Metz",
        genres: &["refactoring", "design"],
    },
    BookRow {
        title: "Crime and punishment",
        published: 1866,
        author: "Fyodor Dostoevsky",
        genres: &["classic", "crime"],
    },
    BookRow {
        title: "The Demon",
        published: 1872,
        author: "Fyodor Dostoevsky",
        genres: &["classic", "revolution"],
    },
];

/// Seed the sample catalog into an empty store.
pub async fn seed_sample_catalog(db: &Database) -> Result<SeedResult> {
    let authors = db.authors();
    let books = db.books();

    if authors.count().await? > 0 {
        debug!("Catalog already populated, skipping sample data");
        return Ok(SeedResult::default());
    }

    let mut result = SeedResult::default();
    let mut ids = Vec::with_capacity(AUTHORS.len());

    for row in AUTHORS {
        let author = authors
            .create(CreateAuthor { name: row.name.to_string(), born: row.born })
            .await?;
        ids.push((row.name, author.id));
        result.authors += 1;
    }

    for row in BOOKS {
        let author_id = ids
            .iter()
            .find(|(name, _)| *name == row.author)
            .map(|(_, id)| id.clone())
            .ok_or_else(|| anyhow!("Seed book '{}' references unknown author", row.title))?;

        books
            .create(CreateBook {
                title: row.title.to_string(),
                published: Some(row.published),
                author_id,
                genres: row.genres.iter().map(|g| g.to_string()).collect(),
            })
            .await?;
        result.books += 1;
    }

    info!(authors = result.authors, books = result.books, "Sample catalog seeded");
    Ok(result)
}
