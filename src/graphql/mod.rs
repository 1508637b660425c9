//! GraphQL API for the library catalog
//!
//! This is the single API surface: queries for books and authors, mutations
//! for catalog edits and user accounts.

pub mod auth;
pub mod errors;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use auth::{AuthExt, AuthGuard, CurrentUser, bearer_token, resolve_current_user};
pub use errors::ApiError;
pub use schema::{CatalogSchema, MutationRoot, QueryRoot, build_schema};
