pub mod auth;
pub mod catalog;

pub use auth::AuthMutations;
pub use catalog::CatalogMutations;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result};
    pub(crate) use serde_json::json;

    pub(crate) use crate::db::*;
    pub(crate) use crate::graphql::auth::AuthGuard;
    pub(crate) use crate::graphql::errors::ApiError;
    pub(crate) use crate::graphql::types::*;
}
