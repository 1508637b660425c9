pub mod catalog;
pub mod user;

pub use catalog::CatalogQueries;
pub use user::UserQueries;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result};

    pub(crate) use crate::db::Database;
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::errors::ApiError;
    pub(crate) use crate::graphql::types::*;
}
