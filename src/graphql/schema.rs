//! GraphQL schema definition
//!
//! Query and mutation roots are merged from the per-domain objects in
//! `queries/` and `mutations/`.

use async_graphql::extensions::Tracing;
use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;
use crate::services::AuthService;

use super::mutations::{AuthMutations, CatalogMutations};
use super::queries::{CatalogQueries, UserQueries};

/// The GraphQL schema type
pub type CatalogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(CatalogQueries, UserQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(CatalogMutations, AuthMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(db: Database, auth: AuthService) -> CatalogSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .extension(Tracing)
        .data(db)
        .data(auth)
        .finish()
}
