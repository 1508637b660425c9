//! Application state and HTTP router construction.
//!
//! The GraphQL handler is where each request's bearer token is resolved to a
//! user before the operation reaches the resolvers.

use async_graphql::http::GraphiQLSource;
use async_graphql::{ErrorExtensions, Pos};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::{ACCEPT, AUTHORIZATION};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::db::Database;
use crate::graphql::{ApiError, CatalogSchema, resolve_current_user};
use crate::services::{AuthError, AuthService};

/// Shared state for HTTP handlers (GraphQL, health).
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: AuthService,
    pub schema: CatalogSchema,
}

/// Build the full Axum router: /graphql, health endpoints and layers.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(api::health::router())
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GraphQL query/mutation handler with auth context
async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    let authorization = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());

    match resolve_current_user(&state.auth, authorization).await {
        Ok(Some(user)) => request = request.data(user),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Rejected bearer token");
            let error = auth_failure(e).extend().into_server_error(Pos::default());
            return async_graphql::Response::from_errors(vec![error]).into();
        }
    }

    state.schema.execute(request).await.into()
}

fn auth_failure(err: AuthError) -> ApiError {
    match err {
        AuthError::Store(e) => ApiError::internal(e),
        AuthError::Signing(e) => ApiError::internal(e),
        other => ApiError::Authentication(other.to_string()),
    }
}

/// GraphiQL interactive playground (only for browsers)
async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        axum::response::Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response()
    } else {
        (
            axum::http::StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}
