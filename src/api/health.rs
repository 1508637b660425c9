//! Liveness and readiness endpoints
//!
//! `/readyz` only reports ready once the catalog tables can be read, which
//! also catches a store that answers but was never migrated.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::app::AppState;
use crate::db::Database;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct CatalogStatus {
    pub authors: i64,
    pub books: i64,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub database: bool,
    pub catalog: Option<CatalogStatus>,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn catalog_status(db: &Database) -> anyhow::Result<CatalogStatus> {
    Ok(CatalogStatus {
        authors: db.authors().count().await?,
        books: db.books().count().await?,
    })
}

async fn readyz(State(state): State<AppState>) -> Json<ReadyResponse> {
    let database = state.db.ping().await;
    let catalog = match catalog_status(&state.db).await {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!(error = %e, "Catalog not readable");
            None
        }
    };

    Json(ReadyResponse {
        ready: database && catalog.is_some(),
        database,
        catalog,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
