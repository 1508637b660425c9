//! Library catalog backend - entry point
//!
//! All operations are exposed via GraphQL at /graphql.

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_catalog::config::Config;
use library_catalog::db::{Database, seed_sample_catalog};
use library_catalog::graphql::build_schema;
use library_catalog::services::{AuthConfig, AuthService};
use library_catalog::{AppState, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_catalog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting library catalog");

    tracing::info!(database_url = %config.database_url, "Connecting to database");
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    tracing::info!("Database connected and migrated");

    if config.seed_sample_data {
        seed_sample_catalog(&db).await?;
    }

    let auth = AuthService::new(db.clone(), AuthConfig::from_config(&config));
    let schema = build_schema(db.clone(), auth.clone());
    tracing::info!("GraphQL schema built");

    let state = AppState {
        db,
        auth,
        schema,
    };
    let app = build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    tracing::info!(
        "GraphQL playground: http://{}:{}/graphql",
        config.display_host(),
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
