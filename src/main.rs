use axum::{
    routing::{get, post},
    Router,
};
use config::AppConfig;
use database::PgPersistence;
use search::store::SearchStore;
use shuttle_runtime::SecretStore;
use sqlx::PgPool;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
mod api;
mod config;
mod database;
mod error;
mod mcp;
mod registries;
mod search;
mod state;
mod tools;
mod trending;

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: SecretStore,
) -> shuttle_axum::ShuttleAxum {
    database::init_db(&pool)
        .await
        .map_err(shuttle_runtime::CustomError::new)?;

    let config = AppConfig::from_secrets(&secrets);
    let store = SearchStore::load(Arc::new(PgPersistence::new(pool))).await;
    let state = AppState::new(config, store);
    info!(
        "Starting {} with {}ms search debounce",
        state.config.server_name,
        state.debouncer.delay().as_millis()
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // MCP protocol endpoint
        .route("/mcp", post(mcp::mcp_handler))
        // REST endpoints for the web client
        .route("/api/tools", get(api::list_tools))
        .route("/api/search", get(api::search))
        .route(
            "/api/search/history",
            get(api::search_history).delete(api::clear_search_history),
        )
        .route("/api/search/stats", get(api::search_stats))
        .route("/api/search/ai-usage", post(api::record_ai_usage))
        .route("/api/recommendations", get(api::recommendations))
        .route("/health", get(api::health))
        .layer(cors)
        .with_state(state);

    Ok(router.into())
}
