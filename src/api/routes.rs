//! Router assembly and server startup.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::store::TaskStore;

use super::todos;

/// Shared application state.
pub struct AppState {
    pub store: TaskStore,
}

/// Start the HTTP server.
pub async fn serve(config: Config, store: TaskStore) -> anyhow::Result<()> {
    let state = Arc::new(AppState { store });
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server is running on port {}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api/todos", todos::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET / - welcome message.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to the TODO List API" }))
}
