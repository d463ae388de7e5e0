use std::path::PathBuf;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

mod routes;

#[derive(Clone)]
pub struct AppState {
    /// Directory with `list.json` and the experience scripts
    pub experiences_dir: PathBuf,
}

pub fn router(state: AppState) -> Router {
    let scripts = ServeDir::new(&state.experiences_dir);
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/games", get(routes::list_games))
        .nest_service("/exp", scripts)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lobby_server=info,tower_http=info".into()),
        )
        .init();

    let addr = std::env::var("LOBBY_SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let state = AppState {
        experiences_dir: std::env::var("LOBBY_EXPERIENCES_DIR")
            .unwrap_or_else(|_| "experiences".to_string())
            .into(),
    };
    if !state.experiences_dir.is_dir() {
        tracing::warn!(
            "Experiences directory {} does not exist",
            state.experiences_dir.display()
        );
    }

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            return;
        }
    };
    tracing::info!(
        "Server running on http://{addr} (experiences from {})",
        state.experiences_dir.display()
    );
    if let Err(e) = axum::serve(listener, router(state)).await {
        tracing::error!("Server error: {e}");
    }
}
