use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use shared::GameList;

use crate::AppState;

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Game list from `list.json`, normalised to a `{slug: metadata}` map
pub async fn list_games(State(state): State<AppState>) -> Result<Json<GameList>, StatusCode> {
    let path = state.experiences_dir.join("list.json");
    let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
        tracing::error!("Failed to read {}: {e}", path.display());
        StatusCode::NOT_FOUND
    })?;
    let games = shared::parse_game_list(&text).map_err(|e| {
        tracing::error!("Invalid game list {}: {e}", path.display());
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    tracing::debug!("Serving {} games", games.len());
    Ok(Json(games))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir(list: Option<&str>) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lobby-server-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        if let Some(list) = list {
            std::fs::write(dir.join("list.json"), list).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_games_from_array() {
        let dir = temp_dir(Some(r#"[{"url": "/exp/a.json", "name": "Alpha", "author": "ann"}]"#));
        let Json(games) = list_games(State(AppState { experiences_dir: dir.clone() }))
            .await
            .unwrap();
        assert_eq!(games["000"].script_url(), Some("/exp/a.json"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_list_games_missing_file() {
        let dir = temp_dir(None);
        let err = list_games(State(AppState { experiences_dir: dir.clone() }))
            .await
            .unwrap_err();
        assert_eq!(err, StatusCode::NOT_FOUND);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_list_games_invalid_json() {
        let dir = temp_dir(Some("{not json"));
        let err = list_games(State(AppState { experiences_dir: dir.clone() }))
            .await
            .unwrap_err();
        assert_eq!(err, StatusCode::INTERNAL_SERVER_ERROR);
        let _ = std::fs::remove_dir_all(dir);
    }
}
