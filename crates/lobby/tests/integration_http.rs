//! HTTP script loading against a throwaway local responder.

use std::time::Duration;

use lobby_lib::experience::{load_script, ExperienceError, ExperienceLifecycle, HttpScriptSource, ScriptSource};
use lobby_lib::fixtures;
use lobby_lib::state::scene::Scene;
use shared::Shape;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve `routes` (path -> body) over HTTP/1.1; unknown paths answer 404
async fn serve(routes: Vec<(&'static str, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let response = match routes.iter().find(|(p, _)| *p == path) {
                    Some((_, body)) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}

fn source(base: &str) -> HttpScriptSource {
    HttpScriptSource::new(Some(base), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_relative_url() {
    let base = serve(vec![("/exp/a.json", fixtures::boxes_script(2))]).await;
    let text = load_script(&source(&base), &fixtures::experience("A", "/exp/a.json"))
        .await
        .unwrap();
    assert_eq!(text, fixtures::boxes_script(2));
}

#[tokio::test]
async fn test_404_carries_status() {
    let base = serve(vec![]).await;
    let err = source(&base).fetch("/exp/nope.json").await.unwrap_err();
    assert_eq!(err.status, Some(404));
    assert_eq!(err.reason, "Not Found");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Bind and drop to get a port nobody listens on
    let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
    let err = source(&format!("http://{addr}")).fetch("/exp/a.json").await.unwrap_err();
    assert_eq!(err.status, None);
}

#[tokio::test]
async fn test_fetch_games() {
    let list = r#"[{"url": "/exp/a.json", "name": "Alpha", "author": "ann"}]"#.to_string();
    let base = serve(vec![("/api/games", list)]).await;
    let games = source(&base).fetch_games("/api/games").await.unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games["000"].name, "Alpha");
}

#[tokio::test]
async fn test_404_leaves_lobby_untouched() {
    let base = serve(vec![]).await;
    let mut scene = Scene::new();
    scene.create_mesh("lobby_floor", Shape::Plane { size: 10.0 }, [0.0; 3]);
    let mut lifecycle = ExperienceLifecycle::default();

    let err = lifecycle
        .load(&mut scene, None, &source(&base), &fixtures::experience("A", "/exp/a.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, ExperienceError::Transport(_)));
    assert!(scene.meshes()[0].enabled);
    assert_eq!(scene.mesh_count(), 1);
}
