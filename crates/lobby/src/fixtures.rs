//! Factory functions for test data: game lists, metadata and scripts.

use shared::{ExperienceMetadata, GameList};

/// Metadata pointing at `url`
pub fn experience(name: &str, url: &str) -> ExperienceMetadata {
    ExperienceMetadata {
        url: Some(url.to_string()),
        name: name.to_string(),
        author: "tester".to_string(),
        genres: vec!["demo".to_string()],
    }
}

/// Metadata without a script URL
pub fn experience_without_url(name: &str) -> ExperienceMetadata {
    ExperienceMetadata {
        url: None,
        name: name.to_string(),
        ..Default::default()
    }
}

/// Game list with one entry per `(slug, url)`
pub fn game_list(entries: &[(&str, &str)]) -> GameList {
    entries
        .iter()
        .map(|(slug, url)| (slug.to_string(), experience(&slug.to_uppercase(), url)))
        .collect()
}

/// Two games: `a` at `/exp/a.json`, `b` at `/exp/b.json`
pub fn two_games() -> GameList {
    game_list(&[("a", "/exp/a.json"), ("b", "/exp/b.json")])
}

/// Script creating `n` boxes named `box_0..box_n`
pub fn boxes_script(n: usize) -> String {
    let commands: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"command": "create_mesh", "name": "box_{i}", "shape": {{"type": "box", "width": 1, "height": 1, "depth": 1}}, "position": [{i}, 0.5, 2]}}"#
            )
        })
        .collect();
    format!("[{}]", commands.join(","))
}

/// Script creating a ground, a hemispheric light and a sphere
pub fn arena_script() -> &'static str {
    r#"[
        {"command": "log", "message": "arena loading"},
        {"command": "create_light", "name": "arenaLight", "light": {"type": "hemispheric", "direction": [0, 1, 0], "intensity": 0.8}},
        {"command": "create_mesh", "name": "arenaGround", "shape": {"type": "ground", "width": 20, "height": 20}},
        {"command": "create_mesh", "name": "ball", "shape": {"type": "sphere", "diameter": 1}, "position": [0, 1, 0]},
        {"command": "move_camera", "position": [0, 3, -8]}
    ]"#
}

/// Script that creates one mesh and then aborts
pub fn faulty_script() -> &'static str {
    r#"[
        {"command": "create_mesh", "name": "partial", "shape": {"type": "plane", "size": 2}},
        {"command": "abort", "message": "asset missing"}
    ]"#
}

/// Script that re-enables a lobby mesh and renames it
pub fn lobby_touching_script() -> &'static str {
    r#"[
        {"command": "set_enabled", "target": "lobby_floor", "enabled": true},
        {"command": "rename", "target": "lobby_floor", "to": "arena_floor"},
        {"command": "create_mesh", "name": "marker", "shape": {"type": "box", "width": 1, "height": 1, "depth": 1}}
    ]"#
}
