//! Lobby scene construction.
//!
//! One planet per game carries the game's `ExperienceMetadata`; a label plane
//! floats above it. Decorative planets are scattered around. After the
//! `lobby_` naming pass the skybox is added under its own name, so it is
//! found by name rather than by prefix.

use glam::Vec3;
use rand::Rng;
use shared::{ExperienceMetadata, GameList, LightKind, Metadata, ObjectId, Shape};

use crate::state::scene::Scene;

pub const LOBBY_PREFIX: &str = "lobby_";
pub const EXTRA_PLANET_KEY: &str = "isExtraPlanet";

const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 2.0, -4.0);
const SKYBOX_SIZE: f32 = 1000.0;

/// What the builder put into the scene
#[derive(Debug, Clone, Default)]
pub struct LobbyReport {
    /// Planet mesh IDs with the game slug they stand for
    pub planets: Vec<(ObjectId, String)>,
    pub extra_planets: usize,
    pub skybox: Option<ObjectId>,
}

/// Build the lobby into `scene`: camera, room, planets, lights, skybox
pub fn build_lobby<R: Rng + ?Sized>(scene: &mut Scene, games: &GameList, rng: &mut R) -> LobbyReport {
    if scene.active_camera_id().is_none() {
        scene.add_camera("camera", CAMERA_POSITION);
    }

    // Room geometry
    scene.create_mesh("floor", Shape::Ground { width: 12.0, height: 12.0 }, [0.0; 3]);
    scene.create_mesh(
        "boxtoplight",
        Shape::Box { width: 3.0, height: 6.0, depth: 0.01 },
        [0.55, 2.7, -7.0],
    );
    scene.create_light(
        "lighttoplight",
        LightKind::RectArea { width: 3.0, height: 6.0, intensity: 0.7 },
        [0.55, 2.7, -7.0],
    );
    scene.create_light(
        "dirLight",
        LightKind::Directional { direction: [0.33, -0.07, -0.97], intensity: 5.0 },
        [0.0; 3],
    );

    let mut report = LobbyReport::default();

    for (index, (slug, game)) in games.iter().enumerate() {
        let position = [
            rng.random_range(-2.5..2.7),
            rng.random_range(0.5..2.0),
            rng.random_range(-3.5..3.7),
        ];
        let radius: f32 = rng.random_range(0.05..0.4);

        let planet = scene.create_mesh(
            format!("planet_{index}"),
            Shape::Sphere { diameter: radius * 2.0, segments: 32 },
            position,
        );
        if let Some(obj) = scene.get_mut(&planet) {
            obj.metadata = game.to_metadata();
        }

        let label = scene.create_mesh(
            format!("label_{index}"),
            Shape::Plane { size: 3.0 },
            [position[0], position[1] + radius + 0.2, position[2]],
        );
        if let Some(obj) = scene.get_mut(&label) {
            obj.metadata.insert("text".into(), game.label().into());
        }

        tracing::debug!("Created planet for game: {}", game.name);
        report.planets.push((planet, slug.clone()));
    }

    let extra_count = rng.random_range(10..20);
    for i in 0..extra_count {
        let position = [
            rng.random_range(-5.0..5.0),
            rng.random_range(0.5..3.0),
            rng.random_range(-5.0..5.0),
        ];
        let radius: f32 = rng.random_range(0.05..0.2);
        let id = scene.create_mesh(
            format!("extra_planet_{i}"),
            Shape::Sphere { diameter: radius * 2.0, segments: 16 },
            position,
        );
        if let Some(obj) = scene.get_mut(&id) {
            let mut metadata = Metadata::new();
            metadata.insert(EXTRA_PLANET_KEY.into(), true.into());
            obj.metadata = metadata;
        }
    }
    report.extra_planets = extra_count;

    apply_lobby_prefix(scene);

    report.skybox = Some(scene.create_mesh(
        "skyBox",
        Shape::Box { width: SKYBOX_SIZE, height: SKYBOX_SIZE, depth: SKYBOX_SIZE },
        [0.0; 3],
    ));

    tracing::info!(
        "Lobby built: {} planets, {} decorative",
        report.planets.len(),
        report.extra_planets
    );
    report
}

/// Prefix every mesh and light name with `lobby_`
pub fn apply_lobby_prefix(scene: &mut Scene) {
    for obj in scene.objects_mut() {
        if !obj.name.starts_with(LOBBY_PREFIX) {
            obj.name = format!("{LOBBY_PREFIX}{}", obj.name);
        }
    }
    scene.notify_mutated();
}

/// Metadata of the planet with this ID, if it is a selectable planet
pub fn pick_planet(scene: &Scene, id: &str) -> Option<ExperienceMetadata> {
    let obj = scene.get(id)?;
    if !obj.is_mesh() || obj.metadata_flag(EXTRA_PLANET_KEY) == Some(true) {
        return None;
    }
    ExperienceMetadata::from_metadata(&obj.metadata)
}

/// Every selectable planet in scene order
pub fn planets(scene: &Scene) -> Vec<(ObjectId, ExperienceMetadata)> {
    scene
        .meshes()
        .iter()
        .filter_map(|m| pick_planet(scene, &m.id).map(|meta| (m.id.clone(), meta)))
        .collect()
}

/// Top-down pick: the enabled planet whose footprint contains `(x, z)`.
/// Overlaps resolve to the nearest centre.
pub fn planet_at(scene: &Scene, x: f32, z: f32) -> Option<ObjectId> {
    scene
        .meshes()
        .iter()
        .filter(|m| m.enabled)
        .filter_map(|m| {
            let radius = match &m.kind {
                shared::ObjectKind::Mesh { shape: Shape::Sphere { diameter, .. } } => diameter / 2.0,
                _ => return None,
            };
            let dist = glam::Vec2::new(m.position[0] - x, m.position[2] - z).length();
            (dist <= radius).then_some((m, dist))
        })
        .filter(|(m, _)| pick_planet(scene, &m.id).is_some())
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(m, _)| m.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experience::{LobbyLayout, LobbySnapshot};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn games() -> GameList {
        shared::parse_game_list(
            r#"{
                "a": {"url": "/exp/a.json", "name": "Alpha", "author": "ann", "genres": ["puzzle"]},
                "b": {"url": "/exp/b.json", "name": "Beta", "author": "bob"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_build_lobby_naming() {
        let mut scene = Scene::new();
        let report = build_lobby(&mut scene, &games(), &mut StdRng::seed_from_u64(7));
        assert_eq!(report.planets.len(), 2);
        assert!((10..20).contains(&report.extra_planets));
        assert!(scene.find_mesh("lobby_planet_0").is_some());
        assert!(scene.find_mesh("lobby_label_1").is_some());
        assert!(scene.find_light("lobby_dirLight").is_some());
        assert!(scene.find_mesh("skyBox").is_some());
        assert!(scene.active_camera().is_some());
    }

    #[test]
    fn test_snapshot_covers_whole_lobby() {
        let mut scene = Scene::new();
        build_lobby(&mut scene, &games(), &mut StdRng::seed_from_u64(1));
        let snap = LobbySnapshot::capture(&scene, &LobbyLayout::default());
        assert!(snap.directional_light().is_some());
        assert!(snap.skybox().is_some());
        // All meshes are prefixed except the skybox
        assert_eq!(snap.mesh_ids().count(), scene.mesh_count() - 1);
    }

    #[test]
    fn test_pick_planet() {
        let mut scene = Scene::new();
        let report = build_lobby(&mut scene, &games(), &mut StdRng::seed_from_u64(3));
        let (id, slug) = &report.planets[1];
        assert_eq!(slug, "b");
        let meta = pick_planet(&scene, id).unwrap();
        assert_eq!(meta.name, "Beta");
        assert_eq!(meta.script_url(), Some("/exp/b.json"));

        let extra = scene.find_mesh("lobby_extra_planet_0").unwrap().id.clone();
        assert!(pick_planet(&scene, &extra).is_none());
        let label = scene.find_mesh("lobby_label_0").unwrap().id.clone();
        assert!(pick_planet(&scene, &label).is_none());
        assert_eq!(planets(&scene).len(), 2);
    }

    #[test]
    fn test_planet_at() {
        let mut scene = Scene::new();
        let report = build_lobby(&mut scene, &games(), &mut StdRng::seed_from_u64(9));
        let (id, _) = &report.planets[0];
        let pos = scene.get(id).unwrap().position;
        assert_eq!(planet_at(&scene, pos[0], pos[2]).as_ref(), Some(id));
        assert!(planet_at(&scene, 100.0, 100.0).is_none());

        scene.set_enabled(id, false);
        assert_ne!(planet_at(&scene, pos[0], pos[2]).as_ref(), Some(id));
    }
}
