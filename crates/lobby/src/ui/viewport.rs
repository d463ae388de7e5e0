//! Top-down scene view.
//!
//! Draws enabled meshes on the XZ plane, lights as markers and the active
//! camera as a triangle. Clicking a planet selects it; double-clicking enters it.

use egui::{Color32, Pos2, Sense, Stroke, Ui, Vec2};
use shared::{ExperienceMetadata, ObjectKind, Shape};

use crate::experience::tagger::is_experience_object;
use crate::lobby::{pick_planet, planet_at};
use crate::state::AppState;

/// World units visible across the shorter side of the panel
const VIEW_EXTENT: f32 = 14.0;

const LOBBY_COLOR: Color32 = Color32::from_rgb(70, 80, 100);
const PLANET_COLOR: Color32 = Color32::from_rgb(50, 200, 255);
const EXPERIENCE_COLOR: Color32 = Color32::from_rgb(255, 170, 60);
const LIGHT_COLOR: Color32 = Color32::from_rgb(255, 240, 150);

struct Projection {
    center: Pos2,
    scale: f32,
}

impl Projection {
    fn to_screen(&self, x: f32, z: f32) -> Pos2 {
        // +Z points up on screen
        Pos2::new(self.center.x + x * self.scale, self.center.y - z * self.scale)
    }

    fn to_world(&self, p: Pos2) -> (f32, f32) {
        ((p.x - self.center.x) / self.scale, (self.center.y - p.y) / self.scale)
    }
}

/// Returns planet metadata when the user double-clicks a planet
pub fn show(ui: &mut Ui, state: &mut AppState) -> Option<ExperienceMetadata> {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, Color32::from_rgb(8, 10, 16));

    let proj = Projection {
        center: rect.center(),
        scale: rect.width().min(rect.height()) / VIEW_EXTENT,
    };

    for obj in state.scene.meshes().iter().filter(|m| m.enabled) {
        let ObjectKind::Mesh { shape } = &obj.kind else {
            continue;
        };
        let pos = proj.to_screen(obj.position[0], obj.position[2]);
        let color = if is_experience_object(obj) {
            EXPERIENCE_COLOR
        } else if pick_planet(&state.scene, &obj.id).is_some() {
            PLANET_COLOR
        } else {
            LOBBY_COLOR
        };
        match shape {
            Shape::Sphere { diameter, .. } => {
                let radius = (diameter / 2.0 * proj.scale).max(2.0);
                painter.circle_filled(pos, radius, color.gamma_multiply(0.6));
                if state.selected.as_deref() == Some(obj.id.as_str()) {
                    painter.circle_stroke(pos, radius + 3.0, Stroke::new(1.5, Color32::WHITE));
                }
            }
            Shape::Box { width, depth, .. } => {
                let size = Vec2::new(width * proj.scale, depth * proj.scale);
                if size.x < rect.width() * 2.0 {
                    painter.rect_stroke(
                        egui::Rect::from_center_size(pos, size),
                        0.0,
                        Stroke::new(1.0, color),
                        egui::StrokeKind::Middle,
                    );
                }
            }
            Shape::Ground { width, height } => {
                let size = Vec2::new(width * proj.scale, height * proj.scale);
                painter.rect_stroke(
                    egui::Rect::from_center_size(pos, size),
                    0.0,
                    Stroke::new(1.0, color.gamma_multiply(0.5)),
                    egui::StrokeKind::Middle,
                );
            }
            Shape::Plane { .. } => {}
        }
    }

    for light in state.scene.lights().iter().filter(|l| l.enabled) {
        let pos = proj.to_screen(light.position[0], light.position[2]);
        painter.circle_stroke(pos, 4.0, Stroke::new(1.0, LIGHT_COLOR));
    }

    if let Some(camera) = state.scene.active_camera() {
        let p = proj.to_screen(camera.position.x, camera.position.z);
        painter.add(egui::Shape::convex_polygon(
            vec![p + Vec2::new(0.0, -7.0), p + Vec2::new(-5.0, 5.0), p + Vec2::new(5.0, 5.0)],
            Color32::WHITE,
            Stroke::NONE,
        ));
    }

    let hit = response
        .interact_pointer_pos()
        .map(|p| proj.to_world(p))
        .and_then(|(x, z)| planet_at(&state.scene, x, z));

    if response.clicked() {
        state.selected = hit.clone();
    }
    if response.double_clicked() {
        return hit.and_then(|id| pick_planet(&state.scene, &id));
    }
    None
}
