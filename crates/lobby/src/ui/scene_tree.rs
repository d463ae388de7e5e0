//! Scene tree panel - meshes, lights and cameras
//!
//! Experience-owned objects are highlighted, disabled ones are dimmed.

use egui::Ui;

use crate::experience::tagger::is_experience_object;
use crate::i18n::t;
use crate::state::scene::{object_display_name, object_icon};
use crate::state::AppState;

const EXPERIENCE_COLOR: egui::Color32 = egui::Color32::from_rgb(90, 200, 255);

pub fn show(ui: &mut Ui, state: &AppState) {
    let scene = &state.scene;

    ui.horizontal(|ui| {
        ui.heading(t("tree.title"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("v{}", scene.version()));
        });
    });
    ui.separator();

    egui::ScrollArea::vertical()
        .id_salt("scene_tree_scroll")
        .show(ui, |ui| {
            for (title, objects) in [(t("tree.meshes"), scene.meshes()), (t("tree.lights"), scene.lights())] {
                egui::CollapsingHeader::new(format!("{title} ({})", objects.len()))
                    .default_open(true)
                    .show(ui, |ui| {
                        for obj in objects {
                            let mut text = format!("{} {}", object_icon(obj), object_display_name(obj));
                            if !obj.enabled {
                                text.push(' ');
                                text.push_str(t("tree.hidden"));
                            }
                            let mut rich = egui::RichText::new(text);
                            if is_experience_object(obj) {
                                rich = rich.color(EXPERIENCE_COLOR);
                            } else if !obj.enabled {
                                rich = rich.weak();
                            }
                            ui.label(rich);
                        }
                    });
            }

            egui::CollapsingHeader::new(t("tree.cameras"))
                .default_open(false)
                .show(ui, |ui| {
                    let active = scene.active_camera_id();
                    for camera in scene.cameras() {
                        let marker = if active == Some(&camera.id) { "▶" } else { " " };
                        ui.label(format!("{marker} {}", camera.name));
                    }
                });
        });
}
