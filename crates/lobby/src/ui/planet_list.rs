//! Planet list panel: one entry per game, click to enter

use egui::Ui;
use shared::ExperienceMetadata;

use crate::i18n::t;
use crate::lobby::planets;
use crate::state::AppState;

/// Returns the metadata of the planet the user chose to enter
pub fn show(ui: &mut Ui, state: &mut AppState) -> Option<ExperienceMetadata> {
    let planets = planets(&state.scene);

    ui.horizontal(|ui| {
        ui.heading(t("planets.title"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("({})", planets.len()));
        });
    });
    ui.separator();

    if planets.is_empty() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| ui.weak(t("planets.empty")));
        return None;
    }

    let can_enter = state.lifecycle.is_idle();
    let mut picked = None;

    egui::ScrollArea::vertical()
        .id_salt("planet_list_scroll")
        .show(ui, |ui| {
            for (id, meta) in planets {
                let selected = state.selected.as_deref() == Some(id.as_str());
                let response = ui.selectable_label(selected, format!("◉ {}", meta.name));
                if response.clicked() {
                    state.selected = Some(id.clone());
                }
                if selected {
                    ui.indent(id.as_str(), |ui| {
                        ui.weak(format!("{}: {}", t("planets.author"), meta.author));
                        if !meta.genres.is_empty() {
                            ui.weak(meta.genres.join(", "));
                        }
                        match meta.script_url() {
                            Some(url) => {
                                ui.weak(url);
                            }
                            None => {
                                ui.colored_label(egui::Color32::from_rgb(220, 120, 80), t("planets.no_url"));
                            }
                        }
                        if ui
                            .add_enabled(can_enter, egui::Button::new(t("planets.enter")))
                            .clicked()
                        {
                            picked = Some(meta.clone());
                        }
                    });
                }
                if response.double_clicked() && can_enter {
                    picked = Some(meta);
                }
            }
        });

    picked
}
