use egui::Ui;

use crate::experience::LifecycleState;
use crate::i18n::t;
use crate::state::AppState;
use crate::xr::XrState;

pub fn show(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui| {
        let lifecycle = match state.lifecycle.state() {
            LifecycleState::Idle => t("status.ready"),
            LifecycleState::Loading => t("status.loading"),
            LifecycleState::Active => t("status.active"),
            LifecycleState::Unloading => t("status.unloading"),
        };
        ui.label(lifecycle);
        if let Some(active) = state.lifecycle.active() {
            ui.strong(&active.metadata.name);
        }

        ui.separator();
        ui.weak(format!("{}: {}", t("status.meshes"), state.scene.mesh_count()));
        ui.weak(format!("{}: {}", t("status.lights"), state.scene.light_count()));

        if state.xr.state() == XrState::InXr {
            ui.separator();
            ui.weak("XR");
        }

        if let Some(status) = &state.status {
            ui.separator();
            ui.label(status);
        }
    });
}
