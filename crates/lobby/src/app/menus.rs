//! Application menu bar

use eframe::egui;

use crate::experience::FailurePolicy;
use crate::i18n::{lang, set_lang, t, Lang};
use crate::state::AppState;
use crate::xr::XrState;

/// Menu clicks that need the app rather than the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    None,
    ReloadGames,
    Dismiss,
    EnteredXr,
    ExitedXr,
    Quit,
}

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, action: &mut MenuAction) {
    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("menu.reload_games")).clicked() {
            *action = MenuAction::ReloadGames;
            ui.close_menu();
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            *action = MenuAction::Quit;
            ui.close_menu();
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut state.panels.planets, t("menu.planets"));
        ui.checkbox(&mut state.panels.scene_tree, t("menu.scene_tree"));
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            for (l, label) in [(Lang::En, "English"), (Lang::Ru, "Русский")] {
                if ui.selectable_label(lang() == l, label).clicked() {
                    set_lang(l);
                    state.settings.ui.language = l;
                    state.settings.save();
                    ui.close_menu();
                }
            }
        });
    });
}

/// Show the XR menu
pub fn xr_menu(ui: &mut egui::Ui, state: &mut AppState, action: &mut MenuAction) {
    ui.menu_button(t("menu.xr"), |ui| {
        let in_xr = state.xr.state() == XrState::InXr;
        if ui.add_enabled(!in_xr, egui::Button::new(t("menu.enter_xr"))).clicked() {
            state.xr.set_state(XrState::InXr, &mut state.scene);
            *action = MenuAction::EnteredXr;
            ui.close_menu();
        }
        if ui.add_enabled(in_xr, egui::Button::new(t("menu.exit_xr"))).clicked() {
            state.xr.set_state(XrState::NotInXr, &mut state.scene);
            *action = MenuAction::ExitedXr;
            ui.close_menu();
        }
    });
}

/// Show the experience menu
pub fn experience_menu(ui: &mut egui::Ui, state: &mut AppState, action: &mut MenuAction) {
    ui.menu_button(t("menu.experience"), |ui| {
        let armed = state.lifecycle.dismiss_listener().is_armed();
        if ui.add_enabled(armed, egui::Button::new(t("menu.dismiss"))).clicked() {
            *action = MenuAction::Dismiss;
            ui.close_menu();
        }
        ui.separator();
        let mut rollback = state.settings.failure_policy == FailurePolicy::Rollback;
        if ui.checkbox(&mut rollback, t("menu.rollback_on_error")).changed() {
            let policy = if rollback {
                FailurePolicy::Rollback
            } else {
                FailurePolicy::LeavePartial
            };
            state.settings.failure_policy = policy;
            state.lifecycle.set_failure_policy(policy);
            state.settings.save();
        }
    });
}
