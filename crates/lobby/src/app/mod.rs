//! Main application module

mod keyboard;
mod menus;
mod styles;

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use shared::{ExperienceMetadata, GameList};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::experience::{load_script, ExperienceError, HttpScriptSource, PendingLoad, TransportError};
use crate::i18n::{set_lang, t};
use crate::input::{input_channel, ControllerTracker, InputReceiver, InputSender};
use crate::state::{AppState, LobbySettings};
use crate::ui::{planet_list, scene_tree, status_bar, viewport};

/// A script fetch running on the background runtime
struct InFlightLoad {
    pending: PendingLoad,
    result: oneshot::Receiver<Result<String, ExperienceError>>,
}

/// Main application
pub struct LobbyApp {
    state: AppState,
    runtime: tokio::runtime::Runtime,
    source: Option<Arc<HttpScriptSource>>,
    input_tx: InputSender,
    input_rx: InputReceiver,
    in_flight: Option<InFlightLoad>,
    games_request: Option<oneshot::Receiver<Result<GameList, TransportError>>>,
    controllers: ControllerTracker,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl LobbyApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        initial_games: Option<GameList>,
    ) -> Self {
        let settings = LobbySettings::load();
        set_lang(settings.ui.language);
        styles::configure_styles(&cc.egui_ctx, settings.ui.font_size);

        let source = match HttpScriptSource::from_settings(&settings.catalog) {
            Ok(source) => Some(Arc::new(source)),
            Err(e) => {
                tracing::error!("{e}");
                None
            }
        };

        let fetch_games = initial_games.is_none();
        let last_font_size = settings.ui.font_size;
        let (input_tx, input_rx) = input_channel();

        let mut app = Self {
            state: AppState::new(settings, initial_games.unwrap_or_default()),
            runtime,
            source,
            input_tx,
            input_rx,
            in_flight: None,
            games_request: None,
            controllers: ControllerTracker::default(),
            last_font_size,
        };
        if fetch_games {
            app.request_games();
        }
        app
    }

    /// Fetch the game list from the catalog in the background
    fn request_games(&mut self) {
        let Some(source) = self.source.clone() else {
            return;
        };
        let path = self.state.settings.catalog.games_path.clone();
        let (tx, rx) = oneshot::channel();
        self.runtime.spawn(async move {
            let _ = tx.send(source.fetch_games(&path).await);
        });
        self.games_request = Some(rx);
    }

    fn poll_games(&mut self) {
        let Some(rx) = self.games_request.as_mut() else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => Err(TransportError::network(
                self.state.settings.catalog.games_path.clone(),
                "request dropped",
            )),
        };
        self.games_request = None;
        match result {
            Ok(games) => {
                tracing::info!("Loaded {} games", games.len());
                if !self.state.replace_games(games) {
                    tracing::warn!("Game list arrived while an experience is running; ignored");
                }
            }
            Err(e) => {
                tracing::error!("{e}");
                self.state.status = Some(format!("{}: {e}", t("status.games_failed")));
            }
        }
    }

    /// Start loading the experience behind a planet
    fn select_planet(&mut self, metadata: ExperienceMetadata) {
        tracing::info!("Planet selected: {}", metadata.name);
        let pending = match self.state.lifecycle.begin_load(&metadata) {
            Ok(pending) => pending,
            Err(e) => {
                tracing::error!("Error loading experience: {e}");
                self.state.status = Some(format!("{}: {e}", t("status.load_failed")));
                return;
            }
        };

        if self.state.lifecycle.is_native(&pending) {
            self.finish_load(pending, Ok(String::new()));
            return;
        }

        let (tx, rx) = oneshot::channel();
        let source = self.source.clone();
        let metadata = pending.metadata().clone();
        let url = pending.url().to_string();
        self.runtime.spawn(async move {
            let result = match source {
                Some(source) => load_script(source.as_ref(), &metadata).await,
                None => Err(TransportError::network(url, "HTTP client unavailable").into()),
            };
            let _ = tx.send(result);
        });
        self.in_flight = Some(InFlightLoad { pending, result: rx });
    }

    fn poll_load(&mut self) {
        let Some(in_flight) = self.in_flight.as_mut() else {
            return;
        };
        let fetched = match in_flight.result.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => Err(TransportError::network(
                in_flight.pending.url(),
                "fetch task dropped",
            )
            .into()),
        };
        if let Some(in_flight) = self.in_flight.take() {
            self.finish_load(in_flight.pending, fetched);
        }
    }

    fn finish_load(&mut self, pending: PendingLoad, fetched: Result<String, ExperienceError>) {
        let state = &mut self.state;
        match state
            .lifecycle
            .complete_load(&mut state.scene, Some(&state.xr), pending, fetched)
        {
            Ok(report) => {
                state.status = Some(format!(
                    "{}: {} ({} {}, {} {})",
                    t("status.active"),
                    report.name,
                    report.created_meshes,
                    t("status.meshes"),
                    report.created_lights,
                    t("status.lights"),
                ));
            }
            Err(e) => {
                tracing::error!("Error loading experience: {e}");
                state.status = Some(format!("{}: {e}", t("status.load_failed")));
            }
        }
    }

    /// Dismiss through the same path a key press would take
    fn dismiss(&mut self) {
        let key = self.state.lifecycle.dismiss_listener().key().to_string();
        let _ = self.input_tx.send(crate::input::InputEvent::key_down(key));
    }

    fn drain_input(&mut self) {
        let reports = self
            .state
            .lifecycle
            .drain_input(&mut self.state.scene, &mut self.input_rx);
        if let Some(report) = reports.last() {
            self.state.status = Some(format!("{}: {}", t("status.dismissed"), report.name));
        }
    }

    /// Start polling controllers that are not tracked yet
    fn track_controllers(&mut self) {
        let period = self.state.settings.input.poll_interval();
        let _guard = self.runtime.enter();
        let started = self.controllers.track_all(&self.state.xr, period, &self.input_tx);
        tracing::debug!("{started} new button pollers ({} total)", self.controllers.tracked());
    }
}

impl eframe::App for LobbyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        self.poll_games();
        self.poll_load();

        keyboard::forward_keys(ctx, &self.input_tx);
        self.drain_input();

        if self.in_flight.is_some() || self.games_request.is_some() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        // ── Menu bar ──────────────────────────────────────────
        let mut action = menus::MenuAction::None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut action);
                menus::view_menu(ui, &mut self.state);
                menus::xr_menu(ui, &mut self.state, &mut action);
                menus::experience_menu(ui, &mut self.state, &mut action);
            });
        });
        match action {
            menus::MenuAction::None => {}
            menus::MenuAction::ReloadGames => self.request_games(),
            menus::MenuAction::Dismiss => self.dismiss(),
            menus::MenuAction::EnteredXr => self.track_controllers(),
            menus::MenuAction::ExitedXr => self.controllers.stop_all(),
            menus::MenuAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state);
            });

        // ── Left panel: Planets ──────────────────────────────
        let mut picked = None;
        if self.state.panels.planets {
            egui::SidePanel::left("planets")
                .default_width(220.0)
                .width_range(160.0..=400.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    picked = planet_list::show(ui, &mut self.state);
                });
        }

        // ── Right panel: Scene tree ──────────────────────────
        if self.state.panels.scene_tree {
            egui::SidePanel::right("scene_tree")
                .default_width(240.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    scene_tree::show(ui, &self.state);
                });
        }

        // ── Central: top-down view ───────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(metadata) = viewport::show(ui, &mut self.state) {
                picked = Some(metadata);
            }
        });

        if let Some(metadata) = picked {
            self.select_planet(metadata);
        }
    }
}
