mod app;
mod ui;

// Re-export library modules so that `crate::state`, `crate::experience`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use lobby_lib::experience;
pub use lobby_lib::i18n;
pub use lobby_lib::input;
pub use lobby_lib::lobby;
pub use lobby_lib::state;
pub use lobby_lib::xr;

use app::LobbyApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lobby=info,lobby_lib=info".into()),
        )
        .init();

    // Parse --games <path> argument
    let initial_games = parse_games_arg();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("lobby-io")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return;
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Planet Lobby")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "planet-lobby",
        native_options,
        Box::new(move |cc| Ok(Box::new(LobbyApp::new(cc, runtime, initial_games)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_games_arg() -> Option<shared::GameList> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--games" && i + 1 < args.len() {
            let path = &args[i + 1];
            match std::fs::read_to_string(path) {
                Ok(json) => match shared::parse_game_list(&json) {
                    Ok(games) => {
                        tracing::info!("Loaded game list from {path} ({} games)", games.len());
                        return Some(games);
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse game list from {path}: {e}");
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to read game list {path}: {e}");
                }
            }
            break;
        }
        i += 1;
    }
    None
}
