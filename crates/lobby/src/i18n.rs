use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lang {
    #[default]
    En,
    Ru,
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=En (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Lang::Ru,
        _ => Lang::En,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::En => 0,
            Lang::Ru => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.file" => if ru { "Файл" } else { "File" },
        "menu.reload_games" => if ru { "Обновить список игр" } else { "Reload game list" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.planets" => if ru { "Планеты" } else { "Planets" },
        "menu.scene_tree" => if ru { "Дерево сцены" } else { "Scene tree" },
        "menu.language" => if ru { "Язык" } else { "Language" },

        "menu.xr" => "XR",
        "menu.enter_xr" => if ru { "Войти в XR" } else { "Enter XR" },
        "menu.exit_xr" => if ru { "Выйти из XR" } else { "Exit XR" },

        "menu.experience" => if ru { "Опыт" } else { "Experience" },
        "menu.dismiss" => if ru { "Закрыть опыт  Del" } else { "Dismiss experience  Del" },
        "menu.rollback_on_error" => if ru { "Откат при ошибке" } else { "Roll back on error" },

        // ── Panels ──────────────────────────────────────────
        "planets.title" => if ru { "Планеты" } else { "Planets" },
        "planets.empty" => if ru { "Нет игр" } else { "No games" },
        "planets.enter" => if ru { "Войти" } else { "Enter" },
        "planets.author" => if ru { "Автор" } else { "Author" },
        "planets.no_url" => if ru { "нет скрипта" } else { "no script" },

        "tree.title" => if ru { "Сцена" } else { "Scene" },
        "tree.meshes" => if ru { "Меши" } else { "Meshes" },
        "tree.lights" => if ru { "Свет" } else { "Lights" },
        "tree.cameras" => if ru { "Камеры" } else { "Cameras" },
        "tree.hidden" => if ru { "(скрыт)" } else { "(hidden)" },

        // ── Status bar ──────────────────────────────────────
        "status.ready" => if ru { "Готово" } else { "Ready" },
        "status.loading" => if ru { "Загрузка..." } else { "Loading..." },
        "status.active" => if ru { "Активен" } else { "Active" },
        "status.unloading" => if ru { "Выгрузка..." } else { "Unloading..." },
        "status.meshes" => if ru { "Меши" } else { "Meshes" },
        "status.lights" => if ru { "Свет" } else { "Lights" },
        "status.games_failed" => if ru { "Не удалось загрузить список игр" } else { "Failed to load game list" },
        "status.load_failed" => if ru { "Ошибка загрузки опыта" } else { "Error loading experience" },
        "status.dismissed" => if ru { "Опыт закрыт" } else { "Experience dismissed" },

        _ => "???",
    }
}
