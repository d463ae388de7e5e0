use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Уникальный идентификатор объекта в сцене
pub type ObjectId = String;

/// Произвольные метаданные объекта (ключ → JSON-значение)
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Ключ метаданных: объект создан экспериенсом и удаляется при его закрытии
pub const EXPERIENCE_OBJECT_KEY: &str = "isExperienceObject";

/// Форма меша
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        diameter: f32,
        #[serde(default = "default_segments")]
        segments: u32,
    },
    Ground {
        width: f32,
        height: f32,
    },
    Plane {
        size: f32,
    },
}

fn default_segments() -> u32 {
    32
}

fn default_intensity() -> f32 {
    1.0
}

/// Тип источника света
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightKind {
    Directional {
        direction: [f32; 3],
        #[serde(default = "default_intensity")]
        intensity: f32,
    },
    Hemispheric {
        direction: [f32; 3],
        #[serde(default = "default_intensity")]
        intensity: f32,
    },
    Point {
        #[serde(default = "default_intensity")]
        intensity: f32,
    },
    RectArea {
        width: f32,
        height: f32,
        #[serde(default = "default_intensity")]
        intensity: f32,
    },
}

/// Вид объекта сцены: меш или свет
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectKind {
    Mesh { shape: Shape },
    Light { light: LightKind },
}

/// Объект сцены (меш или источник света)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    #[serde(flatten)]
    pub kind: ObjectKind,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub metadata: Metadata,
}

fn default_enabled() -> bool {
    true
}

impl SceneObject {
    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, ObjectKind::Mesh { .. })
    }

    pub fn is_light(&self) -> bool {
        matches!(self.kind, ObjectKind::Light { .. })
    }

    /// Булев флаг из метаданных (None, если ключа нет или он не булев)
    pub fn metadata_flag(&self, key: &str) -> Option<bool> {
        self.metadata.get(key).and_then(|v| v.as_bool())
    }
}

/// Описание экспериенса, привязанное к планете в лобби
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExperienceMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl ExperienceMetadata {
    /// URL скрипта, если он задан и не пустой
    pub fn script_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Подпись над планетой
    pub fn label(&self) -> String {
        format!("{}\nby {}", self.name, self.author)
    }

    /// Записать поля в метаданные объекта
    pub fn to_metadata(&self) -> Metadata {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => Metadata::new(),
        }
    }

    /// Прочитать описание из метаданных объекта.
    /// Возвращает None, если объект не несёт описания экспериенса.
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        if !metadata.contains_key("url") && !metadata.contains_key("name") {
            return None;
        }
        serde_json::from_value(serde_json::Value::Object(metadata.clone())).ok()
    }
}

/// Каталог игр: slug → описание экспериенса
pub type GameList = BTreeMap<String, ExperienceMetadata>;

#[derive(Deserialize)]
#[serde(untagged)]
enum GameListRepr {
    Map(GameList),
    List(Vec<ExperienceMetadata>),
}

/// Разобрать каталог: объект `{slug: {...}}` или массив `[{...}]`
pub fn parse_game_list(json: &str) -> Result<GameList, serde_json::Error> {
    let repr: GameListRepr = serde_json::from_str(json)?;
    Ok(match repr {
        GameListRepr::Map(map) => map,
        GameListRepr::List(list) => list
            .into_iter()
            .enumerate()
            .map(|(i, game)| (format!("{i:03}"), game))
            .collect(),
    })
}
