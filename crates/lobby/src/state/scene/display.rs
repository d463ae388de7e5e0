//! Display helper functions for scene objects

use shared::{LightKind, ObjectKind, SceneObject, Shape};

/// Get display name for an object
pub fn object_display_name(obj: &SceneObject) -> String {
    format!("{} ({})", obj.name, short_id(&obj.id))
}

/// Get icon for an object
pub fn object_icon(obj: &SceneObject) -> &'static str {
    match &obj.kind {
        ObjectKind::Mesh { shape } => match shape {
            Shape::Box { .. } => "[B]",
            Shape::Sphere { .. } => "[S]",
            Shape::Ground { .. } => "[G]",
            Shape::Plane { .. } => "[P]",
        },
        ObjectKind::Light { light } => match light {
            LightKind::Directional { .. } => "[D]",
            LightKind::Hemispheric { .. } => "[H]",
            LightKind::Point { .. } => "[*]",
            LightKind::RectArea { .. } => "[R]",
        },
    }
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    if id.len() > 8 {
        &id[..8]
    } else {
        id
    }
}
