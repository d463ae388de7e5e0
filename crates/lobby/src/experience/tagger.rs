//! Experience ownership flag on scene objects

use serde_json::Value;
use shared::{SceneObject, EXPERIENCE_OBJECT_KEY};

/// Mark an object as owned by the running experience. Other metadata keys are kept.
pub fn tag_as_experience_object(object: &mut SceneObject) {
    object
        .metadata
        .insert(EXPERIENCE_OBJECT_KEY.to_string(), Value::Bool(true));
}

/// Mark objects that exist before a load as not experience-owned.
/// An object already flagged `true` keeps its flag.
pub fn tag_all_existing_as_non_experience<'a>(objects: impl IntoIterator<Item = &'a mut SceneObject>) {
    for object in objects {
        let owned = is_experience_object(object);
        object
            .metadata
            .insert(EXPERIENCE_OBJECT_KEY.to_string(), Value::Bool(owned));
    }
}

/// Drop experience ownership, leaving the object in the scene
pub fn clear_experience_flag(object: &mut SceneObject) {
    object
        .metadata
        .insert(EXPERIENCE_OBJECT_KEY.to_string(), Value::Bool(false));
}

/// Missing or non-boolean flag reads as false
pub fn is_experience_object(object: &SceneObject) -> bool {
    object.metadata_flag(EXPERIENCE_OBJECT_KEY).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Metadata, ObjectKind, Shape};

    fn object(name: &str) -> SceneObject {
        let mut metadata = Metadata::new();
        metadata.insert("url".into(), Value::String("/exp/a.json".into()));
        SceneObject {
            id: name.into(),
            name: name.into(),
            kind: ObjectKind::Mesh { shape: Shape::Plane { size: 1.0 } },
            position: [0.0; 3],
            enabled: true,
            metadata,
        }
    }

    #[test]
    fn test_tag_preserves_other_keys() {
        let mut o = object("a");
        tag_as_experience_object(&mut o);
        assert!(is_experience_object(&o));
        assert_eq!(o.metadata["url"], "/exp/a.json");
    }

    #[test]
    fn test_tag_is_idempotent() {
        let mut o = object("a");
        tag_as_experience_object(&mut o);
        let once = o.clone();
        tag_as_experience_object(&mut o);
        assert_eq!(o, once);
    }

    #[test]
    fn test_existing_marked_false_keeps_true() {
        let mut a = object("a");
        let mut b = object("b");
        tag_as_experience_object(&mut b);

        tag_all_existing_as_non_experience([&mut a, &mut b]);
        assert_eq!(a.metadata_flag(EXPERIENCE_OBJECT_KEY), Some(false));
        assert_eq!(b.metadata_flag(EXPERIENCE_OBJECT_KEY), Some(true));
        assert_eq!(a.metadata["url"], "/exp/a.json");

        let before = (a.clone(), b.clone());
        tag_all_existing_as_non_experience([&mut a, &mut b]);
        assert_eq!((a, b), before);
    }

    #[test]
    fn test_missing_flag_reads_false() {
        let mut o = object("a");
        assert!(!is_experience_object(&o));
        o.metadata.insert(EXPERIENCE_OBJECT_KEY.into(), Value::String("yes".into()));
        assert!(!is_experience_object(&o));
    }
}
