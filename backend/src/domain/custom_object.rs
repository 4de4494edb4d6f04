//! User-defined primitive objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CustomObjectId, UserId, Vec3};

/// Primitive geometry such as `box` or `cylinder` with optional constructor args.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ObjectGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<f64>>,
}

/// PBR surface parameters of a custom object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomMaterial {
    #[serde(default = "CustomMaterial::default_color")]
    pub color: String,
    #[serde(default = "CustomMaterial::default_factor")]
    pub roughness: f64,
    #[serde(default = "CustomMaterial::default_factor")]
    pub metalness: f64,
}

impl CustomMaterial {
    fn default_color() -> String {
        crate::domain::DEFAULT_OBJECT_COLOR.to_owned()
    }

    const fn default_factor() -> f64 {
        0.5
    }
}

impl Default for CustomMaterial {
    fn default() -> Self {
        Self {
            color: Self::default_color(),
            roughness: Self::default_factor(),
            metalness: Self::default_factor(),
        }
    }
}

/// An object a user built from a primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomObject {
    pub id: CustomObjectId,
    pub name: String,
    pub kind: String,
    pub geometry: ObjectGeometry,
    pub material: CustomMaterial,
    pub scale: Vec3,
    pub owner: UserId,
    pub is_public: bool,
    pub usage_count: u32,
    pub model_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new custom object.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomObject {
    pub name: String,
    pub kind: String,
    pub geometry: ObjectGeometry,
    pub material: Option<CustomMaterial>,
    pub scale: Vec3,
    pub owner: UserId,
    pub is_public: Option<bool>,
    pub model_url: Option<String>,
}

impl CustomObject {
    /// Materialise a new custom object; private unless stated otherwise.
    pub fn create(id: CustomObjectId, new_object: NewCustomObject, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new_object.name,
            kind: new_object.kind,
            geometry: new_object.geometry,
            material: new_object.material.unwrap_or_default(),
            scale: new_object.scale,
            owner: new_object.owner,
            is_public: new_object.is_public.unwrap_or(false),
            usage_count: 0,
            model_url: new_object.model_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Public objects, plus the viewer's own when a viewer is given.
    pub fn visible_to(&self, viewer: Option<&UserId>) -> bool {
        self.is_public || viewer.is_some_and(|viewer| *viewer == self.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_object(owner: UserId) -> NewCustomObject {
        NewCustomObject {
            name: "Lamp".to_owned(),
            kind: "cylinder".to_owned(),
            geometry: ObjectGeometry {
                kind: "cylinder".to_owned(),
                args: Some(vec![0.1, 0.1, 0.5]),
            },
            material: None,
            scale: [1.0, 1.0, 1.0],
            owner,
            is_public: None,
            model_url: None,
        }
    }

    #[test]
    fn missing_material_uses_neutral_defaults() {
        let object = CustomObject::create(
            CustomObjectId::random(),
            new_object(UserId::random()),
            Utc::now(),
        );
        assert_eq!(object.material, CustomMaterial::default());
        assert!(!object.is_public);
    }

    #[test]
    fn partial_material_fills_missing_factors() {
        let material: CustomMaterial =
            serde_json::from_value(json!({"color": "#ff0000"})).expect("material deserialises");
        assert_eq!(material.color, "#ff0000");
        assert!((material.roughness - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn private_objects_visible_only_to_owner() {
        let owner = UserId::random();
        let object = CustomObject::create(CustomObjectId::random(), new_object(owner), Utc::now());
        assert!(object.visible_to(Some(&owner)));
        assert!(!object.visible_to(Some(&UserId::random())));
        assert!(!object.visible_to(None));
    }
}
