//! Placed 3D items embedded in layouts and templates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Position, rotation or scale triple.
pub type Vec3 = [f64; 3];

/// Colour applied when a payload omits one.
pub const DEFAULT_OBJECT_COLOR: &str = "#ffffff";

fn origin() -> Vec3 {
    [0.0, 0.0, 0.0]
}

fn unit_scale() -> Vec3 {
    [1.0, 1.0, 1.0]
}

fn default_color() -> String {
    DEFAULT_OBJECT_COLOR.to_owned()
}

/// Surface description of a placed object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMaterial {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Rendering hints for a placed object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,
}

/// A single placed item inside a layout.
///
/// `id`, `type` and `name` are mandatory and non-empty. Transform vectors and
/// colour fall back to the identity placement when a client omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceObject {
    /// Client-assigned identifier, unique within the owning layout.
    pub id: String,
    /// Catalogue type such as `desk` or `monitor`.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default = "origin")]
    #[schema(value_type = Vec<f64>)]
    pub position: Vec3,
    #[serde(default = "origin")]
    #[schema(value_type = Vec<f64>)]
    pub rotation: Vec3,
    #[serde(default = "unit_scale")]
    #[schema(value_type = Vec<f64>)]
    pub scale: Vec3,
    #[serde(default = "default_color")]
    pub color: String,
    /// Named extents such as `width`, `height` and `depth`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<ObjectMaterial>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ObjectProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
}

impl WorkspaceObject {
    /// Build an object at the origin with default scale and colour.
    pub fn new(id: impl Into<String>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            name: name.into(),
            position: origin(),
            rotation: origin(),
            scale: unit_scale(),
            color: default_color(),
            dimensions: None,
            material: None,
            properties: None,
            price: None,
            group_id: None,
            model_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omitted_transforms_use_identity_placement() {
        let object: WorkspaceObject =
            serde_json::from_value(json!({"id": "o1", "type": "desk", "name": "Desk"}))
                .expect("minimal object deserialises");
        assert_eq!(object, WorkspaceObject::new("o1", "desk", "Desk"));
    }

    #[test]
    fn optional_shapes_survive_serialisation() {
        let payload = json!({
            "id": "m1",
            "type": "monitor",
            "name": "Monitor",
            "position": [0.5, 0.8, -0.2],
            "rotation": [0.0, 1.57, 0.0],
            "scale": [0.8, 0.5, 0.05],
            "color": "#1a1a2e",
            "dimensions": {"width": 0.8, "height": 0.5, "depth": 0.03},
            "material": {"type": "metal", "color": "#222222"},
            "properties": {"roughness": 0.2, "transparent": false},
            "price": 300.0,
            "groupId": "g1",
            "modelUrl": "https://cdn.example/monitor.glb"
        });
        let object: WorkspaceObject =
            serde_json::from_value(payload.clone()).expect("full object deserialises");
        assert_eq!(object.kind, "monitor");
        assert_eq!(object.group_id.as_deref(), Some("g1"));
        let serialised = serde_json::to_value(&object).expect("serialise object");
        assert_eq!(serialised, payload);
    }
}
