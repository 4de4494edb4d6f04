//! Catalogue of placeable object types and its default seed.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{ObjectMaterial, ObjectTemplateId, Vec3};

/// A catalogue entry clients place into layouts.
///
/// Entries are unique by `(kind, name)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTemplate {
    pub id: ObjectTemplateId,
    pub kind: String,
    pub name: String,
    pub category: String,
    pub scale: Vec3,
    pub color: String,
    pub dimensions: Option<BTreeMap<String, f64>>,
    pub material: Option<ObjectMaterial>,
    pub price: f64,
    pub thumbnail_url: Option<String>,
    pub model_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for a catalogue entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewObjectTemplate {
    pub kind: String,
    pub name: String,
    pub category: String,
    pub scale: Vec3,
    pub color: String,
    pub dimensions: Option<BTreeMap<String, f64>>,
    pub material: Option<ObjectMaterial>,
    pub price: f64,
    pub thumbnail_url: Option<String>,
    pub model_url: Option<String>,
}

impl ObjectTemplate {
    pub fn create(id: ObjectTemplateId, entry: NewObjectTemplate, now: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: entry.kind,
            name: entry.name,
            category: entry.category,
            scale: entry.scale,
            color: entry.color,
            dimensions: entry.dimensions,
            material: entry.material,
            price: entry.price,
            thumbnail_url: entry.thumbnail_url,
            model_url: entry.model_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this entry shares the catalogue key of `entry`.
    pub fn same_entry(&self, entry: &NewObjectTemplate) -> bool {
        self.kind == entry.kind && self.name == entry.name
    }
}

fn box_dimensions(width: f64, height: f64, depth: f64) -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("width".to_owned(), width),
        ("height".to_owned(), height),
        ("depth".to_owned(), depth),
    ])
}

struct SeedEntry {
    kind: &'static str,
    name: &'static str,
    category: &'static str,
    color: &'static str,
    scale: Vec3,
    dimensions: Vec3,
    price: f64,
}

const DEFAULT_ENTRIES: [SeedEntry; 4] = [
    SeedEntry {
        kind: "desk",
        name: "Desk",
        category: "furniture",
        color: "#8B4513",
        scale: [2.0, 0.05, 1.0],
        dimensions: [2.0, 0.05, 1.0],
        price: 200.0,
    },
    SeedEntry {
        kind: "monitor",
        name: "Monitor",
        category: "tech",
        color: "#1a1a2e",
        scale: [0.8, 0.5, 0.05],
        dimensions: [0.8, 0.5, 0.03],
        price: 300.0,
    },
    SeedEntry {
        kind: "pc-tower",
        name: "PC Tower",
        category: "tech",
        color: "#2d2d2d",
        scale: [0.3, 0.6, 0.5],
        dimensions: [0.2, 0.45, 0.4],
        price: 1500.0,
    },
    SeedEntry {
        kind: "chair",
        name: "Ergonomic Chair",
        category: "furniture",
        color: "#1a1a1a",
        scale: [0.6, 1.2, 0.6],
        dimensions: [0.5, 0.6, 0.5],
        price: 400.0,
    },
];

/// The built-in catalogue inserted by the seed operation.
pub fn default_object_templates() -> Vec<NewObjectTemplate> {
    DEFAULT_ENTRIES
        .iter()
        .map(|entry| {
            let [width, height, depth] = entry.dimensions;
            NewObjectTemplate {
                kind: entry.kind.to_owned(),
                name: entry.name.to_owned(),
                category: entry.category.to_owned(),
                scale: entry.scale,
                color: entry.color.to_owned(),
                dimensions: Some(box_dimensions(width, height, depth)),
                material: None,
                price: entry.price,
                thumbnail_url: None,
                model_url: None,
            }
        })
        .collect()
}
