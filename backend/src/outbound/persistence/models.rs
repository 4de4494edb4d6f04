//! Internal Diesel row structs and their conversions to domain entities.
//!
//! Rows never leave the persistence layer. JSON columns are decoded here so
//! repositories only ever see fully typed domain values.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::domain::{
    Comment, CommentId, CustomMaterial, CustomObject, CustomObjectId, Layout, LayoutId,
    ObjectGeometry, ObjectMaterial, ObjectTemplate, ObjectTemplateId, Template, TemplateId, User,
    UserAccount, UserId, Vec3, WorkspaceObject,
};

use super::schema::{comments, custom_objects, layouts, object_templates, templates, users};

/// A stored row could not be decoded into its domain entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed {column} column: {message}")]
pub(crate) struct RowDecodeError {
    column: &'static str,
    message: String,
}

impl RowDecodeError {
    fn new(column: &'static str, message: impl Into<String>) -> Self {
        Self {
            column,
            message: message.into(),
        }
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(
    column: &'static str,
    value: serde_json::Value,
) -> Result<T, RowDecodeError> {
    serde_json::from_value(value).map_err(|err| RowDecodeError::new(column, err.to_string()))
}

pub(crate) fn encode_json<T: Serialize>(
    column: &'static str,
    value: &T,
) -> Result<serde_json::Value, RowDecodeError> {
    serde_json::to_value(value).map_err(|err| RowDecodeError::new(column, err.to_string()))
}

fn decode_vec3(column: &'static str, values: Vec<f64>) -> Result<Vec3, RowDecodeError> {
    let len = values.len();
    Vec3::try_from(values)
        .map_err(|_| RowDecodeError::new(column, format!("expected 3 components, found {len}")))
}

/// Counters are non-negative in storage; clamp anything else to zero.
pub(crate) fn counter_from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

pub(crate) fn counter_to_db(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub bio: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserAccount {
    fn from(row: UserRow) -> Self {
        Self {
            user: User {
                id: UserId::from_uuid(row.id),
                username: row.username,
                email: row.email,
                bio: row.bio,
                avatar: row.avatar,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            password_hash: row.password_hash,
        }
    }
}

impl From<&UserAccount> for UserRow {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: *account.user.id.as_uuid(),
            username: account.user.username.clone(),
            email: account.user.email.clone(),
            password_hash: account.password_hash.clone(),
            bio: account.user.bio.clone(),
            avatar: account.user.avatar.clone(),
            created_at: account.user.created_at,
            updated_at: account.user.updated_at,
        }
    }
}

/// Profile fields written back after an update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileUpdate<'a> {
    pub username: &'a str,
    pub bio: &'a str,
    pub avatar: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = layouts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LayoutRow {
    pub id: Uuid,
    pub name: String,
    pub objects: serde_json::Value,
    pub owner_id: Option<Uuid>,
    pub is_public: bool,
    pub forked_from: Option<Uuid>,
    pub fork_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<LayoutRow> for Layout {
    type Error = RowDecodeError;

    fn try_from(row: LayoutRow) -> Result<Self, Self::Error> {
        let objects: Vec<WorkspaceObject> = decode_json("layouts.objects", row.objects)?;
        Ok(Self {
            id: LayoutId::from_uuid(row.id),
            name: row.name,
            objects,
            owner: row.owner_id.map(UserId::from_uuid),
            is_public: row.is_public,
            forked_from: row.forked_from.map(LayoutId::from_uuid),
            fork_count: counter_from_db(row.fork_count),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<&Layout> for LayoutRow {
    type Error = RowDecodeError;

    fn try_from(layout: &Layout) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *layout.id.as_uuid(),
            name: layout.name.clone(),
            objects: encode_json("layouts.objects", &layout.objects)?,
            owner_id: layout.owner.map(|owner| *owner.as_uuid()),
            is_public: layout.is_public,
            forked_from: layout.forked_from.map(|source| *source.as_uuid()),
            fork_count: counter_to_db(layout.fork_count),
            created_at: layout.created_at,
            updated_at: layout.updated_at,
        })
    }
}

/// Mutable layout columns written back after applying changes.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = layouts)]
pub(crate) struct LayoutUpdate {
    pub name: String,
    pub objects: serde_json::Value,
    pub is_public: bool,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub layout_id: Uuid,
    pub author_id: Uuid,
    pub username: String,
    pub content: String,
    pub parent_id: Option<Uuid>,
    pub likes: i32,
    pub liked_by: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: CommentId::from_uuid(row.id),
            layout_id: LayoutId::from_uuid(row.layout_id),
            author: UserId::from_uuid(row.author_id),
            username: row.username,
            content: row.content,
            parent: row.parent_id.map(CommentId::from_uuid),
            likes: counter_from_db(row.likes),
            liked_by: row.liked_by.into_iter().map(UserId::from_uuid).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        Self {
            id: *comment.id.as_uuid(),
            layout_id: *comment.layout_id.as_uuid(),
            author_id: *comment.author.as_uuid(),
            username: comment.username.clone(),
            content: comment.content.clone(),
            parent_id: comment.parent.map(|parent| *parent.as_uuid()),
            likes: counter_to_db(comment.likes),
            liked_by: comment.liked_by.iter().map(|user| *user.as_uuid()).collect(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// Like state written back after a toggle.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = comments)]
pub(crate) struct CommentLikesUpdate {
    pub likes: i32,
    pub liked_by: Vec<Uuid>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TemplateRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub objects: serde_json::Value,
    pub thumbnail_url: Option<String>,
    pub is_public: bool,
    pub owner_id: Option<Uuid>,
    pub usage_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TemplateRow> for Template {
    type Error = RowDecodeError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TemplateId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            category: row.category,
            objects: decode_json("templates.objects", row.objects)?,
            thumbnail_url: row.thumbnail_url,
            is_public: row.is_public,
            owner: row.owner_id.map(UserId::from_uuid),
            usage_count: counter_from_db(row.usage_count),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<&Template> for TemplateRow {
    type Error = RowDecodeError;

    fn try_from(template: &Template) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *template.id.as_uuid(),
            name: template.name.clone(),
            description: template.description.clone(),
            category: template.category.clone(),
            objects: encode_json("templates.objects", &template.objects)?,
            thumbnail_url: template.thumbnail_url.clone(),
            is_public: template.is_public,
            owner_id: template.owner.map(|owner| *owner.as_uuid()),
            usage_count: counter_to_db(template.usage_count),
            created_at: template.created_at,
            updated_at: template.updated_at,
        })
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = templates)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TemplateUpdate {
    pub name: String,
    pub description: String,
    pub category: String,
    pub objects: serde_json::Value,
    pub thumbnail_url: Option<String>,
    pub is_public: bool,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Custom objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = custom_objects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomObjectRow {
    pub id: Uuid,
    pub name: String,
    pub object_type: String,
    pub geometry: serde_json::Value,
    pub material: serde_json::Value,
    pub scale: Vec<f64>,
    pub owner_id: Uuid,
    pub is_public: bool,
    pub usage_count: i32,
    pub model_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CustomObjectRow> for CustomObject {
    type Error = RowDecodeError;

    fn try_from(row: CustomObjectRow) -> Result<Self, Self::Error> {
        let geometry: ObjectGeometry = decode_json("custom_objects.geometry", row.geometry)?;
        let material: CustomMaterial = decode_json("custom_objects.material", row.material)?;
        Ok(Self {
            id: CustomObjectId::from_uuid(row.id),
            name: row.name,
            kind: row.object_type,
            geometry,
            material,
            scale: decode_vec3("custom_objects.scale", row.scale)?,
            owner: UserId::from_uuid(row.owner_id),
            is_public: row.is_public,
            usage_count: counter_from_db(row.usage_count),
            model_url: row.model_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<&CustomObject> for CustomObjectRow {
    type Error = RowDecodeError;

    fn try_from(object: &CustomObject) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *object.id.as_uuid(),
            name: object.name.clone(),
            object_type: object.kind.clone(),
            geometry: encode_json("custom_objects.geometry", &object.geometry)?,
            material: encode_json("custom_objects.material", &object.material)?,
            scale: object.scale.to_vec(),
            owner_id: *object.owner.as_uuid(),
            is_public: object.is_public,
            usage_count: counter_to_db(object.usage_count),
            model_url: object.model_url.clone(),
            created_at: object.created_at,
            updated_at: object.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Object catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = object_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ObjectTemplateRow {
    pub id: Uuid,
    pub object_type: String,
    pub name: String,
    pub category: String,
    pub scale: Vec<f64>,
    pub color: String,
    pub dimensions: Option<serde_json::Value>,
    pub material: Option<serde_json::Value>,
    pub price: f64,
    pub thumbnail_url: Option<String>,
    pub model_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ObjectTemplateRow> for ObjectTemplate {
    type Error = RowDecodeError;

    fn try_from(row: ObjectTemplateRow) -> Result<Self, Self::Error> {
        let dimensions: Option<BTreeMap<String, f64>> = row
            .dimensions
            .map(|value| decode_json("object_templates.dimensions", value))
            .transpose()?;
        let material: Option<ObjectMaterial> = row
            .material
            .map(|value| decode_json("object_templates.material", value))
            .transpose()?;
        Ok(Self {
            id: ObjectTemplateId::from_uuid(row.id),
            kind: row.object_type,
            name: row.name,
            category: row.category,
            scale: decode_vec3("object_templates.scale", row.scale)?,
            color: row.color,
            dimensions,
            material,
            price: row.price,
            thumbnail_url: row.thumbnail_url,
            model_url: row.model_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<&ObjectTemplate> for ObjectTemplateRow {
    type Error = RowDecodeError;

    fn try_from(entry: &ObjectTemplate) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *entry.id.as_uuid(),
            object_type: entry.kind.clone(),
            name: entry.name.clone(),
            category: entry.category.clone(),
            scale: entry.scale.to_vec(),
            color: entry.color.clone(),
            dimensions: entry
                .dimensions
                .as_ref()
                .map(|dimensions| encode_json("object_templates.dimensions", dimensions))
                .transpose()?,
            material: entry
                .material
                .as_ref()
                .map(|material| encode_json("object_templates.material", material))
                .transpose()?,
            price: entry.price,
            thumbnail_url: entry.thumbnail_url.clone(),
            model_url: entry.model_url.clone(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn layout_row(objects: serde_json::Value) -> LayoutRow {
        let now = Utc::now();
        LayoutRow {
            id: Uuid::new_v4(),
            name: "Desk".to_owned(),
            objects,
            owner_id: None,
            is_public: false,
            forked_from: None,
            fork_count: 2,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[case(-1, 0)]
    #[case(0, 0)]
    #[case(41, 41)]
    fn counters_never_go_negative(#[case] stored: i32, #[case] expected: u32) {
        assert_eq!(counter_from_db(stored), expected);
    }

    #[rstest]
    fn oversized_counters_saturate_in_storage() {
        assert_eq!(counter_to_db(u32::MAX), i32::MAX);
    }

    #[rstest]
    fn layout_rows_decode_their_objects() {
        let row = layout_row(json!([{ "id": "o1", "type": "desk", "name": "Desk" }]));

        let layout = Layout::try_from(row).expect("row decodes");

        assert_eq!(layout.fork_count, 2);
        assert_eq!(layout.objects.len(), 1);
        assert_eq!(layout.objects.first().map(|object| object.kind.as_str()), Some("desk"));
    }

    #[rstest]
    fn malformed_object_column_is_reported() {
        let err = Layout::try_from(layout_row(json!({ "not": "an array" })))
            .expect_err("objects must be an array");

        assert!(err.to_string().contains("layouts.objects"));
    }

    #[rstest]
    #[case("")]
    #[case("Standing desk with dual monitors")]
    fn template_descriptions_round_trip(#[case] description: &str) {
        let now = Utc::now();
        let row = TemplateRow {
            id: Uuid::new_v4(),
            name: "Minimal".to_owned(),
            description: description.to_owned(),
            category: "Office".to_owned(),
            objects: json!([]),
            thumbnail_url: None,
            is_public: true,
            owner_id: None,
            usage_count: 3,
            created_at: now,
            updated_at: now,
        };

        let template = Template::try_from(row).expect("row decodes");
        let stored = TemplateRow::try_from(&template).expect("row encodes");

        assert_eq!(template.description, description);
        assert_eq!(stored.description, description);
        assert_eq!(stored.usage_count, 3);
    }

    #[rstest]
    fn wrong_scale_length_is_reported() {
        assert!(decode_vec3("custom_objects.scale", vec![1.0, 2.0]).is_err());
        assert_eq!(
            decode_vec3("custom_objects.scale", vec![1.0, 2.0, 3.0]).ok(),
            Some([1.0, 2.0, 3.0])
        );
    }
}
