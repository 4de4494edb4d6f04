//! Layout entity and the commands accepted by the layout store.

use chrono::{DateTime, Utc};

use crate::domain::{LayoutId, UserId, WorkspaceObject};

/// Name given to a fork when the caller does not choose one.
pub fn default_fork_name(source: &str) -> String {
    format!("{source} (Fork)")
}

/// A named, ordered collection of placed objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub id: LayoutId,
    /// Non-empty once trimmed.
    pub name: String,
    pub objects: Vec<WorkspaceObject>,
    pub owner: Option<UserId>,
    pub is_public: bool,
    pub forked_from: Option<LayoutId>,
    pub fork_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLayout {
    pub name: String,
    pub objects: Vec<WorkspaceObject>,
    pub owner: Option<UserId>,
    /// Defaults to private when absent.
    pub is_public: Option<bool>,
}

/// Partial update; only provided fields are replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutChanges {
    pub name: Option<String>,
    pub objects: Option<Vec<WorkspaceObject>>,
    pub is_public: Option<bool>,
}

impl LayoutChanges {
    /// Apply the provided fields to `layout` and stamp `updated_at`.
    ///
    /// The timestamp moves forward even when no field is provided.
    pub fn apply_to(self, layout: &mut Layout, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            layout.name = name;
        }
        if let Some(objects) = self.objects {
            layout.objects = objects;
        }
        if let Some(is_public) = self.is_public {
            layout.is_public = is_public;
        }
        layout.updated_at = now;
    }
}

/// Request to copy an existing layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ForkLayout {
    pub source: LayoutId,
    pub owner: Option<UserId>,
    /// Falls back to [`default_fork_name`] of the source.
    pub name: Option<String>,
}

impl Layout {
    /// Materialise a new layout from a validated command.
    pub fn create(id: LayoutId, new_layout: NewLayout, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new_layout.name,
            objects: new_layout.objects,
            owner: new_layout.owner,
            is_public: new_layout.is_public.unwrap_or(false),
            forked_from: None,
            fork_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build the private copy produced by a fork.
    pub fn fork(&self, id: LayoutId, request: ForkLayout, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: request.name.unwrap_or_else(|| default_fork_name(&self.name)),
            objects: self.objects.clone(),
            owner: request.owner,
            is_public: false,
            forked_from: Some(self.id),
            fork_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(now: DateTime<Utc>) -> Layout {
        Layout::create(
            LayoutId::random(),
            NewLayout {
                name: "Desk Setup".to_owned(),
                objects: vec![WorkspaceObject::new("o1", "desk", "Desk")],
                owner: None,
                is_public: None,
            },
            now,
        )
    }

    #[test]
    fn create_defaults_to_private_with_matching_timestamps() {
        let now = Utc::now();
        let layout = sample(now);
        assert!(!layout.is_public);
        assert_eq!(layout.created_at, layout.updated_at);
        assert_eq!(layout.fork_count, 0);
    }

    #[test]
    fn empty_changes_only_refresh_updated_at() {
        let now = Utc::now();
        let mut layout = sample(now);
        let before = layout.clone();
        let later = now + Duration::seconds(5);

        LayoutChanges::default().apply_to(&mut layout, later);

        assert_eq!(layout.name, before.name);
        assert_eq!(layout.objects, before.objects);
        assert_eq!(layout.is_public, before.is_public);
        assert_eq!(layout.updated_at, later);
    }

    #[test]
    fn fork_copies_objects_and_records_source() {
        let now = Utc::now();
        let source = sample(now);
        let owner = UserId::random();
        let fork = source.fork(
            LayoutId::random(),
            ForkLayout {
                source: source.id,
                owner: Some(owner),
                name: None,
            },
            now,
        );
        assert_eq!(fork.name, "Desk Setup (Fork)");
        assert_eq!(fork.objects, source.objects);
        assert_eq!(fork.forked_from, Some(source.id));
        assert_eq!(fork.owner, Some(owner));
        assert!(!fork.is_public);
    }
}
