//! Reusable layout templates shared between users.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domain::{TemplateId, UserId, WorkspaceObject};

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// A starting point for new layouts.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub objects: Vec<WorkspaceObject>,
    pub thumbnail_url: Option<String>,
    pub is_public: bool,
    pub owner: Option<UserId>,
    /// Incremented on every single-template read.
    pub usage_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new template.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTemplate {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub objects: Vec<WorkspaceObject>,
    pub thumbnail_url: Option<String>,
    /// Templates are public unless stated otherwise.
    pub is_public: Option<bool>,
    pub owner: Option<UserId>,
}

/// Partial template update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub objects: Option<Vec<WorkspaceObject>>,
    pub thumbnail_url: Option<String>,
    pub is_public: Option<bool>,
}

impl TemplateChanges {
    /// Apply the provided fields and stamp `updated_at`.
    pub fn apply_to(self, template: &mut Template, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            template.name = name;
        }
        if let Some(description) = self.description {
            template.description = description;
        }
        if let Some(category) = self.category {
            template.category = category;
        }
        if let Some(objects) = self.objects {
            template.objects = objects;
        }
        if let Some(thumbnail_url) = self.thumbnail_url {
            template.thumbnail_url = Some(thumbnail_url);
        }
        if let Some(is_public) = self.is_public {
            template.is_public = is_public;
        }
        template.updated_at = now;
    }
}

impl Template {
    /// Materialise a new template from a validated command.
    pub fn create(id: TemplateId, new_template: NewTemplate, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new_template.name,
            description: new_template.description.unwrap_or_default(),
            category: new_template.category,
            objects: new_template.objects,
            thumbnail_url: new_template.thumbnail_url,
            is_public: new_template.is_public.unwrap_or(true),
            owner: new_template.owner,
            usage_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Visibility and category filter for template listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    category: Option<String>,
    viewer: Option<UserId>,
}

impl TemplateFilter {
    /// Build a filter; an empty category or [`ALL_CATEGORIES`] matches everything.
    pub fn new(category: Option<String>, viewer: Option<UserId>) -> Self {
        let category = category.filter(|value| !value.is_empty() && value != ALL_CATEGORIES);
        Self { category, viewer }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn viewer(&self) -> Option<&UserId> {
        self.viewer.as_ref()
    }

    /// Public templates, plus the viewer's own when a viewer is given.
    pub fn matches(&self, template: &Template) -> bool {
        let category_matches = self
            .category
            .as_deref()
            .is_none_or(|category| template.category == category);
        let visible = template.is_public
            || self
                .viewer
                .is_some_and(|viewer| template.owner == Some(viewer));
        category_matches && visible
    }
}

/// Most used first, newest first among equals.
pub fn popularity_order(
    (left_usage, left_created): (u32, DateTime<Utc>),
    (right_usage, right_created): (u32, DateTime<Utc>),
) -> Ordering {
    right_usage
        .cmp(&left_usage)
        .then_with(|| right_created.cmp(&left_created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    fn template(category: &str, is_public: bool, owner: Option<UserId>) -> Template {
        Template::create(
            TemplateId::random(),
            NewTemplate {
                name: "Minimal".to_owned(),
                description: None,
                category: category.to_owned(),
                objects: Vec::new(),
                thumbnail_url: None,
                is_public: Some(is_public),
                owner,
            },
            Utc::now(),
        )
    }

    #[rstest]
    #[case(Some("All"), None)]
    #[case(Some(""), None)]
    #[case(None, None)]
    #[case(Some("Gaming"), Some("Gaming"))]
    fn all_category_disables_filtering(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        let filter = TemplateFilter::new(raw.map(str::to_owned), None);
        assert_eq!(filter.category(), expected);
    }

    #[test]
    fn private_templates_only_visible_to_owner() {
        let owner = UserId::random();
        let private = template("Gaming", false, Some(owner));

        assert!(!TemplateFilter::new(None, None).matches(&private));
        assert!(!TemplateFilter::new(None, Some(UserId::random())).matches(&private));
        assert!(TemplateFilter::new(None, Some(owner)).matches(&private));
    }

    #[test]
    fn new_templates_default_to_public_with_empty_description() {
        let created = Template::create(
            TemplateId::random(),
            NewTemplate {
                name: "Minimal".to_owned(),
                description: None,
                category: "Minimal".to_owned(),
                objects: Vec::new(),
                thumbnail_url: None,
                is_public: None,
                owner: None,
            },
            Utc::now(),
        );
        assert!(created.is_public);
        assert_eq!(created.description, "");
    }

    #[test]
    fn popularity_prefers_usage_then_recency() {
        let now = Utc::now();
        let earlier = now - Duration::minutes(1);
        assert_eq!(popularity_order((5, earlier), (1, now)), Ordering::Less);
        assert_eq!(popularity_order((1, earlier), (1, now)), Ordering::Greater);
    }
}
