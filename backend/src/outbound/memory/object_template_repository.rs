//! In-memory [`ObjectTemplateRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::RwLock;

use crate::domain::ports::{ObjectTemplateRepository, ObjectTemplateRepositoryError};
use crate::domain::{NewObjectTemplate, ObjectTemplate, ObjectTemplateId};

pub struct InMemoryObjectTemplateRepository {
    entries: RwLock<Vec<ObjectTemplate>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryObjectTemplateRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            clock,
        }
    }
}

#[async_trait]
impl ObjectTemplateRepository for InMemoryObjectTemplateRepository {
    async fn list(
        &self,
        category: Option<String>,
    ) -> Result<Vec<ObjectTemplate>, ObjectTemplateRepositoryError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|entry| category.as_deref().is_none_or(|wanted| entry.category == wanted))
            .cloned()
            .collect())
    }

    async fn insert_if_absent(
        &self,
        entry: NewObjectTemplate,
    ) -> Result<bool, ObjectTemplateRepositoryError> {
        let mut entries = self.entries.write().await;
        if entries.iter().any(|existing| existing.same_entry(&entry)) {
            return Ok(false);
        }
        entries.push(ObjectTemplate::create(
            ObjectTemplateId::random(),
            entry,
            self.clock.utc(),
        ));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_object_templates;
    use crate::outbound::memory::test_clock::SteppingClock;

    #[tokio::test]
    async fn reinserting_defaults_adds_nothing() {
        let repo = InMemoryObjectTemplateRepository::new(Arc::new(SteppingClock::new()));
        for entry in default_object_templates() {
            assert!(repo.insert_if_absent(entry).await.expect("first seed"));
        }
        for entry in default_object_templates() {
            assert!(!repo.insert_if_absent(entry).await.expect("second seed"));
        }

        let all = repo.list(None).await.expect("list");
        assert_eq!(all.len(), default_object_templates().len());
    }

    #[tokio::test]
    async fn category_filter_is_exact() {
        let repo = InMemoryObjectTemplateRepository::new(Arc::new(SteppingClock::new()));
        for entry in default_object_templates() {
            repo.insert_if_absent(entry).await.expect("seed");
        }
        let category = default_object_templates()
            .into_iter()
            .next()
            .map(|entry| entry.category)
            .expect("at least one default");

        let filtered = repo.list(Some(category.clone())).await.expect("list");

        assert!(!filtered.is_empty());
        assert!(filtered.iter().all(|entry| entry.category == category));
        assert!(repo.list(Some("nope".to_owned())).await.expect("list").is_empty());
    }
}
