//! In-memory [`TemplateRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::RwLock;

use crate::domain::ports::{TemplateRepository, TemplateRepositoryError};
use crate::domain::{
    NewTemplate, Template, TemplateChanges, TemplateFilter, TemplateId, popularity_order,
};

pub struct InMemoryTemplateRepository {
    templates: RwLock<Vec<Template>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTemplateRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            templates: RwLock::new(Vec::new()),
            clock,
        }
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn list(&self, filter: TemplateFilter) -> Result<Vec<Template>, TemplateRepositoryError> {
        let templates = self.templates.read().await;
        let mut matching: Vec<Template> = templates
            .iter()
            .filter(|template| filter.matches(template))
            .cloned()
            .collect();
        matching.sort_by(|left, right| {
            popularity_order(
                (left.usage_count, left.created_at),
                (right.usage_count, right.created_at),
            )
        });
        Ok(matching)
    }

    async fn find_by_id(
        &self,
        id: &TemplateId,
    ) -> Result<Option<Template>, TemplateRepositoryError> {
        let templates = self.templates.read().await;
        Ok(templates.iter().find(|template| template.id == *id).cloned())
    }

    async fn record_use(
        &self,
        id: &TemplateId,
    ) -> Result<Option<Template>, TemplateRepositoryError> {
        let mut templates = self.templates.write().await;
        let Some(template) = templates.iter_mut().find(|template| template.id == *id) else {
            return Ok(None);
        };
        template.usage_count = template.usage_count.saturating_add(1);
        Ok(Some(template.clone()))
    }

    async fn create(&self, template: NewTemplate) -> Result<Template, TemplateRepositoryError> {
        let created = Template::create(TemplateId::random(), template, self.clock.utc());
        self.templates.write().await.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &TemplateId,
        changes: TemplateChanges,
    ) -> Result<Option<Template>, TemplateRepositoryError> {
        let mut templates = self.templates.write().await;
        let Some(template) = templates.iter_mut().find(|template| template.id == *id) else {
            return Ok(None);
        };
        changes.apply_to(template, self.clock.utc());
        Ok(Some(template.clone()))
    }

    async fn delete(&self, id: &TemplateId) -> Result<bool, TemplateRepositoryError> {
        let mut templates = self.templates.write().await;
        let before = templates.len();
        templates.retain(|template| template.id != *id);
        Ok(templates.len() < before)
    }
}
