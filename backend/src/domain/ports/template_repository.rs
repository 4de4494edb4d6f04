//! Port for layout template persistence.

use async_trait::async_trait;

use crate::domain::{NewTemplate, Template, TemplateChanges, TemplateFilter, TemplateId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by template repository adapters.
    pub enum TemplateRepositoryError {
        /// Repository connection could not be established.
        Connection =>
            "template repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query =>
            "template repository query failed: {message}",
    }
}

/// Storage for shared layout templates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Templates matching `filter`, most used first then newest first.
    async fn list(&self, filter: TemplateFilter) -> Result<Vec<Template>, TemplateRepositoryError>;

    async fn find_by_id(&self, id: &TemplateId)
    -> Result<Option<Template>, TemplateRepositoryError>;

    /// Increment the usage counter and return the updated template.
    async fn record_use(
        &self,
        id: &TemplateId,
    ) -> Result<Option<Template>, TemplateRepositoryError>;

    async fn create(&self, template: NewTemplate) -> Result<Template, TemplateRepositoryError>;

    async fn update(
        &self,
        id: &TemplateId,
        changes: TemplateChanges,
    ) -> Result<Option<Template>, TemplateRepositoryError>;

    async fn delete(&self, id: &TemplateId) -> Result<bool, TemplateRepositoryError>;
}
