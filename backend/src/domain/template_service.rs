//! Template catalogue use-cases.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{TemplateRepository, TemplateRepositoryError};
use crate::domain::{
    AuthenticatedUser, Error, NewTemplate, Template, TemplateChanges, TemplateFilter, TemplateId,
};

const TEMPLATE_NOT_FOUND: &str = "Template not found";

/// Template service enforcing ownership on mutations.
#[derive(Clone)]
pub struct TemplateService {
    templates: Arc<dyn TemplateRepository>,
}

impl TemplateService {
    pub fn new(templates: Arc<dyn TemplateRepository>) -> Self {
        Self { templates }
    }

    fn map_repository_error(error: TemplateRepositoryError) -> Error {
        match error {
            TemplateRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("template repository unavailable: {message}"))
            }
            TemplateRepositoryError::Query { message } => {
                Error::internal(format!("template repository error: {message}"))
            }
        }
    }

    async fn find_owned(
        &self,
        caller: &AuthenticatedUser,
        id: &TemplateId,
        action: &str,
    ) -> Result<Template, Error> {
        let template = self
            .templates
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(TEMPLATE_NOT_FOUND))?;
        if template.owner != Some(caller.id) {
            return Err(Error::forbidden(format!(
                "Not authorized to {action} this template"
            )));
        }
        Ok(template)
    }

    pub async fn list(&self, filter: TemplateFilter) -> Result<Vec<Template>, Error> {
        self.templates
            .list(filter)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Fetch a template, counting the read as a use.
    pub async fn open(&self, id: &TemplateId) -> Result<Template, Error> {
        self.templates
            .record_use(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(TEMPLATE_NOT_FOUND))
    }

    /// Publish a template owned by the caller.
    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        mut template: NewTemplate,
    ) -> Result<Template, Error> {
        template.owner = Some(caller.id);
        let created = self
            .templates
            .create(template)
            .await
            .map_err(Self::map_repository_error)?;
        info!(template_id = %created.id, "template created");
        Ok(created)
    }

    pub async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: &TemplateId,
        changes: TemplateChanges,
    ) -> Result<Template, Error> {
        self.find_owned(caller, id, "update").await?;
        self.templates
            .update(id, changes)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(TEMPLATE_NOT_FOUND))
    }

    pub async fn delete(&self, caller: &AuthenticatedUser, id: &TemplateId) -> Result<(), Error> {
        self.find_owned(caller, id, "delete").await?;
        if self
            .templates
            .delete(id)
            .await
            .map_err(Self::map_repository_error)?
        {
            info!(template_id = %id, "template deleted");
            Ok(())
        } else {
            Err(Error::not_found(TEMPLATE_NOT_FOUND))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockTemplateRepository;
    use crate::domain::{ErrorCode, UserId};
    use chrono::Utc;

    fn caller() -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::random(),
            username: "ada".to_owned(),
            email: "ada@example.com".to_owned(),
        }
    }

    fn template(owner: Option<UserId>) -> Template {
        Template::create(
            TemplateId::random(),
            NewTemplate {
                name: "Gaming".to_owned(),
                description: None,
                category: "Gaming".to_owned(),
                objects: Vec::new(),
                thumbnail_url: None,
                is_public: None,
                owner,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn open_counts_a_use() {
        let mut stored = template(None);
        stored.usage_count = 3;
        let mut repo = MockTemplateRepository::new();
        repo.expect_record_use()
            .times(1)
            .return_once(move |_| Ok(Some(stored)));

        let opened = TemplateService::new(Arc::new(repo))
            .open(&TemplateId::random())
            .await
            .expect("template exists");

        assert_eq!(opened.usage_count, 3);
    }

    #[tokio::test]
    async fn ownerless_templates_cannot_be_updated() {
        let stored = template(None);
        let id = stored.id;
        let mut repo = MockTemplateRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(stored)));
        repo.expect_update().never();

        let err = TemplateService::new(Arc::new(repo))
            .update(&caller(), &id, TemplateChanges::default())
            .await
            .expect_err("no owner");

        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), "Not authorized to update this template");
    }

    #[tokio::test]
    async fn create_assigns_caller_as_owner() {
        let caller = caller();
        let owner = caller.id;
        let mut repo = MockTemplateRepository::new();
        repo.expect_create()
            .withf(move |new_template| new_template.owner == Some(owner))
            .return_once(|new_template| {
                Ok(Template::create(TemplateId::random(), new_template, Utc::now()))
            });

        let created = TemplateService::new(Arc::new(repo))
            .create(
                &caller,
                NewTemplate {
                    name: "Minimal".to_owned(),
                    description: None,
                    category: "Minimal".to_owned(),
                    objects: Vec::new(),
                    thumbnail_url: None,
                    is_public: None,
                    owner: None,
                },
            )
            .await
            .expect("template created");

        assert_eq!(created.owner, Some(owner));
    }
}
