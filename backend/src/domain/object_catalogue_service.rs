//! Object catalogue listing and default seeding.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{ObjectTemplateRepository, ObjectTemplateRepositoryError};
use crate::domain::{Error, ObjectTemplate, default_object_templates};

/// Object catalogue service.
#[derive(Clone)]
pub struct ObjectCatalogueService {
    entries: Arc<dyn ObjectTemplateRepository>,
}

impl ObjectCatalogueService {
    pub fn new(entries: Arc<dyn ObjectTemplateRepository>) -> Self {
        Self { entries }
    }

    fn map_repository_error(error: ObjectTemplateRepositoryError) -> Error {
        match error {
            ObjectTemplateRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("object catalogue unavailable: {message}"))
            }
            ObjectTemplateRepositoryError::Query { message } => {
                Error::internal(format!("object catalogue error: {message}"))
            }
        }
    }

    /// Catalogue entries, optionally limited to a category.
    pub async fn list(&self, category: Option<String>) -> Result<Vec<ObjectTemplate>, Error> {
        let category = category.filter(|value| !value.is_empty());
        self.entries
            .list(category)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Insert the built-in entries that are missing and return the catalogue.
    ///
    /// Running the seed repeatedly never duplicates an entry.
    pub async fn seed_defaults(&self) -> Result<Vec<ObjectTemplate>, Error> {
        let mut inserted = 0_usize;
        for entry in default_object_templates() {
            if self
                .entries
                .insert_if_absent(entry)
                .await
                .map_err(Self::map_repository_error)?
            {
                inserted += 1;
            }
        }
        info!(inserted, "object catalogue seeded");
        self.list(None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockObjectTemplateRepository;
    use rstest::rstest;

    #[tokio::test]
    async fn seed_offers_every_default_entry() {
        let mut repo = MockObjectTemplateRepository::new();
        repo.expect_insert_if_absent()
            .times(default_object_templates().len())
            .returning(|_| Ok(false));
        repo.expect_list()
            .withf(|category| category.is_none())
            .return_once(|_| Ok(Vec::new()));

        ObjectCatalogueService::new(Arc::new(repo))
            .seed_defaults()
            .await
            .expect("seed succeeds");
    }

    #[rstest]
    #[case(Some(String::new()), None)]
    #[case(Some("tech".to_owned()), Some("tech".to_owned()))]
    #[case(None, None)]
    #[tokio::test]
    async fn empty_category_lists_everything(
        #[case] requested: Option<String>,
        #[case] expected: Option<String>,
    ) {
        let mut repo = MockObjectTemplateRepository::new();
        repo.expect_list()
            .withf(move |category| *category == expected)
            .return_once(|_| Ok(Vec::new()));

        ObjectCatalogueService::new(Arc::new(repo))
            .list(requested)
            .await
            .expect("list succeeds");
    }
}
