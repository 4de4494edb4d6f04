//! Custom object use-cases.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{CustomObjectRepository, CustomObjectRepositoryError};
use crate::domain::{AuthenticatedUser, CustomObject, CustomObjectId, Error, NewCustomObject, UserId};

/// Custom object service enforcing ownership on deletion.
#[derive(Clone)]
pub struct CustomObjectService {
    objects: Arc<dyn CustomObjectRepository>,
}

impl CustomObjectService {
    pub fn new(objects: Arc<dyn CustomObjectRepository>) -> Self {
        Self { objects }
    }

    fn map_repository_error(error: CustomObjectRepositoryError) -> Error {
        match error {
            CustomObjectRepositoryError::Connection { message } => Error::service_unavailable(
                format!("custom object repository unavailable: {message}"),
            ),
            CustomObjectRepositoryError::Query { message } => {
                Error::internal(format!("custom object repository error: {message}"))
            }
        }
    }

    /// Public objects plus those owned by `viewer`.
    pub async fn list(&self, viewer: Option<UserId>) -> Result<Vec<CustomObject>, Error> {
        self.objects
            .list_visible(viewer)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Store an object owned by the caller.
    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        mut object: NewCustomObject,
    ) -> Result<CustomObject, Error> {
        object.owner = caller.id;
        let created = self
            .objects
            .create(object)
            .await
            .map_err(Self::map_repository_error)?;
        info!(object_id = %created.id, "custom object created");
        Ok(created)
    }

    pub async fn delete(
        &self,
        caller: &AuthenticatedUser,
        id: &CustomObjectId,
    ) -> Result<(), Error> {
        let object = self
            .objects
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found("Custom object not found"))?;
        if object.owner != caller.id {
            return Err(Error::forbidden("Not authorized to delete this object"));
        }
        self.objects
            .delete(id)
            .await
            .map_err(Self::map_repository_error)?;
        info!(object_id = %id, "custom object deleted");
        Ok(())
    }
}
