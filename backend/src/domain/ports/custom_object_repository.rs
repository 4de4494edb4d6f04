//! Port for custom object persistence.

use async_trait::async_trait;

use crate::domain::{CustomObject, CustomObjectId, NewCustomObject, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by custom object repository adapters.
    pub enum CustomObjectRepositoryError {
        /// Repository connection could not be established.
        Connection =>
            "custom object repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query =>
            "custom object repository query failed: {message}",
    }
}

/// Storage for user-defined objects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomObjectRepository: Send + Sync {
    /// Public objects plus the viewer's own, most used first then newest first.
    async fn list_visible(
        &self,
        viewer: Option<UserId>,
    ) -> Result<Vec<CustomObject>, CustomObjectRepositoryError>;

    async fn find_by_id(
        &self,
        id: &CustomObjectId,
    ) -> Result<Option<CustomObject>, CustomObjectRepositoryError>;

    async fn create(
        &self,
        object: NewCustomObject,
    ) -> Result<CustomObject, CustomObjectRepositoryError>;

    async fn delete(&self, id: &CustomObjectId) -> Result<bool, CustomObjectRepositoryError>;
}
