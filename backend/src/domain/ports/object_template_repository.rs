//! Port for the object catalogue.

use async_trait::async_trait;

use crate::domain::{NewObjectTemplate, ObjectTemplate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by object catalogue adapters.
    pub enum ObjectTemplateRepositoryError {
        /// Repository connection could not be established.
        Connection =>
            "object catalogue connection failed: {message}",
        /// Query or mutation failed during execution.
        Query =>
            "object catalogue query failed: {message}",
    }
}

/// Storage for catalogue entries, unique by `(kind, name)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectTemplateRepository: Send + Sync {
    /// Entries in insertion order, optionally restricted to one category.
    async fn list(
        &self,
        category: Option<String>,
    ) -> Result<Vec<ObjectTemplate>, ObjectTemplateRepositoryError>;

    /// Insert `entry` unless one with the same kind and name exists.
    ///
    /// Returns `true` when a row was inserted.
    async fn insert_if_absent(
        &self,
        entry: NewObjectTemplate,
    ) -> Result<bool, ObjectTemplateRepositoryError>;
}
