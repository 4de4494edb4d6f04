//! Port for layout persistence.
//!
//! The [`LayoutStore`] trait is the contract shared by the volatile in-memory
//! store and the PostgreSQL store. Both assign identifiers and timestamps;
//! callers hand over validated commands only.

use async_trait::async_trait;

use crate::domain::{ForkLayout, Layout, LayoutChanges, LayoutId, NewLayout, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by layout store adapters.
    pub enum LayoutStoreError {
        /// Store connection could not be established.
        Connection =>
            "layout store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query =>
            "layout store query failed: {message}",
    }
}

/// Owns the collection of layouts.
///
/// Every operation is atomic with respect to itself. `fork` is atomic as a
/// whole: the copy and the source's `fork_count` increment land together.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LayoutStore: Send + Sync {
    /// All layouts in creation order, or only those owned by `owner`.
    async fn list(&self, owner: Option<UserId>) -> Result<Vec<Layout>, LayoutStoreError>;

    /// Public layouts, newest first.
    async fn list_public(&self) -> Result<Vec<Layout>, LayoutStoreError>;

    async fn get(&self, id: &LayoutId) -> Result<Option<Layout>, LayoutStoreError>;

    /// Insert a layout under a fresh, never reused identifier.
    async fn create(&self, layout: NewLayout) -> Result<Layout, LayoutStoreError>;

    /// Merge the provided fields and refresh `updated_at`.
    ///
    /// Returns `None` when the layout does not exist.
    async fn update(
        &self,
        id: &LayoutId,
        changes: LayoutChanges,
    ) -> Result<Option<Layout>, LayoutStoreError>;

    /// Remove a layout; `false` when nothing was removed.
    async fn delete(&self, id: &LayoutId) -> Result<bool, LayoutStoreError>;

    async fn exists(&self, id: &LayoutId) -> Result<bool, LayoutStoreError>;

    /// Copy the source layout and bump its fork counter.
    ///
    /// Returns `None` when the source does not exist.
    async fn fork(&self, request: ForkLayout) -> Result<Option<Layout>, LayoutStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_formats_message() {
        let error = LayoutStoreError::connection("pool exhausted");
        assert_eq!(
            error.to_string(),
            "layout store connection failed: pool exhausted"
        );
    }
}
