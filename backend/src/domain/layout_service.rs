//! Layout use-cases: CRUD, public listing and forking.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{LayoutStore, LayoutStoreError};
use crate::domain::{Error, ForkLayout, Layout, LayoutChanges, LayoutId, NewLayout, UserId};

/// Message returned whenever a layout lookup misses.
pub const LAYOUT_NOT_FOUND: &str = "Layout not found";

/// Layout service delegating persistence to a [`LayoutStore`].
#[derive(Clone)]
pub struct LayoutService {
    store: Arc<dyn LayoutStore>,
}

impl LayoutService {
    pub fn new(store: Arc<dyn LayoutStore>) -> Self {
        Self { store }
    }

    fn map_store_error(error: LayoutStoreError) -> Error {
        match error {
            LayoutStoreError::Connection { message } => {
                Error::service_unavailable(format!("layout store unavailable: {message}"))
            }
            LayoutStoreError::Query { message } => {
                Error::internal(format!("layout store error: {message}"))
            }
        }
    }

    /// All layouts, or the ones owned by `owner`.
    pub async fn list(&self, owner: Option<UserId>) -> Result<Vec<Layout>, Error> {
        self.store.list(owner).await.map_err(Self::map_store_error)
    }

    pub async fn list_public(&self) -> Result<Vec<Layout>, Error> {
        self.store.list_public().await.map_err(Self::map_store_error)
    }

    pub async fn get(&self, id: &LayoutId) -> Result<Layout, Error> {
        self.store
            .get(id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found(LAYOUT_NOT_FOUND))
    }

    /// Fail with not-found unless the layout exists.
    pub async fn ensure_exists(&self, id: &LayoutId) -> Result<(), Error> {
        if self.store.exists(id).await.map_err(Self::map_store_error)? {
            Ok(())
        } else {
            Err(Error::not_found(LAYOUT_NOT_FOUND))
        }
    }

    pub async fn create(&self, layout: NewLayout) -> Result<Layout, Error> {
        let created = self
            .store
            .create(layout)
            .await
            .map_err(Self::map_store_error)?;
        info!(layout_id = %created.id, objects = created.objects.len(), "layout created");
        Ok(created)
    }

    pub async fn update(&self, id: &LayoutId, changes: LayoutChanges) -> Result<Layout, Error> {
        self.store
            .update(id, changes)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found(LAYOUT_NOT_FOUND))
    }

    pub async fn delete(&self, id: &LayoutId) -> Result<(), Error> {
        if self.store.delete(id).await.map_err(Self::map_store_error)? {
            info!(layout_id = %id, "layout deleted");
            Ok(())
        } else {
            Err(Error::not_found(LAYOUT_NOT_FOUND))
        }
    }

    /// Copy a layout for `request.owner`, bumping the source's fork count.
    pub async fn fork(&self, request: ForkLayout) -> Result<Layout, Error> {
        let source = request.source;
        let fork = self
            .store
            .fork(request)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found(LAYOUT_NOT_FOUND))?;
        info!(layout_id = %fork.id, source_id = %source, "layout forked");
        Ok(fork)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockLayoutStore;
    use chrono::Utc;
    use rstest::rstest;

    fn stored_layout(id: LayoutId) -> Layout {
        Layout::create(
            id,
            NewLayout {
                name: "Desk Setup".to_owned(),
                objects: Vec::new(),
                owner: None,
                is_public: None,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn get_maps_missing_layout_to_not_found() {
        let mut store = MockLayoutStore::new();
        store.expect_get().times(1).return_once(|_| Ok(None));

        let service = LayoutService::new(Arc::new(store));
        let err = service
            .get(&LayoutId::random())
            .await
            .expect_err("missing layout");

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), LAYOUT_NOT_FOUND);
    }

    #[tokio::test]
    async fn get_returns_stored_layout() {
        let id = LayoutId::random();
        let layout = stored_layout(id);
        let mut store = MockLayoutStore::new();
        store
            .expect_get()
            .withf(move |requested| *requested == id)
            .return_once(move |_| Ok(Some(layout)));

        let service = LayoutService::new(Arc::new(store));
        let fetched = service.get(&id).await.expect("layout exists");
        assert_eq!(fetched.id, id);
    }

    #[rstest]
    #[case(LayoutStoreError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(LayoutStoreError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn store_failures_are_mapped(
        #[case] failure: LayoutStoreError,
        #[case] expected: ErrorCode,
    ) {
        let mut store = MockLayoutStore::new();
        store.expect_list().return_once(move |_| Err(failure));

        let service = LayoutService::new(Arc::new(store));
        let err = service.list(None).await.expect_err("store failure");
        assert_eq!(err.code(), expected);
    }

    #[tokio::test]
    async fn delete_of_missing_layout_is_not_found() {
        let mut store = MockLayoutStore::new();
        store.expect_delete().return_once(|_| Ok(false));

        let service = LayoutService::new(Arc::new(store));
        let err = service
            .delete(&LayoutId::random())
            .await
            .expect_err("nothing to delete");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn fork_of_missing_source_is_not_found() {
        let mut store = MockLayoutStore::new();
        store.expect_fork().return_once(|_| Ok(None));

        let service = LayoutService::new(Arc::new(store));
        let err = service
            .fork(ForkLayout {
                source: LayoutId::random(),
                owner: Some(UserId::random()),
                name: None,
            })
            .await
            .expect_err("missing source");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn ensure_exists_checks_store() {
        let mut store = MockLayoutStore::new();
        store.expect_exists().return_once(|_| Ok(true));

        let service = LayoutService::new(Arc::new(store));
        service
            .ensure_exists(&LayoutId::random())
            .await
            .expect("layout exists");
    }
}
