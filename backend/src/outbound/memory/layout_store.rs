//! In-memory [`LayoutStore`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{LayoutStore, LayoutStoreError};
use crate::domain::{ForkLayout, Layout, LayoutChanges, LayoutId, NewLayout, UserId};

/// Volatile layout store guarded by a read/write lock.
pub struct InMemoryLayoutStore {
    layouts: RwLock<Vec<Layout>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryLayoutStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            layouts: RwLock::new(Vec::new()),
            clock,
        }
    }
}

impl Default for InMemoryLayoutStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

#[async_trait]
impl LayoutStore for InMemoryLayoutStore {
    async fn list(&self, owner: Option<UserId>) -> Result<Vec<Layout>, LayoutStoreError> {
        let layouts = self.layouts.read().await;
        Ok(layouts
            .iter()
            .filter(|layout| owner.is_none() || layout.owner == owner)
            .cloned()
            .collect())
    }

    async fn list_public(&self) -> Result<Vec<Layout>, LayoutStoreError> {
        let layouts = self.layouts.read().await;
        let mut public: Vec<Layout> = layouts
            .iter()
            .rev()
            .filter(|layout| layout.is_public)
            .cloned()
            .collect();
        public.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(public)
    }

    async fn get(&self, id: &LayoutId) -> Result<Option<Layout>, LayoutStoreError> {
        let layouts = self.layouts.read().await;
        Ok(layouts.iter().find(|layout| layout.id == *id).cloned())
    }

    async fn create(&self, layout: NewLayout) -> Result<Layout, LayoutStoreError> {
        let created = Layout::create(LayoutId::random(), layout, self.clock.utc());
        self.layouts.write().await.push(created.clone());
        debug!(layout_id = %created.id, "stored layout in memory");
        Ok(created)
    }

    async fn update(
        &self,
        id: &LayoutId,
        changes: LayoutChanges,
    ) -> Result<Option<Layout>, LayoutStoreError> {
        let mut layouts = self.layouts.write().await;
        let Some(layout) = layouts.iter_mut().find(|layout| layout.id == *id) else {
            return Ok(None);
        };
        changes.apply_to(layout, self.clock.utc());
        Ok(Some(layout.clone()))
    }

    async fn delete(&self, id: &LayoutId) -> Result<bool, LayoutStoreError> {
        let mut layouts = self.layouts.write().await;
        let before = layouts.len();
        layouts.retain(|layout| layout.id != *id);
        Ok(layouts.len() < before)
    }

    async fn exists(&self, id: &LayoutId) -> Result<bool, LayoutStoreError> {
        let layouts = self.layouts.read().await;
        Ok(layouts.iter().any(|layout| layout.id == *id))
    }

    async fn fork(&self, request: ForkLayout) -> Result<Option<Layout>, LayoutStoreError> {
        let mut layouts = self.layouts.write().await;
        let Some(source) = layouts
            .iter_mut()
            .find(|layout| layout.id == request.source)
        else {
            return Ok(None);
        };
        source.fork_count = source.fork_count.saturating_add(1);
        let fork = source.fork(LayoutId::random(), request, self.clock.utc());
        layouts.push(fork.clone());
        Ok(Some(fork))
    }
}
