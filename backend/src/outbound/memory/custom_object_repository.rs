//! In-memory [`CustomObjectRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::RwLock;

use crate::domain::ports::{CustomObjectRepository, CustomObjectRepositoryError};
use crate::domain::{CustomObject, CustomObjectId, NewCustomObject, UserId, popularity_order};

pub struct InMemoryCustomObjectRepository {
    objects: RwLock<Vec<CustomObject>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCustomObjectRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            objects: RwLock::new(Vec::new()),
            clock,
        }
    }
}

#[async_trait]
impl CustomObjectRepository for InMemoryCustomObjectRepository {
    async fn list_visible(
        &self,
        viewer: Option<UserId>,
    ) -> Result<Vec<CustomObject>, CustomObjectRepositoryError> {
        let objects = self.objects.read().await;
        let mut visible: Vec<CustomObject> = objects
            .iter()
            .filter(|object| object.visible_to(viewer.as_ref()))
            .cloned()
            .collect();
        visible.sort_by(|left, right| {
            popularity_order(
                (left.usage_count, left.created_at),
                (right.usage_count, right.created_at),
            )
        });
        Ok(visible)
    }

    async fn find_by_id(
        &self,
        id: &CustomObjectId,
    ) -> Result<Option<CustomObject>, CustomObjectRepositoryError> {
        let objects = self.objects.read().await;
        Ok(objects.iter().find(|object| object.id == *id).cloned())
    }

    async fn create(
        &self,
        object: NewCustomObject,
    ) -> Result<CustomObject, CustomObjectRepositoryError> {
        let created = CustomObject::create(CustomObjectId::random(), object, self.clock.utc());
        self.objects.write().await.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: &CustomObjectId) -> Result<bool, CustomObjectRepositoryError> {
        let mut objects = self.objects.write().await;
        let before = objects.len();
        objects.retain(|object| object.id != *id);
        Ok(objects.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObjectGeometry;
    use crate::outbound::memory::test_clock::SteppingClock;

    fn new_object(owner: UserId, is_public: bool) -> NewCustomObject {
        NewCustomObject {
            name: "Shelf".to_owned(),
            kind: "box".to_owned(),
            geometry: ObjectGeometry {
                kind: "box".to_owned(),
                args: Some(vec![1.0, 0.1, 0.3]),
            },
            material: None,
            scale: [1.0, 1.0, 1.0],
            owner,
            is_public: Some(is_public),
            model_url: None,
        }
    }

    #[tokio::test]
    async fn viewers_see_public_objects_and_their_own() {
        let repo = InMemoryCustomObjectRepository::new(Arc::new(SteppingClock::new()));
        let viewer = UserId::random();
        repo.create(new_object(viewer, false)).await.expect("create");
        repo.create(new_object(UserId::random(), false))
            .await
            .expect("create");
        repo.create(new_object(UserId::random(), true))
            .await
            .expect("create");

        assert_eq!(repo.list_visible(Some(viewer)).await.expect("list").len(), 2);
        assert_eq!(repo.list_visible(None).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let repo = InMemoryCustomObjectRepository::new(Arc::new(SteppingClock::new()));
        let created = repo
            .create(new_object(UserId::random(), true))
            .await
            .expect("create");

        assert!(repo.delete(&created.id).await.expect("delete"));
        assert!(!repo.delete(&created.id).await.expect("delete again"));
    }
}
