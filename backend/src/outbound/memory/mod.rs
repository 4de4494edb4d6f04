//! Volatile in-memory adapters.
//!
//! Each adapter keeps its entities in a `Vec` behind a `tokio::sync::RwLock`
//! so listings preserve insertion order. Nothing survives a restart. The
//! server falls back to these adapters when no database URL is configured.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::Repositories;

mod comment_repository;
mod custom_object_repository;
mod layout_store;
mod object_template_repository;
mod template_repository;
mod user_repository;

pub use comment_repository::InMemoryCommentRepository;
pub use custom_object_repository::InMemoryCustomObjectRepository;
pub use layout_store::InMemoryLayoutStore;
pub use object_template_repository::InMemoryObjectTemplateRepository;
pub use template_repository::InMemoryTemplateRepository;
pub use user_repository::InMemoryUserRepository;

/// Build the full set of in-memory repositories sharing one clock.
pub fn in_memory_repositories(clock: &Arc<dyn Clock>) -> Repositories {
    Repositories {
        layouts: Arc::new(InMemoryLayoutStore::new(Arc::clone(clock))),
        users: Arc::new(InMemoryUserRepository::new(Arc::clone(clock))),
        comments: Arc::new(InMemoryCommentRepository::new(Arc::clone(clock))),
        templates: Arc::new(InMemoryTemplateRepository::new(Arc::clone(clock))),
        custom_objects: Arc::new(InMemoryCustomObjectRepository::new(Arc::clone(clock))),
        object_templates: Arc::new(InMemoryObjectTemplateRepository::new(Arc::clone(clock))),
    }
}

#[cfg(test)]
pub(crate) mod test_clock {
    //! Deterministic clock advancing one second per reading.

    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::{DateTime, Duration, Local, TimeZone, Utc};
    use mockable::Clock;

    pub(crate) struct SteppingClock {
        ticks: AtomicI64,
    }

    impl SteppingClock {
        pub(crate) fn new() -> Self {
            Self {
                ticks: AtomicI64::new(0),
            }
        }
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            let epoch = Utc
                .with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
                .single()
                .expect("valid epoch");
            epoch + Duration::seconds(tick)
        }
    }
}
