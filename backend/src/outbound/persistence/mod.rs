//! PostgreSQL persistence adapters using Diesel.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; no business rules live here. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) never leave this module.
//!
//! ```ignore
//! use layout_backend::outbound::persistence::{DbPool, PoolConfig, diesel_repositories};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/layouts")).await?;
//! let repositories = diesel_repositories(&pool, &clock);
//! ```

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::Repositories;

mod diesel_comment_repository;
mod diesel_custom_object_repository;
mod diesel_error_mapping;
mod diesel_layout_store;
mod diesel_object_template_repository;
mod diesel_template_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_custom_object_repository::DieselCustomObjectRepository;
pub use diesel_layout_store::DieselLayoutStore;
pub use diesel_object_template_repository::DieselObjectTemplateRepository;
pub use diesel_template_repository::DieselTemplateRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{
    DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError,
};

/// Build every repository on top of one shared pool.
pub fn diesel_repositories(pool: &DbPool, clock: &Arc<dyn Clock>) -> Repositories {
    Repositories {
        layouts: Arc::new(DieselLayoutStore::new(pool.clone(), Arc::clone(clock))),
        users: Arc::new(DieselUserRepository::new(pool.clone(), Arc::clone(clock))),
        comments: Arc::new(DieselCommentRepository::new(pool.clone(), Arc::clone(clock))),
        templates: Arc::new(DieselTemplateRepository::new(pool.clone(), Arc::clone(clock))),
        custom_objects: Arc::new(DieselCustomObjectRepository::new(
            pool.clone(),
            Arc::clone(clock),
        )),
        object_templates: Arc::new(DieselObjectTemplateRepository::new(
            pool.clone(),
            Arc::clone(clock),
        )),
    }
}
