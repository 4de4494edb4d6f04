//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Repository traits expose strongly typed errors generated by
//! [`define_port_error!`] so adapters map their failures into predictable
//! variants that services translate into [`crate::domain::Error`].

use std::sync::Arc;

mod macros;
pub(crate) use macros::define_port_error;

mod comment_repository;
mod custom_object_repository;
mod layout_store;
mod object_template_repository;
mod password_hasher;
mod template_repository;
mod token_codec;
mod user_repository;

#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
#[cfg(test)]
pub use custom_object_repository::MockCustomObjectRepository;
pub use custom_object_repository::{CustomObjectRepository, CustomObjectRepositoryError};
#[cfg(test)]
pub use layout_store::MockLayoutStore;
pub use layout_store::{LayoutStore, LayoutStoreError};
#[cfg(test)]
pub use object_template_repository::MockObjectTemplateRepository;
pub use object_template_repository::{ObjectTemplateRepository, ObjectTemplateRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use template_repository::MockTemplateRepository;
pub use template_repository::{TemplateRepository, TemplateRepositoryError};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};

/// The full set of driven storage ports, backed by one adapter family.
#[derive(Clone)]
pub struct Repositories {
    pub layouts: Arc<dyn LayoutStore>,
    pub users: Arc<dyn UserRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub templates: Arc<dyn TemplateRepository>,
    pub custom_objects: Arc<dyn CustomObjectRepository>,
    pub object_templates: Arc<dyn ObjectTemplateRepository>,
}
