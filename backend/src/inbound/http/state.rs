//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{PasswordHasher, Repositories, TokenCodec};
use crate::domain::{
    AuthService, CommentService, CustomObjectService, LayoutService, ObjectCatalogueService,
    TemplateService,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub repositories: Repositories,
    pub passwords: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenCodec>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub layouts: LayoutService,
    pub auth: AuthService,
    pub comments: CommentService,
    pub templates: TemplateService,
    pub custom_objects: CustomObjectService,
    pub objects: ObjectCatalogueService,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct every domain service from one ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use layout_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use layout_backend::outbound::memory::in_memory_repositories;
    /// use layout_backend::outbound::security::{BcryptPasswordHasher, JwtTokenCodec};
    /// use mockable::{Clock, DefaultClock};
    ///
    /// let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    /// let state = HttpState::new(HttpStatePorts {
    ///     repositories: in_memory_repositories(&clock),
    ///     passwords: Arc::new(BcryptPasswordHasher::default()),
    ///     tokens: Arc::new(JwtTokenCodec::new(b"doc-secret")),
    ///     clock,
    /// });
    /// let _layouts = state.layouts.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            repositories,
            passwords,
            tokens,
            clock,
        } = ports;
        let Repositories {
            layouts,
            users,
            comments,
            templates,
            custom_objects,
            object_templates,
        } = repositories;
        Self {
            layouts: LayoutService::new(layouts),
            auth: AuthService::new(users, passwords, tokens, clock),
            comments: CommentService::new(comments),
            templates: TemplateService::new(templates),
            custom_objects: CustomObjectService::new(custom_objects),
            objects: ObjectCatalogueService::new(object_templates),
        }
    }
}
