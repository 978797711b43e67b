//! Platefeed API client.
//!
//! ARCHITECTURE
//! ============
//! Three layers, bottom up:
//!
//! - [`session`]: the process-wide [`session::SessionStore`], sole owner of
//!   credential state, mirrored to durable storage so a restart does not need
//!   a fresh login.
//! - [`gateway`]: the single choke point for outbound calls. Attaches the
//!   access token at send time and runs the 401 refresh-retry protocol with
//!   single-flight coordination.
//! - [`services`]: typed per-resource callers (auth, posts, comments, likes,
//!   users, recommendations). They never touch credentials.
//!
//! The [`Client`] facade wires the three together.

pub mod config;
pub mod gateway;
pub mod services;
pub mod session;

use std::sync::Arc;

use config::ApiConfig;
use gateway::Gateway;
use gateway::http::HttpTransport;
use gateway::types::{ApiError, Transport};
use services::auth::AuthService;
use services::comments::CommentsService;
use services::likes::LikesService;
use services::posts::PostsService;
use services::recommendations::RecommendationsService;
use services::users::UsersService;
use session::{FileSessionPersist, SessionPersist, SessionStore};

/// Everything a caller needs: one gateway, shared by all services.
pub struct Client {
    pub auth: AuthService,
    pub posts: PostsService,
    pub comments: CommentsService,
    pub likes: LikesService,
    pub users: UsersService,
    pub recommendations: RecommendationsService,
    store: SessionStore,
}

impl Client {
    /// Build from environment config with file-backed session persistence.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn from_env() -> Result<Self, ApiError> {
        let config = ApiConfig::from_env();
        let persist = Arc::new(FileSessionPersist::new(config.session_file.clone()));
        Self::new(&config, persist)
    }

    /// Build with explicit config and persistence.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &ApiConfig, persist: Arc<dyn SessionPersist>) -> Result<Self, ApiError> {
        let transport = Arc::new(HttpTransport::new(config)?);
        Ok(Self::with_transport(transport, SessionStore::restore(persist)))
    }

    /// Build over any transport; the seam embedders and tests use.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, store: SessionStore) -> Self {
        let gateway = Arc::new(Gateway::new(transport, store.clone()));
        Self {
            auth: AuthService::new(Arc::clone(&gateway)),
            posts: PostsService::new(Arc::clone(&gateway)),
            comments: CommentsService::new(Arc::clone(&gateway)),
            likes: LikesService::new(Arc::clone(&gateway)),
            users: UsersService::new(Arc::clone(&gateway)),
            recommendations: RecommendationsService::new(gateway),
            store,
        }
    }

    /// The session store backing every service.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
