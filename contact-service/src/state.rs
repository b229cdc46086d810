//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    config::Config,
    contact::{
        memory::InMemoryContactRepository,
        repository::{ContactRepository, PgContactRepository},
        service::{ContactService, ContactServiceImpl},
    },
    database,
    error::Result,
    middleware::JwtAuth,
};

/// Everything a request handler may need, cheap to clone
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    contacts: Arc<dyn ContactService>,
    auth: JwtAuth,
    db_pool: Option<PgPool>,
}

impl AppState {
    /// Create a new builder for AppState
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Contact operations
    pub fn contacts(&self) -> &Arc<dyn ContactService> {
        &self.contacts
    }

    /// Bearer token verifier guarding mutating routes
    pub fn auth(&self) -> &JwtAuth {
        &self.auth
    }

    /// Database pool, when a database is configured
    pub fn db(&self) -> Option<&PgPool> {
        self.db_pool.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.config.service.name)
            .field("database", &self.db_pool.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`AppState`]
///
/// Anything not supplied explicitly is derived from the configuration: the
/// JWT key is read from `jwt.key_path`, and contacts are stored in PostgreSQL
/// when `database` is set, in memory otherwise.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    repository: Option<Arc<dyn ContactRepository>>,
    auth: Option<JwtAuth>,
}

impl AppStateBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use `repository` instead of the configured store
    pub fn repository(mut self, repository: Arc<dyn ContactRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Use an already built token verifier
    pub fn auth(mut self, auth: JwtAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Connect dependencies and build the state
    pub async fn build(self) -> Result<AppState> {
        let config = self.config.unwrap_or_default();

        let auth = match self.auth {
            Some(auth) => auth,
            None => JwtAuth::new(&config.jwt).await?,
        };

        let (repository, db_pool): (Arc<dyn ContactRepository>, Option<PgPool>) =
            match (self.repository, &config.database) {
                (Some(repository), _) => (repository, None),
                (None, Some(db_config)) => {
                    let pool = database::connect(db_config).await?;
                    (Arc::new(PgContactRepository::new(pool.clone())), Some(pool))
                }
                (None, None) => {
                    tracing::warn!("No database configured, contacts are kept in memory");
                    (Arc::new(InMemoryContactRepository::new()), None)
                }
            };

        Ok(AppState {
            config: Arc::new(config),
            contacts: Arc::new(ContactServiceImpl::new(repository)),
            auth,
            db_pool,
        })
    }
}
