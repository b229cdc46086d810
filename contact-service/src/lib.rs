//! # contact-service
//!
//! A REST service for contact records, layered as HTTP handlers, a service
//! layer holding the business rules, and a repository over PostgreSQL.
//!
//! - `GET /contacts/{id}`, `GET /contacts?page=&page_size=`: public
//! - `POST /contacts`, `PUT /contacts/{id}`, `DELETE /contacts/{id}`: bearer JWT
//! - `GET /health`, `GET /ready`: probes
//!
//! ## Example
//!
//! ```rust,no_run
//! use contact_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::builder().config(config.clone()).build().await?;
//!
//!     Server::new(config).serve(router(state)).await
//! }
//! ```

pub mod api_error;
pub mod config;
pub mod contact;
pub mod database;
pub mod error;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod observability;
pub mod pagination;
pub mod repository;
pub mod server;
pub mod state;
pub mod validation;

/// Commonly used items
pub mod prelude {
    pub use crate::api_error::{ApiError, ApiErrorKind, ApiOperation};
    pub use crate::config::Config;
    pub use crate::contact::{
        Contact, ContactRepository, ContactService, ContactServiceImpl, CreateContactRequest,
        InMemoryContactRepository, PgContactRepository, ServiceError, UpdateContactRequest,
    };
    pub use crate::error::{Error, Result};
    pub use crate::middleware::{Claims, JwtAuth};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{Page, PageQuery, Pages};
    pub use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
    pub use crate::server::{router, Server};
    pub use crate::state::AppState;
}
