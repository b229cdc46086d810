//! The contact resource: model, storage, business rules and HTTP surface
//!
//! Requests flow `api` → `service` → `repository`, and results flow back up
//! as JSON.

pub mod api;
pub mod memory;
pub mod model;
pub mod repository;
pub mod service;

pub use memory::InMemoryContactRepository;
pub use model::{Contact, CreateContactRequest, UpdateContactRequest, MAX_NAME_LEN};
pub use repository::{ContactRepository, PgContactRepository};
pub use service::{ContactService, ContactServiceImpl, ServiceError, ServiceResult};
