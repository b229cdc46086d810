//! Contact business rules
//!
//! The service is the only place a persisted [`Contact`] is built: it
//! validates payloads, assigns ids and timestamps, then hands the record to a
//! [`ContactRepository`].

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

use super::model::{Contact, CreateContactRequest, UpdateContactRequest};
use super::repository::ContactRepository;
use crate::ids::new_contact_id;
use crate::repository::RepositoryError;
use crate::validation::ValidationErrors;

/// Failure of a contact operation
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The payload broke a validation rule; nothing was persisted
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// The repository refused or failed the operation
    #[error("{0}")]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Whether the targeted contact does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Repository(e) if e.is_not_found())
    }
}

/// Result alias for service calls
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Contact operations exposed to the HTTP layer
#[async_trait]
pub trait ContactService: Send + Sync {
    /// Fetch one contact
    async fn get(&self, id: &str) -> ServiceResult<Contact>;

    /// Total number of contacts
    async fn count(&self) -> ServiceResult<u64>;

    /// A window of contacts ordered by id
    async fn query(&self, offset: u64, limit: u64) -> ServiceResult<Vec<Contact>>;

    /// Validate and store a new contact, returning it as persisted
    async fn create(&self, input: CreateContactRequest) -> ServiceResult<Contact>;

    /// Validate and apply a rename, returning the updated contact
    async fn update(&self, id: &str, input: UpdateContactRequest) -> ServiceResult<Contact>;

    /// Remove a contact, returning its last state
    async fn delete(&self, id: &str) -> ServiceResult<Contact>;
}

/// Default [`ContactService`] over any repository
#[derive(Clone)]
pub struct ContactServiceImpl {
    repo: Arc<dyn ContactRepository>,
}

impl ContactServiceImpl {
    /// Build a service on top of `repo`
    pub fn new(repo: Arc<dyn ContactRepository>) -> Self {
        Self { repo }
    }
}

impl std::fmt::Debug for ContactServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactServiceImpl").finish_non_exhaustive()
    }
}

#[async_trait]
impl ContactService for ContactServiceImpl {
    async fn get(&self, id: &str) -> ServiceResult<Contact> {
        Ok(self.repo.get(id).await?)
    }

    async fn count(&self) -> ServiceResult<u64> {
        Ok(self.repo.count().await?)
    }

    async fn query(&self, offset: u64, limit: u64) -> ServiceResult<Vec<Contact>> {
        Ok(self.repo.query(offset, limit).await?)
    }

    async fn create(&self, input: CreateContactRequest) -> ServiceResult<Contact> {
        input.validate()?;

        let now = Utc::now();
        let contact = Contact {
            id: new_contact_id(),
            name: input.name,
            created_at: now,
            updated_at: now,
        };

        self.repo.create(&contact).await?;
        tracing::debug!(contact_id = %contact.id, "contact created");

        self.get(&contact.id).await
    }

    async fn update(&self, id: &str, input: UpdateContactRequest) -> ServiceResult<Contact> {
        input.validate()?;

        let mut contact = self.repo.get(id).await?;
        contact.name = input.name;
        contact.updated_at = Utc::now().max(contact.created_at);

        self.repo.update(&contact).await?;
        tracing::debug!(contact_id = %contact.id, "contact updated");

        Ok(contact)
    }

    async fn delete(&self, id: &str) -> ServiceResult<Contact> {
        let contact = self.repo.get(id).await?;
        self.repo.delete(id).await?;
        tracing::debug!(contact_id = %contact.id, "contact deleted");

        Ok(contact)
    }
}
