//! In-process contact store
//!
//! Used when no database is configured and by the test suite. Contacts live in
//! a `BTreeMap` keyed by id, so iteration order is the id order the SQL
//! repository sorts by.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::model::Contact;
use super::repository::{ContactRepository, ENTITY};
use crate::repository::{RepositoryError, RepositoryOperation, RepositoryResult};

/// Contact repository backed by memory
#[derive(Debug, Default)]
pub struct InMemoryContactRepository {
    contacts: RwLock<BTreeMap<String, Contact>>,
}

impl InMemoryContactRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn get(&self, id: &str) -> RepositoryResult<Contact> {
        self.contacts
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(RepositoryOperation::Get, ENTITY, id))
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.contacts.read().await.len() as u64)
    }

    async fn query(&self, offset: u64, limit: u64) -> RepositoryResult<Vec<Contact>> {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(self
            .contacts
            .read()
            .await
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn create(&self, contact: &Contact) -> RepositoryResult<()> {
        let mut contacts = self.contacts.write().await;
        if contacts.contains_key(&contact.id) {
            return Err(RepositoryError::already_exists(ENTITY, &contact.id));
        }
        contacts.insert(contact.id.clone(), contact.clone());
        Ok(())
    }

    async fn update(&self, contact: &Contact) -> RepositoryResult<()> {
        match self.contacts.write().await.get_mut(&contact.id) {
            Some(stored) => {
                *stored = contact.clone();
                Ok(())
            }
            None => Err(RepositoryError::not_found(
                RepositoryOperation::Update,
                ENTITY,
                &contact.id,
            )),
        }
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.contacts
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(RepositoryOperation::Delete, ENTITY, id))
    }
}
