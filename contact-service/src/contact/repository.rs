//! Contact persistence
//!
//! [`ContactRepository`] is the storage seam. [`PgContactRepository`] maps it
//! onto the `contact` table; see [`super::memory`] for the in-process variant.
//!
//! Every method is a suspension point. Dropping the returned future (client
//! disconnect, request timeout) abandons the in-flight statement.

use async_trait::async_trait;
use sqlx::PgPool;

use super::model::Contact;
use crate::repository::{RepositoryError, RepositoryOperation, RepositoryResult};

/// Entity name used in error context
pub(crate) const ENTITY: &str = "Contact";

/// Storage operations for contacts
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Fetch one contact, or `NotFound`
    async fn get(&self, id: &str) -> RepositoryResult<Contact>;

    /// Total number of stored contacts
    async fn count(&self) -> RepositoryResult<u64>;

    /// Up to `limit` contacts ordered by id, skipping the first `offset`.
    ///
    /// A window past the end yields an empty vector.
    async fn query(&self, offset: u64, limit: u64) -> RepositoryResult<Vec<Contact>>;

    /// Insert a fully populated contact; `AlreadyExists` if the id is taken
    async fn create(&self, contact: &Contact) -> RepositoryResult<()>;

    /// Overwrite the stored contact with the same id; `NotFound` if absent
    async fn update(&self, contact: &Contact) -> RepositoryResult<()>;

    /// Remove a contact; `NotFound` if absent
    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

/// PostgreSQL-backed contact repository
#[derive(Debug, Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Clamp a `u64` into Postgres' `BIGINT` range for OFFSET/LIMIT
fn to_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn get(&self, id: &str) -> RepositoryResult<Contact> {
        sqlx::query_as::<_, Contact>(
            "SELECT id, name, created_at, updated_at FROM contact WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Get, e))?
        .ok_or_else(|| RepositoryError::not_found(RepositoryOperation::Get, ENTITY, id))
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Count, e))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn query(&self, offset: u64, limit: u64) -> RepositoryResult<Vec<Contact>> {
        sqlx::query_as::<_, Contact>(
            "SELECT id, name, created_at, updated_at FROM contact \
             ORDER BY id ASC OFFSET $1 LIMIT $2",
        )
        .bind(to_bigint(offset))
        .bind(to_bigint(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Query, e))
    }

    async fn create(&self, contact: &Contact) -> RepositoryResult<()> {
        sqlx::query(
            "INSERT INTO contact (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&contact.id)
        .bind(&contact.name)
        .bind(contact.created_at)
        .bind(contact.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_sqlx(RepositoryOperation::Create, e)
                .with_entity(ENTITY, &contact.id)
        })?;

        Ok(())
    }

    async fn update(&self, contact: &Contact) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE contact SET name = $2, updated_at = $3 WHERE id = $1")
            .bind(&contact.id)
            .bind(&contact.name)
            .bind(contact.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_sqlx(RepositoryOperation::Update, e)
                    .with_entity(ENTITY, &contact.id)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(
                RepositoryOperation::Update,
                ENTITY,
                &contact.id,
            ));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM contact WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_sqlx(RepositoryOperation::Delete, e).with_entity(ENTITY, id)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(
                RepositoryOperation::Delete,
                ENTITY,
                id,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bigint_saturates() {
        assert_eq!(to_bigint(0), 0);
        assert_eq!(to_bigint(1000), 1000);
        assert_eq!(to_bigint(u64::MAX), i64::MAX);
    }

    #[test]
    fn test_repository_is_object_safe() {
        fn assert_dyn(_: Option<std::sync::Arc<dyn ContactRepository>>) {}
        assert_dyn(None);
    }
}
