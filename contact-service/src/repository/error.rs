//! Repository error types

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Fetching a single entity by id
    Get,
    /// Counting all entities
    Count,
    /// Reading a window of entities
    Query,
    /// Inserting a new entity
    Create,
    /// Overwriting an existing entity
    Update,
    /// Removing an entity
    Delete,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Count => write!(f, "count"),
            Self::Query => write!(f, "query"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Entity was not found
    NotFound,
    /// Entity already exists (duplicate key)
    AlreadyExists,
    /// Database constraint violation other than a duplicate key
    ConstraintViolation,
    /// Failed to reach the database
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Underlying database error
    DatabaseError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured repository error with operation context
///
/// ```rust
/// use contact_service::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
///
/// let error = RepositoryError::not_found(RepositoryOperation::Delete, "Contact", "contact_123");
/// assert_eq!(error.kind, RepositoryErrorKind::NotFound);
/// assert_eq!(
///     error.to_string(),
///     "Repository not_found error during delete: Entity not found [Contact: contact_123]"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a "not found" error with entity context
    pub fn not_found(
        operation: RepositoryOperation,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self::new(operation, RepositoryErrorKind::NotFound, "Entity not found")
            .with_entity(entity_type, entity_id)
    }

    /// Create an "already exists" error with entity context
    pub fn already_exists(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::Create,
            RepositoryErrorKind::AlreadyExists,
            "Entity already exists",
        )
        .with_entity(entity_type, entity_id)
    }

    /// Translate a `sqlx` failure raised while running `operation`
    pub fn from_sqlx(operation: RepositoryOperation, err: sqlx::Error) -> Self {
        use sqlx::Error as E;

        let kind = match &err {
            E::RowNotFound => RepositoryErrorKind::NotFound,
            E::PoolTimedOut => RepositoryErrorKind::Timeout,
            E::PoolClosed | E::Io(_) | E::Tls(_) => RepositoryErrorKind::ConnectionFailed,
            E::Database(db) if db.is_unique_violation() => RepositoryErrorKind::AlreadyExists,
            E::Database(db)
                if db.is_foreign_key_violation() || db.is_check_violation() =>
            {
                RepositoryErrorKind::ConstraintViolation
            }
            _ => RepositoryErrorKind::DatabaseError,
        };

        Self::new(operation, kind, err.to_string())
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Whether the entity simply does not exist
    pub fn is_not_found(&self) -> bool {
        self.kind == RepositoryErrorKind::NotFound
    }

    /// Check if this error is transient
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_entity() {
        let error = RepositoryError::not_found(RepositoryOperation::Get, "Contact", "contact_1");
        assert!(error.is_not_found());
        assert!(!error.is_retriable());
        assert_eq!(error.entity_type.as_deref(), Some("Contact"));
        assert_eq!(error.entity_id.as_deref(), Some("contact_1"));
        assert_eq!(
            error.to_string(),
            "Repository not_found error during get: Entity not found [Contact: contact_1]"
        );
    }

    #[test]
    fn test_display_without_entity() {
        let error = RepositoryError::new(
            RepositoryOperation::Count,
            RepositoryErrorKind::Timeout,
            "took too long",
        );
        assert!(error.is_retriable());
        assert_eq!(
            error.to_string(),
            "Repository timeout error during count: took too long"
        );
    }

    #[test]
    fn test_from_sqlx_classification() {
        let cases = [
            (sqlx::Error::RowNotFound, RepositoryErrorKind::NotFound),
            (sqlx::Error::PoolTimedOut, RepositoryErrorKind::Timeout),
            (sqlx::Error::PoolClosed, RepositoryErrorKind::ConnectionFailed),
            (
                sqlx::Error::Protocol("bad frame".into()),
                RepositoryErrorKind::DatabaseError,
            ),
        ];

        for (err, expected) in cases {
            let mapped = RepositoryError::from_sqlx(RepositoryOperation::Query, err);
            assert_eq!(mapped.kind, expected);
            assert_eq!(mapped.operation, RepositoryOperation::Query);
        }
    }

    #[test]
    fn test_already_exists_is_create() {
        let error = RepositoryError::already_exists("Contact", "contact_1");
        assert_eq!(error.operation, RepositoryOperation::Create);
        assert_eq!(error.kind, RepositoryErrorKind::AlreadyExists);
    }
}
