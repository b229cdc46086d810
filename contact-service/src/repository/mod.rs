//! Persistence error model shared by every repository implementation
//!
//! Repositories report failures as a [`RepositoryError`]: which operation was
//! running, what kind of failure it was, and which entity it concerned. The
//! HTTP layer decides what status code that becomes.

mod error;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};

/// Result alias for repository calls
pub type RepositoryResult<T> = Result<T, RepositoryError>;
