//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] errors. At the simulator boundary they are converted into
//! [`StoreError`] so the controller never sees a driver type.

use geosim_core::StoreError;
use geosim_types::EntityId;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An operation needed the pool before `connect()` succeeded.
    #[error("record store is not connected")]
    NotConnected,

    /// No employee row matched the given id.
    #[error("employee {0} not found")]
    NotFound(EntityId),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(id) => Self::NotFound(id),
            DbError::NotConnected | DbError::Config(_) => Self::Unavailable {
                message: err.to_string(),
            },
            DbError::Postgres(ref e) if is_connectivity(e) => Self::Unavailable {
                message: err.to_string(),
            },
            DbError::Postgres(_) | DbError::Migration(_) => Self::Backend {
                message: err.to_string(),
            },
        }
    }
}

const fn is_connectivity(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_the_id() {
        let id = EntityId::new();
        assert!(matches!(
            StoreError::from(DbError::NotFound(id)),
            StoreError::NotFound(found) if found == id
        ));
    }

    #[test]
    fn connectivity_failures_map_to_unavailable() {
        assert!(matches!(
            StoreError::from(DbError::NotConnected),
            StoreError::Unavailable { .. }
        ));
        assert!(matches!(
            StoreError::from(DbError::Postgres(sqlx::Error::PoolTimedOut)),
            StoreError::Unavailable { .. }
        ));
        assert!(matches!(
            StoreError::from(DbError::Config("bad url".to_owned())),
            StoreError::Unavailable { .. }
        ));
    }

    #[test]
    fn query_failures_map_to_backend() {
        let err = StoreError::from(DbError::Postgres(sqlx::Error::RowNotFound));
        assert!(matches!(
            err,
            StoreError::Backend { ref message } if message.contains("PostgreSQL error")
        ));
    }
}
