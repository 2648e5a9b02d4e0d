//! [`RecordStore`] implementation backed by `PostgreSQL`.

use geosim_core::{RecordStore, StoreError};
use geosim_types::{EntityId, EntityLocation, TrackedEntity};
use tokio::sync::RwLock;

use crate::employee_store::EmployeeStore;
use crate::error::DbError;
use crate::postgres::{PostgresConfig, PostgresPool};

/// Employee records in `PostgreSQL`, exposed to the simulator.
///
/// The pool is opened by [`RecordStore::connect`] and released by
/// [`RecordStore::close`]; calls made in between use it, calls made
/// outside that window fail with [`StoreError::Unavailable`].
pub struct PgRecordStore {
    config: PostgresConfig,
    pool: RwLock<Option<PostgresPool>>,
}

impl PgRecordStore {
    /// Create a disconnected store.
    pub fn new(config: PostgresConfig) -> Self {
        Self {
            config,
            pool: RwLock::new(None),
        }
    }

    async fn pool(&self) -> Result<PostgresPool, DbError> {
        self.pool.read().await.clone().ok_or(DbError::NotConnected)
    }
}

impl RecordStore for PgRecordStore {
    async fn connect(&self) -> Result<(), StoreError> {
        let mut slot = self.pool.write().await;
        if slot.is_some() {
            return Ok(());
        }
        let pool = PostgresPool::connect(&self.config).await.map_err(|e| {
            tracing::error!(error = %e, "Could not connect to PostgreSQL");
            StoreError::Unavailable {
                message: e.to_string(),
            }
        })?;
        *slot = Some(pool);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<TrackedEntity>, StoreError> {
        let pool = self.pool().await?;
        let rows = EmployeeStore::new(pool.pool()).find_all().await?;
        Ok(rows.into_iter().map(TrackedEntity::from).collect())
    }

    async fn update_location(
        &self,
        id: EntityId,
        location: &EntityLocation,
    ) -> Result<(), StoreError> {
        let pool = self.pool().await?;
        EmployeeStore::new(pool.pool())
            .update_location(id, location)
            .await?;
        Ok(())
    }

    async fn close(&self) {
        let taken = self.pool.write().await.take();
        if let Some(pool) = taken {
            pool.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use geosim_types::Coordinate;

    #[tokio::test]
    async fn calls_before_connect_are_unavailable() {
        let store = PgRecordStore::new(PostgresConfig::new("postgresql://localhost/none"));
        assert!(matches!(
            store.find_all().await,
            Err(StoreError::Unavailable { .. })
        ));
        let location = EntityLocation::new(Coordinate::new(19.0, 72.8), "Mumbai", Utc::now());
        assert!(matches!(
            store.update_location(EntityId::new(), &location).await,
            Err(StoreError::Unavailable { .. })
        ));
    }

    #[tokio::test]
    async fn close_without_connect_is_harmless() {
        let store = PgRecordStore::new(PostgresConfig::new("postgresql://localhost/none"));
        store.close().await;
        store.close().await;
    }

    #[tokio::test]
    async fn connect_with_malformed_url_is_unavailable() {
        let store = PgRecordStore::new(PostgresConfig::new("not a url"));
        assert!(matches!(
            store.connect().await,
            Err(StoreError::Unavailable { .. })
        ));
    }
}
