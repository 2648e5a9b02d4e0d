//! Record store contract consumed by the simulator.
//!
//! The simulator never owns entity records. It reads them through
//! [`RecordStore::find_all`] and writes back only the embedded location
//! through [`RecordStore::update_location`]. Connection lifecycle is
//! explicit: [`connect`] is called once when the simulator starts and
//! [`close`] once when it stops.
//!
//! Writes are last-write-wins. A concurrent writer that changes an
//! entity's location between the read and the write of the same pass
//! loses its change; the simulation accepts that race.
//!
//! [`connect`]: RecordStore::connect
//! [`close`]: RecordStore::close

use std::future::Future;

use geosim_types::{EntityId, EntityLocation, TrackedEntity};

/// Errors surfaced by a record store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The store cannot be reached or is not connected.
    #[error("record store unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// No record has the given identity.
    #[error("entity {0} not found")]
    NotFound(EntityId),

    /// The call did not complete within the per-call timeout.
    #[error("record store call timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// Any other backend failure.
    #[error("record store error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

/// Access to tracked entity records.
///
/// Futures must be `Send` because passes run on a spawned tokio task.
pub trait RecordStore: Send + Sync + 'static {
    /// Establish the connection used for the rest of the run.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store cannot be reached.
    fn connect(&self) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Load every tracked entity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the enumeration fails.
    fn find_all(&self) -> impl Future<Output = Result<Vec<TrackedEntity>, StoreError>> + Send;

    /// Replace the embedded location of one entity.
    ///
    /// Implementations also refresh the record's last-modified stamp.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record matches `id`, or
    /// another [`StoreError`] if the write fails.
    fn update_location(
        &self,
        id: EntityId,
        location: &EntityLocation,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Release the connection. Must be safe to call when not connected.
    fn close(&self) -> impl Future<Output = ()> + Send;
}
