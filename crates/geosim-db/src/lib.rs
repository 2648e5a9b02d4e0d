//! `PostgreSQL` record store for the geosim location simulator.
//!
//! # Architecture
//!
//! ```text
//! LocationSimulator
//!     |
//!     +-- RecordStore trait --> PgRecordStore
//!                                 |-- PostgresPool   (connect / migrate / close)
//!                                 +-- EmployeeStore  (employees table queries)
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`employee_store`] -- Queries over the `employees` table
//! - [`record_store`] -- [`RecordStore`](geosim_core::RecordStore) adapter
//! - [`error`] -- Shared error types

pub mod employee_store;
pub mod error;
pub mod postgres;
pub mod record_store;

pub use employee_store::{EmployeeRow, EmployeeStore};
pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use record_store::PgRecordStore;
