//! Queries over the `employees` table.
//!
//! An employee's simulated location is stored in four nullable columns
//! that are either all set or all `NULL` (enforced by a table
//! constraint). [`EmployeeRow`] converts a row into a [`TrackedEntity`].

use chrono::{DateTime, Utc};
use geosim_types::{Coordinate, EntityId, EntityLocation, TrackedEntity};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;

const SELECT_COLUMNS: &str = r"SELECT id, name, location_lat, location_lng, location_city,
                                      location_updated_at, updated_at
                               FROM employees";

/// Operations on the `employees` table.
pub struct EmployeeStore<'a> {
    pool: &'a PgPool,
}

impl<'a> EmployeeStore<'a> {
    /// Create a store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every employee, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn find_all(&self) -> Result<Vec<EmployeeRow>, DbError> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// One employee by id, if present.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn find_by_id(&self, id: EntityId) -> Result<Option<EmployeeRow>, DbError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Overwrite an employee's location and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no row has this id, or
    /// [`DbError::Postgres`] if the update fails.
    pub async fn update_location(
        &self,
        id: EntityId,
        location: &EntityLocation,
    ) -> Result<(), DbError> {
        let result = sqlx::query(
            r"UPDATE employees
              SET location_lat = $2,
                  location_lng = $3,
                  location_city = $4,
                  location_updated_at = $5,
                  updated_at = now()
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(location.lat)
        .bind(location.lng)
        .bind(&location.region)
        .bind(location.last_updated)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id));
        }
        tracing::trace!(entity_id = %id, region = location.region.as_str(), "Updated location");
        Ok(())
    }

    /// Insert an employee record, with or without a location.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert(&self, entity: &TrackedEntity) -> Result<(), DbError> {
        let location = entity.location.as_ref();
        sqlx::query(
            r"INSERT INTO employees
              (id, name, location_lat, location_lng, location_city, location_updated_at, updated_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(entity.id.into_inner())
        .bind(&entity.name)
        .bind(location.map(|l| l.lat))
        .bind(location.map(|l| l.lng))
        .bind(location.map(|l| l.region.as_str()))
        .bind(location.map(|l| l.last_updated))
        .bind(entity.updated_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Delete an employee. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete(&self, id: EntityId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// A row from the `employees` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeRow {
    /// Employee id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Simulated latitude.
    pub location_lat: Option<f64>,
    /// Simulated longitude.
    pub location_lng: Option<f64>,
    /// Region name of the simulated location.
    pub location_city: Option<String>,
    /// When the location was last written.
    pub location_updated_at: Option<DateTime<Utc>>,
    /// When the row was last modified.
    pub updated_at: DateTime<Utc>,
}

impl From<EmployeeRow> for TrackedEntity {
    fn from(row: EmployeeRow) -> Self {
        let location = match (
            row.location_lat,
            row.location_lng,
            row.location_city,
            row.location_updated_at,
        ) {
            (Some(lat), Some(lng), Some(city), Some(at)) => {
                Some(EntityLocation::new(Coordinate::new(lat, lng), city, at))
            }
            _ => None,
        };
        Self {
            id: EntityId::from(row.id),
            name: row.name,
            location,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row() -> EmployeeRow {
        EmployeeRow {
            id: Uuid::now_v7(),
            name: "Meera".to_owned(),
            location_lat: Some(12.97),
            location_lng: Some(77.59),
            location_city: Some("Bangalore".to_owned()),
            location_updated_at: Some(Utc::now()),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn complete_location_columns_become_a_location() {
        let source = row();
        let id = source.id;
        let entity = TrackedEntity::from(source);
        assert_eq!(entity.id.into_inner(), id);
        let location = entity.location.unwrap();
        assert_eq!(location.region, "Bangalore");
        assert_eq!(location.coordinate(), Coordinate::new(12.97, 77.59));
    }

    #[test]
    fn partial_location_columns_mean_no_location() {
        let mut source = row();
        source.location_city = None;
        assert!(TrackedEntity::from(source).location.is_none());

        let mut source = row();
        source.location_lat = None;
        source.location_lng = None;
        assert!(TrackedEntity::from(source).location.is_none());
    }
}
