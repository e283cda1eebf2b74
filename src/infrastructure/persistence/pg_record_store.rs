//! PostgreSQL implementation of the record store.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::sync::Arc;

use crate::domain::entities::{Record, Target};
use crate::domain::repositories::{RecordStore, StoreError, StoreResult};

/// PostgreSQL store keeping one row per short code.
///
/// Targets are stored as a JSONB array, so weights keep whatever numeric form
/// they were written with and are only coerced to `f64` at selection time.
/// The table name comes from configuration and is validated as a plain SQL
/// identifier before it reaches this type (see [`crate::config::is_valid_table_name`]).
pub struct PgRecordStore {
    pool: Arc<PgPool>,
    insert_sql: String,
    select_sql: String,
}

impl PgRecordStore {
    /// Creates a new store over `table` with a database connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if `table` is not a plain SQL identifier.
    pub fn new(pool: Arc<PgPool>, table: &str) -> anyhow::Result<Self> {
        if !crate::config::is_valid_table_name(table) {
            anyhow::bail!("Invalid table name '{}'", table);
        }

        // `ON CONFLICT DO NOTHING` makes the existence check and the write one
        // statement; a taken code shows up as zero affected rows.
        let insert_sql = format!(
            "INSERT INTO {table} (short_code, targets) VALUES ($1, $2) \
             ON CONFLICT (short_code) DO NOTHING"
        );
        let select_sql = format!("SELECT short_code, targets FROM {table} WHERE short_code = $1");

        Ok(Self {
            pool,
            insert_sql,
            select_sql,
        })
    }
}

/// Maps a failed insert to a store error.
///
/// A unique violation can still surface if the table carries an additional
/// unique index the `ON CONFLICT` target does not cover.
fn map_insert_error(e: sqlx::Error, short_code: &str) -> StoreError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return StoreError::AlreadyExists(short_code.to_string());
    }

    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert_if_absent(&self, record: &Record) -> StoreResult<()> {
        let result = sqlx::query(&self.insert_sql)
            .bind(&record.short_code)
            .bind(Json(&record.targets))
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| map_insert_error(e, &record.short_code))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(record.short_code.clone()));
        }

        Ok(())
    }

    async fn get(&self, short_code: &str) -> StoreResult<Option<Record>> {
        let row = sqlx::query(&self.select_sql)
            .bind(short_code)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let code: String = row
            .try_get("short_code")
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        let Json(targets): Json<Vec<Target>> = row
            .try_get("targets")
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        Ok(Some(Record::new(code, targets)))
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
