use crate::db::models::{Device, DeviceStatus};
use crate::db::schema::{SEED_DEVICES, SQLITE_INIT};
use crate::error::TrackerError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Open a pool for `database_url`, creating the database file when absent.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, TrackerError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connect_opts)
        .await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct DevicesStorage {
    pool: SqlitePool,
}

impl DevicesStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), TrackerError> {
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert the seed list when the table is empty. Returns the number of rows inserted.
    pub async fn seed_if_empty(&self) -> Result<u64, TrackerError> {
        let mut tx = self.pool.begin().await?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM devices")
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            tx.commit().await?;
            return Ok(0);
        }

        let mut inserted = 0;
        for name in SEED_DEVICES {
            inserted += sqlx::query("INSERT OR IGNORE INTO devices (name, status) VALUES (?, ?)")
                .bind(name)
                .bind(DeviceStatus::Available.as_str())
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    #[cfg(test)]
    pub(crate) async fn count(&self) -> Result<i64, TrackerError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM devices")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn list_all(&self) -> Result<Vec<Device>, TrackerError> {
        let rows = sqlx::query(
            r#"SELECT id, name, borrower, checked_out_date, status
               FROM devices ORDER BY name COLLATE NOCASE ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    #[cfg(test)]
    pub(crate) async fn get_by_name(&self, name: &str) -> Result<Option<Device>, TrackerError> {
        let row = sqlx::query(
            r#"SELECT id, name, borrower, checked_out_date, status
               FROM devices WHERE name = ?"#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Mark `name` as checked out to `borrower` at `at`, whatever its current status.
    /// Returns the number of rows affected (0 when no device has that name).
    pub async fn checkout(
        &self,
        name: &str,
        borrower: &str,
        at: DateTime<Utc>,
    ) -> Result<u64, TrackerError> {
        let result = sqlx::query(
            r#"UPDATE devices SET
                borrower = ?,
                checked_out_date = ?,
                status = ?
              WHERE name = ?"#,
        )
        .bind(borrower)
        .bind(at.to_rfc3339())
        .bind(DeviceStatus::CheckedOut.as_str())
        .bind(name)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Clear the borrower of `name`. Returns the number of rows affected.
    pub async fn checkin(&self, name: &str) -> Result<u64, TrackerError> {
        let result = sqlx::query(
            r#"UPDATE devices SET
                borrower = NULL,
                checked_out_date = NULL,
                status = ?
              WHERE name = ?"#,
        )
        .bind(DeviceStatus::Available.as_str())
        .bind(name)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    fn row_to_model(row: SqliteRow) -> Result<Device, TrackerError> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let borrower: Option<String> = row.try_get("borrower")?;
        let date_str: Option<String> = row.try_get("checked_out_date")?;
        let status_str: String = row.try_get("status")?;

        let checked_out_date = date_str
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| sqlx::Error::Decode(Box::new(e)))
            })
            .transpose()?;
        let status =
            DeviceStatus::from_str(&status_str).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Device {
            id,
            name,
            borrower,
            checked_out_date,
            status,
        })
    }
}
