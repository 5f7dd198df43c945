use async_trait::async_trait;
use log::{debug, info};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    QueryBuilder, Sqlite,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
    time::Duration,
};
use time::Date;

use super::{Error, ObservationRow, ObservationStore};
use crate::{format_date, parse_date};

/// Observation store backed by a pool of read-only SQLite connections.
///
/// Each query checks a connection out of the pool for its own duration, so
/// concurrent requests never share a connection.
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct MeasurementRecord {
    date: String,
    station: String,
    prcp: Option<f64>,
    tobs: Option<f64>,
}

impl TryFrom<MeasurementRecord> for ObservationRow {
    type Error = Error;

    fn try_from(record: MeasurementRecord) -> Result<Self, Self::Error> {
        let date = parse_date(&record.date).map_err(|source| Error::CorruptDate {
            value: record.date.clone(),
            source,
        })?;
        Ok(ObservationRow {
            date,
            station: record.station,
            precipitation: record.prcp,
            temperature: record.tobs,
        })
    }
}

impl SqliteStore {
    pub async fn connect(path: &Path, max_connections: u32) -> Result<Self, Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        info!(
            "SQLite dataset opened read-only at: {} (max connections: {})",
            path.display(),
            max_connections
        );
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Wait for checked-out connections to return, then close them all.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("SQLite pool closed");
    }

    async fn measurements(
        &self,
        station: Option<&str>,
        start: Date,
        end: Option<Date>,
    ) -> Result<Vec<ObservationRow>, Error> {
        // Dates are stored as YYYY-MM-DD text, which sorts chronologically
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT date, station, prcp, tobs FROM measurement WHERE date >= ",
        );
        query.push_bind(format_date(start));
        if let Some(end) = end {
            query.push(" AND date <= ").push_bind(format_date(end));
        }
        if let Some(station) = station {
            query.push(" AND station = ").push_bind(station.to_owned());
        }
        query.push(" ORDER BY date, station");

        let records: Vec<MeasurementRecord> =
            query.build_query_as().fetch_all(&self.pool).await?;
        debug!(
            "measurement rows from {} to {:?} (station: {:?}): {}",
            start,
            end,
            station,
            records.len()
        );

        records.into_iter().map(ObservationRow::try_from).collect()
    }
}

#[async_trait]
impl ObservationStore for SqliteStore {
    async fn max_observation_date(&self) -> Result<Date, Error> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;

        let latest = latest.ok_or(Error::EmptyDataset)?;
        parse_date(&latest).map_err(|source| Error::CorruptDate {
            value: latest.clone(),
            source,
        })
    }

    async fn observations_in_range(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<Vec<ObservationRow>, Error> {
        self.measurements(None, start, end).await
    }

    async fn station_observations_in_range(
        &self,
        station: &str,
        start: Date,
        end: Option<Date>,
    ) -> Result<Vec<ObservationRow>, Error> {
        self.measurements(Some(station), start, end).await
    }

    async fn station_observation_counts(&self) -> Result<BTreeMap<String, u64>, Error> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT station, COUNT(*) FROM measurement GROUP BY station")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(station, count)| (station, u64::try_from(count).unwrap_or_default()))
            .collect())
    }

    async fn all_station_ids(&self) -> Result<BTreeSet<String>, Error> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT DISTINCT station FROM station")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
