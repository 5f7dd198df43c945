mod sqlite;

pub use sqlite::*;

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use time::Date;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Dataset contains no observations")]
    EmptyDataset,
    #[error("Failed to query dataset: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Stored date '{value}' is not YYYY-MM-DD: {source}")]
    CorruptDate {
        value: String,
        #[source]
        source: time::error::Parse,
    },
}

/// One row of the `measurement` table
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRow {
    pub date: Date,
    pub station: String,
    pub precipitation: Option<f64>,
    pub temperature: Option<f64>,
}

/// Read-only access to station metadata and dated observations.
///
/// Every range filter is inclusive; an absent end date means no upper bound.
#[async_trait]
pub trait ObservationStore: Sync + Send {
    /// Latest observation date in the dataset, [`Error::EmptyDataset`] when there are none
    async fn max_observation_date(&self) -> Result<Date, Error>;
    async fn observations_in_range(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<Vec<ObservationRow>, Error>;
    async fn station_observations_in_range(
        &self,
        station: &str,
        start: Date,
        end: Option<Date>,
    ) -> Result<Vec<ObservationRow>, Error>;
    /// Total observations per station over the whole dataset
    async fn station_observation_counts(&self) -> Result<BTreeMap<String, u64>, Error>;
    async fn all_station_ids(&self) -> Result<BTreeSet<String>, Error>;
    async fn health_check(&self) -> Result<(), Error>;
}
