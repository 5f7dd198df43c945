//! Derived climate views over the observation store.
//!
//! Every "recent" view is anchored to the latest date in the dataset, never to
//! the wall clock, so results are stable for a fixed dataset.

mod error;
mod summary;

pub use error::{Error, ErrorBody};
pub use summary::{round_half_up, RangeEnd, TemperatureSummary};

use log::debug;
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};
use time::{Date, Duration};

use crate::{db::ObservationStore, parse_date};

/// Length of the trailing window behind the latest observation
pub const TRAILING_WINDOW_DAYS: i64 = 365;

/// Inclusive date window `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWindow {
    pub start: Date,
    pub end: Date,
}

impl TrailingWindow {
    pub fn ending_at(anchor: Date) -> Self {
        let start = anchor
            .checked_sub(Duration::days(TRAILING_WINDOW_DAYS))
            .unwrap_or(Date::MIN);
        Self { start, end: anchor }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureReading {
    pub date: Date,
    pub temperature: f64,
}

/// Station with the highest observation count; ties go to the smallest id.
pub fn most_active_station(counts: &BTreeMap<String, u64>) -> Option<&str> {
    counts
        .iter()
        .max_by(|(a_id, a_count), (b_id, b_count)| {
            a_count.cmp(b_count).then_with(|| b_id.cmp(a_id))
        })
        .map(|(station, _)| station.as_str())
}

pub struct ClimateService {
    store: Arc<dyn ObservationStore>,
}

impl ClimateService {
    pub fn new(store: Arc<dyn ObservationStore>) -> Self {
        Self { store }
    }

    pub async fn trailing_window(&self) -> Result<TrailingWindow, Error> {
        let anchor = self.store.max_observation_date().await?;
        Ok(TrailingWindow::ending_at(anchor))
    }

    /// Precipitation per date over the trailing window.
    ///
    /// Several stations report on the same date; rows are applied in
    /// (date, station) order, so the greatest station id wins for a date.
    pub async fn precipitation(&self) -> Result<BTreeMap<Date, Option<f64>>, Error> {
        let window = self.trailing_window().await?;
        let mut rows: Vec<_> = self
            .store
            .observations_in_range(window.start, None)
            .await?
            .into_iter()
            .filter(|row| window.contains(row.date))
            .collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.station.cmp(&b.station)));

        let mut precipitation = BTreeMap::new();
        for row in rows {
            precipitation.insert(row.date, row.precipitation);
        }
        debug!(
            "precipitation window {} to {}: {} dates",
            window.start,
            window.end,
            precipitation.len()
        );
        Ok(precipitation)
    }

    pub async fn stations(&self) -> Result<BTreeSet<String>, Error> {
        let stations = self.store.all_station_ids().await?;
        if stations.is_empty() {
            return Err(Error::EmptyDataset);
        }
        Ok(stations)
    }

    /// Temperatures of the most active station over the trailing window, oldest first
    pub async fn most_active_station_observations(
        &self,
    ) -> Result<Vec<TemperatureReading>, Error> {
        let window = self.trailing_window().await?;
        let counts = self.store.station_observation_counts().await?;
        let station = most_active_station(&counts).ok_or(Error::EmptyDataset)?;
        debug!("most active station: {} ({} observations)", station, counts[station]);

        let rows = self
            .store
            .station_observations_in_range(station, window.start, Some(window.end))
            .await?;

        let mut readings: Vec<TemperatureReading> = rows
            .into_iter()
            .filter_map(|row| {
                row.temperature.map(|temperature| TemperatureReading {
                    date: row.date,
                    temperature,
                })
            })
            .collect();
        readings.sort_by_key(|reading| reading.date);
        Ok(readings)
    }

    /// Min/avg/max temperature from `start` through `end` (or the latest observation).
    pub async fn temperature_summary(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureSummary, Error> {
        let start = parse_request_date(start)?;
        let end = end.map(parse_request_date).transpose()?;
        let range_end = RangeEnd::from(end);

        if end.is_some_and(|end| end < start) {
            debug!("inverted range {} to {}, nothing to summarize", start, range_end);
            return Err(Error::NoDataInRange {
                start,
                end: range_end,
            });
        }

        let rows = self.store.observations_in_range(start, end).await?;
        TemperatureSummary::from_temperatures(
            start,
            range_end,
            rows.into_iter().filter_map(|row| row.temperature),
        )
        .ok_or(Error::NoDataInRange {
            start,
            end: range_end,
        })
    }
}

fn parse_request_date(value: &str) -> Result<Date, Error> {
    parse_date(value).map_err(|_| Error::InvalidDate {
        value: value.to_owned(),
    })
}
