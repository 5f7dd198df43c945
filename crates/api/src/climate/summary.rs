use serde::{Serialize, Serializer};
use std::fmt;
use time::Date;

use crate::format_date;

/// Upper bound of a summary range as reported back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    Until(Date),
    /// No upper bound, the range runs to the latest observation
    Latest,
}

impl From<Option<Date>> for RangeEnd {
    fn from(end: Option<Date>) -> Self {
        end.map_or(RangeEnd::Latest, RangeEnd::Until)
    }
}

impl fmt::Display for RangeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeEnd::Until(date) => f.write_str(&format_date(*date)),
            RangeEnd::Latest => f.write_str("Latest"),
        }
    }
}

impl Serialize for RangeEnd {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSummary {
    pub start: Date,
    pub end: RangeEnd,
    pub min: f64,
    /// Mean rounded to 2 decimals, half-up
    pub avg: f64,
    pub max: f64,
}

impl TemperatureSummary {
    /// Returns `None` when there is nothing to summarize.
    pub fn from_temperatures(
        start: Date,
        end: RangeEnd,
        temperatures: impl IntoIterator<Item = f64>,
    ) -> Option<Self> {
        let mut count = 0_u32;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for temperature in temperatures {
            count += 1;
            sum += temperature;
            min = min.min(temperature);
            max = max.max(temperature);
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            start,
            end,
            min,
            avg: round_half_up(sum / f64::from(count), 2),
            max,
        })
    }
}

/// Round to `places` decimals, ties toward positive infinity.
///
/// The scaled value is snapped to 6 decimals first, so 70.145 (stored as
/// 70.14499999...) still counts as a tie and rounds to 70.15.
pub fn round_half_up(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    let scaled = (value * factor * 1e6).round() / 1e6;
    (scaled + 0.5).floor() / factor
}
