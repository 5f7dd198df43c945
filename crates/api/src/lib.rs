pub mod climate;
pub mod db;
pub mod routes;
pub mod startup;
pub mod templates;
pub mod utils;

pub use climate::{
    most_active_station, ClimateService, Error, ErrorBody, RangeEnd, TemperatureReading,
    TemperatureSummary, TrailingWindow, TRAILING_WINDOW_DAYS,
};
pub use db::{ObservationRow, ObservationStore, SqliteStore};
pub use routes::*;
pub use startup::*;
pub use utils::*;
