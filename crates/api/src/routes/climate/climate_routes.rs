use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::Uri,
    Json,
};
use log::debug;
use serde::Serialize;
use std::{collections::BTreeMap, sync::Arc};
use utoipa::ToSchema;

use crate::{
    format_date, routes::with_timeout, AppState, Error, ErrorBody, RangeEnd, TemperatureSummary,
};

const API_PREFIX: &str = "/api/v1.0/";

/// Min/avg/max temperature over a date range, keyed the way API clients expect
#[derive(Serialize, Debug, ToSchema)]
pub struct TemperatureSummaryResponse {
    #[serde(rename = "Start Date")]
    pub start_date: String,
    /// Literal end date, or "Latest" for an open-ended range
    #[serde(rename = "End Date")]
    #[schema(value_type = String)]
    pub end_date: RangeEnd,
    #[serde(rename = "TMIN")]
    pub tmin: f64,
    #[serde(rename = "TAVG")]
    pub tavg: f64,
    #[serde(rename = "TMAX")]
    pub tmax: f64,
}

impl From<TemperatureSummary> for TemperatureSummaryResponse {
    fn from(summary: TemperatureSummary) -> Self {
        Self {
            start_date: format_date(summary.start),
            end_date: summary.end,
            tmin: summary.min,
            tavg: summary.avg,
            tmax: summary.max,
        }
    }
}

/// Date segments that cannot even be decoded (e.g. invalid UTF-8) are reported
/// like any other malformed date, with the raw segment echoed back.
fn invalid_date_segment(uri: &Uri, rejection: PathRejection) -> Error {
    debug!("rejected date segment in {}: {}", uri.path(), rejection.body_text());
    let path = uri.path();
    Error::InvalidDate {
        value: path.strip_prefix(API_PREFIX).unwrap_or(path).to_owned(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation per date for the 365 days up to the latest observation", body = BTreeMap<String, Option<f64>>),
        (status = INTERNAL_SERVER_ERROR, description = "Dataset has no observations", body = ErrorBody),
        (status = SERVICE_UNAVAILABLE, description = "Dataset cannot be queried", body = ErrorBody)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Option<f64>>>, Error> {
    let precipitation = with_timeout(state.request_timeout, state.climate.precipitation()).await?;

    Ok(Json(
        precipitation
            .into_iter()
            .map(|(date, amount)| (format_date(date), amount))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every station identifier, sorted", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Dataset has no stations", body = ErrorBody),
        (status = SERVICE_UNAVAILABLE, description = "Dataset cannot be queried", body = ErrorBody)
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, Error> {
    let stations = with_timeout(state.request_timeout, state.climate.stations()).await?;
    Ok(Json(stations.into_iter().collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Single-entry {date: temperature} objects for the most active station, oldest first", body = Vec<BTreeMap<String, f64>>),
        (status = INTERNAL_SERVER_ERROR, description = "Dataset has no observations", body = ErrorBody),
        (status = SERVICE_UNAVAILABLE, description = "Dataset cannot be queried", body = ErrorBody)
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BTreeMap<String, f64>>>, Error> {
    let readings = with_timeout(
        state.request_timeout,
        state.climate.most_active_station_observations(),
    )
    .await?;

    Ok(Json(
        readings
            .into_iter()
            .map(|reading| BTreeMap::from([(format_date(reading.date), reading.temperature)]))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "First day of the range, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Temperature summary from start to the latest observation", body = TemperatureSummaryResponse),
        (status = BAD_REQUEST, description = "Start is not a YYYY-MM-DD date", body = ErrorBody),
        (status = NOT_FOUND, description = "No observations in range", body = ErrorBody),
        (status = SERVICE_UNAVAILABLE, description = "Dataset cannot be queried", body = ErrorBody)
    ))]
pub async fn temperature_summary_from(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    start: Result<Path<String>, PathRejection>,
) -> Result<Json<TemperatureSummaryResponse>, Error> {
    let Path(start) = start.map_err(|rejection| invalid_date_segment(&uri, rejection))?;
    let summary = with_timeout(
        state.request_timeout,
        state.climate.temperature_summary(&start, None),
    )
    .await?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "First day of the range, YYYY-MM-DD"),
        ("end" = String, Path, description = "Last day of the range, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Temperature summary between both dates, inclusive", body = TemperatureSummaryResponse),
        (status = BAD_REQUEST, description = "Start or end is not a YYYY-MM-DD date", body = ErrorBody),
        (status = NOT_FOUND, description = "No observations in range", body = ErrorBody),
        (status = SERVICE_UNAVAILABLE, description = "Dataset cannot be queried", body = ErrorBody)
    ))]
pub async fn temperature_summary_between(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    range: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<TemperatureSummaryResponse>, Error> {
    let Path((start, end)) = range.map_err(|rejection| invalid_date_segment(&uri, rejection))?;
    let summary = with_timeout(
        state.request_timeout,
        state.climate.temperature_summary(&start, Some(&end)),
    )
    .await?;
    Ok(Json(summary.into()))
}
