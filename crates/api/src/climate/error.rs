use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::Date;
use utoipa::ToSchema;

use super::RangeEnd;
use crate::db;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Dataset contains no observations")]
    EmptyDataset,
    #[error("Observation store unavailable: {0}")]
    StoreUnavailable(#[source] db::Error),
    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
    #[error("No temperature observations between {start} and {end}")]
    NoDataInRange { start: Date, end: RangeEnd },
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl From<db::Error> for Error {
    fn from(err: db::Error) -> Self {
        match err {
            db::Error::EmptyDataset => Error::EmptyDataset,
            other => Error::StoreUnavailable(other),
        }
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidDate { .. } => StatusCode::BAD_REQUEST,
            Error::NoDataInRange { .. } => StatusCode::NOT_FOUND,
            Error::EmptyDataset => StatusCode::INTERNAL_SERVER_ERROR,
            Error::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

/// JSON body returned for every failed request
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        } else {
            warn!("request rejected: {}", self);
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
