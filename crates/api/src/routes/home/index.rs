use std::sync::Arc;

use axum::{extract::State, response::Html, Json};
use futures::TryFutureExt;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{routes::with_timeout, templates::home_page, AppState, Error, ErrorBody};

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(home_page(&state.remote_url).into_string())
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct Health {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = OK, description = "Dataset is reachable", body = Health),
        (status = SERVICE_UNAVAILABLE, description = "Dataset cannot be queried", body = ErrorBody),
        (status = GATEWAY_TIMEOUT, description = "Dataset did not answer in time", body = ErrorBody)
    ))]
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<Health>, Error> {
    with_timeout(
        state.request_timeout,
        state.store.health_check().map_err(Error::from),
    )
    .await?;
    Ok(Json(Health {
        status: String::from("ok"),
    }))
}
