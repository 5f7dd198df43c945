use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use climate_api::{app, build_app_state, db, ObservationRow, ObservationStore};
use hyper::Method;
use mockall::mock;
use serde_json::Value;
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
    time::Duration,
};
use time::{macros::date, Date};
use tower::ServiceExt;

mock! {
    pub ObservationStore {}
    #[async_trait]
    impl ObservationStore for ObservationStore {
        async fn max_observation_date(&self) -> Result<Date, db::Error>;
        async fn observations_in_range(
            &self,
            start: Date,
            end: Option<Date>,
        ) -> Result<Vec<ObservationRow>, db::Error>;
        async fn station_observations_in_range(
            &self,
            station: &str,
            start: Date,
            end: Option<Date>,
        ) -> Result<Vec<ObservationRow>, db::Error>;
        async fn station_observation_counts(&self) -> Result<BTreeMap<String, u64>, db::Error>;
        async fn all_station_ids(&self) -> Result<BTreeSet<String>, db::Error>;
        async fn health_check(&self) -> Result<(), db::Error>;
    }
}

/// Store whose every call outlives any test deadline
pub struct SlowStore;

impl SlowStore {
    async fn stall() {
        tokio::time::sleep(Duration::from_secs(60)).await;
    }
}

#[async_trait]
impl ObservationStore for SlowStore {
    async fn max_observation_date(&self) -> Result<Date, db::Error> {
        Self::stall().await;
        Ok(date!(2017 - 08 - 23))
    }

    async fn observations_in_range(
        &self,
        _start: Date,
        _end: Option<Date>,
    ) -> Result<Vec<ObservationRow>, db::Error> {
        Self::stall().await;
        Ok(vec![])
    }

    async fn station_observations_in_range(
        &self,
        _station: &str,
        _start: Date,
        _end: Option<Date>,
    ) -> Result<Vec<ObservationRow>, db::Error> {
        Self::stall().await;
        Ok(vec![])
    }

    async fn station_observation_counts(&self) -> Result<BTreeMap<String, u64>, db::Error> {
        Self::stall().await;
        Ok(BTreeMap::new())
    }

    async fn all_station_ids(&self) -> Result<BTreeSet<String>, db::Error> {
        Self::stall().await;
        Ok(BTreeSet::new())
    }

    async fn health_check(&self) -> Result<(), db::Error> {
        Self::stall().await;
        Ok(())
    }
}

pub struct TestApp {
    pub app: Router,
}

pub async fn spawn_app(store: Arc<dyn ObservationStore>) -> TestApp {
    spawn_app_with_timeout(store, Duration::from_secs(5)).await
}

pub async fn spawn_app_with_timeout(
    store: Arc<dyn ObservationStore>,
    request_timeout: Duration,
) -> TestApp {
    let app_state = build_app_state(store, String::from("http://127.0.0.1:5000"), request_timeout);
    TestApp { app: app(app_state) }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        let json = serde_json::from_slice(&body).expect("Response body is not JSON");
        (status, json)
    }
}

pub fn observation(
    station: &str,
    date: Date,
    precipitation: Option<f64>,
    temperature: f64,
) -> ObservationRow {
    ObservationRow {
        date,
        station: station.to_owned(),
        precipitation,
        temperature: Some(temperature),
    }
}
