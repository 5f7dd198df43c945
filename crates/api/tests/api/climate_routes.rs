use crate::helpers::{
    observation, spawn_app, spawn_app_with_timeout, MockObservationStore, SlowStore,
};
use axum::http::StatusCode;
use climate_api::{db, ObservationRow};
use mockall::predicate::eq;
use serde_json::json;
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use time::macros::date;

fn latest_date_store() -> MockObservationStore {
    let mut store = MockObservationStore::new();
    store
        .expect_max_observation_date()
        .returning(|| Ok(date!(2017 - 08 - 23)));
    store
}

#[tokio::test]
async fn precipitation_returns_date_keyed_object() {
    let mut store = latest_date_store();
    store
        .expect_observations_in_range()
        .with(eq(date!(2016 - 08 - 23)), eq(None))
        .times(1)
        .returning(|_, _| {
            Ok(vec![
                observation("USC00519397", date!(2016 - 08 - 23), Some(0.0), 81.0),
                observation("USC00519397", date!(2016 - 08 - 24), Some(0.08), 79.0),
                observation("USC00519397", date!(2017 - 08 - 23), None, 81.0),
            ])
        });

    let test_app = spawn_app(Arc::new(store)).await;
    let (status, body) = test_app.get_json("/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "2016-08-23": 0.0,
            "2016-08-24": 0.08,
            "2017-08-23": null,
        })
    );
}

#[tokio::test]
async fn stations_returns_identifier_array() {
    let mut store = MockObservationStore::new();
    store.expect_all_station_ids().times(1).returning(|| {
        Ok(["USC00519397", "USC00513117", "USC00514830"]
            .into_iter()
            .map(String::from)
            .collect())
    });

    let test_app = spawn_app(Arc::new(store)).await;
    let (status, body) = test_app.get_json("/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["USC00513117", "USC00514830", "USC00519397"]));
}

#[tokio::test]
async fn tobs_returns_most_active_station_series() {
    let mut store = latest_date_store();
    store.expect_station_observation_counts().returning(|| {
        Ok(BTreeMap::from([
            ("USC00519281".to_string(), 2772),
            ("USC00519397".to_string(), 2724),
        ]))
    });
    store
        .expect_station_observations_in_range()
        .withf(|station, start, end| {
            station == "USC00519281"
                && *start == date!(2016 - 08 - 23)
                && *end == Some(date!(2017 - 08 - 23))
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(vec![
                observation("USC00519281", date!(2017 - 08 - 18), Some(0.06), 79.0),
                observation("USC00519281", date!(2016 - 08 - 23), Some(1.79), 77.0),
            ])
        });

    let test_app = spawn_app(Arc::new(store)).await;
    let (status, body) = test_app.get_json("/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"2016-08-23": 77.0},
            {"2017-08-18": 79.0},
        ])
    );
}

#[tokio::test]
async fn start_only_summary_reports_latest_end() {
    let mut store = MockObservationStore::new();
    store
        .expect_observations_in_range()
        .with(eq(date!(2017 - 08 - 01)), eq(None))
        .times(1)
        .returning(|_, _| {
            Ok(vec![
                observation("USC00519397", date!(2017 - 08 - 01), None, 72.0),
                observation("USC00519397", date!(2017 - 08 - 23), None, 87.0),
                observation("USC00514830", date!(2017 - 08 - 23), None, 81.0),
            ])
        });

    let test_app = spawn_app(Arc::new(store)).await;
    let (status, body) = test_app.get_json("/api/v1.0/2017-08-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "Start Date": "2017-08-01",
            "End Date": "Latest",
            "TMIN": 72.0,
            "TAVG": 80.0,
            "TMAX": 87.0,
        })
    );
}

#[tokio::test]
async fn start_end_summary_reports_both_dates() {
    let mut store = MockObservationStore::new();
    store
        .expect_observations_in_range()
        .with(eq(date!(2017 - 01 - 01)), eq(Some(date!(2017 - 01 - 31))))
        .times(1)
        .returning(|_, _| {
            Ok(vec![
                observation("USC00519397", date!(2017 - 01 - 02), None, 60.0),
                observation("USC00519397", date!(2017 - 01 - 15), None, 70.0),
                observation("USC00519397", date!(2017 - 01 - 31), None, 80.0),
            ])
        });

    let test_app = spawn_app(Arc::new(store)).await;
    let (status, body) = test_app.get_json("/api/v1.0/2017-01-01/2017-01-31").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "Start Date": "2017-01-01",
            "End Date": "2017-01-31",
            "TMIN": 60.0,
            "TAVG": 70.0,
            "TMAX": 80.0,
        })
    );
}

#[tokio::test]
async fn malformed_start_date_is_bad_request() {
    let test_app = spawn_app(Arc::new(MockObservationStore::new())).await;
    let (status, body) = test_app.get_json("/api/v1.0/not-a-date").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Invalid date 'not-a-date', expected YYYY-MM-DD"})
    );
}

#[tokio::test]
async fn undecodable_date_segment_is_bad_request() {
    let test_app = spawn_app(Arc::new(MockObservationStore::new())).await;

    let (status, body) = test_app.get_json("/api/v1.0/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Invalid date '%FF', expected YYYY-MM-DD"})
    );

    let (status, body) = test_app.get_json("/api/v1.0/2017-01-01/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid date"));
}

#[tokio::test]
async fn inverted_range_is_not_found() {
    let test_app = spawn_app(Arc::new(MockObservationStore::new())).await;
    let (status, body) = test_app.get_json("/api/v1.0/2017-08-23/2017-01-01").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": "No temperature observations between 2017-08-23 and 2017-01-01"})
    );
}

#[tokio::test]
async fn empty_dataset_maps_to_server_errors() {
    let mut store = MockObservationStore::new();
    store
        .expect_max_observation_date()
        .returning(|| Err(db::Error::EmptyDataset));
    store
        .expect_all_station_ids()
        .returning(|| Ok(Default::default()));
    store
        .expect_observations_in_range()
        .returning(|_, _| Ok(Vec::<ObservationRow>::new()));

    let test_app = spawn_app(Arc::new(store)).await;

    for uri in ["/api/v1.0/precipitation", "/api/v1.0/stations", "/api/v1.0/tobs"] {
        let (status, body) = test_app.get_json(uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert_eq!(body, json!({"error": "Dataset contains no observations"}));
    }

    let (status, _) = test_app.get_json("/api/v1.0/2010-01-01").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_failure_is_service_unavailable() {
    let mut store = MockObservationStore::new();
    store
        .expect_all_station_ids()
        .returning(|| Err(db::Error::Query(sqlx::Error::PoolClosed)));

    let test_app = spawn_app(Arc::new(store)).await;
    let (status, body) = test_app.get_json("/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Observation store unavailable"));
}

#[tokio::test]
async fn slow_store_times_out() {
    let test_app = spawn_app_with_timeout(Arc::new(SlowStore), Duration::from_millis(10)).await;
    let (status, body) = test_app.get_json("/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body, json!({"error": "Request timed out after 10ms"}));
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let mut store = latest_date_store();
    store.expect_observations_in_range().times(2).returning(|_, _| {
        Ok(vec![
            observation("USC00519523", date!(2017 - 08 - 23), Some(0.0), 82.0),
            observation("USC00516128", date!(2017 - 08 - 23), Some(0.45), 76.0),
        ])
    });

    let test_app = spawn_app(Arc::new(store)).await;
    let first = test_app.get_json("/api/v1.0/precipitation").await;
    let second = test_app.get_json("/api/v1.0/precipitation").await;

    assert_eq!(first, second);
    assert_eq!(first.1, json!({"2017-08-23": 0.0}));
}
