//! End-to-end refresh tests: service -> adapter -> HTTP client -> mock server

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use application::{AirQualityService, AirQualityStore, ApplicationError};
use domain::LocationId;
use infrastructure::{
    DatabaseConfig, OpenWeatherAppConfig, OpenWeatherPollutionAdapter, SqliteAirQualityStore,
    create_pool,
};
use secrecy::SecretString;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn pollution_body(index: u8) -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 77.6245, "lat": 12.9352 },
        "list": [{
            "main": { "aqi": index },
            "components": {
                "co": 1200.0,
                "no2": 30.5,
                "o3": 90.0,
                "so2": 4.0,
                "pm2_5": 62.0,
                "pm10": 88.0
            },
            "dt": 1_710_000_000
        }]
    })
}

fn setup(server: &MockServer) -> (AirQualityService, Arc<SqliteAirQualityStore>) {
    let pool = Arc::new(create_pool(&DatabaseConfig::in_memory()).unwrap());
    let store = Arc::new(SqliteAirQualityStore::new(pool));

    let config = OpenWeatherAppConfig {
        base_url: server.uri(),
        api_key: Some(SecretString::from("integration-key")),
        timeout_secs: 5,
    };
    let adapter = OpenWeatherPollutionAdapter::new(config.to_client_config()).unwrap();

    let service = AirQualityService::new(store.clone()).with_pollution_source(Arc::new(adapter));
    (service, store)
}

#[tokio::test]
async fn refresh_stores_upstream_reading() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .and(query_param("appid", "integration-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pollution_body(4)))
        .expect(1)
        .mount(&server)
        .await;

    let (service, store) = setup(&server);
    let stored = service.refresh(LocationId::new(3)).await.unwrap();

    assert!((stored.aqi - 200.0).abs() < f64::EPSILON);
    assert_eq!(stored.pollutants.pm25, Some(62.0));
    assert!((stored.pollutants.co.unwrap() - 1.2).abs() < 1e-9);

    let latest = store.latest_reading(LocationId::new(3)).await.unwrap().unwrap();
    assert_eq!(latest.id, stored.id);
}

#[tokio::test]
async fn upstream_outage_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (service, store) = setup(&server);
    let err = service.refresh(LocationId::new(1)).await.unwrap_err();

    assert!(matches!(err, ApplicationError::ExternalService(_)));
    assert!(store.latest_reading(LocationId::new(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn rejected_key_is_a_configuration_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (service, _) = setup(&server);
    let err = service.refresh(LocationId::new(1)).await.unwrap_err();
    assert!(matches!(err, ApplicationError::Configuration(_)));
}

#[tokio::test]
async fn refresh_of_unknown_location_skips_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pollution_body(1)))
        .expect(0)
        .mount(&server)
        .await;

    let (service, _) = setup(&server);
    let err = service.refresh(LocationId::new(42)).await.unwrap_err();
    assert!(err.is_not_found());
}
