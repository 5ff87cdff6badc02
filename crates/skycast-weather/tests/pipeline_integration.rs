//! Integration tests for the geocode → forecast pipeline using wiremock.

use std::time::Duration;

use skycast_weather::{
    describe, FetchOptions, ForecastProvider, Geocoder, HttpClient, Location, RetryConfig,
    TransportError, WeatherError, WeatherPipeline,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http() -> HttpClient {
    HttpClient::new(Duration::from_secs(5), RetryConfig::new(2, 10, 50)).unwrap()
}

fn http_without_retry() -> HttpClient {
    HttpClient::new(Duration::from_secs(5), RetryConfig::disabled()).unwrap()
}

fn geo_result(name: &str, lat: f64, lon: f64, country: Option<&str>) -> serde_json::Value {
    let mut value = serde_json::json!({
        "id": 1,
        "name": name,
        "latitude": lat,
        "longitude": lon,
        "timezone": "America/Chicago",
    });
    if let Some(country) = country {
        value["country"] = serde_json::Value::String(country.to_string());
    }
    value
}

fn forecast_body(hour_count: usize, temperature: f64, code: i32) -> serde_json::Value {
    let times: Vec<String> = (0..hour_count)
        .map(|i| format!("2026-10-{:02}T{:02}:00", 18 + i / 24, i % 24))
        .collect();
    let temps: Vec<f64> = (0..hour_count).map(|i| i as f64 * 0.5).collect();

    serde_json::json!({
        "latitude": 41.85,
        "longitude": -87.65,
        "timezone": "America/Chicago",
        "current_weather": {
            "temperature": temperature,
            "weathercode": code,
            "windspeed": 14.0,
            "winddirection": 200.0,
            "time": "2026-10-18T09:00"
        },
        "hourly": {
            "time": times,
            "temperature_2m": temps,
            "weathercode": vec![code; hour_count],
        },
        "daily": {
            "time": ["2026-10-18", "2026-10-19"],
            "temperature_2m_max": [9.0, 11.5],
            "temperature_2m_min": [1.0, 2.5],
            "weathercode": [3, 61],
        }
    })
}

async fn mount_chicago(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Chicago"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [geo_result("Chicago", 41.85, -87.65, Some("United States"))]
        })))
        .mount(server)
        .await;
}

fn pipeline(server: &MockServer, options: FetchOptions) -> WeatherPipeline {
    let http = http();
    WeatherPipeline::new(
        Geocoder::new(http.clone()).with_base_url(server.uri()),
        ForecastProvider::new(http).with_base_url(server.uri()),
        options,
    )
}

#[tokio::test]
async fn test_resolve_first_result_wins() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                geo_result("Springfield", 39.80, -89.64, Some("United States")),
                geo_result("Springfield", 37.21, -93.29, Some("United States")),
                geo_result("Springfield", 42.10, -72.59, Some("United States")),
            ]
        })))
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(http())
        .with_base_url(server.uri())
        .with_max_candidates(None);
    let location = geocoder.resolve("Springfield").await.unwrap();

    assert_eq!(location.latitude, 39.80);
    assert_eq!(location.longitude, -89.64);
    assert_eq!(location.resolved_name, "Springfield");
    assert_eq!(location.query, "Springfield");
}

#[tokio::test]
async fn test_resolve_sends_trimmed_name_and_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "New York"))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [geo_result("New York", 40.71, -74.01, Some("United States"))]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(http()).with_base_url(server.uri());
    let location = geocoder.resolve("  New York ").await.unwrap();

    assert_eq!(location.query, "New York");
    assert_eq!(location.display_name(), "New York, United States");
}

#[tokio::test]
async fn test_resolve_empty_query_issues_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(http()).with_base_url(server.uri());

    assert!(matches!(geocoder.resolve("").await, Err(WeatherError::EmptyQuery)));
    assert!(matches!(geocoder.resolve("   ").await, Err(WeatherError::EmptyQuery)));
}

#[tokio::test]
async fn test_resolve_zero_results_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": []
        })))
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(http()).with_base_url(server.uri());
    let result = geocoder.resolve("Atlantis").await;

    match result {
        Err(WeatherError::NotFound(query)) => assert_eq!(query, "Atlantis"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_resolve_missing_results_key_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generationtime_ms": 0.4
        })))
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(http()).with_base_url(server.uri());
    let result = geocoder.resolve("Xyzzyville").await;

    assert!(matches!(result, Err(WeatherError::NotFound(_))));
}

#[tokio::test]
async fn test_resolve_missing_country_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [geo_result("Null Island", 0.0, 0.0, None)]
        })))
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(http()).with_base_url(server.uri());
    let location = geocoder.resolve("Null Island").await.unwrap();

    assert_eq!(location.country, "");
    assert_eq!(location.display_name(), "Null Island");
}

#[tokio::test]
async fn test_resolve_server_error_is_transport_not_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(http_without_retry()).with_base_url(server.uri());
    let result = geocoder.resolve("Chicago").await;

    assert!(matches!(
        result,
        Err(WeatherError::Transport(TransportError::Status { status: 500 }))
    ));
}

#[tokio::test]
async fn test_resolve_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(http()).with_base_url(server.uri());
    let result = geocoder.resolve("Chicago").await;

    assert!(matches!(result, Err(WeatherError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_retry_on_server_error() {
    let server = MockServer::start().await;

    // First two calls fail, the third succeeds
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_chicago(&server).await;

    let geocoder = Geocoder::new(http()).with_base_url(server.uri());
    let location = geocoder.resolve("Chicago").await.unwrap();

    assert_eq!(location.resolved_name, "Chicago");
}

#[tokio::test]
async fn test_no_retry_on_client_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Latitude must be in range of -90 to 90°."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ForecastProvider::new(http()).with_base_url(server.uri());
    let loc = Location {
        query: "Chicago".to_string(),
        latitude: 41.85,
        longitude: -87.65,
        resolved_name: "Chicago".to_string(),
        country: "United States".to_string(),
        admin1: None,
        timezone: None,
    };
    let result = provider.fetch(&loc, &FetchOptions::default()).await;

    assert!(matches!(
        result,
        Err(WeatherError::Transport(TransportError::Status { status: 400 }))
    ));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let http = HttpClient::new(Duration::from_millis(200), RetryConfig::disabled()).unwrap();
    let geocoder = Geocoder::new(http).with_base_url(server.uri());
    let result = geocoder.resolve("Chicago").await;

    assert!(matches!(
        result,
        Err(WeatherError::Transport(TransportError::Timeout))
    ));
}

#[tokio::test]
async fn test_fetch_truncates_hourly_to_horizon() {
    let server = MockServer::start().await;
    mount_chicago(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current_weather", "true"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(48, 5.0, 3)))
        .mount(&server)
        .await;

    let report = pipeline(&server, FetchOptions::default().with_hourly_horizon(24))
        .lookup("Chicago")
        .await
        .unwrap();

    assert_eq!(report.forecast.hourly.len(), 24);
    assert_eq!(report.forecast.hourly[0].timestamp, "2026-10-18T00:00");
    assert_eq!(report.forecast.hourly[23].timestamp, "2026-10-18T23:00");
    assert_eq!(report.forecast.hourly[23].temperature_celsius, 11.5);
    assert_eq!(report.forecast.daily.len(), 2);
    assert_eq!(report.forecast.daily[1].weather_code, 61);
}

#[tokio::test]
async fn test_fetch_missing_hourly_is_malformed() {
    let server = MockServer::start().await;
    mount_chicago(&server).await;

    let mut body = forecast_body(24, 5.0, 3);
    body.as_object_mut().unwrap().remove("hourly");

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let result = pipeline(&server, FetchOptions::default()).lookup("Chicago").await;

    assert!(matches!(result, Err(WeatherError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_not_found_skips_forecast_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(24, 5.0, 3)))
        .expect(0)
        .mount(&server)
        .await;

    let result = pipeline(&server, FetchOptions::default()).lookup("Nowhere").await;

    assert!(matches!(result, Err(WeatherError::NotFound(_))));
}

#[tokio::test]
async fn test_end_to_end_chicago() {
    let server = MockServer::start().await;
    mount_chicago(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "41.85"))
        .and(query_param("longitude", "-87.65"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(24, 5.0, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let report = pipeline(&server, FetchOptions::default())
        .lookup("Chicago")
        .await
        .unwrap();

    assert_eq!(report.location.resolved_name, "Chicago");
    assert_eq!(report.location.country, "United States");
    assert_eq!(report.forecast.current.temperature_celsius, 5.0);
    assert_eq!(describe(report.forecast.current.weather_code), "Overcast");
}

#[tokio::test]
async fn test_details_requested_when_enabled() {
    let server = MockServer::start().await;
    mount_chicago(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param(
            "hourly",
            "temperature_2m,weathercode,relative_humidity_2m,windspeed_10m",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(6, 5.0, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let options = FetchOptions::default()
        .with_daily(false)
        .with_wind_and_humidity(true);
    let report = pipeline(&server, options).lookup("Chicago").await.unwrap();

    assert!(report.forecast.daily.is_empty());
    assert_eq!(report.forecast.hourly.len(), 6);
}
