//! Integration tests for the OpenWeatherMap client and the logging pipeline
//! against a mock HTTP server.

use reqwest::StatusCode;
use weatherlog_core::{
    AppendOutcome, CaptureError, FetchError, Location, OpenWeatherClient, WeatherLogger,
    WeatherSource,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const WEATHER_PATH: &str = "/data/2.5/weather";

fn sample_weather_response() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -6.2672, "lat": 53.344 },
        "weather": [
            { "id": 500, "main": "Rain", "description": "lluvia ligera", "icon": "10d" }
        ],
        "base": "stations",
        "main": {
            "temp": 9.87,
            "feels_like": 7.12,
            "temp_min": 8.9,
            "temp_max": 10.56,
            "pressure": 1003,
            "humidity": 91
        },
        "visibility": 9000,
        "wind": { "speed": 7.2, "deg": 210 },
        "clouds": { "all": 100 },
        "dt": 1_700_000_000,
        "sys": { "type": 2, "id": 2_037_117, "country": "IE" },
        "timezone": 0,
        "id": 2_964_574,
        "name": "Dublin",
        "cod": 200
    })
}

fn client_for(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::with_base_url("TEST_KEY".into(), format!("{}{WEATHER_PATH}", server.uri()))
}

fn dublin() -> Location {
    Location::new("Dublin").with_country("IE")
}

async fn mount(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

// ============================================================================
// fetch
// ============================================================================

#[tokio::test]
async fn fetch_sends_expected_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Dublin,IE"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "es"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_weather_response()))
        .expect(1)
        .mount(&server)
        .await;

    let raw = client_for(&server).fetch(&dublin()).await.expect("fetch succeeds");

    assert_eq!(raw.json()["name"], "Dublin");
}

#[tokio::test]
async fn fetch_city_without_country() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Dublin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_weather_response()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).fetch(&Location::new("Dublin")).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn fetch_not_found_is_http_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(404).set_body_string(r#"{"cod":"404","message":"city not found"}"#),
    )
    .await;

    let err = client_for(&server).fetch(&dublin()).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    match err {
        FetchError::Http { body, .. } => assert!(body.contains("city not found")),
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_unauthorized_is_http_error() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(401)).await;

    let err = client_for(&server).fetch(&dublin()).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn fetch_non_json_body_is_parse_error() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_string("<html>maintenance</html>")).await;

    let err = client_for(&server).fetch(&dublin()).await.unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)));
}

#[tokio::test]
async fn fetch_connection_refused_is_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        listener.local_addr().expect("local addr").port()
    };
    let client =
        OpenWeatherClient::with_base_url("TEST_KEY".into(), format!("http://127.0.0.1:{port}"));

    let err = client.fetch(&dublin()).await.unwrap_err();

    assert!(matches!(err, FetchError::Network(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn network_error_does_not_expose_api_key() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        listener.local_addr().expect("local addr").port()
    };
    let client =
        OpenWeatherClient::with_base_url("SECRET_KEY_123".into(), format!("http://127.0.0.1:{port}"));

    let err = client.fetch(&dublin()).await.unwrap_err();

    let shown = err.to_string();
    assert!(matches!(err, FetchError::Network(_)));
    assert!(!shown.contains("SECRET_KEY_123"));
    assert!(!shown.contains("appid"));
}

// ============================================================================
// pipeline
// ============================================================================

#[tokio::test]
async fn run_appends_one_row_per_call() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_json(sample_weather_response())).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("dublin_weather.csv");
    let logger = WeatherLogger::new(Box::new(client_for(&server)), &output);

    let first = logger.run(&dublin()).await.expect("first run");
    let second = logger.run(&dublin()).await.expect("second run");

    assert_eq!(first.saved, Some(AppendOutcome::Created { rows: 1 }));
    assert_eq!(second.saved, Some(AppendOutcome::Appended { rows: 1 }));
    assert_eq!(first.reading.description, "lluvia ligera");
    assert_eq!(first.reading.pressure, 1003.0);

    let contents = std::fs::read_to_string(&output).expect("read back");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("timestamp,city,country,temperature,"));
    assert!(lines[1].contains(
        ",Dublin,IE,9.87,7.12,8.9,10.56,1003.0,91.0,lluvia ligera,Rain,7.2,210.0,100.0,9000.0,53.344,-6.2672"
    ));
}

#[tokio::test]
async fn run_on_not_found_writes_nothing() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(404)).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("dublin_weather.csv");
    let logger = WeatherLogger::new(Box::new(client_for(&server)), &output);

    assert!(logger.run(&dublin()).await.is_none());
    assert!(!output.exists());
}

#[tokio::test]
async fn run_on_garbage_body_writes_nothing() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("dublin_weather.csv");
    let logger = WeatherLogger::new(Box::new(client_for(&server)), &output);

    assert!(matches!(
        logger.capture(&dublin()).await,
        Err(CaptureError::Fetch(FetchError::Parse(_)))
    ));
    assert!(logger.run(&dublin()).await.is_none());
    assert!(!output.exists());
}
