//! HTTP surface tests
//!
//! Drives the router in-process with tower's oneshot. Only paths that fail
//! validation before reaching an external collaborator are exercised here;
//! everything past validation is covered by the service-level tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use will_it_rain::config::{
    CacheConfig, Config, GeminiConfig, GeocodingConfig, MlConfig, ServerConfig, WeatherConfig,
};
use will_it_rain::{create_app, AppState};

fn test_app() -> axum::Router {
    let config = Config {
        environment: "test".to_string(),
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
        },
        weather: WeatherConfig {
            api_endpoint: "http://127.0.0.1:9".to_string(),
            api_key: String::new(),
        },
        gemini: GeminiConfig {
            api_endpoint: "http://127.0.0.1:9".to_string(),
            model: "gemini-pro".to_string(),
            api_key: String::new(),
        },
        ml: MlConfig {
            interpreter: "false".to_string(),
            script_path: "predict.py".to_string(),
            timeout_secs: 1,
        },
        geocoding: GeocodingConfig {
            google_api_key: String::new(),
            postal_endpoint: "http://127.0.0.1:9".to_string(),
        },
        cache: CacheConfig {
            ml_ttl_secs: 60,
            geocode_ttl_secs: 60,
        },
    };
    create_app(AppState::from_config(config))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let response = test_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}

#[tokio::test]
async fn test_root_banner() {
    let response = test_app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Will It Rain"));
}

#[tokio::test]
async fn test_weather_rejects_bad_latitude() {
    let response = test_app()
        .oneshot(
            Request::get("/api/weather?lat=91.5&lon=72.8&date=2025-07-15")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_weather_rejects_bad_date() {
    let response = test_app()
        .oneshot(
            Request::get("/api/weather?lat=19.07&lon=72.87&date=15/07/2025")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_geocode_requires_a_field() {
    let response = test_app()
        .oneshot(Request::get("/api/geocode").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations_reject_unknown_sector() {
    let body = serde_json::json!({
        "sector": "aviation",
        "location": "Mumbai, IN",
        "weatherData": {
            "location": "Mumbai, IN",
            "date": "2025-07-15",
            "verdict": "Rain",
            "probability": 0.84,
            "confidence": "high",
            "source": ["climate_forecast"],
            "reasoning": "test fixture",
            "details": {
                "hourly": [],
                "daily": {
                    "temp": {"day": 28.0, "morn": 24.0, "eve": 26.0, "night": 21.0},
                    "humidity": 85.0,
                    "wind_speed": 6.0,
                    "pressure": 1004.0,
                    "clouds": 80.0,
                    "weather": {"main": "Rain", "description": "light rain"}
                }
            }
        }
    });

    let response = test_app()
        .oneshot(
            Request::post("/api/recommendations")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("UNSUPPORTED_SECTOR"));
}
