//! HTTP server for the gateway endpoints
//!
//! Provides /weather/location, /weather/current and /weather/forecast. Every
//! other path or method gets the JSON "Route not found" reply, unless a static
//! asset directory is configured and holds a matching file.

use axum::{
    Router,
    extract::{Query, State},
    handler::HandlerWithoutStateExt,
    response::Json,
    routing::get,
};
use serde_json::Value;
use std::{collections::HashMap, net::SocketAddr, path::Path, sync::Arc};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};
use weather_core::{GeocodingProvider, Location, ProviderId, WeatherProvider};

use crate::error::{ApiError, EnvelopeKey, GatewayError};

/// Shared state for the HTTP server
pub struct ServerState {
    pub geocoder: Box<dyn GeocodingProvider>,
    pub weather: Box<dyn WeatherProvider>,
}

impl ServerState {
    pub fn new(geocoder: Box<dyn GeocodingProvider>, weather: Box<dyn WeatherProvider>) -> Self {
        Self { geocoder, weather }
    }
}

pub type SharedState = Arc<ServerState>;

type Params = HashMap<String, String>;

/// Create the HTTP router
pub fn create_router(state: SharedState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/weather/location", get(location).fallback(route_not_found))
        .route("/weather/current", get(current).fallback(route_not_found))
        .route("/weather/forecast", get(forecast).fallback(route_not_found));

    let router = match static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir)
                .call_fallback_on_method_not_allowed(true)
                .not_found_service(route_not_found.into_service()),
        ),
        None => router.fallback(route_not_found),
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server; returns once Ctrl-C is received.
pub async fn start_server(
    state: SharedState,
    port: u16,
    static_dir: Option<&Path>,
) -> std::io::Result<()> {
    let router = create_router(state, static_dir);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server running at http://localhost:{}", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}

fn required<'a>(
    params: &'a Params,
    name: &str,
    missing: &'static str,
) -> Result<&'a str, GatewayError> {
    params
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or(GatewayError::BadRequest(missing))
}

fn coordinate(
    params: &Params,
    name: &str,
    missing: &'static str,
    invalid: &'static str,
) -> Result<f64, GatewayError> {
    required(params, name, missing)?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(GatewayError::BadRequest(invalid))
}

fn coordinates(params: &Params) -> Result<Location, GatewayError> {
    Ok(Location {
        latitude: coordinate(params, "lat", "Latitude is required", "Latitude must be a number")?,
        longitude: coordinate(params, "lon", "Longitude is required", "Longitude must be a number")?,
    })
}

/// Geocode a city name
async fn location(
    State(state): State<SharedState>,
    Query(params): Query<Params>,
) -> Result<Json<Value>, ApiError> {
    let city = required(&params, "city", "City name required")
        .map_err(|e| e.with_key(EnvelopeKey::Message))?;

    state.geocoder.geocode(city).await.map(Json).map_err(|e| {
        warn!(provider = %ProviderId::OpenCage, error = %format!("{e:#}"), "Location lookup failed");
        GatewayError::Upstream("Error fetching location data").with_key(EnvelopeKey::Message)
    })
}

/// Current conditions at a coordinate
async fn current(
    State(state): State<SharedState>,
    Query(params): Query<Params>,
) -> Result<Json<Value>, ApiError> {
    let location = coordinates(&params)?;

    state.weather.current(location).await.map(Json).map_err(|e| {
        warn!(provider = %ProviderId::OpenWeather, error = %format!("{e:#}"), "Current weather lookup failed");
        GatewayError::Upstream("Error fetching current weather data").into()
    })
}

/// Daily forecast at a coordinate
async fn forecast(
    State(state): State<SharedState>,
    Query(params): Query<Params>,
) -> Result<Json<Value>, ApiError> {
    let location = coordinates(&params)?;

    state.weather.daily_forecast(location).await.map(Json).map_err(|e| {
        warn!(provider = %ProviderId::OpenWeather, error = %format!("{e:#}"), "Forecast lookup failed");
        GatewayError::Upstream("Error fetching forecast weather data").into()
    })
}

async fn route_not_found() -> GatewayError {
    GatewayError::RouteNotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use std::sync::Mutex;
    use tower::ServiceExt;

    type Calls = Arc<Mutex<Vec<String>>>;

    #[derive(Debug, Default)]
    struct FakeGeocoder {
        fail: bool,
        calls: Calls,
    }

    #[async_trait]
    impl GeocodingProvider for FakeGeocoder {
        async fn geocode(&self, city: &str) -> anyhow::Result<Value> {
            self.calls.lock().unwrap().push(city.to_string());
            if self.fail {
                anyhow::bail!("opencage geocode request failed with status 401: bad key SECRET-KEY");
            }
            Ok(json!({
                "results": [{ "geometry": { "lat": 37.7749, "lng": -122.4194 } }],
                "status": { "code": 200, "message": "OK" }
            }))
        }
    }

    #[derive(Debug, Default)]
    struct FakeWeather {
        fail: bool,
        calls: Calls,
    }

    impl FakeWeather {
        fn record(&self, kind: &str, location: Location) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{kind}:{},{}", location.latitude, location.longitude));
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn current(&self, location: Location) -> anyhow::Result<Value> {
            self.record("current", location);
            if self.fail {
                anyhow::bail!("upstream down");
            }
            Ok(json!({ "main": { "temp": 15.6 }, "weather": [{ "description": "clear sky", "icon": "01d" }] }))
        }

        async fn daily_forecast(&self, location: Location) -> anyhow::Result<Value> {
            self.record("forecast", location);
            if self.fail {
                anyhow::bail!("upstream down");
            }
            Ok(json!({ "cnt": 16, "list": [] }))
        }
    }

    fn router_with(geocoder: FakeGeocoder, weather: FakeWeather) -> Router {
        let state = Arc::new(ServerState::new(Box::new(geocoder), Box::new(weather)));
        create_router(state, None)
    }

    fn healthy_router() -> Router {
        router_with(FakeGeocoder::default(), FakeWeather::default())
    }

    async fn send_raw(router: Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn send(router: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let (status, body) = send_raw(router, method, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn location_passes_provider_json_through() {
        let calls = Calls::default();
        let geocoder = FakeGeocoder { fail: false, calls: calls.clone() };
        let router = router_with(geocoder, FakeWeather::default());

        let (status, body) = send(router, "GET", "/weather/location?city=San%20Francisco").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"][0]["geometry"]["lat"], 37.7749);
        assert_eq!(body["status"]["message"], "OK");
        assert_eq!(*calls.lock().unwrap(), ["San Francisco"]);
    }

    #[tokio::test]
    async fn location_without_city_is_rejected() {
        let (status, body) = send(healthy_router(), "GET", "/weather/location").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["message"].as_str().unwrap();
        assert!(message.to_lowercase().contains("required"));
    }

    #[tokio::test]
    async fn location_with_empty_city_is_rejected() {
        let (status, body) = send(healthy_router(), "GET", "/weather/location?city=").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "City name required" }));
    }

    #[tokio::test]
    async fn location_upstream_failure_hides_details() {
        let geocoder = FakeGeocoder { fail: true, calls: Calls::default() };
        let router = router_with(geocoder, FakeWeather::default());

        let (status, body) = send(router, "GET", "/weather/location?city=Paris").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Error fetching location data" }));
        assert!(!body.to_string().contains("SECRET-KEY"));
    }

    #[tokio::test]
    async fn current_forwards_parsed_coordinates() {
        let calls = Calls::default();
        let weather = FakeWeather { fail: false, calls: calls.clone() };
        let router = router_with(FakeGeocoder::default(), weather);

        let (status, body) = send(router, "GET", "/weather/current?lat=48.85&lon=2.35").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["main"]["temp"], 15.6);
        assert_eq!(*calls.lock().unwrap(), ["current:48.85,2.35"]);
    }

    #[tokio::test]
    async fn forecast_forwards_parsed_coordinates() {
        let calls = Calls::default();
        let weather = FakeWeather { fail: false, calls: calls.clone() };
        let router = router_with(FakeGeocoder::default(), weather);

        let (status, body) = send(router, "GET", "/weather/forecast?lat=-33.9&lon=151.2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cnt"], 16);
        assert_eq!(*calls.lock().unwrap(), ["forecast:-33.9,151.2"]);
    }

    #[tokio::test]
    async fn missing_coordinates_are_rejected() {
        let (status, body) = send(healthy_router(), "GET", "/weather/current?lon=2").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Latitude is required" }));

        let (status, body) = send(healthy_router(), "GET", "/weather/forecast?lat=1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Longitude is required" }));
    }

    #[tokio::test]
    async fn non_numeric_coordinates_are_rejected() {
        let (status, body) = send(healthy_router(), "GET", "/weather/current?lat=north&lon=2").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Latitude must be a number" }));
    }

    #[tokio::test]
    async fn weather_upstream_failures_use_error_key() {
        let weather = FakeWeather { fail: true, calls: Calls::default() };
        let router = router_with(FakeGeocoder::default(), weather);
        let (status, body) = send(router, "GET", "/weather/current?lat=1&lon=2").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Error fetching current weather data" }));

        let weather = FakeWeather { fail: true, calls: Calls::default() };
        let router = router_with(FakeGeocoder::default(), weather);
        let (status, body) = send(router, "GET", "/weather/forecast?lat=1&lon=2").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Error fetching forecast weather data" }));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, body) = send(healthy_router(), "GET", "/foo/bar").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Route not found" }));
    }

    #[tokio::test]
    async fn other_methods_are_not_found() {
        let (status, body) = send(healthy_router(), "POST", "/weather/current?lat=1&lon=2").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Route not found" }));
    }

    #[tokio::test]
    async fn static_assets_are_served_with_json_404_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>weather</h1>").unwrap();

        let state = Arc::new(ServerState::new(
            Box::new(FakeGeocoder::default()),
            Box::new(FakeWeather::default()),
        ));
        let router = create_router(state, Some(dir.path()));

        let (status, body) = send_raw(router.clone(), "GET", "/index.html").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>weather</h1>");

        let (status, body) = send(router.clone(), "GET", "/foo/bar").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Route not found" }));

        let (status, body) = send(router, "GET", "/weather/location").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "City name required");
    }
}
