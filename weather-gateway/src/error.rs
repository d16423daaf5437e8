//! Error envelope returned to gateway callers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use thiserror::Error;

/// Messages are fixed strings; upstream details are logged, never returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// A required query parameter is missing or unusable.
    #[error("{0}")]
    BadRequest(&'static str),

    /// The provider answered non-2xx, the call failed, or its body was not JSON.
    #[error("{0}")]
    Upstream(&'static str),

    #[error("Route not found")]
    RouteNotFound,
}

impl GatewayError {
    /// Bad requests and upstream failures share 500; only unknown routes are told apart.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) | GatewayError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn with_key(self, key: EnvelopeKey) -> ApiError {
        ApiError { key, error: self }
    }
}

/// JSON field carrying the message: the location endpoint uses `message`, the rest `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKey {
    Message,
    Error,
}

impl EnvelopeKey {
    fn as_str(self) -> &'static str {
        match self {
            EnvelopeKey::Message => "message",
            EnvelopeKey::Error => "error",
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    key: EnvelopeKey,
    error: GatewayError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert(self.key.as_str().to_string(), Value::String(self.error.to_string()));

        (self.error.status(), Json(Value::Object(body))).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        error.with_key(EnvelopeKey::Error)
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(GatewayError::BadRequest("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(GatewayError::Upstream("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(GatewayError::RouteNotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn display_is_the_client_message() {
        assert_eq!(GatewayError::BadRequest("City name required").to_string(), "City name required");
        assert_eq!(GatewayError::RouteNotFound.to_string(), "Route not found");
    }

    #[test]
    fn default_envelope_key_is_error() {
        let api = ApiError::from(GatewayError::RouteNotFound);
        assert_eq!(api.key, EnvelopeKey::Error);

        let api = GatewayError::Upstream("x").with_key(EnvelopeKey::Message);
        assert_eq!(api.key, EnvelopeKey::Message);
    }
}
