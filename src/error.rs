//! Error taxonomy and the REST error envelope.
//!
//! Every failure detected while building a response ends up here and is
//! rendered as a JSON body before anything reaches the client.

use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Default REST error body: `{code, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

/// Errors produced by the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No endpoint is registered for the request path.
    #[error("no endpoint registered for path '{0}'")]
    Routing(String),

    /// A hex/base64 field could not be decoded.
    #[error("invalid value for field '{field}': {reason}")]
    MalformedField { field: String, reason: String },

    /// An enumerated field holds a value outside its declared set.
    #[error("invalid value '{value}' for field '{field}', expected one of [{}]", .allowed.join(", "))]
    InvalidEnumValue {
        field: String,
        value: String,
        allowed: Vec<&'static str>,
    },

    /// The request body could not be read or was rejected by a hook.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The endpoint does not serve this method.
    #[error("method {0} is not supported by this endpoint")]
    MethodNotAllowed(Method),

    /// Forwarding to the backend failed at the transport level.
    #[error("could not proxy request: {0}")]
    BackendUnreachable(String),

    /// The backend answered with a non-empty structured error.
    ///
    /// `body` is the error object already shaped by the endpoint's error
    /// schema, with `code` set to `status`.
    #[error("backend reported error: {message}")]
    BackendReported {
        status: StatusCode,
        headers: HeaderMap,
        body: Value,
        message: String,
    },

    /// An event arrived with a tag outside the known topic set.
    #[error("event type '{0}' not supported")]
    UnsupportedStreamTopic(String),

    /// JSON encoding or decoding failed.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The connection cannot perform the requested operation.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// An embedded binary payload is not valid base64.
    #[error("could not decode payload: {0}")]
    Decode(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status code the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Routing(_) => StatusCode::NOT_FOUND,
            Self::MalformedField { .. } | Self::InvalidEnumValue { .. } | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::BackendUnreachable(_) => StatusCode::BAD_GATEWAY,
            Self::BackendReported { status, .. } => *status,
            Self::UnsupportedStreamTopic(_)
            | Self::Serialization(_)
            | Self::UnsupportedOperation(_)
            | Self::Decode(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Routing(_) => "routing",
            Self::MalformedField { .. } => "malformed_field",
            Self::InvalidEnumValue { .. } => "invalid_enum_value",
            Self::InvalidRequest(_) => "invalid_request",
            Self::MethodNotAllowed(_) => "method_not_allowed",
            Self::BackendUnreachable(_) => "backend_unreachable",
            Self::BackendReported { .. } => "backend_reported",
            Self::UnsupportedStreamTopic(_) => "unsupported_stream_topic",
            Self::Serialization(_) => "serialization",
            Self::UnsupportedOperation(_) => "unsupported_operation",
            Self::Decode(_) => "decode",
            Self::Internal(_) => "internal",
        }
    }

    /// Shorthand for a malformed field error.
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Serialized JSON error body.
    pub fn body(&self) -> Bytes {
        match self {
            Self::BackendReported { body, .. } => serde_json::to_vec(body)
                .map(Bytes::from)
                .unwrap_or_else(|_| self.default_body()),
            _ => self.default_body(),
        }
    }

    fn default_body(&self) -> Bytes {
        let body = ErrorBody {
            code: self.status_code().as_u16(),
            message: self.to_string(),
        };
        // ErrorBody holds only a number and a string.
        serde_json::to_vec(&body).map(Bytes::from).unwrap_or_default()
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.body();
        let mut response = (status, body).into_response();
        if let Self::BackendReported { headers, .. } = self {
            response.headers_mut().extend(headers);
        }
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }
}
