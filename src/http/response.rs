//! Response head construction.
//!
//! Backend headers are copied to the client except:
//! - `Grpc-Metadata-*` headers, which are internal to the backend
//! - framing headers (`Content-Length`, `Transfer-Encoding`, `Connection`),
//!   recomputed for the body actually written
//!
//! The one metadata header that does matter, `Grpc-Metadata-Status-Code`,
//! replaces the backend's transport status when present.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use bytes::Bytes;

use crate::error::{GatewayError, GatewayResult};

/// Prefix of backend metadata headers.
pub const METADATA_PREFIX: &str = "grpc-metadata-";

/// Metadata header carrying the REST status code.
pub const STATUS_CODE_HEADER: &str = "grpc-metadata-status-code";

const FRAMING_HEADERS: [HeaderName; 3] = [header::CONTENT_LENGTH, header::TRANSFER_ENCODING, header::CONNECTION];

/// Client-visible status and headers for a backend response.
pub fn client_head(status: StatusCode, backend: &HeaderMap) -> GatewayResult<(StatusCode, HeaderMap)> {
    let mut headers = HeaderMap::with_capacity(backend.len());
    let mut status = status;
    for (name, value) in backend {
        if name.as_str().starts_with(METADATA_PREFIX) {
            if name.as_str() == STATUS_CODE_HEADER {
                status = parse_status_override(value)?;
            }
            continue;
        }
        if FRAMING_HEADERS.contains(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    Ok((status, headers))
}

fn parse_status_override(value: &HeaderValue) -> GatewayResult<StatusCode> {
    let raw = value
        .to_str()
        .map_err(|_| GatewayError::Internal("could not parse status code".to_string()))?;
    raw.trim()
        .parse::<u16>()
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .ok_or_else(|| GatewayError::Internal(format!("could not parse status code '{raw}'")))
}

/// Assemble a buffered response with an exact `Content-Length`.
pub fn buffered(status: StatusCode, mut headers: HeaderMap, body: Bytes) -> Response {
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Like [`buffered`], marking non-empty bodies as JSON.
pub fn json(status: StatusCode, mut headers: HeaderMap, body: Bytes) -> Response {
    if !body.is_empty() {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    buffered(status, headers, body)
}
