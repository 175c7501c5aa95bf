//! Binary passthrough.
//!
//! When the client asks for `application/octet-stream`, the request goes to
//! the endpoint's binary backend path instead. The backend still answers
//! with a JSON envelope `{"data": "<base64>"}`; the decoded bytes become the
//! response body.

use axum::http::{header, HeaderValue, Method};
use axum::response::Response;
use bytes::Bytes;
use serde_json::Value;

use crate::endpoint::{BinaryPassthrough, Endpoint};
use crate::error::{GatewayError, GatewayResult};
use crate::http::request::OCTET_STREAM;
use crate::http::response;
use crate::proxy::pipeline::{check_reported_error, decode_body, Exchange, ProxyCore};
use crate::proxy::url;
use crate::transform::codec;

/// Envelope field holding the base64 payload.
const PAYLOAD_FIELD: &str = "data";

impl ProxyCore {
    /// Serve `endpoint` as raw bytes through its binary backend path.
    pub async fn passthrough(
        &self,
        endpoint: &Endpoint,
        binary: &BinaryPassthrough,
        exchange: Exchange,
    ) -> GatewayResult<Response> {
        // Every placeholder of the binary path is decoded.
        let path = url::substitute_path(binary.backend_path, &exchange.params, |_| false)?;
        let query = url::rewrite_query(exchange.query.as_deref(), &endpoint.query_params)?;
        let uri = url::backend_uri(self.backend(), &path, query.as_deref())?;

        let mut headers = exchange.headers;
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let backend = self.send(Method::GET, uri, &headers, Bytes::new()).await?;

        let envelope = decode_body(&backend.body)?;
        check_reported_error(endpoint, &backend, &envelope)?;

        let encoded = envelope
            .get(PAYLOAD_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                GatewayError::Serialization(format!("backend envelope has no '{PAYLOAD_FIELD}' string"))
            })?;
        let payload = Bytes::from(codec::decode_payload(encoded)?);

        let (status, mut headers) = response::client_head(backend.status, &backend.headers)?;
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(OCTET_STREAM));
        let disposition = format!("attachment; filename={}", binary.file_name);
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition)
                .map_err(|e| GatewayError::Internal(format!("invalid file name: {e}")))?,
        );
        tracing::debug!(bytes = payload.len(), file_name = binary.file_name, "Serving binary payload");
        Ok(response::buffered(status, headers, payload))
    }
}
