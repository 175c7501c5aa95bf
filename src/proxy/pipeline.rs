//! Default request/response pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, Uri};
use axum::response::Response;
use bytes::Bytes;
use serde_json::Value;

use crate::endpoint::Endpoint;
use crate::error::{GatewayError, GatewayResult};
use crate::http::response;
use crate::observability::metrics;
use crate::proxy::forward::{BackendResponse, Forwarder};
use crate::proxy::url;
use crate::transform::{transform, Direction};

/// Client request headers never copied to the backend.
const SKIPPED_REQUEST_HEADERS: [header::HeaderName; 4] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
];

/// One inbound exchange, with the body already buffered.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub method: Method,
    pub headers: HeaderMap,
    /// Values captured by the path template placeholders.
    pub params: HashMap<String, String>,
    pub query: Option<String>,
    pub body: Bytes,
}

/// Translates REST exchanges into backend calls and back.
#[derive(Clone)]
pub struct ProxyCore {
    backend: String,
    forwarder: Arc<dyn Forwarder>,
}

impl ProxyCore {
    pub fn new(backend: impl Into<String>, forwarder: Arc<dyn Forwarder>) -> Self {
        Self {
            backend: backend.into(),
            forwarder,
        }
    }

    /// Backend address (`host:port`).
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Run the default pipeline for `endpoint`.
    ///
    /// Nothing is written until the final body is known; any failure comes
    /// back as an error for the caller to render.
    pub async fn run(&self, endpoint: &Endpoint, exchange: Exchange) -> GatewayResult<Response> {
        let Exchange {
            method,
            headers,
            params,
            query,
            body,
        } = exchange;

        let body = if method == Method::POST {
            prepare_request_body(endpoint, body)?
        } else {
            Bytes::new()
        };

        let uri = url::rewrite(&self.backend, endpoint, endpoint.path, &params, query.as_deref())?;
        let backend = self.send(method.clone(), uri, &headers, body).await?;

        if backend.is_empty() {
            let (status, headers) = response::client_head(backend.status, &backend.headers)?;
            return Ok(response::buffered(status, headers, Bytes::new()));
        }

        let payload = decode_body(&backend.body)?;
        check_reported_error(endpoint, &backend, &payload)?;

        let body = match endpoint.response_schema(&method) {
            Some(schema) => Bytes::from(serde_json::to_vec(&transform(schema, payload, Direction::ToClient)?)?),
            None => backend.body.clone(),
        };
        let (status, headers) = response::client_head(backend.status, &backend.headers)?;
        Ok(response::json(status, headers, body))
    }

    /// Forward one request to the backend.
    pub(crate) async fn send(
        &self,
        method: Method,
        uri: Uri,
        client_headers: &HeaderMap,
        body: Bytes,
    ) -> GatewayResult<BackendResponse> {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .map_err(|e| GatewayError::Internal(format!("could not build backend request: {e}")))?;

        let headers = request.headers_mut();
        for (name, value) in client_headers {
            if !SKIPPED_REQUEST_HEADERS.contains(name) {
                headers.append(name.clone(), value.clone());
            }
        }
        if !body.is_empty() {
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        *request.body_mut() = Body::from(body);

        tracing::debug!(method = %request.method(), uri = %request.uri(), "Forwarding to backend");

        self.forwarder.forward(request).await.inspect_err(|e| {
            metrics::record_backend_error(e.kind());
            tracing::warn!(error = %e, "Backend call failed");
        })
    }
}

/// Hooks, schema projection and hex/enum decoding for a POST body.
fn prepare_request_body(endpoint: &Endpoint, body: Bytes) -> GatewayResult<Bytes> {
    let Some(schema) = endpoint.post_request else {
        return Err(GatewayError::MethodNotAllowed(Method::POST));
    };

    let mut body = body;
    for hook in &endpoint.hooks.pre_deserialize {
        body = hook(body)?;
    }

    let mut value: Value = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::InvalidRequest(format!("could not decode request body: {e}")))?;
    if !value.is_object() {
        return Err(GatewayError::InvalidRequest(
            "request body must be a JSON object".to_string(),
        ));
    }
    for hook in &endpoint.hooks.post_deserialize {
        hook(&mut value)?;
    }

    let value = transform(schema, value, Direction::ToBackend)?;
    Ok(Bytes::from(serde_json::to_vec(&value)?))
}

pub(crate) fn decode_body(body: &Bytes) -> GatewayResult<Value> {
    serde_json::from_slice(body)
        .map_err(|e| GatewayError::Serialization(format!("could not decode backend response: {e}")))
}

/// Short-circuit on a backend error body carrying a non-empty message.
pub(crate) fn check_reported_error(
    endpoint: &Endpoint,
    backend: &BackendResponse,
    payload: &Value,
) -> GatewayResult<()> {
    let message = match payload.get("message").and_then(Value::as_str) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => return Ok(()),
    };

    let (status, headers) = response::client_head(backend.status, &backend.headers)?;
    let mut body = transform(endpoint.error, payload.clone(), Direction::ToClient)?;
    if let Value::Object(map) = &mut body {
        map.insert("code".to_string(), Value::from(status.as_u16()));
    }
    Err(GatewayError::BackendReported {
        status,
        headers,
        body,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{Endpoint, QueryParam};
    use crate::transform::{Field, Schema};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use std::sync::Mutex;

    static CHECKPOINT: Schema = Schema::new("checkpoint", &[Field::plain("epoch"), Field::hex("root")]);
    static RESPONSE: Schema = Schema::new("response", &[Field::object("data", &CHECKPOINT)]);
    static REQUEST: Schema = Schema::new("request", &[Field::object("data", &CHECKPOINT).list()]);

    /// Records the forwarded request and answers with a canned response.
    struct Canned {
        response: BackendResponse,
        seen: Mutex<Vec<(Method, String, Bytes)>>,
    }

    impl Canned {
        fn new(status: StatusCode, headers: &[(&'static str, &'static str)], body: &str) -> Arc<Self> {
            let mut map = HeaderMap::new();
            for (name, value) in headers {
                map.append(*name, HeaderValue::from_static(value));
            }
            Arc::new(Self {
                response: BackendResponse {
                    status,
                    headers: map,
                    body: Bytes::from(body.to_string()),
                },
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Forwarder for Canned {
        async fn forward(&self, request: Request<Body>) -> GatewayResult<BackendResponse> {
            let (parts, body) = request.into_parts();
            let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
            self.seen
                .lock()
                .unwrap()
                .push((parts.method, parts.uri.to_string(), body));
            Ok(self.response.clone())
        }
    }

    fn exchange(method: Method, params: &[(&str, &str)], query: Option<&str>, body: &str) -> Exchange {
        Exchange {
            method,
            headers: HeaderMap::new(),
            params: params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            query: query.map(str::to_string),
            body: Bytes::from(body.to_string()),
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_transforms_response() {
        let backend = Canned::new(
            StatusCode::OK,
            &[("content-type", "application/json")],
            r#"{"data":{"epoch":"3","root":"3q2+7w==","extra":"dropped"}}"#,
        );
        let core = ProxyCore::new("127.0.0.1:3500", backend.clone());
        let endpoint = Endpoint::new("/eth/v1/beacon/states/{state_id}/checkpoint")
            .get_response(&RESPONSE)
            .query_params(&[QueryParam::hex("root")]);

        let response = core
            .run(&endpoint, exchange(Method::GET, &[("state_id", "0xdeadbeef")], Some("root=0x01"), ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"data": {"epoch": "3", "root": "0xdeadbeef"}})
        );
        let seen = backend.seen.lock().unwrap();
        assert_eq!(
            seen[0].1,
            "http://127.0.0.1:3500/eth/v1/beacon/states/3q2-7w==/checkpoint?root=AQ%3D%3D"
        );
    }

    #[tokio::test]
    async fn test_post_decodes_request() {
        let backend = Canned::new(StatusCode::OK, &[], "");
        let core = ProxyCore::new("backend:1", backend.clone());
        let endpoint = Endpoint::new("/eth/v1/beacon/pool/checkpoints").post_request(&REQUEST);

        let response = core
            .run(
                &endpoint,
                exchange(Method::POST, &[], None, r#"{"data":[{"epoch":"1","root":"0xdeadbeef"}]}"#),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let seen = backend.seen.lock().unwrap();
        let sent: Value = serde_json::from_slice(&seen[0].2).unwrap();
        assert_eq!(sent, serde_json::json!({"data": [{"epoch": "1", "root": "3q2+7w=="}]}));
    }

    #[tokio::test]
    async fn test_post_rejects_malformed_hex() {
        let backend = Canned::new(StatusCode::OK, &[], "");
        let core = ProxyCore::new("backend:1", backend.clone());
        let endpoint = Endpoint::new("/x").post_request(&REQUEST);

        let err = core
            .run(&endpoint, exchange(Method::POST, &[], None, r#"{"data":[{"root":"0xzz"}]}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::MalformedField { .. }));
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reported_error_short_circuits() {
        let backend = Canned::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            &[("grpc-metadata-status-code", "404")],
            r#"{"code":5,"message":"state not found","data":{"root":"not base64 !"}}"#,
        );
        let core = ProxyCore::new("backend:1", backend);
        let endpoint = Endpoint::new("/x").get_response(&RESPONSE);

        let err = core.run(&endpoint, exchange(Method::GET, &[], None, "")).await.unwrap_err();
        let GatewayError::BackendReported { status, body, headers, .. } = err else {
            panic!("expected a reported error");
        };
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"code": 404, "message": "state not found"}));
        assert!(headers.is_empty());
    }

    #[tokio::test]
    async fn test_empty_object_response() {
        let backend = Canned::new(StatusCode::OK, &[("grpc-metadata-status-code", "202")], "{}");
        let core = ProxyCore::new("backend:1", backend);
        let endpoint = Endpoint::new("/x").get_response(&RESPONSE);

        let response = core.run(&endpoint, exchange(Method::GET, &[], None, "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_missing_schema_passes_body_through() {
        let backend = Canned::new(StatusCode::OK, &[], r#"{"anything":["goes"]}"#);
        let core = ProxyCore::new("backend:1", backend);
        let endpoint = Endpoint::new("/eth/v1/node/health");

        let response = core.run(&endpoint, exchange(Method::GET, &[], None, "")).await.unwrap();
        assert_eq!(body_json(response).await, serde_json::json!({"anything": ["goes"]}));
    }
}
