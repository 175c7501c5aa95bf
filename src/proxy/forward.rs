//! Backend forwarding.
//!
//! One HTTP hop to the RPC backend. The response is fully buffered so the
//! pipeline can inspect and transform it before anything reaches the client.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use bytes::Bytes;
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::error::{GatewayError, GatewayResult};

/// Raw backend answer.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl BackendResponse {
    /// Whether the body carries nothing worth decoding: no bytes or `{}`.
    pub fn is_empty(&self) -> bool {
        let trimmed = self.body.trim_ascii();
        trimmed.is_empty() || trimmed == b"{}"
    }
}

/// Performs the proxy hop.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, request: Request<Body>) -> GatewayResult<BackendResponse>;
}

/// [`Forwarder`] backed by a pooled hyper client.
#[derive(Clone)]
pub struct HyperForwarder {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
    max_response_size: usize,
}

impl HyperForwarder {
    pub fn new(connect_timeout: Duration, timeout: Duration, max_response_size: usize) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self {
            client,
            timeout,
            max_response_size,
        }
    }
}

#[async_trait]
impl Forwarder for HyperForwarder {
    async fn forward(&self, request: Request<Body>) -> GatewayResult<BackendResponse> {
        let uri = request.uri().clone();
        let exchange = async {
            let response: hyper::Response<Incoming> = self
                .client
                .request(request)
                .await
                .map_err(|e| GatewayError::BackendUnreachable(e.to_string()))?;
            let (parts, body) = response.into_parts();
            let body = axum::body::to_bytes(Body::new(body), self.max_response_size)
                .await
                .map_err(|e| GatewayError::BackendUnreachable(format!("could not read response body: {e}")))?;
            Ok(BackendResponse {
                status: parts.status,
                headers: parts.headers,
                body,
            })
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(uri = %uri, timeout_secs = self.timeout.as_secs(), "Backend call timed out");
                Err(GatewayError::BackendUnreachable(format!(
                    "backend did not answer within {}s",
                    self.timeout.as_secs()
                )))
            }
        }
    }
}
