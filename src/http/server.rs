//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with one route per registered endpoint
//! - Wire up middleware (request ID, tracing, body limit)
//! - Dispatch each exchange to an override handler or the default pipeline
//! - Render every failure as a JSON error body

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{MatchedPath, Path, Request, State},
    http::Uri,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::beacon;
use crate::config::GatewayConfig;
use crate::endpoint::{EndpointRegistry, Override};
use crate::error::{GatewayError, GatewayResult};
use crate::events::{Multiplexer, PushSource, SseSource};
use crate::http::request;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::proxy::{url, Exchange, Forwarder, HyperForwarder, ProxyCore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn EndpointRegistry>,
    pub proxy: ProxyCore,
    pub events: Multiplexer,
    pub max_body_size: usize,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    state: AppState,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Server for the beacon catalogue with the real backend clients.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let forwarder = Arc::new(HyperForwarder::new(
            config.timeouts.connect(),
            config.timeouts.backend(),
            config.limits.max_response_size,
        ));
        let source = Arc::new(SseSource::new(config.timeouts.connect(), config.events.buffer_size)?);
        Ok(Self::with_components(
            config,
            Arc::new(beacon::registry()),
            forwarder,
            source,
        ))
    }

    /// Server with explicit collaborators.
    pub fn with_components(
        config: GatewayConfig,
        registry: Arc<dyn EndpointRegistry>,
        forwarder: Arc<dyn Forwarder>,
        source: Arc<dyn PushSource>,
    ) -> Self {
        let state = AppState {
            registry,
            proxy: ProxyCore::new(config.backend.address.clone(), forwarder),
            events: Multiplexer::new(source, config.events.buffer_size),
            max_body_size: config.limits.max_body_size,
        };
        let router = Self::build_router(&config, state.clone());
        Self { router, state, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mut router = Router::new();
        for path in state.registry.paths() {
            router = router.route(path, any(endpoint_handler));
        }
        router
            .fallback(fallback_handler)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Router with all layers applied, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Open event streams are closed once shutdown begins so in-flight
    /// connections can drain.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend.address,
            endpoints = self.state.registry.paths().len(),
            "HTTP server starting"
        );

        let events = self.state.events.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown::wait(shutdown).await;
                events.close_all();
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Handler shared by every registered path.
async fn endpoint_handler(
    State(state): State<AppState>,
    matched: MatchedPath,
    params: Option<Path<HashMap<String, String>>>,
    request: Request,
) -> Response {
    let start = Instant::now();
    let template = matched.as_str().to_string();
    let method = request.method().clone();
    let request_id = request::request_id(request.headers()).to_string();
    let params = params.map(|Path(params)| params).unwrap_or_default();

    tracing::debug!(request_id = %request_id, method = %method, path = %template, "Handling request");

    let response = match dispatch(&state, &template, params, request).await {
        Ok(response) => response,
        Err(e) => {
            if e.status_code().is_server_error() {
                tracing::warn!(request_id = %request_id, path = %template, kind = e.kind(), error = %e, "Request failed");
            } else {
                tracing::debug!(request_id = %request_id, path = %template, kind = e.kind(), error = %e, "Request rejected");
            }
            e.into_response()
        }
    };

    metrics::record_request(&template, method.as_str(), response.status().as_u16(), start);
    response
}

async fn dispatch(
    state: &AppState,
    template: &str,
    params: HashMap<String, String>,
    request: Request,
) -> GatewayResult<Response> {
    let endpoint = state
        .registry
        .endpoint(template)
        .ok_or_else(|| GatewayError::Routing(template.to_string()))?;
    let method = request.method().clone();
    if !endpoint.allows(&method) {
        return Err(GatewayError::MethodNotAllowed(method));
    }

    let (parts, body) = request.into_parts();
    let query = parts.uri.query().map(str::to_string);

    for handler in &endpoint.overrides {
        match handler {
            Override::Binary(binary) if request::accepts_binary(&parts.headers) => {
                let exchange = Exchange {
                    method,
                    headers: parts.headers,
                    params,
                    query,
                    body: Bytes::new(),
                };
                return state.proxy.passthrough(&endpoint, binary, exchange).await;
            }
            Override::Binary(_) => {}
            Override::EventStream => {
                let uri = url::backend_uri(state.proxy.backend(), parts.uri.path(), query.as_deref())?;
                return state.events.open(&uri.to_string()).await;
            }
        }
    }

    let body = axum::body::to_bytes(body, state.max_body_size)
        .await
        .map_err(|e| GatewayError::InvalidRequest(format!("could not read request body: {e}")))?;
    let exchange = Exchange {
        method,
        headers: parts.headers,
        params,
        query,
        body,
    };
    state.proxy.run(&endpoint, exchange).await
}

async fn fallback_handler(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No endpoint registered");
    GatewayError::Routing(uri.path().to_string()).into_response()
}
