//! Endpoint descriptors.

use axum::http::Method;
use bytes::Bytes;
use serde_json::Value;

use crate::error::GatewayResult;
use crate::transform::{Annotations, Schema, DEFAULT_ERROR};

/// Metadata for one query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryParam {
    pub name: &'static str,
    pub hex: bool,
    pub variants: Option<&'static [&'static str]>,
}

impl QueryParam {
    pub const fn plain(name: &'static str) -> Self {
        Self {
            name,
            hex: false,
            variants: None,
        }
    }

    pub const fn hex(name: &'static str) -> Self {
        Self {
            name,
            hex: true,
            variants: None,
        }
    }

    pub const fn enumerated(name: &'static str, variants: &'static [&'static str]) -> Self {
        Self {
            name,
            hex: false,
            variants: Some(variants),
        }
    }

    /// Leaf annotations equivalent to this parameter's flags.
    pub fn annotations(&self) -> Annotations {
        Annotations {
            hex: self.hex,
            time: false,
            variants: self.variants,
        }
    }
}

/// Runs on the raw request body before it is parsed.
pub type PreDeserializeHook = fn(Bytes) -> GatewayResult<Bytes>;

/// Runs on the parsed request body before fields are transformed.
pub type PostDeserializeHook = fn(&mut Value) -> GatewayResult<()>;

/// Hooks amending the default pipeline, run in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Hooks {
    pub pre_deserialize: Vec<PreDeserializeHook>,
    pub post_deserialize: Vec<PostDeserializeHook>,
}

/// Alternate handling for a whole exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override {
    /// Serve the resource as raw bytes when the client asks for them.
    Binary(BinaryPassthrough),
    /// Server-push event stream.
    EventStream,
}

/// Binary passthrough settings for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPassthrough {
    /// Backend path template serving the base64 envelope.
    pub backend_path: &'static str,
    /// File name in the `Content-Disposition` header.
    pub file_name: &'static str,
}

/// Everything the gateway knows about one registered path.
///
/// Shared read-only between all requests to the path.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Path template with `{placeholder}` segments.
    pub path: &'static str,
    pub post_request: Option<&'static Schema>,
    pub post_response: Option<&'static Schema>,
    pub get_response: Option<&'static Schema>,
    pub query_params: Vec<QueryParam>,
    /// Placeholders whose values are forwarded without hex decoding.
    pub url_literals: Vec<&'static str>,
    pub error: &'static Schema,
    pub hooks: Hooks,
    pub overrides: Vec<Override>,
}

impl Endpoint {
    /// Endpoint with the default error schema and nothing else.
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            post_request: None,
            post_response: None,
            get_response: None,
            query_params: Vec::new(),
            url_literals: Vec::new(),
            error: &DEFAULT_ERROR,
            hooks: Hooks::default(),
            overrides: Vec::new(),
        }
    }

    pub fn get_response(mut self, schema: &'static Schema) -> Self {
        self.get_response = Some(schema);
        self
    }

    pub fn post_request(mut self, schema: &'static Schema) -> Self {
        self.post_request = Some(schema);
        self
    }

    pub fn post_response(mut self, schema: &'static Schema) -> Self {
        self.post_response = Some(schema);
        self
    }

    pub fn query_params(mut self, params: &[QueryParam]) -> Self {
        self.query_params.extend_from_slice(params);
        self
    }

    pub fn url_literals(mut self, names: &[&'static str]) -> Self {
        self.url_literals.extend_from_slice(names);
        self
    }

    pub fn error(mut self, schema: &'static Schema) -> Self {
        self.error = schema;
        self
    }

    pub fn pre_deserialize(mut self, hook: PreDeserializeHook) -> Self {
        self.hooks.pre_deserialize.push(hook);
        self
    }

    pub fn post_deserialize(mut self, hook: PostDeserializeHook) -> Self {
        self.hooks.post_deserialize.push(hook);
        self
    }

    pub fn with_override(mut self, handler: Override) -> Self {
        self.overrides.push(handler);
        self
    }

    /// Whether `method` is served by this endpoint.
    pub fn allows(&self, method: &Method) -> bool {
        if method == Method::POST {
            self.post_request.is_some()
        } else if method == Method::GET {
            self.get_response.is_some() || !self.overrides.is_empty() || self.post_request.is_none()
        } else {
            false
        }
    }

    /// Success schema for responses to `method`.
    pub fn response_schema(&self, method: &Method) -> Option<&'static Schema> {
        if method == Method::POST {
            self.post_response
        } else {
            self.get_response
        }
    }

    pub fn is_literal(&self, placeholder: &str) -> bool {
        self.url_literals.iter().any(|l| *l == placeholder)
    }
}
