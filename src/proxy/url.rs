//! Outbound URL rewriting.
//!
//! Path placeholders and declared query parameters are re-encoded for the
//! backend: `0x` hex becomes URL-safe base64, enumerated values are
//! validated and sent upper-case. Other path values are percent-encoded as
//! a single segment; undeclared query parameters are forwarded untouched.

use std::collections::HashMap;

use axum::http::Uri;
use url::form_urlencoded;

use crate::endpoint::{Endpoint, QueryParam};
use crate::error::{GatewayError, GatewayResult};
use crate::transform::{codec, transform_leaf, Direction};

/// Fill the `{placeholder}` segments of `template` from `params`.
///
/// Values of literal placeholders are never hex-decoded; other values are
/// when they carry the `0x` prefix. Anything not decoded is percent-encoded
/// so it stays inside its own segment.
pub fn substitute_path(
    template: &str,
    params: &HashMap<String, String>,
    is_literal: impl Fn(&str) -> bool,
) -> GatewayResult<String> {
    let mut path = template.to_string();
    for (name, value) in params {
        let placeholder = format!("{{{name}}}");
        if !path.contains(&placeholder) {
            continue;
        }
        let encoded = if is_literal(name) || !value.starts_with("0x") {
            encode_segment(name, value)?
        } else {
            codec::hex_to_url_base64(name, value)?
        };
        path = path.replace(&placeholder, &encoded);
    }
    Ok(path)
}

/// Percent-encode `value` as one path segment.
fn encode_segment(name: &str, value: &str) -> GatewayResult<String> {
    if value.is_empty() || value == "." || value == ".." {
        return Err(GatewayError::InvalidRequest(format!(
            "'{value}' is not a valid value for path parameter '{name}'"
        )));
    }
    // Form encoding writes spaces as '+' and a literal '+' as %2B.
    Ok(form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20"))
}

/// Re-encode the declared parameters of a raw query string.
///
/// Undeclared parameters keep their position and value.
pub fn rewrite_query(query: Option<&str>, declared: &[QueryParam]) -> GatewayResult<Option<String>> {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return Ok(None);
    };
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in form_urlencoded::parse(query.as_bytes()) {
        let rewritten = match declared.iter().find(|p| p.name == name) {
            Some(param) => rewrite_value(param, &value)?,
            None => value.into_owned(),
        };
        serializer.append_pair(&name, &rewritten);
    }
    Ok(Some(serializer.finish()))
}

fn rewrite_value(param: &QueryParam, value: &str) -> GatewayResult<String> {
    let out = transform_leaf(param.name, param.annotations(), value, Direction::ToBackend)?;
    Ok(if param.hex { codec::to_url_safe(&out) } else { out })
}

/// Absolute backend URI for `path` and an optional query.
pub fn backend_uri(backend: &str, path: &str, query: Option<&str>) -> GatewayResult<Uri> {
    let raw = match query {
        Some(query) => format!("http://{backend}{path}?{query}"),
        None => format!("http://{backend}{path}"),
    };
    raw.parse::<Uri>()
        .map_err(|e| GatewayError::Internal(format!("could not build backend uri '{raw}': {e}")))
}

/// Backend URI for a request to `endpoint`, served at `path_template`.
pub fn rewrite(
    backend: &str,
    endpoint: &Endpoint,
    path_template: &str,
    params: &HashMap<String, String>,
    query: Option<&str>,
) -> GatewayResult<Uri> {
    let path = substitute_path(path_template, params, |name| endpoint.is_literal(name))?;
    let query = rewrite_query(query, &endpoint.query_params)?;
    backend_uri(backend, &path, query.as_deref())
}
