//! Leaf codecs: hex <-> base64, enum validation, time validation.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;

use crate::error::{GatewayError, GatewayResult};

/// Decode a `0x`-prefixed hex string into raw bytes.
pub fn decode_hex(field: &str, value: &str) -> GatewayResult<Vec<u8>> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| GatewayError::malformed(field, format!("'{value}' is missing the 0x prefix")))?;
    hex::decode(digits)
        .map_err(|e| GatewayError::malformed(field, format!("'{value}' is not valid hex: {e}")))
}

/// Lower-case `0x`-prefixed hex encoding.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Client-side hex to backend-side standard base64.
pub fn hex_to_base64(field: &str, value: &str) -> GatewayResult<String> {
    Ok(STANDARD.encode(decode_hex(field, value)?))
}

/// Client-side hex to URL-safe base64, for path and query components.
pub fn hex_to_url_base64(field: &str, value: &str) -> GatewayResult<String> {
    Ok(URL_SAFE.encode(decode_hex(field, value)?))
}

/// Standard base64 text rewritten in the URL-safe alphabet.
pub fn to_url_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

/// Backend-side base64 to client-side hex.
pub fn base64_to_hex(field: &str, value: &str) -> GatewayResult<String> {
    let bytes = STANDARD
        .decode(value)
        .map_err(|e| GatewayError::malformed(field, format!("'{value}' is not valid base64: {e}")))?;
    Ok(encode_hex(&bytes))
}

/// Validate `value` case-insensitively against `variants`.
///
/// Returns the index of the matching variant.
pub fn match_variant(field: &str, value: &str, variants: &'static [&'static str]) -> GatewayResult<usize> {
    variants
        .iter()
        .position(|v| !value.is_empty() && v.eq_ignore_ascii_case(value))
        .ok_or_else(|| GatewayError::InvalidEnumValue {
            field: field.to_string(),
            value: value.to_string(),
            allowed: variants.to_vec(),
        })
}

/// Validate that `value` is a non-negative integer count of seconds.
pub fn validate_time(field: &str, value: &str) -> GatewayResult<()> {
    value
        .parse::<u64>()
        .map(|_| ())
        .map_err(|_| GatewayError::malformed(field, format!("'{value}' is not a unix timestamp")))
}

/// Decode a standard base64 payload into raw bytes.
pub fn decode_payload(value: &str) -> GatewayResult<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| GatewayError::Decode(format!("payload is not valid base64: {e}")))
}
