//! Request hooks for beacon endpoints.
//!
//! Several REST endpoints accept a bare JSON array where the RPC side
//! expects an object with a single list field; the pre-deserialization
//! hooks here add that wrapper.

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::error::{GatewayError, GatewayResult};
use crate::transform::codec;

const GRAFFITI_LEN: usize = 32;

/// `[...]` → `{"data": [...]}`.
pub fn wrap_data_array(body: Bytes) -> GatewayResult<Bytes> {
    wrap_array(body, "data")
}

/// `[...]` → `{"index": [...]}`.
pub fn wrap_index_array(body: Bytes) -> GatewayResult<Bytes> {
    wrap_array(body, "index")
}

fn wrap_array(body: Bytes, key: &str) -> GatewayResult<Bytes> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::InvalidRequest(format!("could not decode request body: {e}")))?;
    let Value::Array(items) = value else {
        return Err(GatewayError::InvalidRequest(
            "request body must be a JSON array".to_string(),
        ));
    };
    let mut wrapper = Map::new();
    wrapper.insert(key.to_string(), Value::Array(items));
    Ok(Bytes::from(serde_json::to_vec(&Value::Object(wrapper))?))
}

/// Normalize `message.body.graffiti` to 32 bytes of `0x` hex.
///
/// The value is taken as UTF-8 text, even when it looks like hex, and is
/// zero-padded or truncated to 32 bytes.
pub fn prepare_graffiti(block: &mut Value) -> GatewayResult<()> {
    let Some(Value::String(graffiti)) = block.pointer_mut("/message/body/graffiti") else {
        return Ok(());
    };
    let mut bytes = graffiti.as_bytes().to_vec();
    bytes.resize(GRAFFITI_LEN, 0);
    *graffiti = codec::encode_hex(&bytes);
    Ok(())
}
