//! Closed set of stream topics.

use serde_json::Value;

use crate::beacon::schemas;
use crate::error::{GatewayError, GatewayResult};
use crate::transform::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Head,
    Block,
    /// Aggregated attestation received; payload nests the attestation
    /// under `aggregate`.
    Attestation,
    VoluntaryExit,
    FinalizedCheckpoint,
    ChainReorg,
    Error,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::Head,
        Topic::Block,
        Topic::Attestation,
        Topic::VoluntaryExit,
        Topic::FinalizedCheckpoint,
        Topic::ChainReorg,
        Topic::Error,
    ];

    /// Topic for an already trimmed tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Topic::Head => "head",
            Topic::Block => "block",
            Topic::Attestation => "attestation",
            Topic::VoluntaryExit => "voluntary_exit",
            Topic::FinalizedCheckpoint => "finalized_checkpoint",
            Topic::ChainReorg => "chain_reorg",
            Topic::Error => "error",
        }
    }

    /// REST schema of the event payload.
    pub fn schema(self) -> &'static Schema {
        match self {
            Topic::Head => &schemas::EVENT_HEAD,
            Topic::Block => &schemas::EVENT_BLOCK,
            Topic::Attestation => &schemas::ATTESTATION,
            Topic::VoluntaryExit => &schemas::SIGNED_VOLUNTARY_EXIT,
            Topic::FinalizedCheckpoint => &schemas::EVENT_FINALIZED_CHECKPOINT,
            Topic::ChainReorg => &schemas::EVENT_CHAIN_REORG,
            Topic::Error => &schemas::EVENT_ERROR,
        }
    }

    /// Parse a raw payload into the shape [`Topic::schema`] describes.
    pub fn payload(self, data: &[u8]) -> GatewayResult<Value> {
        let value: Value = serde_json::from_slice(data)?;
        match self {
            Topic::Attestation => match value {
                Value::Object(mut map) => map.remove("aggregate").ok_or_else(|| {
                    GatewayError::Serialization("attestation event has no 'aggregate' field".to_string())
                }),
                _ => Err(GatewayError::Serialization(
                    "attestation event payload is not an object".to_string(),
                )),
            },
            _ => Ok(value),
        }
    }
}
