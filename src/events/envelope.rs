use bytes::Bytes;

/// One message delivered by the upstream push subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEnvelope {
    /// Event-type tag as received, possibly with stray whitespace.
    pub event: String,
    /// Raw JSON payload.
    pub data: Bytes,
}

impl EventEnvelope {
    pub fn new(event: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            event: event.into(),
            data: data.into(),
        }
    }

    /// Tag with surrounding whitespace removed.
    pub fn tag(&self) -> &str {
        self.event.trim()
    }
}
