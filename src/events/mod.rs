//! Event stream multiplexing.
//!
//! # Data Flow
//! ```text
//! client GET /eth/v1/events?topics=...
//!     → multiplexer.rs opens ONE upstream subscription ("events")
//!     → source.rs (SseSource) decodes backend text/event-stream (sse.rs)
//!     → envelope tag trimmed → topic.rs picks the schema
//!     → transform(ToClient) → "event: <tag>\ndata: <json>\n\n"
//!     → client body stream, one chunk per frame
//! ```
//!
//! # Design Decisions
//! - The backend cannot filter topics on this path, so every topic arrives
//!   on a single feed and is demultiplexed locally by tag
//! - Client disconnect is the only cancellation source and is not an error
//! - The upstream subscription is released on every exit path

pub mod envelope;
pub mod multiplexer;
pub mod source;
pub mod sse;
pub mod topic;

pub use envelope::EventEnvelope;
pub use multiplexer::Multiplexer;
pub use source::{PushSource, SseSource, Subscription, SUBSCRIPTION_TOPIC};
pub use topic::Topic;
