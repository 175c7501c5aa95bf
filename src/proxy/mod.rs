//! Request/response proxy core.
//!
//! # Data Flow
//! ```text
//! Exchange (method, headers, path params, query, buffered body)
//!     → pipeline.rs: pre hooks → parse → post hooks → transform(ToBackend)
//!     → url.rs: placeholders + declared query params re-encoded
//!     → forward.rs: one hop to the backend, response buffered
//!     → empty body?      → headers + status only
//!     → error message?   → BackendReported (error schema)
//!     → transform(ToClient) → headers (metadata stripped, status override)
//!
//! Binary override (passthrough.rs):
//!     binary backend path → {"data": base64} → raw bytes
//! ```
//!
//! # Design Decisions
//! - Backend bodies are buffered in full; nothing reaches the client
//!   before the final body is known
//! - No retries: failures surface immediately
//! - The forwarding hop is a trait so tests can stand in for the backend

pub mod forward;
pub mod passthrough;
pub mod pipeline;
pub mod url;

pub use forward::{BackendResponse, Forwarder, HyperForwarder};
pub use pipeline::{Exchange, ProxyCore};
