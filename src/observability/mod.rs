//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (tracing events with request_id / path / topic fields)
//!     → metrics.rs (counters, gauge, histogram)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The request id assigned at the edge is forwarded to the backend
//! - Metrics are recorded unconditionally; exposition is opt-in

pub mod logging;
pub mod metrics;
