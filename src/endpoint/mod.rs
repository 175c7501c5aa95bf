//! Endpoint descriptors and their registry.
//!
//! # Data Flow
//! ```text
//! Registry (built at startup)
//!     → paths() → one axum route per template
//!     → endpoint(template) → Arc<Endpoint> per request
//! ```
//!
//! # Design Decisions
//! - Descriptors are read-only and shared via Arc
//! - Per-endpoint behavior is data (hooks are plain fn pointers,
//!   overrides an enum), never subclassing

pub mod descriptor;
pub mod registry;

pub use descriptor::{
    BinaryPassthrough, Endpoint, Hooks, Override, PostDeserializeHook, PreDeserializeHook, QueryParam,
};
pub use registry::{EndpointRegistry, StaticRegistry};
