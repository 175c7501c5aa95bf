//! Field transformation engine.
//!
//! # Data Flow
//! ```text
//! client JSON ──▶ walker (ToBackend) ──▶ backend JSON
//!     hex "0x.." → base64, enum → UPPER, time validated
//!
//! backend JSON ──▶ walker (ToClient) ──▶ client JSON
//!     base64 → hex "0x..", enum → lower, time validated
//! ```
//!
//! # Design Decisions
//! - Schemas are static data walked by a single generic visitor
//! - Annotations live on the schema, never on the calling endpoint
//! - Values are projected: only declared fields survive

pub mod codec;
pub mod schema;
pub mod walker;

pub use schema::{Annotations, Field, Kind, Schema, DEFAULT_ERROR};
pub use walker::{transform, transform_leaf, Direction};
