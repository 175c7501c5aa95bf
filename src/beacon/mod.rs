//! Beacon node API catalogue.
//!
//! The concrete endpoint table the gateway serves: paths, schemas,
//! per-endpoint query parameters, hooks and overrides. The proxy core only
//! consumes it through [`crate::endpoint::EndpointRegistry`].

pub mod endpoints;
pub mod hooks;
pub mod schemas;

pub use endpoints::registry;
