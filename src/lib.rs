//! REST ⇄ RPC translation gateway for beacon node APIs.

pub mod beacon;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod events;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod transform;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
