//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, x-request-id, trace, body limit)
//!     → matched path template → endpoint descriptor
//!     → override handler | proxy pipeline
//!     → response.rs (backend headers filtered, status override)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, GatewayServer};
