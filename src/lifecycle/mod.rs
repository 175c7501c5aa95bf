//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger → broadcast → listener stops accepting → in-flight drain → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then logging/metrics, then the listener
//! - Open event streams end on client disconnect or when shutdown begins

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
