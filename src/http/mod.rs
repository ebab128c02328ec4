//! HTTP server, dispatch pipeline, and request plumbing.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → middleware (request id, trace, timeout)
//!     → dispatcher.rs (route table → proxy rules → 404)
//!     → handler response / forwarded upstream response
//! ```

pub mod dispatcher;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, ForwardClient, HttpServer};
