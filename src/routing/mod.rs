//! Locally handled routes.
//!
//! # Data Flow
//! ```text
//! Route declarations (method, template, schemas, handler)
//!     → table.rs (duplicate detection, compile)
//!     → Freeze as immutable RouteTable
//!
//! Per request:
//!     lookup(method, path)
//!     → template.rs (segment match, named parameter binding)
//!     → Return: matched Route + bindings, or explicit no-match
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Named `{param}` segments, distinct from proxy wildcard patterns
//! - Duplicate (method, template shape) fails the build, not the request

pub mod route;
pub mod table;
pub mod template;

pub use route::{
    Handler, HandlerFuture, ParameterSchemas, RequestContext, ResponseFormat, ResponseSpec, Route,
    RouteSpec,
};
pub use table::RouteTable;
pub use template::PathTemplate;
