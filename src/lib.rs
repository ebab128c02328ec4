//! An embeddable HTTP API gateway: declarative routes with schema
//! validation, a specificity-ranked reverse proxy with pre-forward hooks,
//! and an auto-assembled API description.
//!
//! Applications declare [`Route`]s (method, path template, parameter
//! schemas, async handler) and proxy rules (wildcard pattern, target,
//! timeout/retry policy, optional hook), then hand both to [`HttpServer`].
//! Every request flows through one pipeline: route table first, proxy rules
//! second, structured 404 last.

pub mod config;
pub mod docs;
pub mod error;
pub mod http;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod schema;

pub use config::AppConfig;
pub use error::{FieldViolation, GatewayError};
pub use http::{AppState, HttpServer};
pub use proxy::{
    attach_hook, hook, rules_from_config, ForwardContext, HookOutcome, PathPattern, ProxyRule,
};
pub use routing::{RequestContext, ResponseFormat, Route, RouteTable};
pub use schema::{Field, Schema};
