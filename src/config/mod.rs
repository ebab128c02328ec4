//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → passed explicitly into the route table, server, and assembler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no global holder, no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Executable hooks are never part of the deserialized config; they are
//!   attached to runtime rules after validation

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, DocsConfig, ObservabilityConfig, ProxyRuleConfig, ProxySettings, RoutesConfig,
    ServerConfig,
};
pub use validation::{validate_config, ValidationError};
