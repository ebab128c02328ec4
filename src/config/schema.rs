//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listener and request-handling settings.
    pub server: ServerConfig,

    /// Reverse-proxy rules for paths the route table does not handle.
    pub proxy: ProxySettings,

    /// Documentation endpoint settings.
    pub docs: DocsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// API title shown in the assembled documentation.
    pub title: String,

    /// API description shown in the assembled documentation.
    pub description: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            proxy: ProxySettings::default(),
            docs: DocsConfig::default(),
            observability: ObservabilityConfig::default(),
            title: "My API".to_string(),
            description: "Auto-generated API documentation from route specifications".to_string(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host (e.g. "0.0.0.0").
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Whole-request timeout in seconds, applied as a middleware layer.
    /// Must exceed the largest per-rule forwarding timeout to not cut
    /// retries short.
    pub request_timeout_secs: u64,

    /// Maximum buffered request body size in bytes.
    pub max_body_bytes: usize,

    /// Route discovery settings, consumed by the embedding application.
    pub routes: RoutesConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 75,
            max_body_bytes: 2 * 1024 * 1024,
            routes: RoutesConfig::default(),
        }
    }
}

/// Where the embedding application discovers its route declarations.
/// The gateway core only consumes the built route table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub dir: String,
    pub base_path: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            dir: "./routes".to_string(),
            base_path: "/".to_string(),
        }
    }
}

/// Reverse-proxy settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxySettings {
    /// Master switch; disabled means unmatched paths are plain 404s.
    pub enabled: bool,

    /// Forwarding rules, consulted in declaration order but selected by
    /// specificity.
    pub rules: Vec<ProxyRuleConfig>,
}

/// One forwarding rule as declared in configuration. The executable
/// pre-forward hook is deliberately not part of this type; it is attached
/// to the runtime rule after validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyRuleConfig {
    /// Wildcard pattern to match request paths (e.g. "/api/*").
    pub pattern: String,

    /// Target URL to forward matching requests to.
    pub target: String,

    #[serde(default = "default_rule_enabled")]
    pub enabled: bool,

    /// Optional description of what this rule is for.
    #[serde(default)]
    pub description: Option<String>,

    /// Additional headers added to forwarded requests.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Per-attempt timeout in milliseconds (1000–60000).
    #[serde(default = "default_rule_timeout_ms")]
    pub timeout_ms: u64,

    /// Retry attempts after a failed forward (0–5).
    #[serde(default)]
    pub retries: u32,
}

fn default_rule_enabled() -> bool {
    true
}

fn default_rule_timeout_ms() -> u64 {
    10_000
}

/// Documentation endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Serve the assembled API description over HTTP.
    pub enabled: bool,

    /// Path the description is served from.
    pub path: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/openapi.json".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
