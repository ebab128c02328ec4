//! Semantic configuration checks.
//!
//! Serde handles shape; this module checks values: proxy rule ranges,
//! target URLs, path forms. All problems are collected and reported
//! together rather than failing on the first.

use std::fmt;

use url::Url;

use super::schema::AppConfig;

/// One semantic problem in a configuration, with the field that carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: String, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, rule) in config.proxy.rules.iter().enumerate() {
        let field = |name: &str| format!("proxy.rules[{index}].{name}");

        if !rule.pattern.starts_with('/') {
            errors.push(ValidationError::new(
                field("pattern"),
                "must start with '/'",
            ));
        }

        match Url::parse(&rule.target) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(_) => errors.push(ValidationError::new(
                field("target"),
                "must use the http or https scheme",
            )),
            Err(_) => errors.push(ValidationError::new(field("target"), "must be a valid URL")),
        }

        if !(1_000..=60_000).contains(&rule.timeout_ms) {
            errors.push(ValidationError::new(
                field("timeout_ms"),
                "must be between 1000 and 60000",
            ));
        }

        if rule.retries > 5 {
            errors.push(ValidationError::new(
                field("retries"),
                "must be at most 5",
            ));
        }

        // The whole-request timeout layer must outlast the worst-case
        // retry budget, or it answers 408 before the rule can exhaust
        // its attempts and report 502.
        let budget_ms = rule.timeout_ms.saturating_mul(u64::from(rule.retries) + 1);
        if rule.enabled && budget_ms > config.server.request_timeout_secs.saturating_mul(1000) {
            errors.push(ValidationError::new(
                field("timeout_ms"),
                "timeout_ms * (retries + 1) exceeds server.request_timeout_secs",
            ));
        }
    }

    if config.docs.enabled && !config.docs.path.starts_with('/') {
        errors.push(ValidationError::new(
            "docs.path".to_string(),
            "must start with '/'",
        ));
    }

    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::new(
            "server.max_body_bytes".to_string(),
            "must be greater than zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
