//! Proxy rule construction.
//!
//! Rules are built once from validated configuration (or programmatically)
//! and never mutated afterwards. The pre-forward hook is attached after
//! validation and is never part of the serialized configuration.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use url::Url;

use super::hook::PreForwardHook;
use super::pattern::PathPattern;
use crate::config::ProxyRuleConfig;
use crate::error::GatewayError;

/// A single forwarding rule.
pub struct ProxyRule {
    pub pattern: PathPattern,
    pub target: Url,
    pub enabled: bool,
    /// Static headers added to every forwarded request.
    pub headers: HashMap<String, String>,
    pub timeout: Duration,
    /// Extra attempts after the first failed one (`retries + 1` total).
    pub retries: u32,
    pub description: Option<String>,
    pub hook: Option<PreForwardHook>,
}

impl ProxyRule {
    /// A rule with the defaults: enabled, 10s timeout, no retries, no
    /// headers, no hook.
    pub fn new(pattern: &str, target: Url) -> Self {
        Self {
            pattern: PathPattern::parse(pattern),
            target,
            enabled: true,
            headers: HashMap::new(),
            timeout: Duration::from_millis(10_000),
            retries: 0,
            description: None,
            hook: None,
        }
    }

    pub fn from_config(config: &ProxyRuleConfig) -> Result<Self, GatewayError> {
        let target = Url::parse(&config.target)
            .map_err(|_| GatewayError::InvalidTarget(config.target.clone()))?;
        Ok(Self {
            pattern: PathPattern::parse(&config.pattern),
            target,
            enabled: config.enabled,
            headers: config.headers.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            retries: config.retries,
            description: config.description.clone(),
            hook: None,
        })
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_hook(mut self, hook: PreForwardHook) -> Self {
        self.hook = Some(hook);
        self
    }
}

impl fmt::Debug for ProxyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyRule")
            .field("pattern", &self.pattern.as_str())
            .field("target", &self.target.as_str())
            .field("enabled", &self.enabled)
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("description", &self.description)
            .field("hook", &self.hook.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Build the runtime rule list from validated configuration, in declaration
/// order.
pub fn rules_from_config(configs: &[ProxyRuleConfig]) -> Result<Vec<ProxyRule>, GatewayError> {
    configs.iter().map(ProxyRule::from_config).collect()
}

/// Attach a hook to the rule declared with exactly `pattern`. Returns false
/// if no such rule exists.
pub fn attach_hook(rules: &mut [ProxyRule], pattern: &str, hook: PreForwardHook) -> bool {
    for rule in rules.iter_mut() {
        if rule.pattern.as_str() == pattern {
            rule.hook = Some(hook);
            return true;
        }
    }
    false
}
