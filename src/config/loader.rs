//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use super::schema::AppConfig;
use super::validation::validate_config;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(|errors| {
        ConfigError::Validation(
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        )
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(!config.proxy.enabled);
    }

    #[test]
    fn test_parse_proxy_rules() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 3000

            [proxy]
            enabled = true

            [[proxy.rules]]
            pattern = "/api/*"
            target = "https://api.example.com"
            retries = 2

            [proxy.rules.headers]
            "x-forwarded-by" = "gateway"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert!(config.proxy.enabled);
        assert_eq!(config.proxy.rules.len(), 1);

        let rule = &config.proxy.rules[0];
        assert_eq!(rule.pattern, "/api/*");
        assert!(rule.enabled);
        assert_eq!(rule.timeout_ms, 10_000);
        assert_eq!(rule.retries, 2);
        assert_eq!(rule.headers["x-forwarded-by"], "gateway");
    }
}
