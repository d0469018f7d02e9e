use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Url;
use serde::Deserialize;

use crate::auth::{CredentialStore, StaticCredentials};

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: String,
    pub backend_base_url: String,
    pub timeout_ms: u64,
    pub max_body_bytes: usize,
    pub credentials: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
            backend_base_url: "http://localhost:8000/api".to_string(),
            timeout_ms: 30_000,
            max_body_bytes: 2 * 1024 * 1024,
            credentials: HashMap::new(),
        }
    }
}

/// Immutable view of the configuration shared by every request handler.
pub struct GatewayConfig {
    pub backend_base_url: String,
    pub credentials: Arc<dyn CredentialStore>,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn from_config(config: &Config) -> Result<Self> {
        let url = Url::parse(&config.backend_base_url)
            .with_context(|| format!("Invalid backend_base_url: {}", config.backend_base_url))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(anyhow!(
                "Unsupported backend scheme {} in {}",
                url.scheme(),
                config.backend_base_url
            ));
        }

        if config.timeout_ms == 0 {
            bail!("timeout_ms must be greater than zero");
        }

        if config.credentials.is_empty() {
            tracing::warn!("no credentials configured; every request will be rejected");
        }

        Ok(Self {
            backend_base_url: config.backend_base_url.clone(),
            credentials: Arc::new(StaticCredentials::new(config.credentials.clone())),
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("backend_base_url", &self.backend_base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let config: Config = toml::from_str(
            r#"
            listen = "127.0.0.1:4000"
            backend_base_url = "http://backend:8000/api"
            timeout_ms = 500

            [credentials]
            admin = "supersecretpassword"
            "#,
        )
        .unwrap();

        assert_eq!(config.listen, "127.0.0.1:4000");
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.max_body_bytes, 2 * 1024 * 1024);
        assert_eq!(config.credentials["admin"], "supersecretpassword");

        let gateway = GatewayConfig::from_config(&config).unwrap();
        assert_eq!(gateway.timeout, Duration::from_millis(500));
        assert_eq!(gateway.credentials.lookup("admin"), Some("supersecretpassword"));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.backend_base_url, "http://localhost:8000/api");
        assert!(config.credentials.is_empty());
    }

    #[test]
    fn rejects_bad_backend_url() {
        let config = Config {
            backend_base_url: "localhost:8000".to_string(),
            ..Default::default()
        };
        assert!(GatewayConfig::from_config(&config).is_err());

        let config = Config {
            backend_base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(GatewayConfig::from_config(&config).is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = Config {
            timeout_ms: 0,
            ..Default::default()
        };
        assert!(GatewayConfig::from_config(&config).is_err());
    }
}
