//! 客户端配置：服务地址、API 密钥、超时与代理。
//!
//! Client configuration.
//!
//! A [`ClientConfig`] holds the only state a façade keeps across calls: the
//! base endpoint and credential, plus transport knobs. It is either built
//! explicitly or loaded from environment variables:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `AIPLATFORM_API_KEY` | bearer token | required |
//! | `AIPLATFORM_BASE_URL` | service base URL | none |
//! | `AIPLATFORM_HTTP_TIMEOUT_SECS` | overall request timeout | 300 |
//! | `AIPLATFORM_PROXY_URL` | HTTP(S) proxy | none |

use crate::error::{Error, ErrorContext};
use crate::Result;
use std::env;
use std::time::Duration;

pub const ENV_API_KEY: &str = "AIPLATFORM_API_KEY";
pub const ENV_BASE_URL: &str = "AIPLATFORM_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "AIPLATFORM_HTTP_TIMEOUT_SECS";
pub const ENV_PROXY_URL: &str = "AIPLATFORM_PROXY_URL";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Base URL used by [`crate::ModelService`] when none is configured.
pub const DEFAULT_MAAS_BASE_URL: &str = "https://infinitai.sifymdp.digital/maas";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub proxy_url: Option<String>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            proxy_url: None,
            user_agent: default_user_agent(),
        }
    }

    /// Load from `AIPLATFORM_*` environment variables. The base URL may be
    /// empty here; builders fill in a service default or reject it.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(ENV_API_KEY).map_err(|_| {
            Error::configuration_with_context(
                format!("{} is not set", ENV_API_KEY),
                ErrorContext::new()
                    .with_field_path(ENV_API_KEY)
                    .with_source("environment"),
            )
        })?;
        let base_url = env::var(ENV_BASE_URL).unwrap_or_default();

        let timeout = match env::var(ENV_TIMEOUT_SECS) {
            Ok(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    Error::configuration_with_context(
                        format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS),
                        ErrorContext::new()
                            .with_field_path(ENV_TIMEOUT_SECS)
                            .with_details(format!("got '{}'", raw))
                            .with_source("environment"),
                    )
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_TIMEOUT,
        };

        let proxy_url = env::var(ENV_PROXY_URL)
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            base_url,
            api_key,
            timeout,
            proxy_url,
            user_agent: default_user_agent(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check and normalise: trims the key, trims whitespace and trailing `/`
    /// from the base URL, and requires the URL to parse.
    pub fn validated(mut self) -> Result<Self> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(Error::configuration_with_context(
                "api_key must not be empty",
                ErrorContext::new().with_field_path("api_key"),
            ));
        }
        self.api_key = key.to_string();

        let base = self.base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(Error::configuration_with_context(
                "base_url must not be empty",
                ErrorContext::new().with_field_path("base_url"),
            ));
        }
        url::Url::parse(base).map_err(|e| {
            Error::configuration_with_context(
                format!("base_url is not a valid URL: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(base.to_string()),
            )
        })?;
        self.base_url = base.to_string();

        if self.timeout.is_zero() {
            return Err(Error::configuration_with_context(
                "timeout must be greater than zero",
                ErrorContext::new().with_field_path("timeout"),
            ));
        }
        Ok(self)
    }
}

fn default_user_agent() -> String {
    format!("aiplatform-rust/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validated_trims_url_and_key() {
        let cfg = ClientConfig::new(" https://api.example.com/v1/ ", "  sk-123 ")
            .validated()
            .unwrap();
        assert_eq!(cfg.base_url, "https://api.example.com/v1");
        assert_eq!(cfg.api_key, "sk-123");
        assert_eq!(cfg.timeout, Duration::from_secs(300));
        assert!(cfg.user_agent.starts_with("aiplatform-rust/"));
    }

    #[test]
    fn blank_key_is_rejected() {
        let err = ClientConfig::new("https://api.example.com", "   ")
            .validated()
            .unwrap_err();
        assert_eq!(err.message(), "api_key must not be empty");
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("api_key")
        );
    }

    #[test]
    fn unparseable_url_is_rejected() {
        let err = ClientConfig::new("not a url", "k").validated().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(err.message().starts_with("base_url is not a valid URL"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ClientConfig::new("http://localhost:1", "k")
            .with_timeout(Duration::ZERO)
            .validated()
            .unwrap_err();
        assert_eq!(err.message(), "timeout must be greater than zero");
    }
}
