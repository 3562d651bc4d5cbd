//! Collector configuration: the TOML plugin block plus environment overrides.

use crate::core::domain::error::{CloudStackError, CloudStackResult, ValidationError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `api_url`.
pub const ENV_API_URL: &str = "CLOUDSTACK_API_URL";
/// Environment variable overriding `api_key`.
pub const ENV_API_KEY: &str = "CLOUDSTACK_API_KEY";
/// Environment variable overriding `secret_key`.
pub const ENV_SECRET_KEY: &str = "CLOUDSTACK_SECRET_KEY";

/// Example configuration documenting every key.
pub const SAMPLE_CONFIG: &str = r#"
  ## You can skip the client setup portion of this config if the following environment variables are set:
  ## CLOUDSTACK_API_URL
  ## CLOUDSTACK_API_KEY
  ## CLOUDSTACK_SECRET_KEY

  ## Specify the cloudstack api url. This can also be extracted from CLOUDSTACK_API_URL
  api_url = "http://localhost:8080/client/api"

  ## The api key for the cloudstack API. This can also be extracted from CLOUDSTACK_API_KEY
  api_key = ""

  ## The api secret key for the cloudstack API. This can also be extracted from CLOUDSTACK_SECRET_KEY
  secret_key = ""

  ## Verify the TLS certificate of the API endpoint
  verify_ssl = true

  ## Only report these domains (all listed domains when empty)
  domain_ids = []

  ## List domains across the whole hierarchy visible to the key
  all_domains = true

  ## Request timeout in seconds
  timeout = 20

  ## Optional client-side rate limit
  # [rate_limit]
  # requests_per_second = 10
  # burst_size = 20
"#;

/// Client-side request rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// Both values must be at least one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.requests_per_second == 0 {
            return Err(ValidationError::Field {
                field: "rate_limit.requests_per_second".to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }
        if self.burst_size == 0 {
            return Err(ValidationError::Field {
                field: "rate_limit.burst_size".to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Settings of the CloudStack input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloudStackConfig {
    pub api_url: String,
    #[serde(alias = "api_access_key")]
    pub api_key: String,
    #[serde(alias = "api_secret_key")]
    pub secret_key: String,
    pub verify_ssl: bool,
    pub domain_ids: Vec<String>,
    pub all_domains: bool,
    /// Request timeout in seconds.
    pub timeout: u64,
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for CloudStackConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            secret_key: String::new(),
            verify_ssl: true,
            domain_ids: Vec::new(),
            all_domains: true,
            timeout: 20,
            rate_limit: None,
        }
    }
}

impl CloudStackConfig {
    /// Parses a TOML plugin block.
    pub fn from_toml_str(raw: &str) -> CloudStackResult<Self> {
        toml::from_str(raw)
            .map_err(|e| CloudStackError::Configuration(format!("Invalid configuration: {}", e)))
    }

    /// Reads and parses a TOML file, then applies the `CLOUDSTACK_*` environment overrides.
    pub async fn from_file(path: impl AsRef<Path>) -> CloudStackResult<Self> {
        Self::from_file_with_overrides(path, |key| std::env::var(key).ok()).await
    }

    /// Same as [`from_file`](Self::from_file) with a custom override lookup.
    pub async fn from_file_with_overrides<F>(
        path: impl AsRef<Path>,
        lookup: F,
    ) -> CloudStackResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            CloudStackError::Configuration(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&raw)?;
        config.apply_overrides(lookup);
        Ok(config)
    }

    /// Defaults plus the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Replaces the connection settings with the `CLOUDSTACK_*` environment variables that are set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Same as [`apply_env_overrides`](Self::apply_env_overrides) with a custom lookup.
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(url) = get(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(secret) = get(ENV_SECRET_KEY) {
            self.secret_key = secret;
        }
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Checks the settings that are not covered by the connection value objects.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout == 0 {
            return Err(ValidationError::Field {
                field: "timeout".to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }
        if let Some(rate_limit) = &self.rate_limit {
            rate_limit.validate()?;
        }
        Ok(())
    }
}
