use crate::core::domain::{
    error::CloudStackResult,
    model::cloudstack_config::CloudStackConfig,
    value_object::{ApiKey, CloudStackUrl, SecretKey},
};
use std::time::Duration;

/// Validated connection settings for one CloudStack endpoint.
#[derive(Debug, Clone)]
pub struct CloudStackConnection {
    api_url: CloudStackUrl,
    api_key: ApiKey,
    secret_key: SecretKey,
    verify_ssl: bool,
    timeout: Duration,
}

impl CloudStackConnection {
    pub fn new(
        api_url: CloudStackUrl,
        api_key: ApiKey,
        secret_key: SecretKey,
        verify_ssl: bool,
        timeout: Duration,
    ) -> Self {
        Self {
            api_url,
            api_key,
            secret_key,
            verify_ssl,
            timeout,
        }
    }

    /// Validates the connection part of a configuration.
    pub fn from_config(config: &CloudStackConfig) -> CloudStackResult<Self> {
        config.validate()?;
        Ok(Self::new(
            CloudStackUrl::new(&config.api_url)?,
            ApiKey::new(config.api_key.clone())?,
            SecretKey::new(config.secret_key.clone())?,
            config.verify_ssl,
            config.timeout(),
        ))
    }

    pub fn api_url(&self) -> &CloudStackUrl {
        &self.api_url
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
