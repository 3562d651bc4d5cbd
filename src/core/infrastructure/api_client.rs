//! Signed HTTP client for the CloudStack API.

use crate::core::{
    domain::{
        error::{CloudStackError, CloudStackResult, ValidationError},
        model::{
            attribute::value_kind, cloudstack_config::RateLimitConfig,
            cloudstack_connection::CloudStackConnection,
        },
    },
    infrastructure::{cloudstack_api::CloudStackApi, signature},
};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

/// HTTP client that signs every request with the connection's API and secret keys.
///
/// Each call is attempted once; errors are returned to the caller as-is.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    connection: Arc<CloudStackConnection>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Errors
    /// Returns `CloudStackError::Validation` for a zero rate limit and
    /// `CloudStackError::Transport` if the HTTP client cannot be built.
    pub fn new(
        connection: CloudStackConnection,
        rate_limit: Option<RateLimitConfig>,
    ) -> CloudStackResult<Self> {
        let http_client = Client::builder()
            .danger_accept_invalid_certs(!connection.verify_ssl())
            .timeout(connection.timeout())
            .build()
            .map_err(|e| CloudStackError::Transport(e.to_string()))?;

        let rate_limiter = rate_limit.map(build_rate_limiter).transpose()?;

        Ok(Self {
            http_client,
            connection: Arc::new(connection),
            rate_limiter,
        })
    }

    /// Returns a reference to the underlying connection details.
    pub fn connection(&self) -> &CloudStackConnection {
        &self.connection
    }

    /// Builds the signed request URL for a command.
    fn request_url(&self, command: &str, params: &[(&str, &str)]) -> CloudStackResult<String> {
        let mut all_params = Vec::with_capacity(params.len() + 3);
        all_params.push(("command", command));
        all_params.push(("apiKey", self.connection.api_key().as_str()));
        all_params.push(("response", "json"));
        all_params.extend_from_slice(params);

        let query = signature::signed_query(&all_params, self.connection.secret_key())?;
        Ok(format!("{}?{}", self.connection.api_url().as_str(), query))
    }

    /// Sends a command and returns the content of its `<command>response` envelope.
    async fn execute(&self, command: &str, params: &[(&str, &str)]) -> CloudStackResult<Value> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let url = self.request_url(command, params)?;
        debug!(command, "Calling CloudStack API");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| CloudStackError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CloudStackError::Transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(api_error(command, status, &body));
        }

        let json: Value = serde_json::from_str(&body).map_err(|e| {
            CloudStackError::Decode(format!("Failed to parse {} response: {}", command, e))
        })?;
        take_envelope(command, json)
    }
}

#[async_trait]
impl CloudStackApi for ApiClient {
    async fn list_domains(&self, list_all: bool) -> CloudStackResult<Vec<Value>> {
        let params: &[(&str, &str)] = if list_all {
            &[("listall", "true")]
        } else {
            &[]
        };
        let envelope = self.execute("listDomains", params).await?;
        take_list(envelope, "domain")
    }

    async fn list_virtual_machines(&self, domain_id: &str) -> CloudStackResult<Vec<Value>> {
        let envelope = self
            .execute(
                "listVirtualMachines",
                &[("domainid", domain_id), ("listall", "true")],
            )
            .await?;
        take_list(envelope, "virtualmachine")
    }

    async fn update_resource_count(&self, domain_id: &str) -> CloudStackResult<()> {
        self.execute("updateResourceCount", &[("domainid", domain_id)])
            .await
            .map(|_| ())
    }
}

fn build_rate_limiter(config: RateLimitConfig) -> CloudStackResult<Arc<DefaultDirectRateLimiter>> {
    config.validate()?;
    let per_second = NonZeroU32::new(config.requests_per_second).ok_or_else(|| {
        ValidationError::ConstraintViolation("requests_per_second must be non-zero".to_string())
    })?;
    let burst = NonZeroU32::new(config.burst_size).ok_or_else(|| {
        ValidationError::ConstraintViolation("burst_size must be non-zero".to_string())
    })?;
    let quota = Quota::per_second(per_second).allow_burst(burst);
    Ok(Arc::new(DefaultDirectRateLimiter::direct(quota)))
}

fn envelope_key(command: &str) -> String {
    format!("{}response", command.to_lowercase())
}

/// Extracts `<command>response` from a decoded body.
fn take_envelope(command: &str, mut json: Value) -> CloudStackResult<Value> {
    let key = envelope_key(command);
    match json.get_mut(&key).map(Value::take) {
        Some(envelope @ Value::Object(_)) => Ok(envelope),
        Some(other) => Err(CloudStackError::Decode(format!(
            "Expected '{}' to be an object, found {}",
            key,
            value_kind(&other)
        ))),
        None => Err(CloudStackError::Decode(format!(
            "Missing '{}' in response",
            key
        ))),
    }
}

/// Extracts a record list from an envelope. CloudStack omits the key for empty lists.
fn take_list(mut envelope: Value, list_key: &str) -> CloudStackResult<Vec<Value>> {
    match envelope.get_mut(list_key).map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(CloudStackError::Decode(format!(
            "Expected '{}' to be a list, found {}",
            list_key,
            value_kind(&other)
        ))),
    }
}

/// Maps a non-success response to an error, preferring CloudStack's own error envelope.
fn api_error(command: &str, status: StatusCode, body: &str) -> CloudStackError {
    let key = envelope_key(command);
    let envelope = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|mut json| json.get_mut(&key).map(Value::take));

    if let Some(envelope) = envelope {
        let text = envelope.get("errortext").and_then(Value::as_str);
        let code = envelope
            .get("errorcode")
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok());
        if let Some(message) = text {
            return CloudStackError::Api {
                code: code.unwrap_or(status.as_u16()),
                message: message.to_string(),
            };
        }
    }

    CloudStackError::Transport(format!("API error ({}): {}", status, body))
}
