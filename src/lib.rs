//! CloudStack domain quota collector.
//!
//! Lists the domains visible to an API key, sums the CPU and memory of each
//! domain's virtual machines and emits one `cs_domain` measurement per domain,
//! with identifying attributes as tags and quota/usage attributes as numeric fields.

mod collector;
mod core;


pub use crate::collector::application::{
    accumulator::{Accumulator, Emission, MemoryAccumulator},
    service::{
        domain_record_builder::{DomainRecordBuilder, normalize},
        gather_service::GatherService,
        vm_aggregator::VmAggregator,
    },
};
pub use crate::core::domain::{
    error::{CloudStackError, CloudStackResult, ValidationError},
    model::{
        attribute::{RawAttributeMap, UNLIMITED_SENTINEL},
        cloudstack_config::{CloudStackConfig, RateLimitConfig, SAMPLE_CONFIG},
        cloudstack_connection::CloudStackConnection,
        metric::{DOMAIN_MEASUREMENT, FieldSet, FieldValue, NormalizedRecord, TagSet},
        resource_totals::ResourceTotals,
    },
    service::{
        classifier::{AttributeClass, TAG_ATTRIBUTES, classify},
        coercer::{CoercedValue, coerce},
    },
    value_object::{ApiKey, CloudStackUrl, SecretKey},
};
pub use crate::core::infrastructure::{api_client::ApiClient, cloudstack_api::CloudStackApi};

use std::sync::Arc;
use std::time::Duration;

const DESCRIPTION: &str =
    "This plugin queries the CloudStack api listDomains command and grabs domain the data.";

/// Polls a CloudStack endpoint and normalizes domain quota data.
///
/// # Examples
///
/// ```no_run
/// use cloudstack_collector::{CloudStackCollector, CloudStackResult, MemoryAccumulator};
///
/// #[tokio::main]
/// async fn main() -> CloudStackResult<()> {
///     let collector = CloudStackCollector::builder()
///         .api_url("https://cloud.example.com/client/api")
///         .credentials("api-key", "secret-key")
///         .build()?;
///
///     let mut acc = MemoryAccumulator::new();
///     collector.gather(&mut acc).await?;
///     for emission in acc.emissions() {
///         println!("{emission}");
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CloudStackCollector {
    api: Arc<dyn CloudStackApi>,
    domain_ids: Vec<String>,
    all_domains: bool,
}

/// Builder for CloudStackCollector configuration
#[derive(Debug)]
pub struct CloudStackCollectorBuilder {
    config: CloudStackConfig,
}

impl CloudStackCollectorBuilder {
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn credentials(mut self, api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self.config.secret_key = secret_key.into();
        self
    }

    pub fn verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.config.verify_ssl = verify_ssl;
        self
    }

    /// Restricts emission to these domain ids.
    pub fn domain_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.domain_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn all_domains(mut self, all_domains: bool) -> Self {
        self.config.all_domains = all_domains;
        self
    }

    /// Request timeout, in whole seconds. Must be at least one second.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout.as_secs();
        self
    }

    pub fn rate_limit(mut self, requests_per_second: u32, burst_size: u32) -> Self {
        self.config.rate_limit = Some(RateLimitConfig {
            requests_per_second,
            burst_size,
        });
        self
    }

    /// Validates the settings and creates the HTTP client.
    ///
    /// # Errors
    /// `CloudStackError::Validation` for a bad URL, key, timeout or rate limit.
    pub fn build(self) -> CloudStackResult<CloudStackCollector> {
        CloudStackCollector::from_config(self.config)
    }
}

impl CloudStackCollector {
    /// Creates a new builder for CloudStackCollector configuration
    pub fn builder() -> CloudStackCollectorBuilder {
        CloudStackCollectorBuilder {
            config: CloudStackConfig::default(),
        }
    }

    /// Creates a collector from a parsed configuration.
    pub fn from_config(config: CloudStackConfig) -> CloudStackResult<Self> {
        let connection = CloudStackConnection::from_config(&config)?;
        let api_client = ApiClient::new(connection, config.rate_limit)?;
        Ok(Self::with_api(
            Arc::new(api_client),
            config.domain_ids,
            config.all_domains,
        ))
    }

    /// Creates a collector on top of any API implementation.
    pub fn with_api(api: Arc<dyn CloudStackApi>, domain_ids: Vec<String>, all_domains: bool) -> Self {
        Self {
            api,
            domain_ids,
            all_domains,
        }
    }

    /// Runs one collection cycle, emitting one `cs_domain` measurement per domain.
    ///
    /// # Errors
    ///
    /// Returns the error of the domain listing call, which aborts the cycle.
    /// Every other problem is reported to `acc` and collection continues.
    pub async fn gather(&self, acc: &mut dyn Accumulator) -> CloudStackResult<()> {
        GatherService::new(self.api.as_ref(), &self.domain_ids, self.all_domains)
            .execute(acc)
            .await
    }

    /// One-line description of the input.
    pub fn description() -> &'static str {
        DESCRIPTION
    }

    /// Commented example configuration.
    pub fn sample_config() -> &'static str {
        SAMPLE_CONFIG
    }
}
