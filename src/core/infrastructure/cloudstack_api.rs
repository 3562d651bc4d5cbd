//! The calls the collector makes against CloudStack.

use crate::core::domain::error::CloudStackResult;
use async_trait::async_trait;
use serde_json::Value;

/// CloudStack API commands used by the collector.
///
/// Implementations return the decoded records of each response list. Records are
/// left untyped; the collector decides per record and attribute what to keep.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CloudStackApi: Send + Sync {
    /// `listDomains`. With `list_all`, the whole hierarchy visible to the caller.
    async fn list_domains(&self, list_all: bool) -> CloudStackResult<Vec<Value>>;

    /// `listVirtualMachines` scoped to one domain.
    async fn list_virtual_machines(&self, domain_id: &str) -> CloudStackResult<Vec<Value>>;

    /// `updateResourceCount` for one domain. The response body is not used.
    async fn update_resource_count(&self, domain_id: &str) -> CloudStackResult<()>;
}
