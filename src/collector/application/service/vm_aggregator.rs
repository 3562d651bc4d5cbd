use crate::core::{
    domain::{error::CloudStackResult, model::resource_totals::ResourceTotals},
    infrastructure::cloudstack_api::CloudStackApi,
};
use tracing::{debug, warn};

/// Sums the CPU and memory of a domain's virtual machines.
pub struct VmAggregator<'a> {
    api: &'a dyn CloudStackApi,
}

impl<'a> VmAggregator<'a> {
    pub fn new(api: &'a dyn CloudStackApi) -> Self {
        Self { api }
    }

    /// Refreshes the domain's resource counters, then lists and sums its VMs.
    ///
    /// A failed refresh is only logged. A failed VM listing is returned.
    pub async fn aggregate(&self, domain_id: &str) -> CloudStackResult<ResourceTotals> {
        if let Err(e) = self.api.update_resource_count(domain_id).await {
            warn!(domain_id, error = %e, "Resource count refresh failed");
        }

        let vms = self.api.list_virtual_machines(domain_id).await?;
        let totals: ResourceTotals = vms.iter().collect();

        debug!(
            domain_id,
            vms = vms.len(),
            cpu_total = totals.cpu_total,
            memory_total = totals.memory_total,
            "Aggregated VM resources"
        );
        Ok(totals)
    }
}
