use crate::{
    collector::application::{
        accumulator::{Accumulator, report},
        service::domain_record_builder::DomainRecordBuilder,
    },
    core::{
        domain::{
            error::{CloudStackError, CloudStackResult},
            model::{
                attribute::{ID_ATTRIBUTE, RawAttributeMap, value_kind},
                metric::DOMAIN_MEASUREMENT,
            },
        },
        infrastructure::cloudstack_api::CloudStackApi,
    },
};
use serde_json::Value;
use tracing::{debug, error, info};

/// Runs one collection cycle: list domains, normalize each, emit each.
pub struct GatherService<'a> {
    api: &'a dyn CloudStackApi,
    domain_ids: &'a [String],
    all_domains: bool,
}

impl<'a> GatherService<'a> {
    pub fn new(api: &'a dyn CloudStackApi, domain_ids: &'a [String], all_domains: bool) -> Self {
        Self {
            api,
            domain_ids,
            all_domains,
        }
    }

    /// Executes the cycle.
    ///
    /// # Errors
    /// Only a failed domain listing is returned (after being reported to `acc`);
    /// per-domain and per-attribute problems are reported and skipped.
    pub async fn execute(&self, acc: &mut dyn Accumulator) -> CloudStackResult<()> {
        let domains = match self.api.list_domains(self.all_domains).await {
            Ok(domains) => domains,
            Err(e) => {
                error!(error = %e, "Error listing domain data");
                acc.add_error(e.clone());
                return Err(e);
            }
        };

        let builder = DomainRecordBuilder::new(self.api);
        let mut emitted = 0usize;
        for domain in &domains {
            let Some(raw) = domain.as_object() else {
                report(
                    acc,
                    CloudStackError::UnexpectedValueType {
                        attribute: "domain".to_string(),
                        found: value_kind(domain),
                    },
                );
                continue;
            };
            if !self.is_selected(raw) {
                debug!(domain_id = ?raw.get(ID_ATTRIBUTE), "Skipping unselected domain");
                continue;
            }

            let (tags, fields) = builder.build_record(raw, acc).await.into_parts();
            acc.add_fields(DOMAIN_MEASUREMENT, fields, tags);
            emitted += 1;
        }

        info!(listed = domains.len(), emitted, "CloudStack collection finished");
        Ok(())
    }

    fn is_selected(&self, domain: &RawAttributeMap) -> bool {
        if self.domain_ids.is_empty() {
            return true;
        }
        domain
            .get(ID_ATTRIBUTE)
            .and_then(Value::as_str)
            .is_some_and(|id| self.domain_ids.iter().any(|wanted| wanted == id))
    }
}
