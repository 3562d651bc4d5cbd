use crate::{
    collector::application::{
        accumulator::{Accumulator, report},
        service::vm_aggregator::VmAggregator,
    },
    core::{
        domain::{
            error::CloudStackError,
            model::{
                attribute::{CPU_TOTAL_ATTRIBUTE, ID_ATTRIBUTE, MEMORY_TOTAL_ATTRIBUTE, RawAttributeMap},
                metric::NormalizedRecord,
                resource_totals::ResourceTotals,
            },
            service::coercer::{CoercedValue, coerce},
        },
        infrastructure::cloudstack_api::CloudStackApi,
    },
};
use serde_json::{Number, Value};
use tracing::warn;

/// Turns raw domain records into normalized tag and field sets.
pub struct DomainRecordBuilder<'a> {
    aggregator: VmAggregator<'a>,
}

impl<'a> DomainRecordBuilder<'a> {
    pub fn new(api: &'a dyn CloudStackApi) -> Self {
        Self {
            aggregator: VmAggregator::new(api),
        }
    }

    /// Aggregates the domain's VMs and normalizes the record.
    ///
    /// Never fails: aggregation errors fall back to zero totals and attribute
    /// errors drop the attribute, each reported to `acc`.
    pub async fn build_record(
        &self,
        domain: &RawAttributeMap,
        acc: &mut dyn Accumulator,
    ) -> NormalizedRecord {
        let totals = self.totals_for(domain, acc).await;
        normalize(domain, &totals, acc)
    }

    async fn totals_for(
        &self,
        domain: &RawAttributeMap,
        acc: &mut dyn Accumulator,
    ) -> ResourceTotals {
        let Some(domain_id) = domain.get(ID_ATTRIBUTE).and_then(Value::as_str) else {
            report(
                acc,
                CloudStackError::Decode("Domain record has no string 'id'".to_string()),
            );
            return ResourceTotals::default();
        };

        match self.aggregator.aggregate(domain_id).await {
            Ok(totals) => totals,
            Err(e) => {
                warn!(domain_id, "Using zero VM totals");
                report(acc, e);
                ResourceTotals::default()
            }
        }
    }
}

/// Classifies and coerces every attribute of `domain` plus the synthetic totals.
pub fn normalize(
    domain: &RawAttributeMap,
    totals: &ResourceTotals,
    acc: &mut dyn Accumulator,
) -> NormalizedRecord {
    let mut attributes = domain.clone();
    for (name, total) in [
        (CPU_TOTAL_ATTRIBUTE, totals.cpu_total),
        (MEMORY_TOTAL_ATTRIBUTE, totals.memory_total),
    ] {
        match Number::from_f64(total) {
            Some(number) => {
                attributes.insert(name.to_string(), Value::Number(number));
            }
            None => {
                attributes.remove(name);
                report(
                    acc,
                    CloudStackError::UnexpectedValueType {
                        attribute: name.to_string(),
                        found: "non-finite number",
                    },
                );
            }
        }
    }

    let mut record = NormalizedRecord::new();
    for (name, value) in &attributes {
        match coerce(name, value, totals) {
            Ok(CoercedValue::Tag(tag)) => {
                record.tags.insert(name.clone(), tag);
            }
            Ok(CoercedValue::Field(field)) => {
                record.fields.insert(name.clone(), field);
            }
            Err(e) => report(acc, e),
        }
    }
    record
}
