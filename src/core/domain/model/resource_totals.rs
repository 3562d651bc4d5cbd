//! Per-domain resource totals summed over the domain's virtual machines.

use crate::core::domain::model::attribute::{VM_CPU_ATTRIBUTE, VM_MEMORY_ATTRIBUTE};
use serde_json::Value;

/// CPU and memory summed across the VMs of one domain.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResourceTotals {
    /// Sum of `cpunumber` over all VMs.
    pub cpu_total: f64,
    /// Sum of `memory` over all VMs (MiB, as reported by CloudStack).
    pub memory_total: f64,
}

impl ResourceTotals {
    pub fn new(cpu_total: f64, memory_total: f64) -> Self {
        Self {
            cpu_total,
            memory_total,
        }
    }

    /// Adds one VM record. Records that are not objects, and attributes that are
    /// missing or not numeric, contribute zero.
    pub fn add_vm(&mut self, vm: &Value) {
        let Some(attributes) = vm.as_object() else {
            return;
        };
        self.cpu_total += attributes
            .get(VM_CPU_ATTRIBUTE)
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        self.memory_total += attributes
            .get(VM_MEMORY_ATTRIBUTE)
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
    }

    /// CPU total rounded down, `None` if it does not fit an `i64`.
    pub fn cpu_whole(&self) -> Option<i64> {
        whole(self.cpu_total)
    }

    /// Memory total rounded down, `None` if it does not fit an `i64`.
    pub fn memory_whole(&self) -> Option<i64> {
        whole(self.memory_total)
    }
}

fn whole(total: f64) -> Option<i64> {
    let floored = total.floor();
    // i64::MAX as f64 is 2^63, one past the largest i64
    (floored >= i64::MIN as f64 && floored < i64::MAX as f64).then_some(floored as i64)
}

impl<'a> FromIterator<&'a Value> for ResourceTotals {
    fn from_iter<I: IntoIterator<Item = &'a Value>>(iter: I) -> Self {
        let mut totals = ResourceTotals::default();
        for vm in iter {
            totals.add_vm(vm);
        }
        totals
    }
}
