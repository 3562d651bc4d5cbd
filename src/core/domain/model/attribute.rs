//! Raw attribute maps as decoded from CloudStack API records.

use serde_json::{Map, Value};

/// One decoded domain or virtual machine record: attribute name to untyped JSON value.
pub type RawAttributeMap = Map<String, Value>;

/// Attribute name of the entity identifier.
pub const ID_ATTRIBUTE: &str = "id";

/// Synthetic attribute carrying the summed VM CPU count of a domain.
pub const CPU_TOTAL_ATTRIBUTE: &str = "cputotal";

/// Synthetic attribute carrying the summed VM memory of a domain.
pub const MEMORY_TOTAL_ATTRIBUTE: &str = "memorytotal";

/// Domain attribute adjusted by the CPU total.
pub const CPU_AVAILABLE_ATTRIBUTE: &str = "cpuavailable";

/// Domain attribute adjusted by the memory total.
pub const MEMORY_AVAILABLE_ATTRIBUTE: &str = "memoryavailable";

/// VM attribute holding the number of virtual CPUs.
pub const VM_CPU_ATTRIBUTE: &str = "cpunumber";

/// VM attribute holding the allocated memory.
pub const VM_MEMORY_ATTRIBUTE: &str = "memory";

/// Wire-level marker CloudStack uses for a quota without limit.
pub const UNLIMITED_SENTINEL: &str = "Unlimited";

/// Short name of a JSON value's variant, used in error reports.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
