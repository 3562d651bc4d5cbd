//! The sink that receives normalized records and error reports.

use crate::core::domain::{
    error::CloudStackError,
    model::metric::{FieldSet, TagSet},
};
use std::fmt;
use tracing::{error, warn};

/// Receives one emission per normalized domain record plus out-of-band error reports.
///
/// Error reports never stop a collection cycle.
pub trait Accumulator: Send {
    /// Records one measurement.
    fn add_fields(&mut self, measurement: &str, fields: FieldSet, tags: TagSet);

    /// Records an error that did not abort the cycle (or the one that did).
    fn add_error(&mut self, error: CloudStackError);
}

/// Logs an error that does not abort the cycle and hands it to the accumulator.
///
/// Failed calls are logged at error level, dropped attributes at warn level.
pub(crate) fn report(acc: &mut dyn Accumulator, err: CloudStackError) {
    if err.is_fatal() {
        error!(error = %err, "CloudStack call failed");
    } else {
        warn!(error = %err, "Dropped CloudStack attribute");
    }
    acc.add_error(err);
}

/// One measurement handed to an accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub measurement: String,
    pub tags: TagSet,
    pub fields: FieldSet,
}

/// Escapes the characters that delimit measurement, tag and field keys in line protocol.
fn escape(raw: &str) -> String {
    raw.replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}

impl fmt::Display for Emission {
    /// Influx line protocol without timestamp.
    ///
    /// An emission without fields renders as its series key alone, which line
    /// protocol parsers reject.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", escape(&self.measurement))?;
        for (key, value) in &self.tags {
            write!(f, ",{}={}", escape(key), escape(value))?;
        }
        if self.fields.is_empty() {
            return Ok(());
        }
        let fields = self
            .fields
            .iter()
            .map(|(key, value)| format!("{}={}", escape(key), value))
            .collect::<Vec<_>>()
            .join(",");
        write!(f, " {}", fields)
    }
}

/// Accumulator that keeps everything in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryAccumulator {
    emissions: Vec<Emission>,
    errors: Vec<CloudStackError>,
}

impl MemoryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emissions(&self) -> &[Emission] {
        &self.emissions
    }

    pub fn errors(&self) -> &[CloudStackError] {
        &self.errors
    }

    /// Returns the first emission carrying the given tag value.
    pub fn find_by_tag(&self, tag: &str, value: &str) -> Option<&Emission> {
        self.emissions
            .iter()
            .find(|e| e.tags.get(tag).is_some_and(|v| v == value))
    }
}

impl Accumulator for MemoryAccumulator {
    fn add_fields(&mut self, measurement: &str, fields: FieldSet, tags: TagSet) {
        self.emissions.push(Emission {
            measurement: measurement.to_string(),
            tags,
            fields,
        });
    }

    fn add_error(&mut self, error: CloudStackError) {
        self.errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::model::metric::FieldValue;

    #[test]
    fn test_memory_accumulator_keeps_order() {
        let mut acc = MemoryAccumulator::new();
        for id in ["d1", "d2"] {
            let tags = TagSet::from([("id".to_string(), id.to_string())]);
            acc.add_fields("cs_domain", FieldSet::new(), tags);
        }
        acc.add_error(CloudStackError::Decode("x".to_string()));

        assert_eq!(acc.emissions().len(), 2);
        assert_eq!(acc.emissions()[0].tags["id"], "d1");
        assert_eq!(acc.find_by_tag("id", "d2").unwrap().measurement, "cs_domain");
        assert!(acc.find_by_tag("id", "d3").is_none());
        assert_eq!(acc.errors().len(), 1);
    }

    #[test]
    fn test_line_protocol() {
        let emission = Emission {
            measurement: "cs_domain".to_string(),
            tags: TagSet::from([
                ("id".to_string(), "d1".to_string()),
                ("name".to_string(), "My Dom".to_string()),
            ]),
            fields: FieldSet::from([
                ("cpulimit".to_string(), FieldValue::Integer(-1)),
                ("cputotal".to_string(), FieldValue::Float(6.5)),
            ]),
        };
        assert_eq!(
            emission.to_string(),
            "cs_domain,id=d1,name=My\\ Dom cpulimit=-1i,cputotal=6.5"
        );
    }

    #[test]
    fn test_line_protocol_without_fields() {
        let emission = Emission {
            measurement: "cs_domain".to_string(),
            tags: TagSet::from([("id".to_string(), "d1".to_string())]),
            fields: FieldSet::new(),
        };
        assert_eq!(emission.to_string(), "cs_domain,id=d1");
    }

    #[test]
    fn test_report_forwards_every_error() {
        let mut acc = MemoryAccumulator::new();
        let call_failure = CloudStackError::Transport("refused".to_string());
        let dropped = CloudStackError::Parse {
            attribute: "vmlimit".to_string(),
            value: "many".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        report(&mut acc, call_failure.clone());
        report(&mut acc, dropped.clone());
        assert_eq!(acc.errors(), &[call_failure, dropped]);
    }
}
