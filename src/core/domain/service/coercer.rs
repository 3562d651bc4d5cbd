//! Conversion of untyped JSON attribute values into tags and numeric fields.

use crate::core::domain::{
    error::{CloudStackError, CloudStackResult},
    model::{
        attribute::{
            CPU_AVAILABLE_ATTRIBUTE, MEMORY_AVAILABLE_ATTRIBUTE, UNLIMITED_SENTINEL, value_kind,
        },
        metric::FieldValue,
        resource_totals::ResourceTotals,
    },
    service::classifier::{AttributeClass, classify},
};
use serde_json::Value;

/// The result of coercing one attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    Tag(String),
    Field(FieldValue),
}

/// Coerces one attribute value according to its classification.
///
/// `totals` are subtracted from `cpuavailable`/`memoryavailable` string values.
/// Errors only concern this attribute; callers drop it and carry on.
pub fn coerce(
    attribute: &str,
    value: &Value,
    totals: &ResourceTotals,
) -> CloudStackResult<CoercedValue> {
    match classify(attribute) {
        AttributeClass::Tag => coerce_tag(attribute, value).map(CoercedValue::Tag),
        AttributeClass::Field => coerce_field(attribute, value, totals).map(CoercedValue::Field),
    }
}

fn coerce_tag(attribute: &str, value: &Value) -> CloudStackResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            Err(CloudStackError::UnsupportedTagType {
                attribute: attribute.to_string(),
                found: value_kind(value),
            })
        }
    }
}

fn coerce_field(
    attribute: &str,
    value: &Value,
    totals: &ResourceTotals,
) -> CloudStackResult<FieldValue> {
    match value {
        Value::String(s) if s == UNLIMITED_SENTINEL => Ok(FieldValue::Integer(-1)),
        Value::String(s) => match attribute {
            CPU_AVAILABLE_ATTRIBUTE => subtract_total(attribute, s, totals.cpu_whole()),
            MEMORY_AVAILABLE_ATTRIBUTE => subtract_total(attribute, s, totals.memory_whole()),
            _ => parse_number(attribute, s),
        },
        Value::Number(n) => {
            FieldValue::from_number(n).ok_or_else(|| CloudStackError::UnexpectedValueType {
                attribute: attribute.to_string(),
                found: "number",
            })
        }
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            Err(CloudStackError::UnexpectedValueType {
                attribute: attribute.to_string(),
                found: value_kind(value),
            })
        }
    }
}

fn parse_integer(attribute: &str, raw: &str) -> CloudStackResult<i64> {
    raw.parse::<i64>().map_err(|e| CloudStackError::Parse {
        attribute: attribute.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Parses `raw` as an integer and subtracts the whole VM total from it.
fn subtract_total(attribute: &str, raw: &str, total: Option<i64>) -> CloudStackResult<FieldValue> {
    let available = parse_integer(attribute, raw)?;
    total
        .and_then(|total| available.checked_sub(total))
        .map(FieldValue::Integer)
        .ok_or_else(|| CloudStackError::Parse {
            attribute: attribute.to_string(),
            value: raw.to_string(),
            reason: "overflow".to_string(),
        })
}

/// Integer first, then a finite float.
fn parse_number(attribute: &str, raw: &str) -> CloudStackResult<FieldValue> {
    let int_err = match raw.parse::<i64>() {
        Ok(v) => return Ok(FieldValue::Integer(v)),
        Err(e) => e,
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(FieldValue::Float(v)),
        _ => Err(CloudStackError::Parse {
            attribute: attribute.to_string(),
            value: raw.to_string(),
            reason: int_err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn zero() -> ResourceTotals {
        ResourceTotals::default()
    }

    #[test]
    fn test_tag_string_passes_through() {
        let result = coerce("name", &json!("Dom1"), &zero()).unwrap();
        assert_eq!(result, CoercedValue::Tag("Dom1".to_string()));
    }

    #[test]
    fn test_tag_bool_is_canonical_string() {
        assert_eq!(
            coerce("haschild", &json!(true), &zero()).unwrap(),
            CoercedValue::Tag("true".to_string())
        );
        assert_eq!(
            coerce("haschild", &json!(false), &zero()).unwrap(),
            CoercedValue::Tag("false".to_string())
        );
    }

    #[test]
    fn test_tag_rejects_other_types() {
        for value in [json!(1), json!(null), json!([]), json!({"a": "b"})] {
            let result = coerce("id", &value, &zero());
            assert!(
                matches!(result, Err(CloudStackError::UnsupportedTagType { ref attribute, .. }) if attribute == "id"),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_unlimited_is_minus_one_for_any_field() {
        let totals = ResourceTotals::new(6.0, 2048.0);
        for name in ["cpulimit", "vmlimit", "cpuavailable", "memoryavailable"] {
            assert_eq!(
                coerce(name, &json!("Unlimited"), &totals).unwrap(),
                CoercedValue::Field(FieldValue::Integer(-1)),
                "{name}"
            );
        }
    }

    #[test]
    fn test_unlimited_sentinel_is_case_sensitive() {
        for raw in ["unlimited", "UNLIMITED", " Unlimited"] {
            assert!(matches!(
                coerce("cpulimit", &json!(raw), &zero()),
                Err(CloudStackError::Parse { .. })
            ));
        }
    }

    #[test]
    fn test_numeric_strings_parse() {
        assert_eq!(
            coerce("vmlimit", &json!("20"), &zero()).unwrap(),
            CoercedValue::Field(FieldValue::Integer(20))
        );
        assert_eq!(
            coerce("vmlimit", &json!("-3"), &zero()).unwrap(),
            CoercedValue::Field(FieldValue::Integer(-3))
        );
        assert_eq!(
            coerce("primarystoragetotal", &json!("12.5"), &zero()).unwrap(),
            CoercedValue::Field(FieldValue::Float(12.5))
        );
    }

    #[test]
    fn test_non_numeric_strings_fail() {
        for raw in ["abc", "", "NaN", "inf", "12,5"] {
            let result = coerce("vmlimit", &json!(raw), &zero());
            assert!(
                matches!(result, Err(CloudStackError::Parse { ref value, .. }) if value == raw),
                "{raw:?} should fail to parse"
            );
        }
    }

    #[test]
    fn test_available_fields_subtract_totals() {
        let totals = ResourceTotals::new(6.0, 2048.0);
        assert_eq!(
            coerce("cpuavailable", &json!("20"), &totals).unwrap(),
            CoercedValue::Field(FieldValue::Integer(14))
        );
        assert_eq!(
            coerce("memoryavailable", &json!("8192"), &totals).unwrap(),
            CoercedValue::Field(FieldValue::Integer(6144))
        );
    }

    #[test]
    fn test_available_fields_floor_totals() {
        let totals = ResourceTotals::new(2.9, 100.99);
        assert_eq!(
            coerce("cpuavailable", &json!("10"), &totals).unwrap(),
            CoercedValue::Field(FieldValue::Integer(8))
        );
        assert_eq!(
            coerce("memoryavailable", &json!("1000"), &totals).unwrap(),
            CoercedValue::Field(FieldValue::Integer(900))
        );

        let negative = ResourceTotals::new(-0.5, -1.5);
        assert_eq!(
            coerce("cpuavailable", &json!("10"), &negative).unwrap(),
            CoercedValue::Field(FieldValue::Integer(11))
        );
        assert_eq!(
            coerce("memoryavailable", &json!("10"), &negative).unwrap(),
            CoercedValue::Field(FieldValue::Integer(12))
        );
    }

    #[test]
    fn test_available_fields_overflow_is_a_parse_error() {
        let result = coerce(
            "cpuavailable",
            &json!("-9223372036854775808"),
            &ResourceTotals::new(1.0, 1.0),
        );
        assert_eq!(
            result,
            Err(CloudStackError::Parse {
                attribute: "cpuavailable".to_string(),
                value: "-9223372036854775808".to_string(),
                reason: "overflow".to_string(),
            })
        );

        // totals beyond the i64 range
        let result = coerce("memoryavailable", &json!("-5"), &ResourceTotals::new(0.0, 1e300));
        assert!(matches!(
            result,
            Err(CloudStackError::Parse { ref reason, .. }) if reason == "overflow"
        ));
    }

    #[test]
    fn test_available_fields_require_integers() {
        let result = coerce("cpuavailable", &json!("1.5"), &zero());
        assert!(matches!(result, Err(CloudStackError::Parse { .. })));
        let result = coerce("memoryavailable", &json!("lots"), &zero());
        assert!(matches!(result, Err(CloudStackError::Parse { .. })));
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(
            coerce("vmtotal", &json!(3), &zero()).unwrap(),
            CoercedValue::Field(FieldValue::Integer(3))
        );
        assert_eq!(
            coerce("cputotal", &json!(6.0), &zero()).unwrap(),
            CoercedValue::Field(FieldValue::Float(6.0))
        );
        // numeric availability is not adjusted
        assert_eq!(
            coerce("cpuavailable", &json!(20), &ResourceTotals::new(6.0, 0.0)).unwrap(),
            CoercedValue::Field(FieldValue::Integer(20))
        );
    }

    #[test]
    fn test_field_rejects_structures() {
        for (value, kind) in [
            (json!({"nested": 1}), "object"),
            (json!([1, 2]), "array"),
            (json!(true), "bool"),
            (json!(null), "null"),
        ] {
            let result = coerce("vmlimit", &value, &zero());
            assert_eq!(
                result,
                Err(CloudStackError::UnexpectedValueType {
                    attribute: "vmlimit".to_string(),
                    found: kind,
                })
            );
        }
    }

    #[test]
    fn test_coercion_is_idempotent() {
        let totals = ResourceTotals::new(1.0, 1.0);
        let cases = [
            ("id", json!("d1")),
            ("cpuavailable", json!("5")),
            ("vmlimit", json!("x")),
            ("cpulimit", json!("Unlimited")),
        ];
        for (name, value) in cases {
            assert_eq!(
                coerce(name, &value, &totals),
                coerce(name, &value, &totals)
            );
        }
    }
}
