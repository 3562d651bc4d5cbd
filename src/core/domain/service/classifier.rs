//! Tag/field classification of CloudStack attribute names.

/// Attribute names emitted as tags. Everything else is a field.
pub const TAG_ATTRIBUTES: [&str; 8] = [
    "haschild",
    "id",
    "name",
    "parentdomainid",
    "parentdomainname",
    "path",
    "state",
    "networkdomain",
];

/// Which half of a metric record an attribute belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeClass {
    Tag,
    Field,
}

/// Classifies an attribute by its name alone.
///
/// Matching is exact and case-sensitive: `domainid` or `Name` are fields.
pub fn classify(attribute: &str) -> AttributeClass {
    if TAG_ATTRIBUTES.contains(&attribute) {
        AttributeClass::Tag
    } else {
        AttributeClass::Field
    }
}
