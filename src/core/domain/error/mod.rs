use thiserror::Error;

/// The main error type for CloudStack collection.
///
/// Variants fall into two groups. Transport-class errors (`Transport`, `Decode`,
/// `Api`, `Validation`, `Configuration`) mean a call or setup step failed as a whole.
/// Data-class errors (`UnsupportedTagType`, `UnexpectedValueType`, `Parse`) mean a
/// single attribute could not be normalized and was dropped from its record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CloudStackError {
    /// The upstream call failed before a usable response was received
    /// (network failure, TLS failure, unexpected HTTP status).
    ///
    /// # Fields
    /// * `0` - A description of what went wrong
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body was not valid JSON or lacked its expected envelope key.
    ///
    /// # Fields
    /// * `0` - A description of the decoding failure
    #[error("Decode error: {0}")]
    Decode(String),

    /// CloudStack answered with an error envelope (`errorcode`/`errortext`).
    ///
    /// # Fields
    /// * `code` - The CloudStack error code (HTTP-like, e.g. 401, 431)
    /// * `message` - The error text reported by the API
    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    /// A tag attribute carried a JSON value that cannot be rendered as a tag.
    #[error("Unsupported type {found} for tag '{attribute}'")]
    UnsupportedTagType {
        attribute: String,
        found: &'static str,
    },

    /// A field attribute carried a JSON value that cannot become a numeric field.
    #[error("Unexpected value type {found} for field '{attribute}'")]
    UnexpectedValueType {
        attribute: String,
        found: &'static str,
    },

    /// A numeric string could not be parsed.
    #[error("Error parsing number from '{value}' for field '{attribute}': {reason}")]
    Parse {
        attribute: String,
        value: String,
        reason: String,
    },

    /// A configuration value failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The collector could not be configured (missing keys, unreadable file).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CloudStackError {
    /// Returns `true` if the error aborts the call or cycle it happened in,
    /// `false` if it only drops a single attribute.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CloudStackError::UnsupportedTagType { .. }
                | CloudStackError::UnexpectedValueType { .. }
                | CloudStackError::Parse { .. }
        )
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    ///
    /// # Fields
    /// * `0` - Description of the format violation
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    ///
    /// # Fields
    /// * `0` - Description of the constraint violation
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Type alias for Results that may fail with a CloudStackError
pub type CloudStackResult<T> = Result<T, CloudStackError>;
