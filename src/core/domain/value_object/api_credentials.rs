use crate::core::domain::error::ValidationError;
use std::fmt;

const MAX_KEY_LENGTH: usize = 512;

/// A CloudStack API key, sent with every request as `apiKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a validated API key.
    pub fn new(key: String) -> Result<Self, ValidationError> {
        validate_key("api_key", &key)?;
        Ok(Self(key))
    }

    /// Creates a new API key without validation.
    #[cfg(test)]
    pub(crate) fn new_unchecked(key: &str) -> Self {
        Self(key.to_string())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A CloudStack secret key, used only to sign requests. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    /// Creates a validated secret key.
    pub fn new(key: String) -> Result<Self, ValidationError> {
        validate_key("secret_key", &key)?;
        Ok(Self(key))
    }

    /// Creates a new secret key without validation.
    #[cfg(test)]
    pub(crate) fn new_unchecked(key: &str) -> Self {
        Self(key.to_string())
    }

    /// Returns the key bytes for signing.
    #[must_use]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

/// Validates an API or secret key.
pub(crate) fn validate_key(field: &str, key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::Field {
            field: field.to_string(),
            message: "Key cannot be empty".to_string(),
        });
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(ValidationError::Format(format!(
            "Key cannot exceed {} characters",
            MAX_KEY_LENGTH
        )));
    }
    if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::Format(
            "Key cannot contain whitespace or control characters".to_string(),
        ));
    }
    Ok(())
}
