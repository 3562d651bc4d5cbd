use crate::core::domain::error::ValidationError;
use url::Url;

const MAX_URL_LENGTH: usize = 2048;
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// The CloudStack API endpoint, e.g. `https://cloud.example.com/client/api`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudStackUrl(Url);

impl CloudStackUrl {
    /// Parses and validates an API endpoint URL.
    pub fn new(url: &str) -> Result<Self, ValidationError> {
        validate_url(url).map(Self)
    }

    /// Creates a new URL without validation.
    #[cfg(test)]
    pub(crate) fn new_unchecked(url: &str) -> Self {
        Self(Url::parse(url).unwrap())
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the parsed URL.
    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

/// Validates an API endpoint URL: http(s), with a host, no query or fragment.
pub(crate) fn validate_url(url: &str) -> Result<Url, ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::Field {
            field: "api_url".to_string(),
            message: "URL cannot be empty".to_string(),
        });
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(ValidationError::Format(format!(
            "URL exceeds maximum length of {} characters",
            MAX_URL_LENGTH
        )));
    }

    let parsed =
        Url::parse(url).map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(ValidationError::ConstraintViolation(format!(
            "Invalid scheme. Must be one of: {}",
            ALLOWED_SCHEMES.join(", ")
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::Field {
            field: "api_url".to_string(),
            message: "URL must include a host".to_string(),
        });
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ValidationError::ConstraintViolation(
            "URL cannot carry a query string or fragment".to_string(),
        ));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        let valid = [
            "http://localhost:8080/client/api",
            "https://cloud.example.com/client/api",
            "https://10.0.0.1/client/api",
        ];
        for url in valid {
            assert!(CloudStackUrl::new(url).is_ok(), "{url} should be valid");
        }
    }

    #[test]
    fn test_invalid_urls() {
        let long_url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        let cases = [
            ("", "empty"),
            ("not a url", "no scheme"),
            ("ftp://example.com/client/api", "wrong scheme"),
            ("https://example.com/client/api?command=x", "query"),
            ("https://example.com/client/api#top", "fragment"),
            (long_url.as_str(), "too long"),
        ];
        for (url, case) in cases {
            assert!(
                CloudStackUrl::new(url).is_err(),
                "Case '{}' should fail validation: {}",
                case,
                url
            );
        }
    }

    #[test]
    fn test_as_str_round_trips() {
        let url = CloudStackUrl::new("http://localhost:8080/client/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/client/api");
    }
}
