//! CloudStack API request signing.
//!
//! Parameters are percent-encoded, sorted by lowercased name and joined into a
//! query string. The lowercased query string is signed with HMAC-SHA1 keyed by the
//! secret key; the base64 digest travels as the `signature` parameter.

use crate::core::domain::{
    error::{CloudStackError, CloudStackResult},
    value_object::SecretKey,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use url::form_urlencoded::byte_serialize;

type HmacSha1 = Hmac<Sha1>;

/// Percent-encodes a parameter value the way CloudStack expects (space as `%20`).
pub(crate) fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Builds the sorted, encoded query string (without signature).
pub(crate) fn canonical_query(params: &[(&str, &str)]) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| ((*k).to_string(), encode(v)))
        .collect();
    pairs.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Signs a canonical query string and returns the base64 signature (not yet encoded).
pub(crate) fn sign(query: &str, secret: &SecretKey) -> CloudStackResult<String> {
    let mut mac = <HmacSha1 as Mac>::new_from_slice(secret.as_bytes())
        .map_err(|e| CloudStackError::Configuration(format!("HMAC initialization failed: {}", e)))?;
    mac.update(query.to_lowercase().as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Returns the full signed query string: canonical query plus `&signature=...`.
pub(crate) fn signed_query(params: &[(&str, &str)], secret: &SecretKey) -> CloudStackResult<String> {
    let query = canonical_query(params);
    let signature = sign(&query, secret)?;
    Ok(format!("{}&signature={}", query, encode(&signature)))
}
