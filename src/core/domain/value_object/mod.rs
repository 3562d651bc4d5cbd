mod api_credentials;
mod cloudstack_url;

pub use api_credentials::{ApiKey, SecretKey};
pub use cloudstack_url::CloudStackUrl;
