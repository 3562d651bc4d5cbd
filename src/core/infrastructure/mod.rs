pub mod api_client;
pub mod cloudstack_api;
pub(crate) mod signature;
