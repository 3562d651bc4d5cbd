pub mod attribute;
pub mod cloudstack_config;
pub mod cloudstack_connection;
pub mod metric;
pub mod resource_totals;
