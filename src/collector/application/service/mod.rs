pub mod domain_record_builder;
pub mod gather_service;
pub mod vm_aggregator;
