pub mod accumulator;
pub mod service;
