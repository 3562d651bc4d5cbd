pub mod classifier;
pub mod coercer;
