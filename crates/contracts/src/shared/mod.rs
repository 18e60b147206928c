pub mod analytics;
pub mod envelope;
