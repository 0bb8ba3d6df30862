pub mod builder;
pub mod exporter;
