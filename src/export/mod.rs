pub mod exporter;
pub mod render;
