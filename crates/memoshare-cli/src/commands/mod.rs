pub mod common;
pub mod config;
pub mod heatmap;
pub mod share;
