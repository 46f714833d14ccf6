//! Data models: persisted configuration and panel geometry.

pub mod config;
pub mod display;

pub use config::{AppConfig, Crop, OutputFormat, ResampleKernel, SourceMode, Viewport};
pub use display::DisplaySpec;
