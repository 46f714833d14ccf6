//! Services: page capture, conversion pipeline, config persistence.

pub mod capture;
pub mod config_store;
pub mod pipeline;

pub use capture::{CaptureError, CaptureRequest, CaptureSource, ChromeCapture, PageCapture};
pub use config_store::ConfigStore;
pub use pipeline::{ConvertPipeline, PipelineError, RenderParams};
