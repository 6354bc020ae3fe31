//! framedoc library
//!
//! Downloads a video, keeps one frame every N seconds and writes the frames
//! to a multi-page PDF. The same pipeline backs the command line and the
//! HTTP server.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod http;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use adapters::AppConfig;
pub use app::{AppContainer, DefaultAppContainer, ProcessRequest, ProcessResponse};
pub use domain::errors::{AcquisitionError, AcquisitionFailure, PipelineError, ProcessError};
pub use domain::model::{ExtractionSummary, FrameBatch, Outcome, SamplingSpec};
pub use engine::{EngineConfig, SamplingEngine};
pub use output::PdfDocumentWriter;
