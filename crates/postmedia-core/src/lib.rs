//! Postmedia Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared across all postmedia components.

pub mod config;
pub mod error;
pub mod models;
pub mod telemetry;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{ErrorPresentation, LogLevel, MediaPrepError};
pub use models::aspect::{AspectRatio, MAX_RATIO, MIN_RATIO, RATIO_MATCH_EPSILON};
pub use models::candidate::CandidateFile;
pub use models::media::{FittedImage, MediaItem};
pub use models::post::{PostResponse, PostUpdate, UploadBatchResponse};
