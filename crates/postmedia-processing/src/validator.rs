//! Batch validation for candidate files.
//!
//! Admits or rejects a whole batch before anything is queued: the check is
//! transactional, so a single offending file rejects every file in the
//! batch and admits none.

use postmedia_core::{CandidateFile, MediaPrepError, PipelineConfig};

/// Validation errors for a candidate batch
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Too many images: {requested} selected (max: {max})")]
    TooManyFiles { requested: usize, max: usize },

    #[error("File too large: {filename} is {size} bytes (max: {max} bytes)")]
    FileTooLarge {
        filename: String,
        size: usize,
        max: usize,
    },

    #[error("Invalid content type: {filename} is {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        filename: String,
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Empty file: {0}")]
    EmptyFile(String),
}

impl From<ValidationError> for MediaPrepError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::TooManyFiles { requested, max } => {
                MediaPrepError::TooManyImages { requested, max }
            }
            ValidationError::FileTooLarge {
                filename,
                size,
                max,
            } => MediaPrepError::FileTooLarge {
                filename,
                size,
                max,
            },
            ValidationError::InvalidContentType {
                filename,
                content_type,
                ..
            } => MediaPrepError::UnsupportedContentType {
                filename,
                content_type,
            },
            ValidationError::EmptyFile(filename) => MediaPrepError::EmptyFile(filename),
        }
    }
}

/// Candidate batch validator
///
/// Checks count, size, and content type against the session's limits. Pure;
/// callers surface the error and add zero files on rejection.
pub struct BatchValidator {
    max_files: usize,
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl BatchValidator {
    pub fn new(
        max_files: usize,
        max_file_size: usize,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_files,
            max_file_size,
            allowed_content_types,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.max_files,
            config.max_file_size_bytes,
            config.allowed_content_types.clone(),
        )
    }

    /// Validate an incoming batch against the union of already-selected
    /// files and the batch itself. The first offending file is named.
    pub fn validate_batch(
        &self,
        already_selected: usize,
        candidates: &[CandidateFile],
    ) -> Result<(), ValidationError> {
        let requested = already_selected + candidates.len();
        if requested > self.max_files {
            return Err(ValidationError::TooManyFiles {
                requested,
                max: self.max_files,
            });
        }

        for candidate in candidates {
            if candidate.size() == 0 {
                return Err(ValidationError::EmptyFile(candidate.filename.clone()));
            }
            if candidate.size() > self.max_file_size {
                return Err(ValidationError::FileTooLarge {
                    filename: candidate.filename.clone(),
                    size: candidate.size(),
                    max: self.max_file_size,
                });
            }
            // Exact match: the whitelist is case-sensitive, same as the API.
            if !self
                .allowed_content_types
                .iter()
                .any(|ct| ct == &candidate.content_type)
            {
                return Err(ValidationError::InvalidContentType {
                    filename: candidate.filename.clone(),
                    content_type: candidate.content_type.clone(),
                    allowed: self.allowed_content_types.clone(),
                });
            }
        }

        Ok(())
    }
}
