//! Error types module
//!
//! All pipeline failures are unified under the [`MediaPrepError`] enum.
//! Every failure is scoped to the current edit session; nothing here is
//! fatal to the host application. The [`ErrorPresentation`] trait lets each
//! variant self-describe how it should be surfaced to the user.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a dropped queue entry
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Presentation metadata for errors - defines how an error is surfaced.
pub trait ErrorPresentation {
    /// User-facing message (may differ from the internal error message)
    fn user_message(&self) -> String;

    /// Whether retrying the same operation can succeed without new input
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaPrepError {
    #[error("Too many images: {requested} selected (max: {max})")]
    TooManyImages { requested: usize, max: usize },

    #[error("File too large: {filename} is {size} bytes (max: {max} bytes)")]
    FileTooLarge {
        filename: String,
        size: usize,
        max: usize,
    },

    #[error("Unsupported image type: {filename} is {content_type}")]
    UnsupportedContentType {
        filename: String,
        content_type: String,
    },

    #[error("Empty file: {0}")]
    EmptyFile(String),

    #[error("Failed to decode image: {filename}: {reason}")]
    Decode { filename: String, reason: String },

    #[error("Image compositing failed: {0}")]
    Compositing(String),

    #[error("No active crop session")]
    NoActiveSession,

    #[error("Aspect ratio is locked while the post has images")]
    AspectRatioLocked,

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Upload returned {received} URLs for {expected} images")]
    UploadCountMismatch { expected: usize, received: usize },

    #[error("Failed to save post: {0}")]
    Persist(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Static metadata for each variant: (recoverable, log_level).
/// user_message stays per-variant for dynamic content.
fn static_metadata(err: &MediaPrepError) -> (bool, LogLevel) {
    match err {
        MediaPrepError::TooManyImages { .. } => (false, LogLevel::Debug),
        MediaPrepError::FileTooLarge { .. } => (false, LogLevel::Debug),
        MediaPrepError::UnsupportedContentType { .. } => (false, LogLevel::Debug),
        MediaPrepError::EmptyFile(_) => (false, LogLevel::Debug),
        MediaPrepError::Decode { .. } => (false, LogLevel::Warn),
        MediaPrepError::Compositing(_) => (false, LogLevel::Warn),
        MediaPrepError::NoActiveSession => (false, LogLevel::Debug),
        MediaPrepError::AspectRatioLocked => (false, LogLevel::Debug),
        MediaPrepError::Upload(_) => (true, LogLevel::Error),
        MediaPrepError::UploadCountMismatch { .. } => (true, LogLevel::Error),
        MediaPrepError::Persist(_) => (true, LogLevel::Error),
        MediaPrepError::InvalidInput(_) => (false, LogLevel::Debug),
    }
}

impl ErrorPresentation for MediaPrepError {
    fn user_message(&self) -> String {
        match self {
            MediaPrepError::TooManyImages { max, .. } => {
                format!("You can attach at most {} images", max)
            }
            MediaPrepError::FileTooLarge { filename, max, .. } => {
                format!("{} is too large (max {} MB)", filename, max / (1024 * 1024))
            }
            MediaPrepError::UnsupportedContentType { filename, .. } => {
                format!("{} is not a supported image type", filename)
            }
            MediaPrepError::EmptyFile(filename) => format!("{} is empty", filename),
            MediaPrepError::Decode { filename, .. } => {
                format!("{} could not be read as an image", filename)
            }
            MediaPrepError::Compositing(_) => "Failed to process image".to_string(),
            MediaPrepError::NoActiveSession => "No image is being cropped".to_string(),
            MediaPrepError::AspectRatioLocked => {
                "Remove all images to change the aspect ratio".to_string()
            }
            MediaPrepError::Upload(_) => "Image upload failed, please retry".to_string(),
            MediaPrepError::UploadCountMismatch { .. } => {
                "Image upload failed, please retry".to_string()
            }
            MediaPrepError::Persist(_) => "Failed to save post, please retry".to_string(),
            MediaPrepError::InvalidInput(msg) => msg.clone(),
        }
    }

    fn is_recoverable(&self) -> bool {
        static_metadata(self).0
    }

    fn log_level(&self) -> LogLevel {
        static_metadata(self).1
    }
}
