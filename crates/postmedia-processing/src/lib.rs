//! Postmedia Processing Library
//!
//! The client-side media preparation pipeline for post attachments:
//! batch validation, the sequential crop queue, the aspect-ratio fitter,
//! selection reconciliation, and the edit-session orchestration that ties
//! them together behind upload/persist trait seams.

pub mod image;
pub mod queue;
pub mod reconciler;
pub mod session;
pub mod validator;

// Re-export commonly used types
pub use self::image::{AspectRatioFitter, FitError, FitOptions, ImageDecoder};
pub use queue::{ActiveCropSession, CropOutcome, CropQueue, DecodeOutcome, DecodeTicket};
pub use reconciler::MediaSelection;
pub use session::{EditSession, MediaUploader, PostDraft, PostStore};
pub use validator::{BatchValidator, ValidationError};
