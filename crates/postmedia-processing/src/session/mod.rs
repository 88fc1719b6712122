//! Edit-session orchestration
//!
//! Ties validator, crop queue, fitter, and reconciler together behind the
//! surface the host application drives, with trait seams for the upload
//! and persist boundary.

pub mod pipeline;
pub mod traits;

pub use pipeline::{EditSession, PostDraft};
pub use traits::{MediaUploader, PostStore};
