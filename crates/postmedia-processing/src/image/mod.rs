//! Image handling for the crop pipeline
//!
//! - Decoding candidate files into rasters (decoder)
//! - Fitting a raster into a target aspect ratio without cropping (fitter)

pub mod decoder;
pub mod fitter;

pub use decoder::ImageDecoder;
pub use fitter::{AspectRatioFitter, FitError, FitOptions};
