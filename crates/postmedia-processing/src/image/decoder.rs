//! Candidate file decoding.

use image::{DynamicImage, GenericImageView, ImageError, ImageReader};
use std::io::Cursor;

pub struct ImageDecoder;

impl ImageDecoder {
    /// Decode raw bytes into a raster, sniffing the format from content.
    /// Failure here is local to one candidate file.
    pub fn decode(data: &[u8]) -> Result<DynamicImage, ImageError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(ImageError::IoError)?;
        reader.decode()
    }

    /// Decode and return dimensions, discarding the raster.
    pub fn dimensions(data: &[u8]) -> Result<(u32, u32), ImageError> {
        Ok(Self::decode(data)?.dimensions())
    }
}
