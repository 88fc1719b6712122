//! Aspect-ratio fitter: fit a source raster into a target ratio without
//! cropping any content.
//!
//! The output canvas has a fixed base width; height follows from the target
//! ratio. The source is scaled to touch the canvas on its longer relative
//! axis and centered on the other, leaving opaque black bars (letterbox for
//! relatively wide sources, pillarbox for relatively tall ones). The full
//! source is always visible.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, GenericImageView, Rgb, RgbImage};
use postmedia_core::config::{CANVAS_BASE_WIDTH, JPEG_QUALITY};
use postmedia_core::{AspectRatio, FittedImage, PipelineConfig, RATIO_MATCH_EPSILON};
use std::io::Cursor;

#[derive(Debug, thiserror::Error)]
pub enum FitError {
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("JPEG encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Output parameters for the fitter.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    pub canvas_base_width: u32,
    pub jpeg_quality: u8,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            canvas_base_width: CANVAS_BASE_WIDTH,
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

impl From<&PipelineConfig> for FitOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            canvas_base_width: config.canvas_base_width,
            jpeg_quality: config.jpeg_quality,
        }
    }
}

/// Placement of the scaled source on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DrawRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

pub struct AspectRatioFitter;

impl AspectRatioFitter {
    /// Fit `image` into `target`, producing an encoded JPEG of exact
    /// dimensions `canvas_base_width x round(canvas_base_width / target)`.
    pub fn fit(
        image: &DynamicImage,
        target: AspectRatio,
        options: FitOptions,
    ) -> Result<FittedImage, FitError> {
        let canvas_width = options.canvas_base_width;
        let canvas_height = (canvas_width as f64 / target.value()).round() as u32;
        if canvas_width == 0 || canvas_height == 0 {
            return Err(FitError::InvalidCanvas {
                width: canvas_width,
                height: canvas_height,
            });
        }

        let rect = Self::placement(image.dimensions(), target, canvas_width, canvas_height);

        tracing::debug!(
            source_width = image.width(),
            source_height = image.height(),
            canvas_width,
            canvas_height,
            draw_x = rect.x,
            draw_y = rect.y,
            "Fitting image into target ratio"
        );

        let mut canvas = RgbImage::from_pixel(canvas_width, canvas_height, Rgb([0, 0, 0]));

        let (src_w, src_h) = image.dimensions();
        let filter = Self::select_filter(src_w, src_h, rect.width, rect.height);
        let scaled = image.resize_exact(rect.width, rect.height, filter).to_rgb8();
        imageops::overlay(&mut canvas, &scaled, rect.x as i64, rect.y as i64);

        let mut buffer = Vec::with_capacity((canvas_width * canvas_height / 4) as usize);
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), options.jpeg_quality);
        canvas.write_with_encoder(encoder)?;

        Ok(FittedImage {
            data: Bytes::from(buffer),
            width: canvas_width,
            height: canvas_height,
            aspect_ratio: target,
        })
    }

    /// Compute where the scaled source lands on the canvas. The source is
    /// never clipped: one axis spans the canvas, the other is centered.
    fn placement(
        (src_w, src_h): (u32, u32),
        target: AspectRatio,
        canvas_width: u32,
        canvas_height: u32,
    ) -> DrawRect {
        let source_ratio = src_w as f64 / src_h as f64;

        if (source_ratio - target.value()).abs() < RATIO_MATCH_EPSILON {
            // Ratios match within tolerance: full coverage, no bars.
            DrawRect {
                x: 0,
                y: 0,
                width: canvas_width,
                height: canvas_height,
            }
        } else if source_ratio > target.value() {
            // Source relatively wider: span the width, letterbox vertically.
            let draw_height = ((canvas_width as f64 / source_ratio).round() as u32).max(1);
            DrawRect {
                x: 0,
                y: (canvas_height - draw_height) / 2,
                width: canvas_width,
                height: draw_height,
            }
        } else {
            // Source relatively taller: span the height, pillarbox horizontally.
            let draw_width = ((canvas_height as f64 * source_ratio).round() as u32).max(1);
            DrawRect {
                x: (canvas_width - draw_width) / 2,
                y: 0,
                width: draw_width,
                height: canvas_height,
            }
        }
    }

    /// Select the scaling filter by downscale ratio: cheap filters for heavy
    /// downscales, Lanczos for near-1:1 work.
    fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            imageops::FilterType::CatmullRom
        } else {
            imageops::FilterType::Lanczos3
        }
    }
}
