//! Configuration module
//!
//! Provides the pipeline configuration with hard defaults matching the
//! product constraints, optional environment overrides, and validation.

use std::env;

// Common constants
pub const MAX_FILES: usize = 10;
pub const MAX_FILE_SIZE_BYTES: usize = 5 * 1024 * 1024;
pub const CANVAS_BASE_WIDTH: u32 = 800;
pub const JPEG_QUALITY: u8 = 90;

/// MIME types accepted for post attachments. The whitelist is matched
/// exactly (case-sensitive), mirroring what the API accepts.
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Media preparation pipeline configuration
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Maximum number of images per post (existing + new)
    pub max_files: usize,
    /// Maximum size of a single candidate file in bytes
    pub max_file_size_bytes: usize,
    /// Exact-match MIME type whitelist
    pub allowed_content_types: Vec<String>,
    /// Fixed output canvas width; height is derived from the target ratio
    pub canvas_base_width: u32,
    /// JPEG encode quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_files: MAX_FILES,
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
            allowed_content_types: ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            canvas_base_width: CANVAS_BASE_WIDTH,
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

impl PipelineConfig {
    /// Build configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `POSTMEDIA_MAX_FILES`, `POSTMEDIA_MAX_FILE_SIZE_MB`,
    /// `POSTMEDIA_ALLOWED_CONTENT_TYPES` (comma-separated),
    /// `POSTMEDIA_CANVAS_BASE_WIDTH`, `POSTMEDIA_JPEG_QUALITY`.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let max_files = env::var("POSTMEDIA_MAX_FILES")
            .ok()
            .map(|v| v.parse::<usize>())
            .transpose()?
            .unwrap_or(defaults.max_files);

        let max_file_size_bytes = env::var("POSTMEDIA_MAX_FILE_SIZE_MB")
            .ok()
            .map(|v| v.parse::<usize>())
            .transpose()?
            .map(|mb| mb * 1024 * 1024)
            .unwrap_or(defaults.max_file_size_bytes);

        let allowed_content_types = env::var("POSTMEDIA_ALLOWED_CONTENT_TYPES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.allowed_content_types);

        let canvas_base_width = env::var("POSTMEDIA_CANVAS_BASE_WIDTH")
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()?
            .unwrap_or(defaults.canvas_base_width);

        let jpeg_quality = env::var("POSTMEDIA_JPEG_QUALITY")
            .ok()
            .map(|v| v.parse::<u8>())
            .transpose()?
            .unwrap_or(defaults.jpeg_quality);

        let config = Self {
            max_files,
            max_file_size_bytes,
            allowed_content_types,
            canvas_base_width,
            jpeg_quality,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_files == 0 {
            anyhow::bail!("max_files must be at least 1");
        }
        if self.max_file_size_bytes == 0 {
            anyhow::bail!("max_file_size_bytes must be non-zero");
        }
        if self.allowed_content_types.is_empty() {
            anyhow::bail!("allowed_content_types must not be empty");
        }
        if self.canvas_base_width == 0 {
            anyhow::bail!("canvas_base_width must be non-zero");
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            anyhow::bail!("jpeg_quality must be in 1-100");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_files, 10);
        assert_eq!(config.max_file_size_bytes, 5 * 1024 * 1024);
        assert_eq!(config.canvas_base_width, 800);
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.allowed_content_types.len(), 3);
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let config = PipelineConfig {
            max_files: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_quality() {
        let config = PipelineConfig {
            jpeg_quality: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            jpeg_quality: 101,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_whitelist() {
        let config = PipelineConfig {
            allowed_content_types: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
