//! Core types for image preprocessing.

use serde::{Deserialize, Serialize};

/// Default width every input image is scaled to before decoding.
pub const DEFAULT_TARGET_WIDTH: u32 = 1000;

/// Largest accepted `target_width`.
pub const MAX_TARGET_WIDTH: u32 = 16_384;

/// Interpolation used when the image is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Pixel replication. Bars stay hard-edged but steps appear.
    Nearest,
    /// Linear blend of the four nearest pixels.
    Bilinear,
    /// Windowed sinc; sharpest bar edges.
    #[default]
    Lanczos3,
}

impl FilterType {
    /// The matching `imageops` filter.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Settings for the preprocessing applied once per decode call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Width the image is scaled to, keeping aspect ratio. 0 disables resizing.
    pub target_width: u32,
    /// Interpolation filter used for resizing and upscaled variants.
    pub filter: FilterType,
    /// Optional contrast adjustment (-100 to 100) applied after grayscale.
    pub contrast: Option<f32>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            filter: FilterType::default(),
            contrast: None,
        }
    }
}

impl PreprocessConfig {
    /// Check values read from configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the first out-of-range value.
    pub fn validate(&self) -> Result<(), String> {
        if self.target_width > MAX_TARGET_WIDTH {
            return Err(format!(
                "target width {} exceeds {MAX_TARGET_WIDTH}",
                self.target_width
            ));
        }
        match self.contrast {
            Some(amount) if !(-100.0..=100.0).contains(&amount) => {
                Err(format!("contrast {amount} outside -100..=100"))
            }
            _ => Ok(()),
        }
    }
}
