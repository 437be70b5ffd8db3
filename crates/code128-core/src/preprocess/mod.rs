//! Image preprocessing applied before any backend sees the image.
//!
//! This module provides:
//! - Grayscale conversion of any decoded input
//! - Normalisation to a fixed width (1000 px by default)
//! - Optional contrast adjustment
//! - Upscaling and binarization used by the per-rotation variants
//!
//! The pipeline runs once per decode call; rotations and variants are
//! derived from its output.

mod resize;
mod tone;
mod types;

pub use resize::{scale_to_width, upscale};
pub use tone::{adjust_contrast, binarize, grayscale};
pub use types::{FilterType, PreprocessConfig, DEFAULT_TARGET_WIDTH, MAX_TARGET_WIDTH};

use image::{DynamicImage, GrayImage};

/// Run the full preprocessing pipeline: grayscale, resize, contrast.
pub fn preprocess(image: &DynamicImage, config: &PreprocessConfig) -> GrayImage {
    let gray = grayscale(image);
    let scaled = scale_to_width(&gray, config.target_width, config.filter);
    match config.contrast {
        Some(amount) => adjust_contrast(&scaled, amount),
        None => scaled,
    }
}
