//! Resizing for decode input.
//!
//! Barcode readers work best when bars are a few pixels wide, so every input
//! is normalised to a fixed width and later variants may upscale it further.
//! All functions return new images without modifying the input.

use image::GrayImage;

use super::FilterType;

/// Scale an image so its width equals `target_width`, preserving aspect ratio.
///
/// Both downscaling and upscaling are applied. A `target_width` of 0, or an
/// empty image, returns a copy of the input.
pub fn scale_to_width(image: &GrayImage, target_width: u32, filter: FilterType) -> GrayImage {
    let (width, height) = image.dimensions();
    if target_width == 0 || width == 0 || height == 0 || width == target_width {
        return image.clone();
    }

    let (new_width, new_height) = calculate_width_dimensions(width, height, target_width);
    image::imageops::resize(image, new_width, new_height, filter.to_image_filter())
}

/// Upscale an image by an integer factor in both dimensions.
///
/// A factor of 0 or 1 returns a copy of the input.
pub fn upscale(image: &GrayImage, factor: u32, filter: FilterType) -> GrayImage {
    if factor <= 1 || image.width() == 0 || image.height() == 0 {
        return image.clone();
    }
    let target = image.width().saturating_mul(factor);
    scale_to_width(image, target, filter)
}

/// Calculate dimensions for a fixed target width while preserving aspect ratio.
fn calculate_width_dimensions(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    // Truncates, so a fractional row is dropped
    let new_height = u64::from(height) * u64::from(target_width) / u64::from(width);
    let new_height = u32::try_from(new_height).unwrap_or(u32::MAX);
    (target_width, new_height.max(1))
}
