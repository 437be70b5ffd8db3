//! Tonal operations on grayscale images: conversion, contrast and thresholding.

use image::{DynamicImage, GrayImage, Luma};

/// Convert any decoded image to 8-bit luma.
pub fn grayscale(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Apply a contrast adjustment around mid-gray.
///
/// `amount` ranges from -100 to +100 and is clamped to that range.
///
/// Formula: `output = (input - 0.5) * (1 + amount/100) + 0.5`
pub fn adjust_contrast(image: &GrayImage, amount: f32) -> GrayImage {
    let amount = amount.clamp(-100.0, 100.0);
    if amount == 0.0 {
        return image.clone();
    }

    let factor = 1.0 + amount / 100.0;
    let mut out = image.clone();
    for Luma([v]) in out.pixels_mut() {
        let normalized = *v as f32 / 255.0;
        let adjusted = (normalized - 0.5) * factor + 0.5;
        *v = (adjusted.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    out
}

/// Binarize an image: pixels brighter than `threshold` become white, the rest black.
///
/// `threshold` is a fraction of full scale (0.0 to 1.0) and is clamped.
pub fn binarize(image: &GrayImage, threshold: f32) -> GrayImage {
    let limit = (threshold.clamp(0.0, 1.0) * 255.0) as u8;
    let mut out = image.clone();
    for Luma([v]) in out.pixels_mut() {
        *v = if *v > limit { 255 } else { 0 };
    }
    out
}


// ============================================================================
// Property-Based Tests
// ============================================================================
