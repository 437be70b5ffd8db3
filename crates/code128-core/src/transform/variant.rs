//! Per-attempt image variants derived from a rotated image.

use std::fmt;

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::preprocess::{adjust_contrast, binarize, upscale, FilterType};

/// Largest accepted [`Variant::Upscaled`] factor.
pub const MAX_UPSCALE_FACTOR: u32 = 8;

/// How the rotated image is altered before it is handed to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variant {
    /// The rotated image as is.
    #[default]
    Original,
    /// Scaled up by an integer factor; helps with thin bars.
    Upscaled { factor: u32 },
    /// Hard threshold at a fraction of full scale (0.0 to 1.0).
    Binarized { threshold: f32 },
    /// Extra contrast (-100 to 100) on top of preprocessing.
    Contrast { amount: f32 },
}

impl Variant {
    /// Check parameters read from configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the first out-of-range parameter.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Variant::Original => Ok(()),
            Variant::Upscaled { factor } if (1..=MAX_UPSCALE_FACTOR).contains(&factor) => Ok(()),
            Variant::Upscaled { factor } => Err(format!(
                "upscale factor {factor} outside 1..={MAX_UPSCALE_FACTOR}"
            )),
            Variant::Binarized { threshold } if (0.0..=1.0).contains(&threshold) => Ok(()),
            Variant::Binarized { threshold } => {
                Err(format!("threshold {threshold} outside 0.0..=1.0"))
            }
            Variant::Contrast { amount } if (-100.0..=100.0).contains(&amount) => Ok(()),
            Variant::Contrast { amount } => Err(format!("contrast {amount} outside -100..=100")),
        }
    }

    /// Apply the variant, returning a new image.
    pub fn apply(self, image: &GrayImage, filter: FilterType) -> GrayImage {
        match self {
            Variant::Original => image.clone(),
            Variant::Upscaled { factor } => upscale(image, factor, filter),
            Variant::Binarized { threshold } => binarize(image, threshold),
            Variant::Contrast { amount } => adjust_contrast(image, amount),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Original => write!(f, "original"),
            Variant::Upscaled { factor } => write!(f, "upscaled x{factor}"),
            Variant::Binarized { threshold } => write!(f, "binarized @{threshold}"),
            Variant::Contrast { amount } => write!(f, "contrast {amount:+}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn sample() -> GrayImage {
        GrayImage::from_fn(10, 4, |x, _| Luma([(x * 25) as u8]))
    }

    #[test]
    fn test_original_is_identity() {
        let img = sample();
        assert_eq!(Variant::Original.apply(&img, FilterType::Lanczos3), img);
    }

    #[test]
    fn test_upscaled_dimensions() {
        let out = Variant::Upscaled { factor: 2 }.apply(&sample(), FilterType::Lanczos3);
        assert_eq!(out.dimensions(), (20, 8));
    }

    #[test]
    fn test_binarized_two_levels() {
        let out = Variant::Binarized { threshold: 0.5 }.apply(&sample(), FilterType::Lanczos3);
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn test_contrast_variant_keeps_dimensions() {
        let out = Variant::Contrast { amount: 40.0 }.apply(&sample(), FilterType::Lanczos3);
        assert_eq!(out.dimensions(), (10, 4));
    }

    #[test]
    fn test_validate_ranges() {
        assert!(Variant::Original.validate().is_ok());
        assert!(Variant::Upscaled { factor: 2 }.validate().is_ok());
        assert!(Variant::Upscaled { factor: 0 }.validate().is_err());
        assert!(Variant::Upscaled { factor: 4_000_000_000 }.validate().is_err());
        assert!(Variant::Binarized { threshold: 1.0 }.validate().is_ok());
        assert!(Variant::Binarized { threshold: 1.5 }.validate().is_err());
        assert!(Variant::Binarized { threshold: f32::NAN }.validate().is_err());
        assert!(Variant::Contrast { amount: -100.0 }.validate().is_ok());
        assert!(Variant::Contrast { amount: f32::INFINITY }.validate().is_err());
    }

    #[test]
    fn test_serde_tagged_form() {
        let json = serde_json::to_string(&Variant::Upscaled { factor: 2 }).unwrap();
        assert_eq!(json, r#"{"kind":"upscaled","factor":2}"#);
        let parsed: Variant = serde_json::from_str(r#"{"kind":"binarized","threshold":0.5}"#).unwrap();
        assert_eq!(parsed, Variant::Binarized { threshold: 0.5 });
    }

    #[test]
    fn test_display() {
        assert_eq!(Variant::Original.to_string(), "original");
        assert_eq!(Variant::Upscaled { factor: 2 }.to_string(), "upscaled x2");
        assert_eq!(Variant::Binarized { threshold: 0.5 }.to_string(), "binarized @0.5");
        assert_eq!(Variant::Contrast { amount: 20.0 }.to_string(), "contrast +20");
    }
}
