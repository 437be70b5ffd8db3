//! Quarter-turn rotations.
//!
//! Barcode readers scan rows, so a symbol printed vertically is invisible to
//! them until the image is turned. Only lossless 90° steps are needed; they
//! map pixels exactly and never resample.

use std::fmt;

use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Clockwise rotation applied to the preprocessed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// No rotation.
    #[default]
    #[serde(rename = "0")]
    Deg0,
    /// Rotate 90 degrees clockwise.
    #[serde(rename = "90")]
    Deg90,
    /// Rotate 180 degrees.
    #[serde(rename = "180")]
    Deg180,
    /// Rotate 270 degrees clockwise (90 counter-clockwise).
    #[serde(rename = "270")]
    Deg270,
}

impl Rotation {
    /// All rotations in the order they are tried.
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Rotation angle in degrees.
    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Returns true if this rotation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Apply the rotation, returning a new image.
    pub fn apply(self, image: &GrayImage) -> GrayImage {
        match self {
            Rotation::Deg0 => image.clone(),
            Rotation::Deg90 => image::imageops::rotate90(image),
            Rotation::Deg180 => image::imageops::rotate180(image),
            Rotation::Deg270 => image::imageops::rotate270(image),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}
