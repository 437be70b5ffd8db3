//! Encoding of backend input images into temporary files.
//!
//! External decoders only accept files, so each process-based attempt writes
//! the current image to a scoped temp file. The file is a
//! [`NamedTempFile`] and is removed when the handle drops, whichever way the
//! attempt ends.

use std::io::{Cursor, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::error::BackendError;

/// JPEG quality used for temp images unless configured otherwise.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Errors that can occur while encoding a temp image.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec failed
    #[error("Image encoding failed: {0}")]
    EncodingFailed(String),
}

/// File format a backend expects its input in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum TempFormat {
    /// JPEG with the given quality (1-100, clamped).
    Jpeg { quality: u8 },
    /// Lossless PNG.
    Png,
}

impl Default for TempFormat {
    fn default() -> Self {
        TempFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl TempFormat {
    /// File extension including the leading dot.
    pub fn suffix(self) -> &'static str {
        match self {
            TempFormat::Jpeg { .. } => ".jpg",
            TempFormat::Png => ".png",
        }
    }
}

/// Encode a grayscale image to bytes in the given format.
pub fn encode_gray(image: &GrayImage, format: TempFormat) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut buffer = Cursor::new(Vec::new());
    let result = match format {
        TempFormat::Jpeg { quality } => {
            JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100)).write_image(
                image.as_raw(),
                width,
                height,
                ExtendedColorType::L8,
            )
        }
        TempFormat::Png => PngEncoder::new(&mut buffer).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::L8,
        ),
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Write `image` to a fresh `barcode-*` temp file inside `dir`.
///
/// The returned handle owns the file; dropping it deletes the file. On any
/// error the partially written file is dropped (and deleted) before returning.
pub fn write_temp_image(
    image: &GrayImage,
    format: TempFormat,
    dir: &Path,
) -> Result<NamedTempFile, BackendError> {
    let bytes = encode_gray(image, format)?;

    let mut file = tempfile::Builder::new()
        .prefix("barcode-")
        .suffix(format.suffix())
        .tempfile_in(dir)
        .map_err(BackendError::TempFile)?;
    file.write_all(&bytes).map_err(BackendError::TempFile)?;
    file.flush().map_err(BackendError::TempFile)?;

    Ok(file)
}
