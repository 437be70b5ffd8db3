//! Shared helpers for integration tests.
//!
//! Barcode images are rendered with rxing's writer so the tests need no
//! fixture files, and the external tools are pointed at programs that do not
//! exist so only the in-process backend can succeed.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use code128_core::encode::{encode_gray, TempFormat};
use code128_core::{DecodeConfig, Decoder, ToolConfig};
use image::{GrayImage, Luma};
use rxing::{BarcodeFormat, MultiFormatWriter, Writer};

/// White border added around the rendered symbol.
const QUIET_BORDER: u32 = 40;

/// Render `payload` as a CODE128 symbol on a white background.
pub fn render_code128(payload: &str) -> GrayImage {
    let matrix = MultiFormatWriter
        .encode(payload, &BarcodeFormat::CODE_128, 600, 150)
        .expect("Failed to encode test barcode");
    let (width, height) = (matrix.width(), matrix.height());

    GrayImage::from_fn(
        width + 2 * QUIET_BORDER,
        height + 2 * QUIET_BORDER,
        |x, y| {
            let inside = x >= QUIET_BORDER
                && y >= QUIET_BORDER
                && x < width + QUIET_BORDER
                && y < height + QUIET_BORDER;
            if inside && matrix.get(x - QUIET_BORDER, y - QUIET_BORDER) {
                Luma([0])
            } else {
                Luma([255])
            }
        },
    )
}

/// A plain white image with no symbol.
pub fn blank_image() -> GrayImage {
    GrayImage::from_pixel(600, 200, Luma([255]))
}

/// Write `image` as a quality-95 JPEG at `dir/name`.
pub fn write_jpeg(dir: &Path, name: &str, image: &GrayImage) -> PathBuf {
    let path = dir.join(name);
    let bytes = encode_gray(image, TempFormat::Jpeg { quality: 95 }).unwrap();
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Write `image` as a PNG at `dir/name`.
pub fn write_png(dir: &Path, name: &str, image: &GrayImage) -> PathBuf {
    let path = dir.join(name);
    let bytes = encode_gray(image, TempFormat::Png).unwrap();
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Standard plan, temp files in `temp_dir`, external tools unavailable.
pub fn hermetic_decoder(temp_dir: &Path) -> Decoder {
    let config = DecodeConfig {
        tools: ToolConfig {
            zbar_program: "code128-test-missing-zbarimg".to_string(),
            zxing_program: "code128-test-missing-zxingreader".to_string(),
            timeout_ms: 5_000,
            ..Default::default()
        },
        temp_dir: Some(temp_dir.to_path_buf()),
        ..Default::default()
    };
    Decoder::new(config).expect("Failed to build decoder")
}

/// Number of entries in a directory.
pub fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
