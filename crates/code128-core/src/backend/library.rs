//! In-process backend built on the `rxing` library.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use image::{DynamicImage, GrayImage};
use rxing::common::HybridBinarizer;
use rxing::{
    BarcodeFormat, BinaryBitmap, BufferedImageLuminanceSource, DecodeHintType, DecodeHintValue,
    DecodingHintDictionary, MultiFormatReader, Reader,
};

use super::{non_empty, BackendDecoder, RXING};
use crate::error::BackendError;

/// Decodes CODE128 in process with rxing's multi-format reader.
#[derive(Debug, Clone)]
pub struct RxingDecoder {
    try_harder: bool,
}

impl Default for RxingDecoder {
    fn default() -> Self {
        Self { try_harder: true }
    }
}

impl RxingDecoder {
    /// Create a decoder with the "try harder" hint enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the "try harder" hint.
    pub fn with_try_harder(mut self, try_harder: bool) -> Self {
        self.try_harder = try_harder;
        self
    }

    fn hints(&self) -> DecodingHintDictionary {
        DecodingHintDictionary::from([
            (
                DecodeHintType::TRY_HARDER,
                DecodeHintValue::TryHarder(self.try_harder),
            ),
            (
                DecodeHintType::POSSIBLE_FORMATS,
                DecodeHintValue::PossibleFormats(HashSet::from([BarcodeFormat::CODE_128])),
            ),
        ])
    }

    fn library_error(message: impl Into<String>) -> BackendError {
        BackendError::Library {
            backend: RXING.to_string(),
            message: message.into(),
        }
    }
}

impl BackendDecoder for RxingDecoder {
    fn name(&self) -> &str {
        RXING
    }

    fn decode(&self, image: &GrayImage) -> Result<String, BackendError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Self::library_error("empty image"));
        }

        let hints = self.hints();
        let source = BufferedImageLuminanceSource::new(DynamicImage::ImageLuma8(image.clone()));

        // rxing can panic on degenerate input; keep that inside this attempt
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(source));
            let mut reader = MultiFormatReader::default();
            reader
                .decode_with_hints(&mut bitmap, &hints)
                .map(|result| result.getText().to_string())
                .map_err(|e| e.to_string())
        }));

        match outcome {
            Ok(Ok(text)) => non_empty(RXING, &text),
            Ok(Err(message)) => Err(Self::library_error(message)),
            Err(_) => Err(Self::library_error("decoder panicked")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert_eq!(RxingDecoder::new().name(), "rxing");
    }

    #[test]
    fn test_hints_restrict_to_code128() {
        let hints = RxingDecoder::new().with_try_harder(false).hints();
        assert_eq!(hints.len(), 2);
        assert!(matches!(
            hints.get(&DecodeHintType::TRY_HARDER),
            Some(DecodeHintValue::TryHarder(false))
        ));
        let Some(DecodeHintValue::PossibleFormats(formats)) =
            hints.get(&DecodeHintType::POSSIBLE_FORMATS)
        else {
            panic!("Expected a PossibleFormats hint");
        };
        assert_eq!(formats, &HashSet::from([BarcodeFormat::CODE_128]));
    }

    #[test]
    fn test_decodes_rendered_code128() {
        use rxing::{MultiFormatWriter, Writer};

        let matrix = MultiFormatWriter
            .encode("LIB-128", &BarcodeFormat::CODE_128, 400, 80)
            .unwrap();
        let border = 20;
        let img = GrayImage::from_fn(matrix.width() + 2 * border, matrix.height() + 2 * border, |x, y| {
            let inside = x >= border
                && y >= border
                && x < matrix.width() + border
                && y < matrix.height() + border;
            if inside && matrix.get(x - border, y - border) {
                image::Luma([0])
            } else {
                image::Luma([255])
            }
        });

        assert_eq!(RxingDecoder::new().decode(&img).unwrap(), "LIB-128");
    }

    #[test]
    fn test_blank_image_is_library_error() {
        let img = GrayImage::from_pixel(200, 60, image::Luma([255]));
        let err = RxingDecoder::new().decode(&img).unwrap_err();
        assert!(matches!(err, BackendError::Library { .. }));
    }

    #[test]
    fn test_empty_image_is_error_not_panic() {
        let err = RxingDecoder::new().decode(&GrayImage::new(0, 0)).unwrap_err();
        assert!(matches!(err, BackendError::Library { .. }));
    }
}
