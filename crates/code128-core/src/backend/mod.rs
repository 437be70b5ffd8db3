//! Backend decoders: the black boxes that turn pixels into a payload.
//!
//! Every backend implements [`BackendDecoder`]. Two flavours exist:
//! - [`ProcessDecoder`] writes the image to a temp file and runs an external
//!   command-line tool (`zbarimg`, `ZXingReader`).
//! - [`RxingDecoder`] decodes in process with the `rxing` library.
//!
//! Backends never panic on bad input. They return a non-empty payload or a
//! [`BackendError`], and any temp file they create is gone when `decode`
//! returns.

mod library;
mod process;

pub use library::RxingDecoder;
pub use process::{OutputParser, ProcessDecoder};

use image::GrayImage;

use crate::error::BackendError;

/// Name of the `zbarimg` backend.
pub const ZBAR: &str = "zbar";
/// Name of the `ZXingReader` backend.
pub const ZXING: &str = "zxing";
/// Name of the in-process rxing backend.
pub const RXING: &str = "rxing";

/// A single decoding engine.
pub trait BackendDecoder: Send + Sync {
    /// Name plan steps use to refer to this backend.
    fn name(&self) -> &str;

    /// Decode a CODE128 payload from a grayscale image.
    fn decode(&self, image: &GrayImage) -> Result<String, BackendError>;
}

/// Reject empty payloads so every `Ok` carries text.
pub(crate) fn non_empty(backend: &str, text: &str) -> Result<String, BackendError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(BackendError::EmptyResult {
            backend: backend.to_string(),
        });
    }
    Ok(text.to_string())
}
