//! Image encoding for external decoders.
//!
//! This module provides functionality for:
//! - Encoding grayscale images to JPEG (configurable quality) or PNG
//! - Writing them to scoped temporary files that delete themselves
//!
//! # Examples
//!
//! ```ignore
//! use code128_core::encode::{write_temp_image, TempFormat};
//!
//! let file = write_temp_image(&gray, TempFormat::Png, &std::env::temp_dir())?;
//! println!("Wrote {}", file.path().display());
//! // file is removed here
//! ```

mod temp;

pub use temp::{encode_gray, write_temp_image, EncodeError, TempFormat, DEFAULT_JPEG_QUALITY};
