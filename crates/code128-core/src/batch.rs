//! Decoding every image in a directory.
//!
//! Files are decoded in parallel on the rayon pool. Each decode call owns its
//! own temp files, so calls share nothing mutable. Results come back in file
//! name order and an individual failure never stops the scan.

use std::fmt;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::warn;

use crate::decoder::Decoder;
use crate::error::DecodeError;

/// Extensions (lowercase) picked up by [`decode_dir`].
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Outcome of decoding one file.
#[derive(Debug)]
pub struct BatchEntry {
    /// File name without directory.
    pub file_name: String,
    pub outcome: Result<String, DecodeError>,
}

impl BatchEntry {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl fmt::Display for BatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(text) => write!(f, "{}: {}", self.file_name, text),
            Err(err) => write!(f, "{}: error {}", self.file_name, err),
        }
    }
}

/// Returns true if `path` has one of the [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// List image files directly inside `dir`, sorted by file name.
///
/// # Errors
///
/// Returns `DecodeError::Io` if the directory cannot be read.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, DecodeError> {
    let io_error = |source| DecodeError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let path = entry.path();
        if path.is_file() && is_image_file(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Decode every image file in `dir`.
///
/// Returns one entry per image file, in file name order.
pub fn decode_dir(decoder: &Decoder, dir: &Path) -> Result<Vec<BatchEntry>, DecodeError> {
    let files = list_images(dir)?;

    let entries = files
        .par_iter()
        .map(|path| {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let outcome = decoder.decode_file(path);
            if let Err(err) = &outcome {
                warn!(file = %file_name, error = %err, "decode failed");
            }
            BatchEntry { file_name, outcome }
        })
        .collect();

    Ok(entries)
}
