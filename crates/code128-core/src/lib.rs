//! Code128 Core - CODE128 decode orchestration
//!
//! This crate does not decode barcodes itself. It prepares an image
//! (grayscale, fixed width, optional contrast), then tries a fixed, ordered
//! matrix of rotations, image variants and backend decoders until one of them
//! returns a payload.
//!
//! # Module Structure
//!
//! - `preprocess` - grayscale, resize, contrast and threshold operations
//! - `transform` - quarter-turn rotations and per-attempt variants
//! - `encode` - temp image encoding for external tools
//! - `backend` - the `BackendDecoder` trait, process and rxing backends
//! - `plan` - the retry matrix as data
//! - `decoder` - the orchestrator
//! - `batch` - decoding every image in a directory
//!
//! # Examples
//!
//! ```ignore
//! use code128_core::{DecodeConfig, Decoder};
//!
//! let decoder = Decoder::new(DecodeConfig::default())?;
//! let text = decoder.decode_file("label.jpg")?;
//! println!("{text}");
//! ```

pub mod backend;
pub mod batch;
pub mod config;
pub mod decoder;
pub mod encode;
pub mod error;
pub mod plan;
pub mod preprocess;
pub mod transform;

pub use backend::{BackendDecoder, OutputParser, ProcessDecoder, RxingDecoder};
pub use batch::{decode_dir, BatchEntry};
pub use config::{DecodeConfig, ToolConfig};
pub use decoder::{decode_code128_from_file, Decoder, DecoderBuilder};
pub use error::{BackendError, DecodeError};
pub use plan::{DecodePlan, PlanStep};
pub use preprocess::{FilterType, PreprocessConfig};
pub use transform::{Rotation, Variant};
