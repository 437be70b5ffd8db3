//! Image transformations tried by the decode plan: rotations and variants.
//!
//! # Transform Order
//!
//! For each plan step the orchestrator derives the backend input as:
//! 1. Preprocessed image (once per decode call)
//! 2. Rotation (lossless quarter turn)
//! 3. Variant (original, upscaled, binarized or contrast)
//!
//! # Coordinate System
//!
//! - Rotations are clockwise
//! - Origin is top-left corner

mod rotation;
mod variant;

pub use rotation::Rotation;
pub use variant::{Variant, MAX_UPSCALE_FACTOR};
