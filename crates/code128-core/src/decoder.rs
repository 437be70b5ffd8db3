//! The decode orchestrator.
//!
//! [`Decoder`] loads an image, preprocesses it once, then walks the
//! [`DecodePlan`] in order. Each step rotates the preprocessed image, derives
//! a variant and hands it to one backend. The first non-empty payload wins;
//! backend failures are logged and skipped.

use std::path::Path;

use image::{DynamicImage, GrayImage};
use tracing::{debug, info};

use crate::backend::{BackendDecoder, ProcessDecoder, RxingDecoder};
use crate::config::DecodeConfig;
use crate::error::DecodeError;
use crate::plan::DecodePlan;
use crate::preprocess::{preprocess, FilterType, PreprocessConfig};
use crate::transform::{Rotation, Variant};

/// Decode a CODE128 payload from an image file with the default configuration.
pub fn decode_code128_from_file(path: impl AsRef<Path>) -> Result<String, DecodeError> {
    Decoder::new(DecodeConfig::default())?.decode_file(path)
}

/// Orchestrates preprocessing, the retry plan and the backends.
pub struct Decoder {
    backends: Vec<Box<dyn BackendDecoder>>,
    plan: DecodePlan,
    preprocess: PreprocessConfig,
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.backends.iter().map(|b| b.name()).collect();
        f.debug_struct("Decoder")
            .field("backends", &names)
            .field("plan", &self.plan)
            .field("preprocess", &self.preprocess)
            .finish()
    }
}

impl Decoder {
    /// Build a decoder with the standard backends (zbar, zxing, rxing).
    pub fn new(config: DecodeConfig) -> Result<Self, DecodeError> {
        Self::builder().config(config).build()
    }

    /// Start building a decoder with custom backends or plan.
    pub fn builder() -> DecoderBuilder {
        DecoderBuilder::default()
    }

    pub fn plan(&self) -> &DecodePlan {
        &self.plan
    }

    /// Names of the registered backends in registration order.
    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Load an image from disk and decode it.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::CannotRead` if the file cannot be opened or
    /// decoded as an image, and `DecodeError::NotFound` if no plan step
    /// produced a payload.
    pub fn decode_file(&self, path: impl AsRef<Path>) -> Result<String, DecodeError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| DecodeError::CannotRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.decode_image(&image)
    }

    /// Decode an already loaded image.
    pub fn decode_image(&self, image: &DynamicImage) -> Result<String, DecodeError> {
        let base = preprocess(image, &self.preprocess);
        debug!(
            width = base.width(),
            height = base.height(),
            steps = self.plan.len(),
            "preprocessed image"
        );

        let mut images = StepImages::default();
        for (index, step) in self.plan.steps().iter().enumerate() {
            // Plans are validated at build time, so the backend exists
            let Some(backend) = self.backend(&step.backend) else {
                continue;
            };
            let input = images.image_for(&base, step.rotation, step.variant, self.preprocess.filter);

            match backend.decode(input) {
                Ok(text) => {
                    info!(
                        step = index + 1,
                        rotation = %step.rotation,
                        variant = %step.variant,
                        backend = %step.backend,
                        "decoded code128"
                    );
                    return Ok(text);
                }
                Err(err) => {
                    debug!(
                        step = index + 1,
                        rotation = %step.rotation,
                        variant = %step.variant,
                        backend = %step.backend,
                        error = %err,
                        "attempt failed"
                    );
                }
            }
        }

        Err(DecodeError::NotFound {
            attempts: self.plan.len(),
        })
    }

    fn backend(&self, name: &str) -> Option<&dyn BackendDecoder> {
        self.backends
            .iter()
            .find(|b| b.name() == name)
            .map(|b| b.as_ref())
    }
}

/// Builder for [`Decoder`].
///
/// Custom backends registered under a standard name replace the standard one.
pub struct DecoderBuilder {
    config: DecodeConfig,
    backends: Vec<Box<dyn BackendDecoder>>,
    standard_backends: bool,
}

impl Default for DecoderBuilder {
    fn default() -> Self {
        Self {
            config: DecodeConfig::default(),
            backends: Vec::new(),
            standard_backends: true,
        }
    }
}

impl DecoderBuilder {
    /// Replace the whole configuration.
    pub fn config(mut self, config: DecodeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn plan(mut self, plan: DecodePlan) -> Self {
        self.config.plan = plan;
        self
    }

    pub fn preprocess(mut self, preprocess: PreprocessConfig) -> Self {
        self.config.preprocess = preprocess;
        self
    }

    /// Register an additional backend.
    pub fn backend(mut self, backend: impl BackendDecoder + 'static) -> Self {
        self.backends.push(Box::new(backend));
        self
    }

    /// Do not register zbar, zxing and rxing automatically.
    pub fn without_standard_backends(mut self) -> Self {
        self.standard_backends = false;
        self
    }

    /// Validate the plan against the registered backends and build.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Config` if the plan is empty, names a backend
    /// that is not registered, or carries out-of-range variant or
    /// preprocessing parameters.
    pub fn build(self) -> Result<Decoder, DecodeError> {
        let DecoderBuilder {
            config,
            mut backends,
            standard_backends,
        } = self;

        if standard_backends {
            let temp_dir = config.resolved_temp_dir();
            let standard: [Box<dyn BackendDecoder>; 3] = [
                Box::new(ProcessDecoder::zbar(&config.tools, temp_dir.clone())),
                Box::new(ProcessDecoder::zxing(&config.tools, temp_dir)),
                Box::new(RxingDecoder::new()),
            ];
            for backend in standard {
                if !backends.iter().any(|b| b.name() == backend.name()) {
                    backends.push(backend);
                }
            }
        }

        if config.plan.is_empty() {
            return Err(DecodeError::Config("decode plan is empty".to_string()));
        }
        for name in config.plan.backends() {
            if !backends.iter().any(|b| b.name() == name) {
                return Err(DecodeError::Config(format!(
                    "plan uses unknown backend '{name}'"
                )));
            }
        }
        for (index, step) in config.plan.steps().iter().enumerate() {
            step.variant.validate().map_err(|message| {
                DecodeError::Config(format!("plan step {}: {message}", index + 1))
            })?;
        }
        config.preprocess.validate().map_err(DecodeError::Config)?;

        Ok(Decoder {
            backends,
            plan: config.plan,
            preprocess: config.preprocess,
        })
    }
}

/// Images derived from the preprocessed base during one decode call.
///
/// The rotated image is rebuilt only when the rotation changes, and each
/// variant of it is built at most once.
#[derive(Default)]
struct StepImages {
    rotated: Option<(Rotation, GrayImage)>,
    variants: Vec<(Variant, GrayImage)>,
}

impl StepImages {
    fn image_for(
        &mut self,
        base: &GrayImage,
        rotation: Rotation,
        variant: Variant,
        filter: FilterType,
    ) -> &GrayImage {
        if !matches!(&self.rotated, Some((current, _)) if *current == rotation) {
            self.variants.clear();
            self.rotated = None;
        }
        let (_, rotated) = self
            .rotated
            .get_or_insert_with(|| (rotation, rotation.apply(base)));
        let rotated: &GrayImage = rotated;
        if variant == Variant::Original {
            return rotated;
        }

        let index = match self.variants.iter().position(|(v, _)| *v == variant) {
            Some(index) => index,
            None => {
                let derived = variant.apply(rotated, filter);
                self.variants.push((variant, derived));
                self.variants.len() - 1
            }
        };
        &self.variants[index].1
    }
}
