//! Decoder configuration.
//!
//! Every field has a default, and `#[serde(default)]` lets partial JSON files
//! override only what they mention.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::encode::DEFAULT_JPEG_QUALITY;
use crate::plan::DecodePlan;
use crate::preprocess::PreprocessConfig;

/// Default wall-clock limit for one external tool invocation.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Settings for the external command-line decoders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Program invoked as `<program> --raw <file>`.
    pub zbar_program: String,
    /// Program invoked as `<program> -format CODE_128 <file>`.
    pub zxing_program: String,
    /// Per-invocation timeout in milliseconds.
    pub timeout_ms: u64,
    /// JPEG quality for the zbar temp image (1-100).
    pub jpeg_quality: u8,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            zbar_program: "zbarimg".to_string(),
            zxing_program: "ZXingReader".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ToolConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Complete configuration of a [`crate::Decoder`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Preprocessing applied once per decode call.
    pub preprocess: PreprocessConfig,
    /// External tool settings.
    pub tools: ToolConfig,
    /// Directory for temp images; the system temp dir when unset.
    pub temp_dir: Option<PathBuf>,
    /// Ordered retry matrix.
    pub plan: DecodePlan,
}

impl DecodeConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory temp images are written to.
    pub fn resolved_temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecodeConfig::new();
        assert_eq!(config.tools.zbar_program, "zbarimg");
        assert_eq!(config.tools.zxing_program, "ZXingReader");
        assert_eq!(config.tools.timeout(), Duration::from_secs(10));
        assert_eq!(config.tools.jpeg_quality, 95);
        assert_eq!(config.plan, DecodePlan::standard());
        assert_eq!(config.resolved_temp_dir(), std::env::temp_dir());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{"tools": {"timeout_ms": 500}, "temp_dir": "/var/tmp/barcodes"}"#;
        let config: DecodeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.tools.timeout_ms, 500);
        assert_eq!(config.tools.zbar_program, "zbarimg");
        assert_eq!(config.resolved_temp_dir(), PathBuf::from("/var/tmp/barcodes"));
        assert_eq!(config.plan, DecodePlan::standard());
    }

    #[test]
    fn test_json_round_trip() {
        let config = DecodeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: DecodeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
