//! Configuration type definitions.

use crate::constants::DEFAULT_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model and label files.
    pub model: ModelConfig,

    /// Default settings.
    pub defaults: DefaultsConfig,

    /// Inference settings.
    pub inference: InferenceConfig,

    /// Pin storage settings.
    pub storage: StorageConfig,
}

/// Location of the classifier artifacts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the ONNX model file.
    pub path: Option<PathBuf>,

    /// Path to the labels file.
    pub labels: Option<PathBuf>,
}

/// Default classification and pin settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Minimum confidence for a prediction to count as recognized.
    pub threshold: f32,

    /// Fixed latitude used when no location is given on the command line.
    pub latitude: Option<f64>,

    /// Fixed longitude used when no location is given on the command line.
    pub longitude: Option<f64>,

    /// Output format for classification results.
    pub result_format: ResultFormat,

    /// Output format for pin listings.
    pub pin_format: PinFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            latitude: None,
            longitude: None,
            result_format: ResultFormat::Text,
            pin_format: PinFormat::Text,
        }
    }
}

/// Inference device configuration.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum InferenceDevice {
    /// Try GPU providers, fall back to CPU.
    #[default]
    Auto,
    /// Prefer GPU providers.
    Gpu,
    /// Force CPU inference.
    Cpu,
}

/// Inference settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Device to use for inference.
    pub device: InferenceDevice,

    /// Intra-op threads for the runtime (0 = runtime default).
    pub intra_threads: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            device: InferenceDevice::Auto,
            intra_threads: 1,
        }
    }
}

/// Pin storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding pin records (default: platform data dir + `PINS`).
    pub pins_dir: Option<PathBuf>,
}

/// Output formats for classification results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    /// One human-readable line per image.
    #[default]
    Text,
    /// One JSON object per image.
    Json,
}

/// Output formats for pin listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PinFormat {
    /// Aligned text table.
    #[default]
    Text,
    /// JSON array of pin records.
    Json,
    /// CSV with a header row.
    Csv,
    /// GeoJSON feature collection for map renderers.
    Geojson,
}

impl std::fmt::Display for PinFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Geojson => write!(f, "geojson"),
        }
    }
}

impl std::str::FromStr for PinFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "geojson" | "geo" => Ok(Self::Geojson),
            other => Err(format!("unknown pin format: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_format_from_str() {
        assert_eq!("text".parse::<PinFormat>().ok(), Some(PinFormat::Text));
        assert_eq!("JSON".parse::<PinFormat>().ok(), Some(PinFormat::Json));
        assert_eq!("csv".parse::<PinFormat>().ok(), Some(PinFormat::Csv));
        assert_eq!("geo".parse::<PinFormat>().ok(), Some(PinFormat::Geojson));
        assert!("kml".parse::<PinFormat>().is_err());
    }

    #[test]
    fn test_pin_format_display() {
        assert_eq!(PinFormat::Geojson.to_string(), "geojson");
        assert_eq!(PinFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_defaults_config_default_values() {
        let defaults = DefaultsConfig::default();
        assert_eq!(defaults.threshold, 0.4);
        assert!(defaults.latitude.is_none());
        assert_eq!(defaults.pin_format, PinFormat::Text);
    }

    #[test]
    fn test_inference_config_defaults_to_single_thread() {
        let inference = InferenceConfig::default();
        assert_eq!(inference.device, InferenceDevice::Auto);
        assert_eq!(inference.intra_threads, 1);
    }
}
