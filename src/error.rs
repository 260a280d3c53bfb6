//! Error types for florascope.

use std::path::PathBuf;

/// Result type alias for florascope operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for florascope.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Data directory could not be determined.
    #[error("could not determine data directory for this platform")]
    DataDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Model file does not exist.
    #[error("model file does not exist: {path}")]
    ModelFileNotFound {
        /// Path to the missing model file.
        path: PathBuf,
    },

    /// Labels file does not exist.
    #[error("labels file does not exist: {path}")]
    LabelsFileNotFound {
        /// Path to the missing labels file.
        path: PathBuf,
    },

    /// Failed to read labels file.
    #[error("failed to read labels file '{path}'")]
    LabelsRead {
        /// Path to the labels file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Labels file contained no labels.
    #[error("labels file '{path}' contains no labels")]
    EmptyCatalog {
        /// Path to the labels file.
        path: PathBuf,
    },

    /// No image files found in the given inputs.
    #[error("no valid image files found in the provided paths")]
    NoValidImageFiles,

    /// Failed to open image file.
    #[error("failed to open image file '{path}'")]
    ImageOpen {
        /// Path to the image file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Image could not be decoded or resampled.
    #[error("invalid image: {reason}")]
    InvalidImage {
        /// Description of the failure.
        reason: String,
    },

    /// Model artifact missing or malformed.
    #[error("failed to load model '{path}': {reason}")]
    ModelLoad {
        /// Path to the model artifact.
        path: PathBuf,
        /// Description of the load failure.
        reason: String,
    },

    /// Tensor shape did not match what the model expects or produced.
    #[error("shape mismatch for {tensor}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Which tensor mismatched (input or output).
        tensor: &'static str,
        /// Expected shape or element count.
        expected: String,
        /// Actual shape or element count.
        actual: String,
    },

    /// Inference runtime failure.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference step that failed.
        reason: String,
        /// Underlying runtime error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Current location could not be determined.
    #[error("current location is unavailable (pass --lat/--lon or set defaults.latitude/longitude)")]
    LocationUnavailable,

    /// Invalid latitude value.
    #[error("invalid latitude: {value} (must be -90.0 to 90.0)")]
    InvalidLatitude {
        /// Invalid latitude value.
        value: f64,
    },

    /// Invalid longitude value.
    #[error("invalid longitude: {value} (must be -180.0 to 180.0)")]
    InvalidLongitude {
        /// Invalid longitude value.
        value: f64,
    },

    /// Stored pin could not be parsed.
    #[error("malformed pin '{key}': {reason}")]
    MalformedPin {
        /// Store key of the malformed entry.
        key: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// Failed to access the pin store.
    #[error("pin store error at '{path}'")]
    StoreIo {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid key for the pin store.
    #[error("invalid store key '{key}'")]
    InvalidStoreKey {
        /// The rejected key.
        key: String,
    },

    /// Failed to encode a pin record.
    #[error("failed to encode pin record")]
    PinEncode {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write JSON output.
    #[error("failed to write JSON output")]
    JsonWrite {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write CSV output.
    #[error("failed to write CSV output")]
    CsvWrite {
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}
