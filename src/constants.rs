//! Application-wide constants.
//!
//! Tensor layout, decision defaults and pin store naming live here so the
//! preprocessor, engine and store agree on them.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "florascope";

/// Default confidence threshold for accepting a prediction.
pub const DEFAULT_THRESHOLD: f32 = 0.4;

/// Number of top predictions reported alongside the decision.
pub const DEFAULT_TOP_K: usize = 5;

/// Number of flower classes the bundled classifier distinguishes.
pub const NUM_CLASSES: usize = 102;

/// Message shown when no class clears the threshold.
pub const UNRECOGNIZED_TEXT: &str = "Flower not recognized";

/// Model input tensor geometry.
pub mod tensor {
    /// Input height in pixels.
    pub const HEIGHT: u32 = 224;
    /// Input width in pixels.
    pub const WIDTH: u32 = 224;
    /// Color channels per pixel (R, G, B).
    pub const CHANNELS: usize = 3;
    /// Total element count of one input tensor.
    pub const LEN: usize = HEIGHT as usize * WIDTH as usize * CHANNELS;
    /// Input tensor shape, NHWC with batch size 1.
    pub const SHAPE: [usize; 4] = [1, HEIGHT as usize, WIDTH as usize, CHANNELS];

    /// Value subtracted from each 8-bit channel.
    pub const MEAN: f32 = 0.0;
    /// Divisor applied after mean subtraction.
    pub const STD: f32 = 255.0;
}

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
}

/// Pin store naming.
pub mod pins {
    /// Namespace directory holding one file per pin.
    pub const NAMESPACE: &str = "PINS";
    /// Prefix of every pin key.
    pub const KEY_PREFIX: &str = "pin_";
    /// Extension of record files inside the namespace.
    pub const RECORD_EXTENSION: &str = "json";
    /// Delimiter of the legacy `lat,lon,label` record form.
    pub const LEGACY_DELIMITER: char = ',';
}

/// Supported image file extensions for batch input collection.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp", "tif", "tiff"];
