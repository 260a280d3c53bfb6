//! Bitmap to model-input tensor conversion.

use crate::constants::tensor::{CHANNELS, HEIGHT, LEN, MEAN, SHAPE, STD, WIDTH};
use crate::error::{Error, Result};
use image::DynamicImage;
use image::imageops::FilterType;

/// Model input buffer: 224x224 RGB, row-major, channel-interleaved f32.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Vec<f32>,
}

impl ImageTensor {
    /// Wrap a raw buffer, rejecting anything that is not exactly one input tensor.
    pub fn from_vec(data: Vec<f32>) -> Result<Self> {
        if data.len() != LEN {
            return Err(Error::ShapeMismatch {
                tensor: "input",
                expected: format!("{LEN} elements {SHAPE:?}"),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self { data })
    }

    /// Logical NHWC shape of the tensor.
    pub const fn shape(&self) -> [usize; 4] {
        SHAPE
    }

    /// Borrow the flat buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Values at pixel (`x`, `y`) as `[r, g, b]`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 3]> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        let offset = (y as usize * WIDTH as usize + x as usize) * CHANNELS;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ])
    }
}

/// Convert a decoded bitmap into the classifier's input tensor.
///
/// The image is stretched to 224x224 with a bilinear filter regardless of its
/// aspect ratio, alpha is dropped, and each 8-bit channel is mapped to
/// `(v - MEAN) / STD`.
pub fn preprocess(image: &DynamicImage) -> Result<ImageTensor> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(Error::InvalidImage {
            reason: format!("image has a zero dimension ({width}x{height})"),
        });
    }

    let resized = image.resize_exact(WIDTH, HEIGHT, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let data: Vec<f32> = rgb
        .into_raw()
        .into_iter()
        .map(|v| (f32::from(v) - MEAN) / STD)
        .collect();

    ImageTensor::from_vec(data)
}
