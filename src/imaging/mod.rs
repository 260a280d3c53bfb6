//! Image decoding and tensor preparation.

mod decode;
mod preprocess;

pub use decode::decode_image_file;
pub use preprocess::{ImageTensor, preprocess};
