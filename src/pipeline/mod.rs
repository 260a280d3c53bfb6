//! Batch classification pipeline.

mod coordinator;
mod processor;

pub use coordinator::collect_input_files;
pub use processor::{BatchOptions, BatchSummary, PinTarget, classify_files};
