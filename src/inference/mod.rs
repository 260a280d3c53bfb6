//! Inference module for flower species recognition.

mod classifier;
pub mod decision;
pub mod engine;
mod labels;

pub use classifier::{Classification, FlowerClassifier};
pub use decision::{ClassificationResult, Prediction, decide};
pub use engine::{EngineOptions, InferenceEngine, ModelArtifact, OnnxEngine, ProbabilityVector};
pub use labels::LabelCatalog;

#[cfg(test)]
pub(crate) use classifier::tests as classifier_tests;
