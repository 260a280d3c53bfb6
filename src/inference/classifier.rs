//! Flower classifier combining preprocessing, inference and the decision policy.

use crate::constants::DEFAULT_TOP_K;
use crate::error::Result;
use crate::imaging::{decode_image_file, preprocess};
use crate::inference::decision::{ClassificationResult, Prediction, decide, top_k};
use crate::inference::engine::{EngineOptions, InferenceEngine, ModelArtifact, OnnxEngine};
use crate::inference::LabelCatalog;
use image::DynamicImage;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

/// Full outcome of one classification request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// Thresholded decision.
    pub result: ClassificationResult,
    /// Highest-ranked classes regardless of threshold.
    pub top: Vec<Prediction>,
}

/// Classifier bound to one model, one label catalog and one threshold.
pub struct FlowerClassifier<E = OnnxEngine> {
    engine: E,
    catalog: LabelCatalog,
    threshold: f32,
    top_k: usize,
}

impl FlowerClassifier<OnnxEngine> {
    /// Load the ONNX model and labels from disk.
    pub fn from_files(
        model_path: &Path,
        labels_path: &Path,
        options: &EngineOptions,
        threshold: f32,
    ) -> Result<Self> {
        let catalog = LabelCatalog::from_file(labels_path)?;
        let artifact = ModelArtifact::open(model_path)?;
        let engine = OnnxEngine::load(&artifact, options)?;
        Ok(Self::new(engine, catalog, threshold))
    }
}

impl<E: InferenceEngine> FlowerClassifier<E> {
    /// Wrap an engine and catalog.
    pub fn new(engine: E, catalog: LabelCatalog, threshold: f32) -> Self {
        if catalog.len() != engine.output_len() {
            warn!(
                "Label catalog has {} entries but the model produces {} classes; unlabeled classes will be reported as unrecognized",
                catalog.len(),
                engine.output_len()
            );
        }

        Self {
            engine,
            catalog,
            threshold,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Override the number of ranked predictions reported.
    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Current acceptance threshold.
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Label catalog in use.
    pub const fn catalog(&self) -> &LabelCatalog {
        &self.catalog
    }

    /// Classify a decoded bitmap.
    pub fn classify_image(&mut self, image: &DynamicImage) -> Result<Classification> {
        let start = Instant::now();
        let tensor = preprocess(image)?;
        let preprocess_ms = start.elapsed().as_secs_f64() * 1000.0;

        let start = Instant::now();
        let probabilities = self.engine.infer(&tensor)?;
        let inference_ms = start.elapsed().as_secs_f64() * 1000.0;

        let result = decide(&probabilities, &self.catalog, self.threshold);
        let top = top_k(&probabilities, &self.catalog, self.top_k);

        debug!(
            "Preprocess {:.1}ms, inference {:.1}ms, result: {}",
            preprocess_ms, inference_ms, result
        );

        Ok(Classification { result, top })
    }

    /// Decode and classify an image file.
    pub fn classify_file(&mut self, path: &Path) -> Result<Classification> {
        let start = Instant::now();
        let image = decode_image_file(path)?;
        debug!(
            "Decoded {} ({}x{}) in {:.1}ms",
            path.display(),
            image.width(),
            image.height(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        self.classify_image(&image)
    }
}
