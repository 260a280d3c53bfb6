//! ONNX Runtime inference engine.

use crate::config::InferenceDevice;
use crate::constants::NUM_CLASSES;
use crate::constants::tensor::SHAPE;
use crate::error::{Error, Result};
use crate::imaging::ImageTensor;
use memmap2::Mmap;
use ort::execution_providers::{
    CPUExecutionProvider, CUDAExecutionProvider, CoreMLExecutionProvider,
    DirectMLExecutionProvider,
};
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Per-class model output, one value per catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityVector(Vec<f32>);

impl ProbabilityVector {
    /// Wrap raw model output.
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Take ownership of the values.
    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

impl Deref for ProbabilityVector {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

/// Anything that turns an input tensor into a probability vector.
pub trait InferenceEngine {
    /// Run the model once on `input`.
    fn infer(&mut self, input: &ImageTensor) -> Result<ProbabilityVector>;

    /// Length of the vector `infer` produces.
    fn output_len(&self) -> usize;
}

/// Read-only memory map of a serialized model.
pub struct ModelArtifact {
    path: PathBuf,
    mmap: Mmap,
}

impl ModelArtifact {
    /// Map a model file into memory.
    #[allow(unsafe_code)]
    pub fn open(path: &Path) -> Result<Self> {
        let load_error = |reason: String| Error::ModelLoad {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
        let len = file.metadata().map_err(|e| load_error(e.to_string()))?.len();
        if len == 0 {
            return Err(load_error("model file is empty".to_string()));
        }

        // SAFETY: the mapping is read-only and the model file is not expected
        // to be modified while florascope runs.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| load_error(e.to_string()))?;

        debug!("Mapped {} bytes from {}", mmap.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    /// Path the artifact was mapped from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw model bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }
}

/// Session construction settings.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Execution device.
    pub device: InferenceDevice,
    /// Intra-op thread count; 0 leaves the runtime default.
    pub intra_threads: usize,
    /// Expected number of output classes.
    pub num_classes: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            device: InferenceDevice::Auto,
            intra_threads: 1,
            num_classes: NUM_CLASSES,
        }
    }
}

/// ONNX Runtime session over a single-input, single-output classifier.
pub struct OnnxEngine {
    session: Session,
    num_classes: usize,
}

impl OnnxEngine {
    /// Build a session from a memory-mapped artifact.
    pub fn load(artifact: &ModelArtifact, options: &EngineOptions) -> Result<Self> {
        Self::from_bytes(artifact.bytes(), artifact.path(), options)
    }

    /// Build a session from serialized model bytes.
    ///
    /// `source` is only used to label errors and log lines.
    pub fn from_bytes(bytes: &[u8], source: &Path, options: &EngineOptions) -> Result<Self> {
        let load_error = |reason: String| Error::ModelLoad {
            path: source.to_path_buf(),
            reason,
        };

        let mut builder = Session::builder()
            .map_err(|e| load_error(format!("failed to create session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error(format!("failed to set optimization level: {e}")))?;

        if options.intra_threads > 0 {
            builder = builder
                .with_intra_threads(options.intra_threads)
                .map_err(|e| load_error(format!("failed to set intra threads: {e}")))?;
        }

        builder = match options.device {
            InferenceDevice::Cpu => {
                info!("Requested device: CPU");
                builder
                    .with_execution_providers([CPUExecutionProvider::default().build()])
                    .map_err(|e| load_error(format!("failed to register CPU provider: {e}")))?
            }
            InferenceDevice::Auto | InferenceDevice::Gpu => {
                // Unavailable providers are skipped by the runtime, CPU is the final fallback.
                info!("Requested device: {:?}", options.device);
                builder
                    .with_execution_providers([
                        CUDAExecutionProvider::default().build(),
                        CoreMLExecutionProvider::default().build(),
                        DirectMLExecutionProvider::default().build(),
                        CPUExecutionProvider::default().build(),
                    ])
                    .map_err(|e| load_error(format!("failed to register GPU providers: {e}")))?
            }
        };

        let session = builder
            .commit_from_memory(bytes)
            .map_err(|e| load_error(e.to_string()))?;

        let (inputs, outputs) = (session.inputs().len(), session.outputs().len());
        if inputs != 1 || outputs != 1 {
            return Err(Error::ShapeMismatch {
                tensor: "model signature",
                expected: "1 input and 1 output".to_string(),
                actual: format!("{inputs} input(s) and {outputs} output(s)"),
            });
        }

        let input_dims = session.inputs()[0]
            .dtype()
            .tensor_shape()
            .map(|shape| shape.to_vec())
            .ok_or_else(|| load_error("model input is not a tensor".to_string()))?;
        check_input_dims(&input_dims)?;

        let output_dims = session.outputs()[0]
            .dtype()
            .tensor_shape()
            .map(|shape| shape.to_vec())
            .ok_or_else(|| load_error("model output is not a tensor".to_string()))?;
        check_output_dims(&output_dims, options.num_classes)?;

        info!("Loaded model: {}", source.display());
        Ok(Self {
            session,
            num_classes: options.num_classes,
        })
    }
}

/// A declared dimension matches when it is dynamic (negative) or equal.
fn dim_matches(declared: i64, expected: usize) -> bool {
    declared < 0 || usize::try_from(declared).is_ok_and(|d| d == expected)
}

/// Model input must be `[1, 224, 224, 3]`, dynamic dimensions allowed.
fn check_input_dims(declared: &[i64]) -> Result<()> {
    let matches = declared.len() == SHAPE.len()
        && declared
            .iter()
            .zip(SHAPE)
            .all(|(&d, expected)| dim_matches(d, expected));

    if matches {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            tensor: "input",
            expected: format!("{SHAPE:?}"),
            actual: format!("{declared:?}"),
        })
    }
}

/// Model output must end in `num_classes`, dynamic dimensions allowed.
fn check_output_dims(declared: &[i64], num_classes: usize) -> Result<()> {
    match declared.last() {
        Some(&last) if dim_matches(last, num_classes) => Ok(()),
        _ => Err(Error::ShapeMismatch {
            tensor: "output",
            expected: format!("[.., {num_classes}]"),
            actual: format!("{declared:?}"),
        }),
    }
}

impl InferenceEngine for OnnxEngine {
    fn infer(&mut self, input: &ImageTensor) -> Result<ProbabilityVector> {
        let tensor = Tensor::from_array((input.shape(), input.as_slice().to_vec())).map_err(
            |e| Error::Inference {
                reason: "failed to create input tensor".to_string(),
                source: Box::new(e),
            },
        )?;

        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .map_err(|e| Error::Inference {
                reason: "session run failed".to_string(),
                source: Box::new(e),
            })?;

        if outputs.len() != 1 {
            return Err(Error::ShapeMismatch {
                tensor: "output",
                expected: "1 tensor".to_string(),
                actual: format!("{} tensors", outputs.len()),
            });
        }

        let (_, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference {
                reason: "failed to extract output tensor".to_string(),
                source: Box::new(e),
            })?;

        if data.len() != self.num_classes {
            return Err(Error::ShapeMismatch {
                tensor: "output",
                expected: format!("{} elements", self.num_classes),
                actual: format!("{} elements", data.len()),
            });
        }

        Ok(ProbabilityVector::new(data.to_vec()))
    }

    fn output_len(&self) -> usize {
        self.num_classes
    }
}
