//! Batch classification loop.

use crate::config::ResultFormat;
use crate::error::Result;
use crate::inference::{FlowerClassifier, InferenceEngine};
use crate::output::progress;
use crate::output::{write_classification, write_failure};
use crate::pins::{KeyValueStore, LocationProvider, PinStore};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};

/// Options for a batch run.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Result output format.
    pub format: ResultFormat,
    /// Stop at the first failing image instead of continuing.
    pub fail_fast: bool,
    /// Show a progress bar.
    pub progress: bool,
}

/// Where recognized flowers get pinned.
pub struct PinTarget<'a, S> {
    /// Store receiving the pins.
    pub store: &'a PinStore<S>,
    /// Location the pins are placed at.
    pub location: &'a dyn LocationProvider,
}

/// Counts from a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Images classified successfully.
    pub classified: usize,
    /// Images with a recognized flower.
    pub recognized: usize,
    /// Images that could not be classified.
    pub failed: usize,
    /// Pins saved.
    pub pinned: usize,
}

/// Classify `files` in order, writing one result per image to `out`.
///
/// A failing image is reported and counted unless `fail_fast` is set, in
/// which case its error is returned. Pin store failures always abort.
pub fn classify_files<E, S, W>(
    classifier: &mut FlowerClassifier<E>,
    files: &[PathBuf],
    options: BatchOptions,
    pin_target: Option<&PinTarget<'_, S>>,
    out: &mut W,
) -> Result<BatchSummary>
where
    E: InferenceEngine,
    S: KeyValueStore,
    W: Write,
{
    let start = Instant::now();
    let mut summary = BatchSummary::default();
    let show_path = files.len() > 1;
    let pb = progress::create_image_progress(files.len(), options.progress);

    for path in files {
        progress::set_progress_message(pb.as_ref(), &path.display().to_string());

        match classifier.classify_file(path) {
            Ok(classification) => {
                summary.classified += 1;
                write_classification(out, path, &classification, options.format, show_path)?;

                if let Some(label) = classification.result.label() {
                    summary.recognized += 1;
                    if let Some(target) = pin_target {
                        target.store.add_pin(target.location, label)?;
                        summary.pinned += 1;
                    }
                } else if pin_target.is_some() {
                    debug!("Not pinning {}: flower not recognized", path.display());
                }
            }
            Err(e) => {
                if options.fail_fast {
                    progress::finish_progress(pb, "aborted");
                    return Err(e);
                }
                error!("Failed to classify {}: {e}", path.display());
                write_failure(out, path, &e, options.format)?;
                summary.failed += 1;
            }
        }

        progress::inc_progress(pb.as_ref());
    }

    progress::finish_progress(pb, "done");
    out.flush()?;

    info!(
        "Classified {} image(s) in {:.2}s: {} recognized, {} failed, {} pinned",
        summary.classified,
        start.elapsed().as_secs_f64(),
        summary.recognized,
        summary.failed,
        summary.pinned
    );

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::inference::LabelCatalog;
    use crate::inference::classifier_tests::StubEngine;
    use crate::pins::{Coordinates, FixedLocation, MemoryStore};
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn catalog() -> LabelCatalog {
        LabelCatalog::from_labels(vec!["rose".to_string(), "tulip".to_string()])
    }

    fn write_photo(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        RgbImage::from_pixel(16, 16, Rgb([200, 40, 40]))
            .save(&path)
            .unwrap();
        path
    }

    fn options(format: ResultFormat, fail_fast: bool) -> BatchOptions {
        BatchOptions {
            format,
            fail_fast,
            progress: false,
        }
    }

    #[test]
    fn test_failed_image_does_not_stop_batch() {
        let dir = TempDir::new().unwrap();
        let good = write_photo(&dir, "a.png");
        let bad = dir.path().join("b.png");
        std::fs::write(&bad, b"not an image").unwrap();

        let mut classifier =
            FlowerClassifier::new(StubEngine::returning(vec![0.9, 0.1]), catalog(), 0.4);
        let mut out = Vec::new();
        let summary = classify_files::<_, MemoryStore, _>(
            &mut classifier,
            &[bad, good],
            options(ResultFormat::Text, false),
            None,
            &mut out,
        )
        .unwrap();

        assert_eq!(summary.classified, 1);
        assert_eq!(summary.failed, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("a.png: rose (90%)"));
    }

    #[test]
    fn test_fail_fast_returns_error() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("b.png");
        std::fs::write(&bad, b"not an image").unwrap();

        let mut classifier =
            FlowerClassifier::new(StubEngine::returning(vec![0.9, 0.1]), catalog(), 0.4);
        let result = classify_files::<_, MemoryStore, _>(
            &mut classifier,
            &[bad],
            options(ResultFormat::Text, true),
            None,
            &mut Vec::new(),
        );
        assert!(matches!(result, Err(Error::InvalidImage { .. })));
    }

    #[test]
    fn test_recognized_images_are_pinned() {
        let dir = TempDir::new().unwrap();
        let files = vec![write_photo(&dir, "a.png"), write_photo(&dir, "b.png")];
        let store = PinStore::new(MemoryStore::new());
        let location = FixedLocation::new(Coordinates::new(52.1, 21.0).unwrap());
        let target = PinTarget {
            store: &store,
            location: &location,
        };

        let mut classifier =
            FlowerClassifier::new(StubEngine::returning(vec![0.2, 0.8]), catalog(), 0.4);
        let summary = classify_files(
            &mut classifier,
            &files,
            options(ResultFormat::Json, false),
            Some(&target),
            &mut Vec::new(),
        )
        .unwrap();

        assert_eq!(summary.pinned, 2);
        let listing = store.listing().unwrap();
        assert!(listing.pins.iter().all(|p| p.label == "tulip"));
    }

    #[test]
    fn test_unrecognized_images_are_not_pinned() {
        let dir = TempDir::new().unwrap();
        let files = vec![write_photo(&dir, "a.png")];
        let store = PinStore::new(MemoryStore::new());
        let location = FixedLocation::new(Coordinates::new(52.1, 21.0).unwrap());
        let target = PinTarget {
            store: &store,
            location: &location,
        };

        let mut classifier =
            FlowerClassifier::new(StubEngine::returning(vec![0.3, 0.3]), catalog(), 0.4);
        let summary = classify_files(
            &mut classifier,
            &files,
            options(ResultFormat::Text, false),
            Some(&target),
            &mut Vec::new(),
        )
        .unwrap();

        assert_eq!(summary.recognized, 0);
        assert_eq!(summary.pinned, 0);
        assert!(store.listing().unwrap().pins.is_empty());
    }
}
