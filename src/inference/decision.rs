//! Confidence-thresholded classification decision.
//!
//! Everything here is pure: a probability vector, a catalog and a threshold
//! go in, a result comes out.

use crate::inference::LabelCatalog;
use serde::Serialize;
use std::fmt;

/// Outcome of classifying one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ClassificationResult {
    /// The top class cleared the threshold and has a catalog entry.
    Recognized {
        /// Catalog label of the predicted class.
        label: String,
        /// Probability of the predicted class.
        confidence: f32,
    },
    /// No class cleared the threshold, or the top class has no label.
    Unrecognized,
}

impl ClassificationResult {
    /// Label of a recognized flower.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Recognized { label, .. } => Some(label),
            Self::Unrecognized => None,
        }
    }

    /// Whether a flower was recognized.
    pub const fn is_recognized(&self) -> bool {
        matches!(self, Self::Recognized { .. })
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recognized { label, confidence } => {
                write!(f, "{label} ({}%)", whole_percent(*confidence))
            }
            Self::Unrecognized => write!(f, "{}", crate::constants::UNRECOGNIZED_TEXT),
        }
    }
}

/// One ranked class from a probability vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Output channel index.
    pub index: usize,
    /// Catalog label, if the catalog covers this index.
    pub label: Option<String>,
    /// Probability of this class.
    pub confidence: f32,
}

/// Index and value of the largest element; the first occurrence wins ties.
///
/// NaN entries are never selected. Returns `None` for an empty or all-NaN vector.
pub fn argmax(probabilities: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in probabilities.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, current)| value > current) {
            best = Some((index, value));
        }
    }
    best
}

/// Turn a probability vector into a recognized label or `Unrecognized`.
///
/// The top class is accepted when its probability is at least `threshold`
/// (inclusive) and the catalog has a label for its index.
pub fn decide(
    probabilities: &[f32],
    catalog: &LabelCatalog,
    threshold: f32,
) -> ClassificationResult {
    let Some((index, confidence)) = argmax(probabilities) else {
        return ClassificationResult::Unrecognized;
    };

    if confidence < threshold {
        return ClassificationResult::Unrecognized;
    }

    catalog
        .get(index)
        .map_or(ClassificationResult::Unrecognized, |label| {
            ClassificationResult::Recognized {
                label: label.to_string(),
                confidence,
            }
        })
}

/// The `k` most probable classes, highest first; equal values keep index order.
pub fn top_k(probabilities: &[f32], catalog: &LabelCatalog, k: usize) -> Vec<Prediction> {
    let mut indexed: Vec<(usize, f32)> = probabilities
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));

    indexed
        .into_iter()
        .take(k)
        .map(|(index, confidence)| Prediction {
            index,
            label: catalog.get(index).map(str::to_string),
            confidence,
        })
        .collect()
}

/// Confidence as a truncated whole percentage, clamped to 0..=100.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_percent(confidence: f32) -> u32 {
    (confidence.clamp(0.0, 1.0) * 100.0) as u32
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn catalog(n: usize) -> LabelCatalog {
        LabelCatalog::from_labels((0..n).map(|i| format!("flower {i}")).collect())
    }

    fn vector_with(len: usize, entries: &[(usize, f32)]) -> Vec<f32> {
        let mut v = vec![0.0; len];
        for &(i, p) in entries {
            v[i] = p;
        }
        v
    }

    #[test]
    fn test_recognized_above_threshold() {
        let probs = vector_with(102, &[(17, 0.83)]);
        let result = decide(&probs, &catalog(102), 0.4);
        assert_eq!(
            result,
            ClassificationResult::Recognized {
                label: "flower 17".to_string(),
                confidence: 0.83
            }
        );
    }

    #[test]
    fn test_unrecognized_below_threshold() {
        let probs = vector_with(102, &[(3, 0.39)]);
        assert_eq!(
            decide(&probs, &catalog(102), 0.4),
            ClassificationResult::Unrecognized
        );
    }

    #[test]
    fn test_tie_prefers_lowest_index() {
        let mut probs = vec![0.5, 0.5, 0.1];
        probs.resize(102, 0.0);
        let result = decide(&probs, &catalog(102), 0.4);
        assert_eq!(result.label(), Some("flower 0"));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let probs = vector_with(102, &[(5, 0.4)]);
        assert!(decide(&probs, &catalog(102), 0.4).is_recognized());
    }

    #[test]
    fn test_one_ulp_below_threshold_is_unrecognized() {
        let threshold: f32 = 0.4;
        let below = f32::from_bits(threshold.to_bits() - 1);
        assert!(below < threshold);

        let probs = vector_with(102, &[(5, below)]);
        assert!(!decide(&probs, &catalog(102), threshold).is_recognized());
    }

    #[test]
    fn test_index_past_catalog_is_unrecognized() {
        let probs = vector_with(110, &[(105, 0.99)]);
        assert_eq!(
            decide(&probs, &catalog(102), 0.4),
            ClassificationResult::Unrecognized
        );
    }

    #[test]
    fn test_empty_vector_is_unrecognized() {
        assert_eq!(
            decide(&[], &catalog(102), 0.4),
            ClassificationResult::Unrecognized
        );
    }

    #[test]
    fn test_nan_is_never_selected() {
        let probs = [f32::NAN, 0.7, 0.2];
        assert_eq!(argmax(&probs), Some((1, 0.7)));
        assert_eq!(argmax(&[f32::NAN]), None);
    }

    #[test]
    fn test_decide_is_deterministic() {
        let probs = vector_with(102, &[(9, 0.45), (10, 0.45), (50, 0.1)]);
        let labels = catalog(102);
        let first = decide(&probs, &labels, 0.4);
        for _ in 0..10 {
            assert_eq!(decide(&probs, &labels, 0.4), first);
        }
    }

    #[test]
    fn test_top_k_ordering() {
        let probs = vector_with(102, &[(4, 0.2), (7, 0.6), (1, 0.2), (99, 0.05)]);
        let top = top_k(&probs, &catalog(102), 3);
        let indices: Vec<usize> = top.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![7, 1, 4]);
        assert_eq!(top[0].label.as_deref(), Some("flower 7"));
    }

    #[test]
    fn test_top_k_without_label() {
        let probs = vec![0.1, 0.9];
        let top = top_k(&probs, &catalog(1), 2);
        assert_eq!(top[0].index, 1);
        assert!(top[0].label.is_none());
    }

    #[test]
    fn test_display_text() {
        let recognized = ClassificationResult::Recognized {
            label: "sunflower".to_string(),
            confidence: 0.857,
        };
        assert_eq!(recognized.to_string(), "sunflower (85%)");
        assert_eq!(
            ClassificationResult::Unrecognized.to_string(),
            "Flower not recognized"
        );
    }
}
