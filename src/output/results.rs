//! Classification result printing.

use crate::config::ResultFormat;
use crate::error::{Error, Result};
use crate::inference::{Classification, ClassificationResult, Prediction};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One JSON line per classified image.
#[derive(Debug, Serialize)]
struct ResultLine<'a> {
    file: String,
    #[serde(flatten)]
    result: &'a ClassificationResult,
    top: &'a [Prediction],
}

/// One JSON line per image that failed.
#[derive(Debug, Serialize)]
struct FailureLine {
    file: String,
    error: String,
}

/// Write the outcome for `path`.
///
/// Text is `<file>: <label> (<pct>%)`, or just the result text when `path`
/// is the only input. JSON is one object per line.
pub fn write_classification<W: Write>(
    writer: &mut W,
    path: &Path,
    classification: &Classification,
    format: ResultFormat,
    show_path: bool,
) -> Result<()> {
    match format {
        ResultFormat::Text => {
            if show_path {
                writeln!(writer, "{}: {}", path.display(), classification.result)?;
            } else {
                writeln!(writer, "{}", classification.result)?;
            }
        }
        ResultFormat::Json => {
            let line = ResultLine {
                file: path.display().to_string(),
                result: &classification.result,
                top: &classification.top,
            };
            serde_json::to_writer(&mut *writer, &line)
                .map_err(|source| Error::JsonWrite { source })?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Write a per-image failure. Text mode leaves failures to the log.
pub fn write_failure<W: Write>(
    writer: &mut W,
    path: &Path,
    error: &Error,
    format: ResultFormat,
) -> Result<()> {
    if format == ResultFormat::Json {
        let line = FailureLine {
            file: path.display().to_string(),
            error: error.to_string(),
        };
        serde_json::to_writer(&mut *writer, &line).map_err(|source| Error::JsonWrite { source })?;
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sunflower() -> Classification {
        Classification {
            result: ClassificationResult::Recognized {
                label: "sunflower".to_string(),
                confidence: 0.9,
            },
            top: vec![Prediction {
                index: 53,
                label: Some("sunflower".to_string()),
                confidence: 0.9,
            }],
        }
    }

    fn render(classification: &Classification, format: ResultFormat, show_path: bool) -> String {
        let mut out = Vec::new();
        write_classification(
            &mut out,
            Path::new("garden/a.jpg"),
            classification,
            format,
            show_path,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_single_image() {
        assert_eq!(
            render(&sunflower(), ResultFormat::Text, false),
            "sunflower (90%)\n"
        );
    }

    #[test]
    fn test_text_with_path() {
        assert_eq!(
            render(&sunflower(), ResultFormat::Text, true),
            "garden/a.jpg: sunflower (90%)\n"
        );
    }

    #[test]
    fn test_text_unrecognized() {
        let outcome = Classification {
            result: ClassificationResult::Unrecognized,
            top: Vec::new(),
        };
        assert_eq!(
            render(&outcome, ResultFormat::Text, false),
            "Flower not recognized\n"
        );
    }

    #[test]
    fn test_json_line() {
        let json = render(&sunflower(), ResultFormat::Json, false);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["file"], "garden/a.jpg");
        assert_eq!(value["status"], "recognized");
        assert_eq!(value["label"], "sunflower");
        assert_eq!(value["top"][0]["index"], 53);
    }

    #[test]
    fn test_failure_json_only() {
        let error = Error::InvalidImage {
            reason: "truncated".to_string(),
        };

        let mut text = Vec::new();
        write_failure(&mut text, Path::new("x.png"), &error, ResultFormat::Text).unwrap();
        assert!(text.is_empty());

        let mut json = Vec::new();
        write_failure(&mut json, Path::new("x.png"), &error, ResultFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["error"], "invalid image: truncated");
    }
}
