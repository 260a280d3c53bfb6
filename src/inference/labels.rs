//! Label catalog loading.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Ordered class names, where index `i` names model output channel `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCatalog {
    labels: Vec<String>,
}

impl LabelCatalog {
    /// Build a catalog from an already ordered list of labels.
    pub fn from_labels(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Read a catalog from a labels file.
    ///
    /// # File Format
    /// - One label per line, in model output order
    /// - Surrounding whitespace is trimmed
    /// - Blank lines are ignored and do not consume an index
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::LabelsRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let catalog = Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            Error::Io(source) => Error::LabelsRead {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        if catalog.is_empty() {
            return Err(Error::EmptyCatalog {
                path: path.to_path_buf(),
            });
        }

        debug!("Loaded {} labels from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Read a catalog from any line-oriented UTF-8 source.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut labels = Vec::new();
        let mut pending_blank = 0usize;
        let mut interior_blank = 0usize;

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                pending_blank += 1;
                continue;
            }
            if !labels.is_empty() {
                interior_blank += pending_blank;
            }
            pending_blank = 0;
            labels.push(trimmed.to_string());
        }

        if interior_blank > 0 {
            warn!(
                "Labels contain {} blank line(s) between entries; indices count non-blank lines only",
                interior_blank
            );
        }

        Ok(Self { labels })
    }

    /// Label for output channel `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the catalog has no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All labels in index order.
    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test setup code - panics are acceptable
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_labels_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "pink primrose").unwrap();
        writeln!(file, "hard-leaved pocket orchid").unwrap();
        writeln!(file, "canterbury bells").unwrap();

        let catalog = LabelCatalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(0), Some("pink primrose"));
        assert_eq!(catalog.get(2), Some("canterbury bells"));
        assert_eq!(catalog.get(3), None);
    }

    #[test]
    fn test_blank_lines_do_not_consume_indices() {
        let input = "rose\n\n   \nsunflower\n\n";
        let catalog = LabelCatalog::from_reader(input.as_bytes()).unwrap();
        assert_eq!(catalog.as_slice(), &["rose".to_string(), "sunflower".to_string()]);
        assert_eq!(catalog.get(1), Some("sunflower"));
    }

    #[test]
    fn test_crlf_line_endings_are_trimmed() {
        let catalog = LabelCatalog::from_reader("daisy\r\ntulip\r\n".as_bytes()).unwrap();
        assert_eq!(catalog.get(0), Some("daisy"));
        assert_eq!(catalog.get(1), Some("tulip"));
    }

    #[test]
    fn test_read_labels_file_not_found() {
        let result = LabelCatalog::from_file(Path::new("nonexistent_labels.txt"));
        assert!(matches!(result, Err(Error::LabelsRead { .. })));
    }

    #[test]
    fn test_empty_labels_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file).unwrap();

        let result = LabelCatalog::from_file(file.path());
        assert!(matches!(result, Err(Error::EmptyCatalog { .. })));
    }
}
