use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::patterns::parse_line;
use crate::models::PairKey;

/// File extension scanned by default
pub const DEFAULT_EXTENSION: &str = ".md";

/// Filename never scanned, compared case-insensitively
pub const RESERVED_FILENAME: &str = "LICENSE.md";

/// Errors that can occur while scanning rendered output
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where a pair was seen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairOccurrence {
    pub person1: String,
    pub person2: String,
    pub filename: String,
    pub line_number: usize,
    pub line_text: String,
}

/// Scan counters; lines no pattern parses are skipped, not errors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_ignored: usize,
    pub lines_read: usize,
    pub lines_parsed: usize,
    pub lines_skipped: usize,
}

/// Every parsed pair and the places it occurred
#[derive(Debug, Clone, Default)]
pub struct PairIndex {
    pairs: HashMap<PairKey, Vec<PairOccurrence>>,
    stats: ScanStats,
}

impl PairIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every non-empty line of `text`, attributed to `filename`
    pub fn ingest_str(&mut self, filename: &str, text: &str) {
        for (idx, line) in text.lines().enumerate() {
            let stripped = line.trim();
            if stripped.is_empty() {
                continue;
            }
            self.stats.lines_read += 1;

            let Some(parsed) = parse_line(stripped) else {
                tracing::trace!("{}:{} skipped: {}", filename, idx + 1, stripped);
                self.stats.lines_skipped += 1;
                continue;
            };

            self.stats.lines_parsed += 1;
            let key = PairKey::new(parsed.first.as_str(), parsed.second.as_str());
            self.pairs.entry(key).or_default().push(PairOccurrence {
                person1: parsed.first,
                person2: parsed.second,
                filename: filename.to_string(),
                line_number: idx + 1,
                line_text: stripped.to_string(),
            });
        }
    }

    /// Number of distinct pairs seen
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Pairs seen more than once, ordered by their sorted ids
    pub fn find_duplicates(&self) -> DuplicateReport {
        let duplicates: BTreeMap<&PairKey, &Vec<PairOccurrence>> = self
            .pairs
            .iter()
            .filter(|(_, occs)| occs.len() > 1)
            .collect();

        DuplicateReport {
            duplicates: duplicates
                .into_iter()
                .map(|(pair, occs)| DuplicatePair {
                    pair: pair.clone(),
                    occurrences: occs.clone(),
                })
                .collect(),
            stats: self.stats,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub pair: PairKey,
    pub occurrences: Vec<PairOccurrence>,
}

/// Outcome of a verification scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub duplicates: Vec<DuplicatePair>,
    pub stats: ScanStats,
}

impl DuplicateReport {
    /// True when no pair occurred more than once
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty()
    }
}

/// Re-parses rendered round files and reports repeated pairs
///
/// Works only from the text on disk, independent of any in-run history, so it
/// also catches repeats across separate runs or introduced by rendering.
#[derive(Debug, Clone)]
pub struct DuplicateVerifier {
    extension: String,
}

impl DuplicateVerifier {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Whether a file with this name is scanned
    pub fn accepts(&self, filename: &str) -> bool {
        !filename.eq_ignore_ascii_case(RESERVED_FILENAME) && filename.ends_with(&self.extension)
    }

    /// Walk `root` recursively and index every accepted file
    pub fn collect_pairs(&self, root: &Path) -> Result<PairIndex, VerifyError> {
        if !root.is_dir() {
            return Err(VerifyError::NotADirectory(root.to_path_buf()));
        }

        let mut index = PairIndex::new();
        self.scan_dir(root, &mut index)?;

        tracing::debug!(
            "Scanned {} files under {}: {} lines parsed, {} skipped",
            index.stats.files_scanned,
            root.display(),
            index.stats.lines_parsed,
            index.stats.lines_skipped
        );
        Ok(index)
    }

    /// Collect pairs under `root` and report duplicates
    pub fn verify(&self, root: &Path) -> Result<DuplicateReport, VerifyError> {
        let report = self.collect_pairs(root)?.find_duplicates();
        if !report.is_clean() {
            tracing::warn!("{} duplicate pair(s) under {}", report.duplicates.len(), root.display());
        }
        Ok(report)
    }

    fn scan_dir(&self, dir: &Path, index: &mut PairIndex) -> Result<(), VerifyError> {
        let io_err = |source| VerifyError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(dir)
            .map_err(io_err)?
            .map(|entry| entry.and_then(|e| Ok((e.path(), e.file_type()?))))
            .collect::<Result<Vec<(PathBuf, fs::FileType)>, _>>()
            .map_err(io_err)?;
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        // Symlinked directories are never descended into
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for (path, file_type) in entries {
            if file_type.is_dir() {
                dirs.push(path);
            } else if file_type.is_symlink() && path.is_dir() {
                tracing::debug!("Skipping symlinked directory {}", path.display());
            } else {
                files.push(path);
            }
        }

        for path in files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if !self.accepts(&name) {
                index.stats.files_ignored += 1;
                continue;
            }

            let text = fs::read_to_string(&path).map_err(|source| VerifyError::Io {
                path: path.clone(),
                source,
            })?;
            index.stats.files_scanned += 1;
            index.ingest_str(&name, &text);
        }

        for sub in dirs {
            self.scan_dir(&sub, index)?;
        }
        Ok(())
    }
}

impl Default for DuplicateVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}
