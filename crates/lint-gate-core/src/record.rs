//! File records and the per-engine annotations they accumulate.

use crate::types::{Severity, Violation};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Payload carried by a [`FileRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Placeholder record with nothing to check (e.g., a directory entry).
    Null,
    /// Contents that are still being streamed and were never buffered.
    Streamed,
    /// Fully buffered file contents.
    Buffered(Vec<u8>),
}

/// Diagnostics produced by one engine for one file.
///
/// `error_count` counts the error-level diagnostics and `warning_count` the
/// rest; both are derived from `errors` by the only constructor. Only
/// `error_count` feeds the validation gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticSet {
    error_count: usize,
    warning_count: usize,
    errors: Vec<Violation>,
}

impl DiagnosticSet {
    /// Creates a set from an engine's ordered diagnostic list.
    #[must_use]
    pub fn new(errors: Vec<Violation>) -> Self {
        let error_count = errors
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count();
        Self {
            error_count,
            warning_count: errors.len() - error_count,
            errors,
        }
    }

    /// Number of error-level diagnostics in this set.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Number of diagnostics below error level.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Returns true when the engine reported nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// All diagnostics, warnings included, in the order the engine reported them.
    #[must_use]
    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }
}

/// A source file travelling through the pipeline.
///
/// The path never changes between stages. Annotations are added through
/// [`FileRecord::with_annotation`], which consumes the record and returns the
/// annotated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    path: PathBuf,
    payload: Payload,
    annotations: BTreeMap<String, DiagnosticSet>,
}

impl FileRecord {
    /// Creates a record with the given payload and no annotations.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, payload: Payload) -> Self {
        Self {
            path: path.into(),
            payload,
            annotations: BTreeMap::new(),
        }
    }

    /// Creates a record with buffered contents.
    #[must_use]
    pub fn buffered(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self::new(path, Payload::Buffered(contents.into()))
    }

    /// Creates a placeholder record.
    #[must_use]
    pub fn null(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Payload::Null)
    }

    /// Creates a record whose contents are still streaming.
    #[must_use]
    pub fn streamed(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Payload::Streamed)
    }

    /// Path identifying this record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The record payload.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Buffered contents, if any.
    #[must_use]
    pub fn contents(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Buffered(bytes) => Some(bytes),
            Payload::Null | Payload::Streamed => None,
        }
    }

    /// Returns true for placeholder records.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.payload, Payload::Null)
    }

    /// Returns true when the payload was never buffered.
    #[must_use]
    pub fn is_streamed(&self) -> bool {
        matches!(self.payload, Payload::Streamed)
    }

    /// Returns this record with `set` attached under `engine`.
    #[must_use]
    pub fn with_annotation(mut self, engine: impl Into<String>, set: DiagnosticSet) -> Self {
        self.annotations.insert(engine.into(), set);
        self
    }

    /// Returns the annotation left by `engine`, if it checked this file.
    #[must_use]
    pub fn annotation(&self, engine: &str) -> Option<&DiagnosticSet> {
        self.annotations.get(engine)
    }

    /// Iterates over all annotations, keyed by engine name.
    pub fn annotations(&self) -> impl Iterator<Item = (&str, &DiagnosticSet)> {
        self.annotations.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sum of `error_count` across every engine's annotation.
    #[must_use]
    pub fn total_error_count(&self) -> usize {
        self.annotations.values().map(DiagnosticSet::error_count).sum()
    }
}
