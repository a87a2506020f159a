//! Pipeline stages: the stage trait, analysis stages, and reporter stages.

use crate::config::RuleConfiguration;
use crate::engine::{AnalyzerBox, WriterBox};
use crate::error::PipelineError;
use crate::record::{DiagnosticSet, FileRecord};
use tracing::debug;

/// One unit of a pipeline.
///
/// A stage receives each record exactly once, in arrival order, and either
/// forwards it or fails the run. `finish` is called once after the last
/// record.
pub trait Stage {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Handles one record.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the run.
    fn process(&mut self, record: FileRecord) -> Result<FileRecord, PipelineError>;

    /// Called once when no more records will arrive.
    ///
    /// # Errors
    ///
    /// Returns an error to fail the run at end of stream.
    fn finish(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }
}

/// Type alias for boxed [`Stage`] trait objects.
pub type StageBox = Box<dyn Stage>;

/// Runs one analyzer over buffered records and annotates them.
pub struct AnalysisStage {
    engine: String,
    analyzer: AnalyzerBox,
}

impl AnalysisStage {
    /// Configures `analyzer` with `rules` and wraps it in a stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configure`] if the analyzer rejects the rules.
    pub fn new(mut analyzer: AnalyzerBox, rules: &RuleConfiguration) -> Result<Self, PipelineError> {
        let engine = analyzer.name().to_string();
        analyzer
            .configure(rules)
            .map_err(|source| PipelineError::Configure {
                engine: engine.clone(),
                source,
            })?;
        debug!("Configured engine `{}` with {} rule(s)", engine, rules.len());
        Ok(Self { engine, analyzer })
    }

    /// Name of the wrapped engine.
    #[must_use]
    pub fn engine(&self) -> &str {
        &self.engine
    }
}

impl Stage for AnalysisStage {
    fn name(&self) -> &str {
        &self.engine
    }

    fn process(&mut self, record: FileRecord) -> Result<FileRecord, PipelineError> {
        if record.is_streamed() {
            return Err(PipelineError::StreamingUnsupported {
                engine: self.engine.clone(),
                path: record.path().to_path_buf(),
            });
        }

        let Some(bytes) = record.contents() else {
            return Ok(record);
        };

        if self.analyzer.is_excluded(record.path()) {
            debug!("{}: excluded {}", self.engine, record.path().display());
            return Ok(record);
        }

        let text = std::str::from_utf8(bytes).map_err(|_| PipelineError::InvalidEncoding {
            path: record.path().to_path_buf(),
        })?;

        let errors = self
            .analyzer
            .check_text(text, record.path())
            .map_err(|source| PipelineError::Engine {
                engine: self.engine.clone(),
                path: record.path().to_path_buf(),
                source,
            })?;

        debug!(
            "{}: {} diagnostic(s) in {}",
            self.engine,
            errors.len(),
            record.path().display()
        );

        let set = DiagnosticSet::new(errors);
        Ok(record.with_annotation(self.engine.clone(), set))
    }
}

/// Hands one engine's diagnostics to a writer whenever a record has any.
pub struct ReporterStage {
    name: String,
    engine: String,
    writer: WriterBox,
}

impl ReporterStage {
    /// Creates a reporter for `engine`'s annotations.
    #[must_use]
    pub fn new(engine: impl Into<String>, writer: WriterBox) -> Self {
        let engine = engine.into();
        Self {
            name: format!("{engine}-reporter"),
            engine,
            writer,
        }
    }
}

impl Stage for ReporterStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&mut self, record: FileRecord) -> Result<FileRecord, PipelineError> {
        if let Some(set) = record.annotation(&self.engine) {
            if !set.is_empty() {
                self.writer.write(&[set]);
            }
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Analyzer, DiagnosticWriter, EngineError};
    use crate::types::{Location, Severity, Violation};
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    /// Reports one diagnostic per occurrence of `needle`.
    struct NeedleAnalyzer {
        needle: String,
        excluded_suffix: Option<&'static str>,
        configured: bool,
    }

    impl NeedleAnalyzer {
        fn boxed(excluded_suffix: Option<&'static str>) -> AnalyzerBox {
            Box::new(Self {
                needle: String::new(),
                excluded_suffix,
                configured: false,
            })
        }
    }

    impl Analyzer for NeedleAnalyzer {
        fn name(&self) -> &str {
            "needle"
        }

        fn configure(&mut self, rules: &RuleConfiguration) -> Result<(), EngineError> {
            let Some(setting) = rules.get("needle") else {
                return Err(EngineError::new("missing `needle` rule"));
            };
            self.needle = setting
                .option("text")
                .and_then(toml::Value::as_str)
                .unwrap_or("bad")
                .to_string();
            self.configured = true;
            Ok(())
        }

        fn check_text(&self, contents: &str, path: &Path) -> Result<Vec<Violation>, EngineError> {
            assert!(self.configured);
            if contents.contains("PANIC") {
                return Err(EngineError::new("engine crashed"));
            }
            Ok(contents
                .match_indices(&self.needle)
                .map(|(offset, _)| {
                    Violation::new(
                        "N001",
                        "needle",
                        Severity::Error,
                        Location::new(path, 1, offset + 1),
                        "needle found",
                    )
                })
                .collect())
        }

        fn is_excluded(&self, path: &Path) -> bool {
            self.excluded_suffix
                .is_some_and(|s| path.to_string_lossy().ends_with(s))
        }
    }

    fn rules() -> RuleConfiguration {
        toml::from_str(r#"needle = { text = "bad" }"#).expect("rules should parse")
    }

    fn stage(excluded_suffix: Option<&'static str>) -> AnalysisStage {
        AnalysisStage::new(NeedleAnalyzer::boxed(excluded_suffix), &rules())
            .expect("stage should configure")
    }

    #[test]
    fn annotates_buffered_records() {
        let record = stage(None)
            .process(FileRecord::buffered("a.rs", "bad bad good"))
            .expect("should forward");
        let set = record.annotation("needle").expect("annotated");
        assert_eq!(set.error_count(), 2);
        assert_eq!(set.errors()[1].location.column, 5);
    }

    #[test]
    fn clean_records_get_an_empty_annotation() {
        let record = stage(None)
            .process(FileRecord::buffered("a.rs", "good"))
            .expect("should forward");
        assert_eq!(record.annotation("needle").map(DiagnosticSet::error_count), Some(0));
    }

    #[test]
    fn streamed_records_are_rejected() {
        let err = stage(None)
            .process(FileRecord::streamed("a.rs"))
            .expect_err("should fail");
        assert!(matches!(err, PipelineError::StreamingUnsupported { ref engine, .. } if engine == "needle"));
    }

    #[test]
    fn null_records_pass_without_annotation() {
        let record = stage(None)
            .process(FileRecord::null("dir"))
            .expect("should forward");
        assert!(record.annotation("needle").is_none());
    }

    #[test]
    fn excluded_records_pass_without_annotation() {
        let record = stage(Some(".gen.rs"))
            .process(FileRecord::buffered("a.gen.rs", "bad"))
            .expect("should forward");
        assert!(record.annotation("needle").is_none());
    }

    #[test]
    fn engine_failures_abort() {
        let err = stage(None)
            .process(FileRecord::buffered("a.rs", "PANIC"))
            .expect_err("should fail");
        assert_eq!(err.to_string(), "engine crashed");
    }

    #[test]
    fn invalid_utf8_is_a_hard_failure() {
        let err = stage(None)
            .process(FileRecord::buffered("a.rs", vec![0xff, 0xfe]))
            .expect_err("should fail");
        assert!(matches!(err, PipelineError::InvalidEncoding { .. }));
    }

    #[test]
    fn configuration_errors_surface_at_construction() {
        let result = AnalysisStage::new(NeedleAnalyzer::boxed(None), &RuleConfiguration::new());
        assert!(matches!(result, Err(PipelineError::Configure { ref engine, .. }) if engine == "needle"));
    }

    struct RecordingWriter(Rc<RefCell<Vec<usize>>>);

    impl DiagnosticWriter for RecordingWriter {
        fn write(&mut self, sets: &[&DiagnosticSet]) {
            self.0
                .borrow_mut()
                .extend(sets.iter().map(|s| s.error_count()));
        }
    }

    #[test]
    fn reporter_writes_only_when_engine_has_errors() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut reporter = ReporterStage::new("needle", Box::new(RecordingWriter(calls.clone())));
        let mut analysis = stage(None);

        for contents in ["good", "bad", "bad bad"] {
            let record = analysis
                .process(FileRecord::buffered("a.rs", contents))
                .expect("should forward");
            let forwarded = reporter.process(record.clone()).expect("never fails");
            assert_eq!(forwarded, record);
        }
        reporter
            .process(FileRecord::null("dir"))
            .expect("never fails");

        assert_eq!(*calls.borrow(), vec![1, 2]);
    }

    #[test]
    fn reporter_writes_warning_only_sets() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut reporter = ReporterStage::new("needle", Box::new(RecordingWriter(calls.clone())));
        let warning = Violation::new(
            "N001",
            "needle",
            Severity::Warning,
            Location::new("a.rs", 1, 1),
            "needle found",
        );
        let record = FileRecord::buffered("a.rs", "bad")
            .with_annotation("needle", DiagnosticSet::new(vec![warning]));
        reporter.process(record).expect("never fails");
        assert_eq!(*calls.borrow(), vec![0]);
    }

    #[test]
    fn reporter_ignores_other_engines() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut reporter = ReporterStage::new("other", Box::new(RecordingWriter(calls.clone())));
        let record = stage(None)
            .process(FileRecord::buffered("a.rs", "bad"))
            .expect("should forward");
        reporter.process(record).expect("never fails");
        assert!(calls.borrow().is_empty());
        assert_eq!(reporter.name(), "other-reporter");
    }
}
